//! Whitespace tokenizer over document files, used by the ingest path.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

/// Streams whitespace-separated tokens out of a file.
///
/// Any run of whitespace delimits tokens. A read failure mid-stream ends
/// the iteration; the file is closed on drop.
#[derive(Debug)]
pub struct FileTokenizer {
    reader: BufReader<File>,
    pending: VecDeque<String>,
}

impl FileTokenizer {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(FileTokenizer {
            reader: BufReader::new(file),
            pending: VecDeque::new(),
        })
    }
}

impl Iterator for FileTokenizer {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => self
                    .pending
                    .extend(line.split_whitespace().map(str::to_owned)),
            }
        }
    }
}
