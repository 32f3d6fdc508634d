//! Textual on-disk format for the index.
//!
//! Layout, one whitespace-separated token stream:
//!
//! ```text
//! <ndocs>
//! <docid> <name>          (ndocs lines)
//! <nterms>
//! <term> <npostings> <docid>...   (nterms lines)
//! ```
//!
//! `ndocs` excludes the docid-0 sentinel. Names and terms must be
//! whitespace-free tokens; names containing spaces are not supported.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::index::Index;
use crate::DocId;

impl Index {
    /// Serialize the index to `path`, replacing any existing file.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);

        writeln!(out, "{}", self.num_documents() - 1)?;
        for (id, name) in self.documents() {
            if *id != 0 {
                writeln!(out, "{id} {name}")?;
            }
        }

        writeln!(out, "{}", self.num_terms())?;
        for (term, list) in self.terms() {
            write!(out, "{term} {}", list.len())?;
            for id in list.iter() {
                write!(out, " {id}")?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Read an index back from `path`.
    ///
    /// A file that cannot be opened or read surfaces the I/O error as is.
    /// Any malformed content (missing or non-numeric fields, truncated
    /// posting lists) resets the index to the empty state and returns
    /// `Io("File corrupted")`, so a failed load never leaves partial
    /// contents behind.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let contents = std::fs::read_to_string(path)?;
        match self.parse_dump(&contents) {
            Some(()) => Ok(()),
            None => {
                self.reset();
                Err(Error::Io("File corrupted".into()))
            }
        }
    }

    fn parse_dump(&mut self, contents: &str) -> Option<()> {
        let mut fields = contents.split_ascii_whitespace();

        let num_docs: u64 = next_field(&mut fields)?;
        let mut max_doc_id: DocId = 0;
        for _ in 0..num_docs {
            let id: DocId = next_field(&mut fields)?;
            let name = fields.next()?;
            self.insert_document(id, name.to_owned());
            max_doc_id = max_doc_id.max(id);
        }
        self.set_next_doc_id(max_doc_id.saturating_add(1));

        let num_terms: u64 = next_field(&mut fields)?;
        for _ in 0..num_terms {
            let term = fields.next()?;
            let num_postings: u64 = next_field(&mut fields)?;
            for _ in 0..num_postings {
                let id: DocId = next_field(&mut fields)?;
                self.add_posting(term, id);
            }
        }
        Some(())
    }
}

fn next_field<'a, T, I>(fields: &mut I) -> Option<T>
where
    T: FromStr,
    I: Iterator<Item = &'a str>,
{
    fields.next()?.parse().ok()
}
