//! Character scanner and token lexer for the query language.

/// One character of the query, tagged with its source position.
///
/// `position` is a 0-based byte offset; `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    pub value: char,
    pub line: u32,
    pub column: u32,
    pub position: usize,
}

/// Walks the query string character by character, tracking positions.
pub struct Scanner<'a> {
    query: &'a str,
    line: u32,
    column: u32,
    position: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(query: &'a str) -> Self {
        Scanner {
            query,
            line: 1,
            column: 1,
            position: 0,
        }
    }

    /// Next character; a `'\0'` character marks the end of input.
    pub fn next_character(&mut self) -> Character {
        let ch = match self.query[self.position..].chars().next() {
            Some(ch) => ch,
            None => {
                return Character {
                    value: '\0',
                    line: self.line,
                    column: self.column,
                    position: self.position,
                }
            }
        };

        let out = Character {
            value: ch,
            line: self.line,
            column: self.column,
            position: self.position,
        };
        self.position += ch.len_utf8();
        self.column += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A search term.
    Term,
    /// `(` or `)`.
    Symbol,
    /// `AND` or `OR`.
    BinaryOp,
    /// `NOT`.
    UnaryOp,
    /// End of input.
    End,
}

/// A lexed token with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
    pub position: usize,
}

/// Splits the query into terms, parentheses, and operator keywords.
///
/// Only the ASCII space separates tokens; tabs, newlines and other
/// whitespace are ordinary term characters. A parenthesis ends the term
/// being accumulated and is held back as a pending token, so the lexer
/// keeps exactly one token of lookahead. Operator keywords are recognized
/// only once a whole word has been accumulated.
pub struct Lexer<'a> {
    scanner: Scanner<'a>,
    pending: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(query: &'a str) -> Self {
        Lexer {
            scanner: Scanner::new(query),
            pending: None,
        }
    }

    /// Next token; `End` tokens repeat once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pending.take() {
            return token;
        }

        let mut ch = self.scanner.next_character();
        while ch.value == ' ' {
            ch = self.scanner.next_character();
        }

        if ch.value == '\0' {
            return token_at(String::new(), TokenKind::End, ch);
        }
        if ch.value == '(' || ch.value == ')' {
            return token_at(ch.value.to_string(), TokenKind::Symbol, ch);
        }

        let start = ch;
        let mut value = String::new();
        value.push(ch.value);
        loop {
            ch = self.scanner.next_character();
            match ch.value {
                '\0' | ' ' => break,
                '(' | ')' => {
                    self.pending = Some(token_at(ch.value.to_string(), TokenKind::Symbol, ch));
                    break;
                }
                c => value.push(c),
            }
        }

        let kind = match value.as_str() {
            "AND" | "OR" => TokenKind::BinaryOp,
            "NOT" => TokenKind::UnaryOp,
            _ => TokenKind::Term,
        };
        token_at(value, kind, start)
    }
}

fn token_at(value: String, kind: TokenKind, at: Character) -> Token {
    Token {
        value,
        kind,
        line: at.line,
        column: at.column,
        position: at.position,
    }
}
