//! Streaming query execution over posting-list cursors.
//!
//! The parsed query is planned into a tree of forward-only cursors, each
//! producing docids in strictly ascending order. `advance` moves a cursor
//! to its next docid; `current` reads it, with [`EXHAUSTED`] once the
//! stream is drained. Planning happens bottom-up while the tree is built,
//! so a freshly planned tree is ready to drain.

use crate::error::Result;
use crate::index::{DocumentIter, Index};
use crate::parse::{parse_query, Expr};
use crate::DocId;

/// Sentinel docid of a drained cursor.
const EXHAUSTED: DocId = DocId::MAX;

/// Runs boolean queries against a read-only index.
pub struct QueryExecutor<'a> {
    index: &'a Index,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(index: &'a Index) -> Self {
        QueryExecutor { index }
    }

    /// Execute `query`, returning matching document names in ascending
    /// docid order.
    ///
    /// Unknown terms match nothing; only malformed queries fail.
    pub fn run(&self, query: &str) -> Result<Vec<String>> {
        let tree = parse_query(query)?;
        let mut root = plan(&tree, self.index);
        let mut names = Vec::new();
        while root.advance() {
            names.push(self.index.document_name(root.current()).to_owned());
        }
        Ok(names)
    }
}

/// Build the prepared cursor tree for `expr`.
fn plan<'a>(expr: &Expr, index: &'a Index) -> Cursor<'a> {
    match expr {
        Expr::Term(word) => Cursor::Term(TermCursor::new(word, index)),
        Expr::Not(inner) => Cursor::Not(NotCursor::new(plan(inner, index), index)),
        Expr::And(operands) => {
            let children = operands.iter().map(|c| plan(c, index)).collect();
            Cursor::And(AndCursor::new(children))
        }
        Expr::Or(operands) => {
            let children = operands.iter().map(|c| plan(c, index)).collect();
            Cursor::Or(OrCursor::new(children))
        }
    }
}

enum Cursor<'a> {
    Term(TermCursor<'a>),
    Not(NotCursor<'a>),
    And(AndCursor<'a>),
    Or(OrCursor<'a>),
}

impl<'a> Cursor<'a> {
    /// Cardinality estimate used for planning.
    fn count(&self) -> u64 {
        match self {
            Cursor::Term(c) => c.count(),
            Cursor::Not(c) => c.count,
            Cursor::And(c) => c.count,
            Cursor::Or(c) => c.count,
        }
    }

    fn current(&self) -> DocId {
        match self {
            Cursor::Term(c) => c.doc,
            Cursor::Not(c) => c.doc,
            Cursor::And(c) => c.doc,
            Cursor::Or(c) => c.doc,
        }
    }

    /// Move to the next docid; false once the stream is drained.
    fn advance(&mut self) -> bool {
        match self {
            Cursor::Term(c) => c.advance(),
            Cursor::Not(c) => c.advance(),
            Cursor::And(c) => c.advance(),
            Cursor::Or(c) => c.advance(),
        }
    }

    fn is_not(&self) -> bool {
        matches!(self, Cursor::Not(_))
    }

    fn exhausted() -> Cursor<'a> {
        Cursor::Term(TermCursor::default())
    }
}

/// Advance `cursor` until it reaches or passes `doc`.
fn catch_up(cursor: &mut Cursor<'_>, doc: DocId) {
    while cursor.current() < doc && cursor.advance() {}
}

/// Do all `cursors` contain `doc`? Short-circuits on the first miss.
fn all_match(cursors: &mut [Cursor<'_>], doc: DocId) -> bool {
    cursors.iter_mut().all(|c| {
        catch_up(c, doc);
        c.current() == doc
    })
}

/// Does any of `cursors` contain `doc`? Short-circuits on the first hit.
fn any_match(cursors: &mut [Cursor<'_>], doc: DocId) -> bool {
    cursors.iter_mut().any(|c| {
        catch_up(c, doc);
        c.current() == doc
    })
}

/// Walks one term's posting list. Unknown terms are born drained.
struct TermCursor<'a> {
    postings: &'a [DocId],
    pos: usize,
    doc: DocId,
}

impl Default for TermCursor<'_> {
    fn default() -> Self {
        TermCursor {
            postings: &[],
            pos: 0,
            doc: EXHAUSTED,
        }
    }
}

impl<'a> TermCursor<'a> {
    fn new(word: &str, index: &'a Index) -> Self {
        let term = word.to_ascii_lowercase();
        let postings = index.find(&term).map(|list| list.as_slice()).unwrap_or(&[]);
        TermCursor {
            postings,
            pos: 0,
            doc: EXHAUSTED,
        }
    }

    fn count(&self) -> u64 {
        self.postings.len() as u64
    }

    fn advance(&mut self) -> bool {
        match self.postings.get(self.pos) {
            Some(&doc) => {
                self.doc = doc;
                self.pos += 1;
                true
            }
            None => {
                self.doc = EXHAUSTED;
                false
            }
        }
    }
}

/// Produces every real document the child does not match.
///
/// Walks the document table in ascending docid order, streaming the child
/// cursor alongside and skipping docids the child reports.
struct NotCursor<'a> {
    child: Box<Cursor<'a>>,
    documents: DocumentIter<'a>,
    doc: DocId,
    count: u64,
}

impl<'a> NotCursor<'a> {
    fn new(mut child: Cursor<'a>, index: &'a Index) -> Self {
        child.advance();
        // counts are estimates; a composite child may claim more than
        // the table holds
        let count = index.num_documents().saturating_sub(child.count());
        let mut documents = index.documents();
        documents.next(); // sentinel
        NotCursor {
            child: Box::new(child),
            documents,
            doc: EXHAUSTED,
            count,
        }
    }

    fn advance(&mut self) -> bool {
        for (&id, _) in self.documents.by_ref() {
            catch_up(&mut self.child, id);
            if self.child.current() == id {
                continue;
            }
            self.doc = id;
            return true;
        }
        self.doc = EXHAUSTED;
        false
    }
}

/// Intersection driven by the sparsest non-negated child.
struct AndCursor<'a> {
    driver: Box<Cursor<'a>>,
    intersectors: Vec<Cursor<'a>>,
    negators: Vec<Cursor<'a>>,
    doc: DocId,
    count: u64,
}

impl<'a> AndCursor<'a> {
    fn new(mut children: Vec<Cursor<'a>>) -> Self {
        children.sort_by_key(Cursor::count);
        let count = children.first().map_or(0, Cursor::count);

        // The sparsest non-Not child drives; a Not drives only when
        // every child is a Not.
        let driver = match children.iter().position(|c| !c.is_not()) {
            Some(pos) => children.remove(pos),
            None if children.is_empty() => Cursor::exhausted(),
            None => children.remove(0),
        };

        // Not children hand over their inner cursor as a negator; it was
        // seeded when the Not was built, so it must not be seeded again.
        let mut intersectors = Vec::new();
        let mut negators = Vec::new();
        for child in children {
            match child {
                Cursor::Not(not) => negators.push(*not.child),
                mut other => {
                    other.advance();
                    intersectors.push(other);
                }
            }
        }

        AndCursor {
            driver: Box::new(driver),
            intersectors,
            negators,
            doc: EXHAUSTED,
            count,
        }
    }

    fn advance(&mut self) -> bool {
        while self.driver.advance() {
            let doc = self.driver.current();
            if all_match(&mut self.intersectors, doc) && !any_match(&mut self.negators, doc) {
                self.doc = doc;
                return true;
            }
        }
        self.doc = EXHAUSTED;
        false
    }
}

/// Sorted-merge union.
struct OrCursor<'a> {
    children: Vec<Cursor<'a>>,
    doc: DocId,
    count: u64,
}

impl<'a> OrCursor<'a> {
    fn new(mut children: Vec<Cursor<'a>>) -> Self {
        let count = children.iter().map(Cursor::count).sum();
        for child in &mut children {
            child.advance();
        }
        // ordering hint only; the merge is order-independent
        children.sort_by_key(|c| (c.is_not(), c.count()));
        OrCursor {
            children,
            doc: EXHAUSTED,
            count,
        }
    }

    fn advance(&mut self) -> bool {
        let doc = self
            .children
            .iter()
            .map(Cursor::current)
            .min()
            .unwrap_or(EXHAUSTED);
        if doc == EXHAUSTED {
            self.doc = EXHAUSTED;
            return false;
        }
        for child in &mut self.children {
            if child.current() == doc {
                child.advance();
            }
        }
        self.doc = doc;
        true
    }
}
