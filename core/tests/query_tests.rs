//! End-to-end query scenarios and executor properties.

use std::collections::BTreeSet;

use proptest::prelude::*;
use stacks_core::{Error, Index, QueryExecutor};

const TERMS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

/// The three-document corpus: a{cat,dog}, b{dog,fish}, c{cat,fish}.
fn menagerie() -> Index {
    let mut index = Index::new();
    for (name, terms) in [
        ("a.txt", ["cat", "dog"]),
        ("b.txt", ["dog", "fish"]),
        ("c.txt", ["cat", "fish"]),
    ] {
        let id = index.register_document(name);
        for term in terms {
            index.add_posting(term, id);
        }
    }
    index
}

fn run(index: &Index, query: &str) -> Vec<String> {
    QueryExecutor::new(index)
        .run(query)
        .unwrap_or_else(|err| panic!("query {query:?} failed: {err}"))
}

fn run_set(index: &Index, query: &str) -> BTreeSet<String> {
    run(index, query).into_iter().collect()
}

/// Build an index from per-document term sets; names sort like docids.
fn build(docs: &[BTreeSet<&str>]) -> Index {
    let mut index = Index::new();
    for (i, terms) in docs.iter().enumerate() {
        let id = index.register_document(&format!("doc-{i:03}.txt"));
        for term in terms {
            index.add_posting(term, id);
        }
    }
    index
}

#[test]
fn build_and_query() {
    let index = menagerie();
    assert_eq!(run(&index, "cat"), ["a.txt", "c.txt"]);
    assert_eq!(run(&index, "cat AND dog"), ["a.txt"]);
    assert_eq!(run(&index, "cat OR dog"), ["a.txt", "b.txt", "c.txt"]);
    assert_eq!(run(&index, "NOT cat"), ["b.txt"]);
    assert_eq!(run(&index, "(cat OR dog) AND NOT fish"), ["a.txt"]);
    assert!(run(&index, "fish AND NOT (cat OR dog)").is_empty());
}

#[test]
fn query_terms_are_case_folded() {
    let index = menagerie();
    assert_eq!(run(&index, "CAT"), run(&index, "cat"));
    assert_eq!(run(&index, "Cat AND dOg"), run(&index, "cat AND dog"));
}

#[test]
fn unknown_terms_yield_empty_results() {
    let index = menagerie();
    assert!(run(&index, "xyzzy").is_empty());
    assert!(run(&index, "cat AND xyzzy").is_empty());
    assert_eq!(run(&index, "cat OR xyzzy"), ["a.txt", "c.txt"]);
}

#[test]
fn syntax_errors_name_the_offending_position() {
    let index = menagerie();
    let executor = QueryExecutor::new(&index);

    let err = executor.run("cat AND").unwrap_err();
    assert_eq!(err, Error::Syntax("Syntax error at (1, 8)".into()));
    assert_eq!(err.to_string(), "[Syntax Error]: Syntax error at (1, 8)");

    assert!(matches!(executor.run("(cat").unwrap_err(), Error::Syntax(_)));
    // no implicit AND between adjacent terms
    assert!(matches!(executor.run("cat dog").unwrap_err(), Error::Syntax(_)));
}

#[test]
fn queries_survive_a_dump_load_cycle() {
    let index = menagerie();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menagerie.idx");
    index.dump(&path).unwrap();

    let mut loaded = Index::new();
    loaded.load(&path).unwrap();

    for query in [
        "cat",
        "cat AND dog",
        "cat OR dog",
        "NOT cat",
        "(cat OR dog) AND NOT fish",
        "fish AND NOT (cat OR dog)",
    ] {
        assert_eq!(run(&loaded, query), run(&index, query), "query {query:?}");
    }
}

#[test]
fn empty_index_file_loads_and_answers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.idx");
    Index::new().dump(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "0\n0\n");

    let mut index = Index::new();
    index.load(&path).unwrap();
    assert_eq!(index.num_documents(), 1);
    assert_eq!(index.num_terms(), 0);
    assert!(run(&index, "cat").is_empty());
    assert!(run(&index, "NOT cat").is_empty());
}

fn docs_strategy() -> impl Strategy<Value = Vec<BTreeSet<&'static str>>> {
    prop::collection::vec(
        prop::collection::btree_set(prop::sample::select(&TERMS[..]), 0..=3),
        0..10,
    )
}

proptest! {
    // P5: results come out strictly ascending (names sort like docids).
    #[test]
    fn results_are_strictly_ascending(docs in docs_strategy()) {
        let index = build(&docs);
        for query in [
            "alpha",
            "alpha AND beta",
            "alpha OR beta OR gamma",
            "NOT alpha",
            "(alpha OR beta) AND NOT gamma",
        ] {
            let names = run(&index, query);
            prop_assert!(
                names.windows(2).all(|w| w[0] < w[1]),
                "query {} returned {:?}",
                query,
                names
            );
        }
    }

    // P6: OR is union, AND is intersection, NOT is complement over the
    // real documents.
    #[test]
    fn connectives_match_set_algebra(docs in docs_strategy()) {
        let index = build(&docs);
        let pairs = [
            ("alpha", "beta"),
            ("alpha AND beta", "gamma"),
            ("NOT alpha", "beta OR delta"),
        ];
        for (q1, q2) in pairs {
            let r1 = run_set(&index, q1);
            let r2 = run_set(&index, q2);

            let union = run_set(&index, &format!("({q1}) OR ({q2})"));
            prop_assert_eq!(&union, &(&r1 | &r2), "OR of {} / {}", q1, q2);

            let intersection = run_set(&index, &format!("({q1}) AND ({q2})"));
            prop_assert_eq!(&intersection, &(&r1 & &r2), "AND of {} / {}", q1, q2);
        }

        let all_docs: BTreeSet<String> = index
            .documents()
            .filter(|&(&id, _)| id != 0)
            .map(|(_, name)| name.clone())
            .collect();
        for q in ["alpha", "alpha AND beta", "beta OR gamma"] {
            let complement = run_set(&index, &format!("NOT ({q})"));
            let expected: BTreeSet<String> = &all_docs - &run_set(&index, q);
            prop_assert_eq!(complement, expected, "NOT of {}", q);
        }
    }

    // P7: double negation is the identity.
    #[test]
    fn double_negation_is_identity(docs in docs_strategy()) {
        let index = build(&docs);
        for q in ["alpha", "beta AND gamma", "alpha OR delta"] {
            prop_assert_eq!(
                run(&index, &format!("NOT NOT ({q})")),
                run(&index, q),
                "query {}", q
            );
        }
    }

    // P8: operand order never changes the result set.
    #[test]
    fn operand_order_is_irrelevant(docs in docs_strategy()) {
        let index = build(&docs);
        let variants = [
            ("alpha AND beta", "beta AND alpha"),
            ("alpha OR beta", "beta OR alpha"),
            ("alpha AND beta AND gamma", "gamma AND beta AND alpha"),
            ("alpha OR beta OR gamma", "gamma OR alpha OR beta"),
            ("alpha AND NOT beta", "NOT beta AND alpha"),
            ("NOT alpha OR beta", "beta OR NOT alpha"),
        ];
        for (left, right) in variants {
            prop_assert_eq!(
                run(&index, left),
                run(&index, right),
                "{} vs {}", left, right
            );
        }
    }
}
