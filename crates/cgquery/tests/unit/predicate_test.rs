//! Unit tests for the predicate algebra
//!
//! Tests cover:
//! - Flag predicates and their negations
//! - Relationship predicates with set and pattern targets
//! - Self-relationship (recursion) predicates
//! - Pattern targets re-resolved per graph
//! - Composition with &, | and !

use cgquery::{CallGraph, Item, Predicate, RelationTarget, SymbolDecl};

// Helper: A -> B -> C -> A plus an isolated D, and a self-recursive R
fn create_cycle() -> cgquery::Result<CallGraph> {
    let mut graph = CallGraph::new();

    let a = graph.add_symbol(SymbolDecl::new("A", "cycle.c", 1));
    let b = graph.add_symbol(SymbolDecl::new("B", "cycle.c", 10));
    let c = graph.add_symbol(SymbolDecl::new("C", "cycle.c", 20));
    graph.add_symbol(SymbolDecl::new("D", "alone.c", 1));
    let r = graph.add_symbol(SymbolDecl::new("R", "rec.c", 5).with_static(true));

    graph.add_calls_batch(&[(a, b), (b, c), (c, a), (r, r)])?;
    graph.compute_callers();
    Ok(graph)
}

fn matches(graph: &CallGraph, predicate: &Predicate, name: &str) -> bool {
    let symbol = graph.symbols().find(|s| s.name == name).unwrap();
    predicate.eval(graph, Item::Symbol(symbol))
}

#[test]
fn test_flags() {
    let mut graph = CallGraph::new();
    graph.add_symbol(SymbolDecl::new("f", "f.c", 1));
    graph.add_symbol(SymbolDecl::new("v", "f.c", 2).with_variable(true));
    graph.add_symbol(SymbolDecl::new("s", "f.c", 3).with_static(true));
    graph.add_symbol(SymbolDecl::new("d", "f.h", 4).with_declaration(true));
    graph.compute_callers();
    let all = graph.all_program_symbols().unwrap();

    assert_eq!(all.filter(&Predicate::var()).names(), vec!["v"]);
    assert_eq!(all.filter(&Predicate::fun()).names(), vec!["f", "s", "d"]);
    assert_eq!(all.filter(&Predicate::is_static()).names(), vec!["s"]);
    assert_eq!(all.filter(&Predicate::is_extern()).names(), vec!["f", "v", "d"]);
    assert_eq!(all.filter(&Predicate::decl()).names(), vec!["d"]);
}

#[test]
fn test_calls_pattern() {
    let graph = create_cycle().unwrap();
    let calls_b = Predicate::calls(RelationTarget::pattern("B").unwrap());

    assert!(matches(&graph, &calls_b, "A"));
    assert!(!matches(&graph, &calls_b, "B"));
    assert!(!matches(&graph, &calls_b, "D"));
}

#[test]
fn test_calls_set_target() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let target = all.filter_by_name("C").unwrap();

    let called_by_c = Predicate::called_by(RelationTarget::from(&target));
    assert_eq!(all.filter(&called_by_c).names(), vec!["A"]);

    let calls_c = Predicate::calls(RelationTarget::symbols(&target));
    assert_eq!(all.filter(&calls_c).names(), vec!["B"]);
}

#[test]
fn test_transitive_relationships() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    let reaches_c = Predicate::tcalls(RelationTarget::pattern("C").unwrap());
    assert_eq!(all.filter(&reaches_c).names(), vec!["A", "B", "C"]);

    let reached_from_r = Predicate::tcalled_by(RelationTarget::pattern("R").unwrap());
    assert_eq!(all.filter(&reached_from_r).names(), vec!["R"]);

    // Reflexive forms include the target itself
    let in_or_reaches_d = Predicate::trcalls(RelationTarget::pattern("D").unwrap());
    assert_eq!(all.filter(&in_or_reaches_d).names(), vec!["D"]);

    let in_or_reached_from_a = Predicate::trcalled_by(RelationTarget::pattern("A").unwrap());
    assert_eq!(all.filter(&in_or_reached_from_a).names(), vec!["A", "B", "C"]);
}

#[test]
fn test_calls_itself() {
    let graph = create_cycle().unwrap();

    assert!(matches(&graph, &Predicate::calls_itself(), "R"));
    assert!(!matches(&graph, &Predicate::calls_itself(), "A"));
    assert!(!matches(&graph, &Predicate::calls_itself(), "D"));

    assert!(matches(&graph, &Predicate::tcalls_itself(), "A"));
    assert!(matches(&graph, &Predicate::tcalls_itself(), "R"));
    assert!(!matches(&graph, &Predicate::tcalls_itself(), "D"));
}

#[test]
fn test_pattern_target_follows_graph() {
    let first = create_cycle().unwrap();
    let mut second = CallGraph::new();
    let x = second.add_symbol(SymbolDecl::new("X", "x.c", 1));
    let b = second.add_symbol(SymbolDecl::new("B", "x.c", 2));
    second.add_call(x, b).unwrap();
    second.compute_callers();

    let calls_b = Predicate::calls(RelationTarget::pattern("B").unwrap());
    assert!(matches(&first, &calls_b, "A"));
    assert!(matches(&second, &calls_b, "X"));
    assert!(matches(&first, &calls_b, "A"));
    assert!(!matches(&second, &calls_b, "B"));
}

#[test]
fn test_composition() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    let static_recursive = Predicate::is_static() & Predicate::calls_itself();
    assert_eq!(all.filter(&static_recursive).names(), vec!["R"]);

    let a_or_d = Predicate::calls(RelationTarget::pattern("B").unwrap())
        | Predicate::tcalls_itself().negate();
    assert_eq!(all.filter(&a_or_d).names(), vec!["A", "D"]);

    let not_recursive = !Predicate::tcalls_itself();
    assert_eq!(all.filter(&not_recursive).names(), vec!["D"]);
}

#[test]
fn test_bad_target_pattern() {
    assert!(RelationTarget::pattern("[").is_err());
    assert!(Predicate::path_contains("(").is_err());
}

#[test]
fn test_set_target_ignores_other_graphs() {
    let mut first = CallGraph::new();
    let a = first.add_symbol(SymbolDecl::new("a", "one.c", 1));
    let b = first.add_symbol(SymbolDecl::new("b", "one.c", 2));
    first.add_call(a, b).unwrap();
    first.compute_callers();

    let mut second = CallGraph::new();
    let x = second.add_symbol(SymbolDecl::new("x", "two.c", 1));
    let y = second.add_symbol(SymbolDecl::new("y", "two.c", 2));
    second.add_call(x, y).unwrap();
    second.compute_callers();

    let first_all = first.all_program_symbols().unwrap();
    let calls_b = Predicate::calls(RelationTarget::from(&first_all.filter_by_name("b").unwrap()));
    assert_eq!(first_all.filter(&calls_b).names(), vec!["a"]);

    // y shares b's id but belongs to another graph
    let second_all = second.all_program_symbols().unwrap();
    assert!(second_all.filter(&calls_b).is_empty());
}
