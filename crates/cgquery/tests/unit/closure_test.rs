//! Unit tests for the closure engine
//!
//! Tests cover:
//! - Idempotence of the transitive-reflexive closure
//! - tclose(S, f) == trclose(f(S), f)
//! - Reflexive inclusion and cycle membership
//! - Closures in the caller direction

use cgquery::{tclose, trclose, CallGraph, SymbolDecl, SymbolSet};

// Helper: A -> B -> C -> A plus an isolated D
fn create_cycle() -> cgquery::Result<CallGraph> {
    let mut graph = CallGraph::new();

    let a = graph.add_symbol(SymbolDecl::new("A", "cycle.c", 1));
    let b = graph.add_symbol(SymbolDecl::new("B", "cycle.c", 10));
    let c = graph.add_symbol(SymbolDecl::new("C", "cycle.c", 20));
    graph.add_symbol(SymbolDecl::new("D", "alone.c", 1));

    graph.add_calls_batch(&[(a, b), (b, c), (c, a)])?;
    graph.compute_callers();
    Ok(graph)
}

// Helper: main -> parse -> lex, main -> log
fn create_tree() -> cgquery::Result<CallGraph> {
    let mut graph = CallGraph::new();

    let main = graph.add_symbol(SymbolDecl::new("main", "main.c", 1));
    let parse = graph.add_symbol(SymbolDecl::new("parse", "parse.c", 5));
    let lex = graph.add_symbol(SymbolDecl::new("lex", "lex.c", 9));
    let log = graph.add_symbol(SymbolDecl::new("log", "log.c", 2));

    graph.add_calls_batch(&[(main, parse), (parse, lex), (main, log)])?;
    graph.compute_callers();
    Ok(graph)
}

fn sorted_names(set: &SymbolSet<'_>) -> Vec<String> {
    let mut names: Vec<String> = set.names().into_iter().map(String::from).collect();
    names.sort();
    names
}

#[test]
fn test_trclose_is_idempotent() {
    let graph = create_tree().unwrap();
    let all = graph.all_program_symbols().unwrap();

    for pattern in ["main", "parse", "lex|log", ".*"] {
        let start = all.filter_by_name(pattern).unwrap();
        let once = trclose(&start, |set| set.callees().clone());
        let twice = trclose(&once, |set| set.callees().clone());
        assert_eq!(once, twice, "closure of '{pattern}' is not a fixed point");
    }
}

#[test]
fn test_tclose_seeds_with_image() {
    let graph = create_tree().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let main = all.filter_by_name("main").unwrap();

    let transitive = tclose(&main, |set| set.callees().clone());
    let seeded = trclose(main.callees(), |set| set.callees().clone());
    assert_eq!(transitive, seeded);
    assert_eq!(sorted_names(&transitive), vec!["lex", "log", "parse"]);
}

#[test]
fn test_reflexive_inclusion() {
    let graph = create_tree().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let main = all.filter_by_name("main").unwrap();

    let reflexive = main.trcallees();
    assert!(reflexive.contains(main.iter().next().unwrap()));
    assert_eq!(reflexive.len(), 4);

    // No cycle, so main is not its own transitive callee
    let transitive = main.tcallees();
    assert!(!transitive.contains(main.iter().next().unwrap()));
    assert_eq!(transitive.len(), 3);
}

#[test]
fn test_transitive_closure_with_cycle() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let a = all.filter_by_name("A").unwrap();

    assert_eq!(sorted_names(&a.tcallees()), vec!["A", "B", "C"]);
    assert_eq!(sorted_names(&a.trcallees()), vec!["A", "B", "C"]);
}

#[test]
fn test_isolated_symbol_closures() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let d = all.filter_by_name("D").unwrap();

    assert!(d.tcallees().is_empty());
    assert_eq!(d.trcallees().names(), vec!["D"]);
    assert!(d.tcallers().is_empty());
}

#[test]
fn test_caller_direction() {
    let graph = create_tree().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let lex = all.filter_by_name("lex").unwrap();

    assert_eq!(sorted_names(&lex.tcallers()), vec!["main", "parse"]);
    assert_eq!(sorted_names(&lex.trcallers()), vec!["lex", "main", "parse"]);
}

#[test]
fn test_closure_of_empty_set() {
    let graph = create_tree().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let empty = all.filter_by_name("nothing").unwrap();

    assert!(trclose(&empty, |set| set.callees().clone()).is_empty());
    assert!(tclose(&empty, |set| set.callers().clone()).is_empty());
}
