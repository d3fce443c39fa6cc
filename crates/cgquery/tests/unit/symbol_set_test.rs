//! Unit tests for SymbolSet
//!
//! Tests cover:
//! - Set algebra laws and universe propagation
//! - Complement
//! - Direct callees/callers
//! - Filtering by predicate, address and name
//! - Sorting with chained comparators
//! - pop() on empty and non-empty sets

use cgquery::{
    Address, CallGraph, IntField, LineSelector, Predicate, QueryError, StrField, SymbolDecl,
};

// Helper: A -> B -> C -> A plus an isolated D
fn create_cycle() -> cgquery::Result<CallGraph> {
    let mut graph = CallGraph::new();

    let a = graph.add_symbol(SymbolDecl::new("A", "src/cycle.c", 1));
    let b = graph.add_symbol(SymbolDecl::new("B", "src/cycle.c", 10));
    let c = graph.add_symbol(SymbolDecl::new("C", "src/other.c", 10));
    graph.add_symbol(SymbolDecl::new("D", "lib/alone.c", 3).with_static(true));

    graph.add_calls_batch(&[(a, b), (b, c), (c, a)])?;
    graph.compute_callers();
    Ok(graph)
}

#[test]
fn test_union_and_intersection_commute() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let ab = all.filter_by_name("A|B").unwrap();
    let bc = all.filter_by_name("B|C").unwrap();

    assert_eq!(ab.union(&bc), bc.union(&ab));
    assert_eq!(ab.intersect(&bc), bc.intersect(&ab));
    assert_eq!(ab.intersect(&bc).names(), vec!["B"]);
}

#[test]
fn test_union_and_intersection_associate() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let a = all.filter_by_name("A").unwrap();
    let ab = all.filter_by_name("A|B").unwrap();
    let cd = all.filter_by_name("C|D").unwrap();

    assert_eq!(a.union(&ab).union(&cd), a.union(&ab.union(&cd)));
    assert_eq!(
        a.intersect(&ab).intersect(&cd),
        a.intersect(&ab.intersect(&cd))
    );
}

#[test]
fn test_difference_is_not_symmetric() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let ab = all.filter_by_name("A|B").unwrap();
    let bc = all.filter_by_name("B|C").unwrap();

    assert_eq!(ab.difference(&bc).names(), vec!["A"]);
    assert_eq!(bc.difference(&ab).names(), vec!["C"]);
    assert_ne!(ab.difference(&bc), bc.difference(&ab));
}

#[test]
fn test_double_complement() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let ab = all.filter_by_name("A|B").unwrap();

    let outside = ab.complement().unwrap();
    let mut names = outside.names();
    names.sort_unstable();
    assert_eq!(names, vec!["C", "D"]);
    assert_eq!(outside.complement().unwrap(), ab);
    assert!(all.complement().unwrap().is_empty());
}

#[test]
fn test_derived_sets_keep_universe() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let a = all.filter_by_name("A").unwrap();

    assert!(a.has_universe());
    assert!(a.callees().has_universe());
    assert!(a.tcallers().has_universe());
    assert_eq!(a.universe_set().unwrap(), all);
}

#[test]
fn test_direct_relations() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let a = all.filter_by_name("A").unwrap();

    assert_eq!(a.callees().names(), vec!["B"]);
    assert_eq!(a.callers().names(), vec!["C"]);
    assert!(all.filter_by_name("D").unwrap().callees().is_empty());
}

#[test]
fn test_address_filter_defaults() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    let address: Address = "*:*:A".parse().unwrap();
    assert_eq!(all.filter_by_address(&address).unwrap().names(), vec!["A"]);

    let everything: Address = "*:*:*".parse().unwrap();
    assert_eq!(all.filter_by_address(&everything).unwrap(), all);
    assert_eq!(all.filter_by_address(&Address::any()).unwrap(), all);
}

#[test]
fn test_address_components() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    // File patterns match anywhere in the path
    let in_src = all.filter_by_address(&Address::any().with_file("src/")).unwrap();
    assert_eq!(in_src.len(), 3);

    // Line 10 appears in two files
    let line_ten = all
        .filter_by_address(&Address::any().with_line(LineSelector::Exact(10)))
        .unwrap();
    assert_eq!(line_ten.names(), vec!["B", "C"]);

    let both: Address = "cycle:10:*".parse().unwrap();
    assert_eq!(all.filter_by_address(&both).unwrap().names(), vec!["B"]);

    let lines: Address = "*:1,3:*".parse().unwrap();
    assert_eq!(all.filter_by_address(&lines).unwrap().names(), vec!["A", "D"]);
}

#[test]
fn test_name_filter_is_anchored() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    // Empty and "*" are wildcards, as in the textual address form
    assert_eq!(all.filter_by_name("").unwrap(), all);
    assert_eq!(all.filter_by_name("*").unwrap(), all);
    assert!(all.filter_by_name("E").unwrap().is_empty());
    assert_eq!(all.filter_by_name("[AB]").unwrap().len(), 2);
    assert!(matches!(
        all.filter_by_name("(unclosed"),
        Err(QueryError::Pattern { .. })
    ));
}

#[test]
fn test_predicate_filter() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    assert_eq!(all.filter(&Predicate::is_static()).names(), vec!["D"]);
    assert_eq!(all.filter(&Predicate::is_extern()).len(), 3);
    assert_eq!(all.filter(&Predicate::always()), all);
    assert!(all.filter(&Predicate::never()).is_empty());
}

#[test]
fn test_sort_default_and_chained() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    let mut set = all.filter_by_name("C|A|B").unwrap();
    set.sort(&[StrField::Name.descending()]);
    assert_eq!(set.names(), vec!["C", "B", "A"]);

    set.sort(&[]);
    assert_eq!(set.names(), vec!["A", "B", "C"]);

    // Line descending, ties broken by file descending
    let mut set = all.clone();
    set.sort(&[IntField::Line.descending(), StrField::File.descending()]);
    assert_eq!(set.names(), vec!["C", "B", "D", "A"]);
}

#[test]
fn test_sort_keeps_membership() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    let mut sorted = all.clone();
    sorted.sort(&[StrField::File.ascending()]);
    assert_eq!(sorted, all);
}

#[test]
fn test_pop() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    let mut set = all.filter_by_name("A|B").unwrap();
    let popped = set.pop().unwrap();
    assert!(!set.contains(popped));
    assert_eq!(set.len(), 1);
    set.pop().unwrap();

    let err = set.pop().unwrap_err();
    assert!(matches!(err, QueryError::EmptyCollection { .. }));
}

#[test]
fn test_intersects() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();
    let ab = all.filter_by_name("A|B").unwrap();

    assert!(ab.intersects(&all.filter_by_name("B|C").unwrap()));
    assert!(!ab.intersects(&all.filter_by_name("D").unwrap()));
}

#[test]
fn test_in_place_algebra() {
    let graph = create_cycle().unwrap();
    let all = graph.all_program_symbols().unwrap();

    let mut set = all.filter_by_name("A").unwrap();
    set.union_with(&all.filter_by_name("B|C").unwrap());
    assert_eq!(set.len(), 3);
    set.subtract(&all.filter_by_name("B").unwrap());
    assert_eq!(set.names(), vec!["A", "C"]);
    set.intersect_with(&all.filter_by_name("C|D").unwrap());
    assert_eq!(set.names(), vec!["C"]);
    assert_eq!(set.callees().names(), vec!["A"]);
}
