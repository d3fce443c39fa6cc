//! Fixed-point closures over symbol relations.
//!
//! A relation maps a symbol set to another symbol set, typically the direct
//! callees or callers of every member. Both closures terminate because the
//! symbol universe is finite and each iteration only ever grows the result.

use super::SymbolSet;
use log::trace;

/// Transitive-reflexive closure: the smallest superset `S'` of `set` with
/// `relation(S') ⊆ S'`. The starting members are always included.
pub fn trclose<'g, F>(set: &SymbolSet<'g>, mut relation: F) -> SymbolSet<'g>
where
    F: FnMut(&SymbolSet<'g>) -> SymbolSet<'g>,
{
    let mut closure = set.clone();
    let mut iterations = 0usize;
    loop {
        let before = closure.len();
        let image = relation(&closure);
        closure.union_with(&image);
        iterations += 1;
        if closure.len() == before {
            break;
        }
    }
    trace!(
        "Closure of {} symbols reached {} after {iterations} iterations",
        set.len(),
        closure.len()
    );
    closure
}

/// Transitive closure: [`trclose`] seeded with the relation's image of `set`
/// rather than `set` itself. A member only reappears if it lies on a cycle.
pub fn tclose<'g, F>(set: &SymbolSet<'g>, mut relation: F) -> SymbolSet<'g>
where
    F: FnMut(&SymbolSet<'g>) -> SymbolSet<'g>,
{
    let seed = relation(set);
    trclose(&seed, relation)
}
