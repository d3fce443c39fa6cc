//! Predicate algebra over symbols and paths.
//!
//! A [`Predicate`] is a tagged expression evaluated against a `(graph, item)`
//! pair by a single dispatch function, [`Predicate::eval`]. Composite
//! predicates evaluate both operands on every call; there is no
//! short-circuiting.
//!
//! Predicates that only make sense for one kind of item (symbol flags and
//! relationships for symbols, path shapes for paths) are false for the other.
//!
//! # Examples
//!
//! ```
//! use cgquery::{CallGraph, IntField, Predicate, SymbolDecl};
//!
//! # fn example() -> cgquery::Result<()> {
//! let mut graph = CallGraph::new();
//! let f = graph.add_symbol(SymbolDecl::new("f", "f.c", 120).with_static(true));
//! graph.add_call(f, f)?;
//! graph.compute_callers();
//!
//! // static functions past line 100 that call themselves
//! let query = Predicate::is_static() & Predicate::fun()
//!     & IntField::Line.greater_than(100)
//!     & Predicate::calls_itself();
//! let found = graph.all_program_symbols()?.filter(&query);
//! assert_eq!(found.names(), vec!["f"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod field;
mod relation;

pub use field::{CmpOp, Comparator, FieldPredicate, IntField, IntOperand, SortKey, StrField, StrOperand};
pub use relation::{Relation, RelationTarget, RelationshipPredicate};

use crate::error::Result;
use crate::graph::{CallGraph, Symbol};
use crate::pattern::name_regex;
use regex::Regex;

/// The thing a predicate is evaluated against.
#[derive(Debug, Clone, Copy)]
pub enum Item<'a> {
    /// A single symbol
    Symbol(&'a Symbol),
    /// A call path, first symbol first
    Path(&'a [&'a Symbol]),
}

impl<'a> Item<'a> {
    /// The symbol, if this item is one.
    pub fn as_symbol(self) -> Option<&'a Symbol> {
        match self {
            Self::Symbol(symbol) => Some(symbol),
            Self::Path(_) => None,
        }
    }

    /// The path, if this item is one.
    pub fn as_path(self) -> Option<&'a [&'a Symbol]> {
        match self {
            Self::Symbol(_) => None,
            Self::Path(path) => Some(path),
        }
    }
}

/// A boolean attribute of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Variable rather than function
    Variable,
    /// File-local linkage
    Static,
    /// Declaration only
    Declaration,
}

impl Flag {
    fn test(self, symbol: &Symbol) -> bool {
        match self {
            Self::Variable => symbol.is_variable,
            Self::Static => symbol.is_static,
            Self::Declaration => symbol.is_declaration,
        }
    }
}

/// Where on a path a matching symbol must be.
#[derive(Debug, Clone)]
pub enum PathShape {
    /// Anywhere on the path
    Contains(Regex),
    /// First symbol
    StartsWith(Regex),
    /// Last symbol
    EndsWith(Regex),
}

impl PathShape {
    fn test(&self, path: &[&Symbol]) -> bool {
        match self {
            Self::Contains(pattern) => path.iter().any(|symbol| pattern.is_match(&symbol.name)),
            Self::StartsWith(pattern) => path
                .first()
                .is_some_and(|symbol| pattern.is_match(&symbol.name)),
            Self::EndsWith(pattern) => path
                .last()
                .is_some_and(|symbol| pattern.is_match(&symbol.name)),
        }
    }
}

/// A composable boolean test over symbols and paths.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Constant result
    Const(bool),
    /// Symbol attribute
    Flag(Flag),
    /// Both operands hold
    And(Box<Predicate>, Box<Predicate>),
    /// Either operand holds
    Or(Box<Predicate>, Box<Predicate>),
    /// Operand does not hold
    Not(Box<Predicate>),
    /// The symbol's image under a relation meets a target set
    Relationship(RelationshipPredicate),
    /// The symbol's image under a relation contains the symbol itself
    SelfRelationship(Relation),
    /// Test on a field selector
    Field(FieldPredicate),
    /// Test on the symbols of a path
    PathShape(PathShape),
}

impl Predicate {
    /// Evaluate against an item of `graph`.
    pub fn eval(&self, graph: &CallGraph, item: Item<'_>) -> bool {
        match self {
            Self::Const(value) => *value,
            Self::Flag(flag) => item.as_symbol().is_some_and(|symbol| flag.test(symbol)),
            Self::And(left, right) => {
                let left = left.eval(graph, item);
                let right = right.eval(graph, item);
                left & right
            }
            Self::Or(left, right) => {
                let left = left.eval(graph, item);
                let right = right.eval(graph, item);
                left | right
            }
            Self::Not(operand) => !operand.eval(graph, item),
            Self::Relationship(relationship) => item
                .as_symbol()
                .is_some_and(|symbol| relationship.eval(graph, symbol)),
            Self::SelfRelationship(relation) => item
                .as_symbol()
                .is_some_and(|symbol| relation.reaches_itself(graph, symbol)),
            Self::Field(field) => field.eval(item),
            Self::PathShape(shape) => item.as_path().is_some_and(|path| shape.test(path)),
        }
    }

    /// Evaluate against a symbol.
    pub fn matches_symbol(&self, graph: &CallGraph, symbol: &Symbol) -> bool {
        self.eval(graph, Item::Symbol(symbol))
    }

    /// Always true.
    pub fn always() -> Self {
        Self::Const(true)
    }

    /// Always false.
    pub fn never() -> Self {
        Self::Const(false)
    }

    /// Variables.
    pub fn var() -> Self {
        Self::Flag(Flag::Variable)
    }

    /// Functions (not variables).
    pub fn fun() -> Self {
        Self::var().negate()
    }

    /// File-local symbols.
    pub fn is_static() -> Self {
        Self::Flag(Flag::Static)
    }

    /// Externally visible symbols.
    pub fn is_extern() -> Self {
        Self::is_static().negate()
    }

    /// Declarations without a definition.
    pub fn decl() -> Self {
        Self::Flag(Flag::Declaration)
    }

    /// Conjunction. Both operands are always evaluated.
    pub fn and(self, other: Predicate) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Disjunction. Both operands are always evaluated.
    pub fn or(self, other: Predicate) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Negation.
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Symbols whose image under `relation` meets `target`.
    pub fn related(relation: Relation, target: RelationTarget) -> Self {
        Self::Relationship(RelationshipPredicate::new(relation, target))
    }

    /// Symbols directly calling something in `target`.
    pub fn calls(target: RelationTarget) -> Self {
        Self::related(Relation::Callees, target)
    }

    /// Symbols directly called by something in `target`.
    pub fn called_by(target: RelationTarget) -> Self {
        Self::related(Relation::Callers, target)
    }

    /// Symbols reaching `target` through one or more calls.
    pub fn tcalls(target: RelationTarget) -> Self {
        Self::related(Relation::TransitiveCallees, target)
    }

    /// Symbols reached from `target` through one or more calls.
    pub fn tcalled_by(target: RelationTarget) -> Self {
        Self::related(Relation::TransitiveCallers, target)
    }

    /// Symbols in `target` or reaching it.
    pub fn trcalls(target: RelationTarget) -> Self {
        Self::related(Relation::ReflexiveCallees, target)
    }

    /// Symbols in `target` or reached from it.
    pub fn trcalled_by(target: RelationTarget) -> Self {
        Self::related(Relation::ReflexiveCallers, target)
    }

    /// Directly recursive symbols.
    pub fn calls_itself() -> Self {
        Self::SelfRelationship(Relation::Callees)
    }

    /// Directly or indirectly recursive symbols.
    pub fn tcalls_itself() -> Self {
        Self::SelfRelationship(Relation::TransitiveCallees)
    }

    /// Paths with a symbol whose name fully matches `pattern`.
    pub fn path_contains(pattern: &str) -> Result<Self> {
        Ok(Self::PathShape(PathShape::Contains(name_regex(pattern)?)))
    }

    /// Paths whose first symbol's name fully matches `pattern`.
    pub fn path_starts_with(pattern: &str) -> Result<Self> {
        Ok(Self::PathShape(PathShape::StartsWith(name_regex(pattern)?)))
    }

    /// Paths whose last symbol's name fully matches `pattern`.
    pub fn path_ends_with(pattern: &str) -> Result<Self> {
        Ok(Self::PathShape(PathShape::EndsWith(name_regex(pattern)?)))
    }
}

impl From<FieldPredicate> for Predicate {
    fn from(predicate: FieldPredicate) -> Self {
        Self::Field(predicate)
    }
}

impl std::ops::BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        self.and(rhs)
    }
}

impl std::ops::BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        self.or(rhs)
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        self.negate()
    }
}
