//! Field selectors: typed accessors that build predicates and sort comparators.

use super::{Item, Predicate};
use crate::error::Result;
use crate::pattern::{file_regex, name_regex};
use regex::Regex;
use std::borrow::Cow;
use std::cmp::Ordering;

/// A string-valued field of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StrField {
    /// Symbol name
    Name,
    /// Symbol file path
    File,
    /// Final component of the file path
    FileBase,
    /// Directory part of the file path
    FileDir,
    /// Lowercased value of another field
    Lower(Box<StrField>),
    /// Uppercased value of another field
    Upper(Box<StrField>),
}

/// An integer-valued field of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntField {
    /// Symbol line
    Line,
    /// Number of symbols on a path
    PathLength,
    /// Character count of a string field
    Len(StrField),
}

/// Comparison operator for field predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CmpOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

/// Right-hand side of a string comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrOperand {
    /// Fixed value
    Literal(String),
    /// Another field of the same item
    Field(StrField),
}

/// Right-hand side of an integer comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntOperand {
    /// Fixed value
    Literal(i64),
    /// Another field of the same item
    Field(IntField),
}

/// A test on a field of an item. False when the item lacks the field.
#[derive(Debug, Clone)]
pub enum FieldPredicate {
    /// String equality or inequality
    StrCompare {
        /// Left-hand field
        field: StrField,
        /// `Eq` or `Ne`
        op: CmpOp,
        /// Right-hand side
        operand: StrOperand,
    },
    /// Regex match (anchoring decided when the regex was built)
    StrMatch {
        /// Field to match
        field: StrField,
        /// Compiled pattern
        pattern: Regex,
    },
    /// Value starts with a prefix
    StartsWith {
        /// Field to test
        field: StrField,
        /// Prefix
        prefix: String,
    },
    /// Value ends with a suffix
    EndsWith {
        /// Field to test
        field: StrField,
        /// Suffix
        suffix: String,
    },
    /// Value contains a substring
    Contains {
        /// Field to test
        field: StrField,
        /// Substring
        needle: String,
    },
    /// Integer ordering comparison
    IntCompare {
        /// Left-hand field
        field: IntField,
        /// Operator
        op: CmpOp,
        /// Right-hand side
        operand: IntOperand,
    },
    /// Value is one of a list
    IntIn {
        /// Field to test
        field: IntField,
        /// Accepted values
        values: Vec<i64>,
    },
}

impl FieldPredicate {
    pub(crate) fn eval(&self, item: Item<'_>) -> bool {
        match self {
            Self::StrCompare { field, op, operand } => {
                let Some(left) = field.get(item) else {
                    return false;
                };
                let right = match operand {
                    StrOperand::Literal(value) => Cow::Borrowed(value.as_str()),
                    StrOperand::Field(other) => match other.get(item) {
                        Some(value) => value,
                        None => return false,
                    },
                };
                op.holds(left.as_ref().cmp(right.as_ref()))
            }
            Self::StrMatch { field, pattern } => {
                field.get(item).is_some_and(|value| pattern.is_match(&value))
            }
            Self::StartsWith { field, prefix } => {
                field.get(item).is_some_and(|value| value.starts_with(prefix.as_str()))
            }
            Self::EndsWith { field, suffix } => {
                field.get(item).is_some_and(|value| value.ends_with(suffix.as_str()))
            }
            Self::Contains { field, needle } => {
                field.get(item).is_some_and(|value| value.contains(needle.as_str()))
            }
            Self::IntCompare { field, op, operand } => {
                let right = match operand {
                    IntOperand::Literal(value) => Some(*value),
                    IntOperand::Field(other) => other.get(item),
                };
                match (field.get(item), right) {
                    (Some(left), Some(right)) => op.holds(left.cmp(&right)),
                    _ => false,
                }
            }
            Self::IntIn { field, values } => {
                field.get(item).is_some_and(|value| values.contains(&value))
            }
        }
    }
}

impl StrField {
    /// Value of the field for `item`, if the item has it.
    pub fn get<'a>(&self, item: Item<'a>) -> Option<Cow<'a, str>> {
        match self {
            Self::Name => item.as_symbol().map(|s| Cow::Borrowed(s.name.as_str())),
            Self::File => item.as_symbol().map(|s| Cow::Borrowed(s.file.as_str())),
            Self::FileBase => item.as_symbol().map(|s| Cow::Borrowed(s.file_base())),
            Self::FileDir => item.as_symbol().map(|s| Cow::Borrowed(s.file_dir())),
            Self::Lower(inner) => inner.get(item).map(|v| Cow::Owned(v.to_lowercase())),
            Self::Upper(inner) => inner.get(item).map(|v| Cow::Owned(v.to_uppercase())),
        }
    }

    /// Case-folded to lowercase.
    pub fn lower(self) -> Self {
        Self::Lower(Box::new(self))
    }

    /// Case-folded to uppercase.
    pub fn upper(self) -> Self {
        Self::Upper(Box::new(self))
    }

    /// Character count, as an integer field.
    pub fn len(self) -> IntField {
        IntField::Len(self)
    }

    fn compare(&self, op: CmpOp, operand: StrOperand) -> Predicate {
        Predicate::Field(FieldPredicate::StrCompare {
            field: self.clone(),
            op,
            operand,
        })
    }

    /// Equal to `value`.
    pub fn equals(&self, value: impl Into<String>) -> Predicate {
        self.compare(CmpOp::Eq, StrOperand::Literal(value.into()))
    }

    /// Not equal to `value`.
    pub fn not_equals(&self, value: impl Into<String>) -> Predicate {
        self.compare(CmpOp::Ne, StrOperand::Literal(value.into()))
    }

    /// Equal to another field of the same item.
    pub fn equals_field(&self, other: StrField) -> Predicate {
        self.compare(CmpOp::Eq, StrOperand::Field(other))
    }

    /// Not equal to another field of the same item.
    pub fn not_equals_field(&self, other: StrField) -> Predicate {
        self.compare(CmpOp::Ne, StrOperand::Field(other))
    }

    /// Whole value matches `pattern`.
    pub fn matches(&self, pattern: &str) -> Result<Predicate> {
        Ok(Predicate::Field(FieldPredicate::StrMatch {
            field: self.clone(),
            pattern: name_regex(pattern)?,
        }))
    }

    /// Some part of the value matches `pattern`.
    pub fn search(&self, pattern: &str) -> Result<Predicate> {
        Ok(Predicate::Field(FieldPredicate::StrMatch {
            field: self.clone(),
            pattern: file_regex(pattern)?,
        }))
    }

    /// Value starts with `prefix`.
    pub fn starts_with(&self, prefix: impl Into<String>) -> Predicate {
        Predicate::Field(FieldPredicate::StartsWith {
            field: self.clone(),
            prefix: prefix.into(),
        })
    }

    /// Value ends with `suffix`.
    pub fn ends_with(&self, suffix: impl Into<String>) -> Predicate {
        Predicate::Field(FieldPredicate::EndsWith {
            field: self.clone(),
            suffix: suffix.into(),
        })
    }

    /// Value contains `needle`.
    pub fn contains(&self, needle: impl Into<String>) -> Predicate {
        Predicate::Field(FieldPredicate::Contains {
            field: self.clone(),
            needle: needle.into(),
        })
    }

    /// Sort ascending by this field.
    pub fn ascending(&self) -> Comparator {
        Comparator::new(SortKey::Str(self.clone()))
    }

    /// Sort descending by this field.
    pub fn descending(&self) -> Comparator {
        self.ascending().reversed()
    }
}

impl IntField {
    /// Value of the field for `item`, if the item has it.
    pub fn get(&self, item: Item<'_>) -> Option<i64> {
        match self {
            Self::Line => item.as_symbol().map(|s| i64::from(s.line)),
            Self::PathLength => item.as_path().map(|p| p.len() as i64),
            Self::Len(inner) => inner.get(item).map(|v| v.chars().count() as i64),
        }
    }

    /// Compare with a fixed value.
    pub fn compare(&self, op: CmpOp, value: i64) -> Predicate {
        Predicate::Field(FieldPredicate::IntCompare {
            field: self.clone(),
            op,
            operand: IntOperand::Literal(value),
        })
    }

    /// Compare with another field of the same item.
    pub fn compare_field(&self, op: CmpOp, other: IntField) -> Predicate {
        Predicate::Field(FieldPredicate::IntCompare {
            field: self.clone(),
            op,
            operand: IntOperand::Field(other),
        })
    }

    /// `== value`
    pub fn equals(&self, value: i64) -> Predicate {
        self.compare(CmpOp::Eq, value)
    }

    /// `!= value`
    pub fn not_equals(&self, value: i64) -> Predicate {
        self.compare(CmpOp::Ne, value)
    }

    /// `< value`
    pub fn less_than(&self, value: i64) -> Predicate {
        self.compare(CmpOp::Lt, value)
    }

    /// `<= value`
    pub fn at_most(&self, value: i64) -> Predicate {
        self.compare(CmpOp::Le, value)
    }

    /// `> value`
    pub fn greater_than(&self, value: i64) -> Predicate {
        self.compare(CmpOp::Gt, value)
    }

    /// `>= value`
    pub fn at_least(&self, value: i64) -> Predicate {
        self.compare(CmpOp::Ge, value)
    }

    /// One of `values`.
    pub fn one_of(&self, values: impl IntoIterator<Item = i64>) -> Predicate {
        Predicate::Field(FieldPredicate::IntIn {
            field: self.clone(),
            values: values.into_iter().collect(),
        })
    }

    /// Sort ascending by this field.
    pub fn ascending(&self) -> Comparator {
        Comparator::new(SortKey::Int(self.clone()))
    }

    /// Sort descending by this field.
    pub fn descending(&self) -> Comparator {
        self.ascending().reversed()
    }
}

/// Field a [`Comparator`] orders by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// String field, lexical order
    Str(StrField),
    /// Integer field, numeric order
    Int(IntField),
}

/// Two-item comparison on one field, optionally reversed.
///
/// Items missing the field sort first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparator {
    key: SortKey,
    descending: bool,
}

impl Comparator {
    /// Ascending comparison on `key`.
    pub fn new(key: SortKey) -> Self {
        Self {
            key,
            descending: false,
        }
    }

    /// The same comparison in the opposite direction.
    pub fn reversed(mut self) -> Self {
        self.descending = !self.descending;
        self
    }

    /// Compare two items.
    pub fn compare(&self, a: Item<'_>, b: Item<'_>) -> Ordering {
        let ordering = match &self.key {
            SortKey::Str(field) => field.get(a).cmp(&field.get(b)),
            SortKey::Int(field) => field.get(a).cmp(&field.get(b)),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Compare with each comparator in turn; the first non-equal result decides.
    pub fn compare_chain(comparators: &[Comparator], a: Item<'_>, b: Item<'_>) -> Ordering {
        comparators
            .iter()
            .map(|comparator| comparator.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}
