//! Name/file patterns and symbol addresses.
//!
//! All pattern compilation goes through this module so the anchoring rules
//! stay uniform: name patterns must match the whole name, file patterns may
//! match anywhere in the path.

use crate::error::{QueryError, Result};
use crate::predicate::{IntField, Predicate, StrField};
use regex::Regex;
use std::str::FromStr;

/// Compile a name pattern anchored at both ends.
pub(crate) fn name_regex(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|e| QueryError::pattern(pattern, e))
}

/// Compile a file pattern matched anywhere in the path.
pub(crate) fn file_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| QueryError::pattern(pattern, e))
}

/// Which lines an [`Address`] accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LineSelector {
    /// Any line
    #[default]
    Any,
    /// Exactly this line
    Exact(u32),
    /// Any of these lines
    OneOf(Vec<u32>),
}

/// A symbol location pattern: file pattern, line selector and name pattern.
///
/// Omitted components match everything. The textual form is
/// `name`, `file:name` or `file:line:name`, where `*` or an empty component
/// is a wildcard and `line` may list several lines separated by commas.
///
/// # Examples
///
/// ```
/// use cgquery::{Address, LineSelector};
///
/// let address: Address = "util.c:*:helper_.*".parse().unwrap();
/// assert_eq!(address.line, LineSelector::Any);
/// assert_eq!(address.name.as_deref(), Some("helper_.*"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    /// File pattern, matched anywhere in the path
    pub file: Option<String>,
    /// Accepted lines
    pub line: LineSelector,
    /// Name pattern, matched against the whole name
    pub name: Option<String>,
}

impl Address {
    /// Matches every symbol.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches symbols whose name fully matches `pattern`. An empty or `*`
    /// pattern matches every name, as in the textual form.
    pub fn name(pattern: impl Into<String>) -> Self {
        Self::any().with_name(pattern)
    }

    /// Restrict by name pattern (`""` or `*` for any)
    pub fn with_name(mut self, pattern: impl Into<String>) -> Self {
        self.name = wildcard(&pattern.into());
        self
    }

    /// Restrict by file pattern (`""` or `*` for any)
    pub fn with_file(mut self, pattern: impl Into<String>) -> Self {
        self.file = wildcard(&pattern.into());
        self
    }

    /// Restrict by line
    pub fn with_line(mut self, line: LineSelector) -> Self {
        self.line = line;
        self
    }

    /// The equivalent predicate.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Pattern`] if a component does not compile.
    pub fn to_predicate(&self) -> Result<Predicate> {
        let mut parts = Vec::new();
        if let Some(file) = &self.file {
            parts.push(StrField::File.search(file)?);
        }
        match &self.line {
            LineSelector::Any => {}
            LineSelector::Exact(line) => parts.push(IntField::Line.equals(i64::from(*line))),
            LineSelector::OneOf(lines) => {
                parts.push(IntField::Line.one_of(lines.iter().map(|&l| i64::from(l))))
            }
        }
        if let Some(name) = &self.name {
            parts.push(StrField::Name.matches(name)?);
        }

        Ok(parts
            .into_iter()
            .reduce(Predicate::and)
            .unwrap_or_else(Predicate::always))
    }
}

fn wildcard(component: &str) -> Option<String> {
    match component {
        "" | "*" => None,
        pattern => Some(pattern.to_string()),
    }
}

impl FromStr for Address {
    type Err = QueryError;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = |message: &str| QueryError::InvalidAddress {
            address: text.to_string(),
            message: message.to_string(),
        };

        let parts: Vec<&str> = text.split(':').collect();
        let (file, line, name) = match parts.as_slice() {
            [name] => ("", "", *name),
            [file, name] => (*file, "", *name),
            [file, line, name] => (*file, *line, *name),
            _ => return Err(invalid("expected name, file:name or file:line:name")),
        };

        let line = match line {
            "" | "*" => LineSelector::Any,
            list => {
                let lines = list
                    .split(',')
                    .map(|l| l.trim().parse::<u32>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|_| invalid("line must be a number or a comma-separated list"))?;
                match lines.as_slice() {
                    [single] => LineSelector::Exact(*single),
                    _ => LineSelector::OneOf(lines),
                }
            }
        };

        Ok(Self {
            file: wildcard(file),
            line,
            name: wildcard(name),
        })
    }
}
