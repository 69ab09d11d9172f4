//! Identifier handling: quote stripping, case folding, and name equality
//!
//! Every engine stores unquoted identifiers in a default case (uppercase for
//! Oracle-style engines, lowercase for PostgreSQL) while quoted identifiers
//! keep their exact spelling. Name matching has to honor both rules at once:
//! a quoted identifier compares verbatim, an unquoted one is folded to the
//! connection's default case first.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default case an engine applies to unquoted identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierCase {
    /// Unquoted identifiers are stored uppercase (Oracle, DB2, H2)
    #[default]
    Upper,
    /// Unquoted identifiers are stored lowercase (PostgreSQL)
    Lower,
    /// Identifiers are stored as written (SQLite, MySQL on most platforms)
    Mixed,
}

impl IdentifierCase {
    /// Folds a name to this case. `Mixed` leaves the name untouched.
    pub fn fold(&self, name: &str) -> String {
        match self {
            IdentifierCase::Upper => name.to_uppercase(),
            IdentifierCase::Lower => name.to_lowercase(),
            IdentifierCase::Mixed => name.to_string(),
        }
    }
}

/// A database identifier, tracking whether it was quoted in the source
///
/// `parse` recognizes the three quoting styles that matter in practice:
/// `"name"`, `` `name` `` and `[name]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectName {
    name: String,
    quoted: bool,
}

impl ObjectName {
    /// Creates an unquoted identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: false,
        }
    }

    /// Creates a quoted identifier (compared verbatim, never case-folded)
    pub fn quoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: true,
        }
    }

    /// Parses a raw identifier, stripping one level of quoting if present
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() >= 2 {
            let stripped = match (bytes[0], bytes[bytes.len() - 1]) {
                (b'"', b'"') | (b'`', b'`') => Some(&trimmed[1..trimmed.len() - 1]),
                (b'[', b']') => Some(&trimmed[1..trimmed.len() - 1]),
                _ => None,
            };
            if let Some(inner) = stripped {
                return Self::quoted(inner);
            }
        }
        Self::new(trimmed)
    }

    /// The bare name without quoting
    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// The name as used for matching: quoted names verbatim, unquoted names
    /// folded to the connection's default case
    pub fn comparison_name(&self, case: IdentifierCase) -> String {
        if self.quoted {
            self.name.clone()
        } else {
            case.fold(&self.name)
        }
    }

    /// Name equality under the case-adjustment rule: case-sensitive when
    /// either side is quoted, folded otherwise. `Mixed` engines compare
    /// unquoted names case-insensitively since they never fold.
    pub fn matches(&self, other: &ObjectName, case: IdentifierCase) -> bool {
        if self.quoted || other.quoted {
            self.name == other.name
        } else {
            match case {
                IdentifierCase::Mixed => self.name.eq_ignore_ascii_case(&other.name),
                c => c.fold(&self.name) == c.fold(&other.name),
            }
        }
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Fully qualified table (or view) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableIdentifier {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: ObjectName,
}

impl TableIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: ObjectName::parse(&name.into()),
        }
    }

    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: Some(schema.into()),
            name: ObjectName::parse(&name.into()),
        }
    }

    /// Returns the qualified name (schema.name or just name)
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name.as_str()),
            None => self.name.as_str().to_string(),
        }
    }

    /// True when both identifiers live in the same schema scope
    pub fn same_schema(&self, other: &TableIdentifier) -> bool {
        match (&self.schema, &other.schema) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// Case-insensitive bare-name equality after quote stripping. Columns,
/// triggers and constraints are matched with this rule.
pub fn names_equal(a: &str, b: &str) -> bool {
    ObjectName::parse(a)
        .as_str()
        .eq_ignore_ascii_case(ObjectName::parse(b).as_str())
}
