//! Entity identifiers (`urn:li:<entityType>:<id>`).
//!
//! Only the structure is checked here: the prefix, a non-empty type
//! qualifier, a non-empty id, and balanced parentheses in tuple ids. Whether
//! the entity exists is the catalog's business.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const URN_PREFIX: &str = "urn:li:";

pub const CHART: &str = "chart";
pub const DATASET: &str = "dataset";
pub const DATA_PLATFORM: &str = "dataPlatform";
pub const TAG: &str = "tag";
pub const GLOSSARY_TERM: &str = "glossaryTerm";
pub const CORP_USER: &str = "corpuser";
pub const SCHEMA_FIELD: &str = "schemaField";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrnError {
    #[error("malformed urn {urn:?}: {reason}")]
    Malformed { urn: String, reason: &'static str },
}

impl UrnError {
    fn malformed(urn: &str, reason: &'static str) -> Self {
        UrnError::Malformed {
            urn: urn.to_string(),
            reason,
        }
    }
}

/// A parsed entity identifier.
///
/// `to_string()` is the exact inverse of `parse()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Urn {
    entity_type: String,
    id: String,
}

impl Urn {
    /// Builds an urn from a type qualifier and an already-formatted id.
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Result<Self, UrnError> {
        let entity_type = entity_type.into();
        let id = id.into();
        let urn = Urn { entity_type, id };
        urn.check()?;
        Ok(urn)
    }

    pub fn parse(s: &str) -> Result<Self, UrnError> {
        let rest = s
            .strip_prefix(URN_PREFIX)
            .ok_or_else(|| UrnError::malformed(s, "missing urn:li: prefix"))?;
        let (entity_type, id) = rest
            .split_once(':')
            .ok_or_else(|| UrnError::malformed(s, "missing entity id"))?;
        let urn = Urn {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        };
        urn.check()?;
        Ok(urn)
    }

    fn check(&self) -> Result<(), UrnError> {
        let display = || self.to_string();
        if self.entity_type.is_empty() {
            return Err(UrnError::malformed(&display(), "empty entity type"));
        }
        if self
            .entity_type
            .chars()
            .any(|c| c.is_whitespace() || c == ':' || c == '(' || c == ')')
        {
            return Err(UrnError::malformed(&display(), "invalid character in entity type"));
        }
        if self.id.is_empty() {
            return Err(UrnError::malformed(&display(), "empty entity id"));
        }
        let mut depth: usize = 0;
        for c in self.id.chars() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| UrnError::malformed(&display(), "unbalanced parentheses"))?;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(UrnError::malformed(&display(), "unbalanced parentheses"));
        }
        Ok(())
    }

    /// The type qualifier, e.g. `chart` for `urn:li:chart:(looker,1)`.
    #[inline]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Splits a tuple id `(a,b,c)` into its top-level parts.
    ///
    /// Nested urns inside the tuple stay intact. A plain id yields itself.
    pub fn entity_ids(&self) -> Vec<&str> {
        let inner = match self
            .id
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
        {
            Some(inner) => inner,
            None => return vec![self.id.as_str()],
        };
        let mut parts = Vec::new();
        let mut depth = 0usize;
        let mut start = 0usize;
        for (i, c) in inner.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(&inner[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        parts.push(&inner[start..]);
        parts
    }

    pub fn is_type(&self, entity_type: &str) -> bool {
        self.entity_type == entity_type
    }

    pub fn tag(name: &str) -> Result<Self, UrnError> {
        Urn::new(TAG, name)
    }

    pub fn glossary_term(name: &str) -> Result<Self, UrnError> {
        Urn::new(GLOSSARY_TERM, name)
    }

    pub fn corp_user(username: &str) -> Result<Self, UrnError> {
        Urn::new(CORP_USER, username)
    }

    pub fn data_platform(platform: &str) -> Result<Self, UrnError> {
        Urn::new(DATA_PLATFORM, platform)
    }

    /// `urn:li:chart:(<platform>,<name>)`
    pub fn chart(platform: &str, name: &str) -> Result<Self, UrnError> {
        Urn::new(CHART, format!("({platform},{name})"))
    }

    /// `urn:li:dataset:(urn:li:dataPlatform:<platform>,<name>,<env>)`
    pub fn dataset(platform: &str, name: &str, env: &str) -> Result<Self, UrnError> {
        let platform = Urn::data_platform(platform)?;
        Urn::new(DATASET, format!("({platform},{name},{env})"))
    }

    /// `urn:li:schemaField:(<dataset urn>,<field path>)`
    pub fn schema_field(dataset: &Urn, field_path: &str) -> Result<Self, UrnError> {
        if field_path.is_empty() {
            return Err(UrnError::malformed(&dataset.to_string(), "empty field path"));
        }
        Urn::new(SCHEMA_FIELD, format!("({dataset},{field_path})"))
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", URN_PREFIX, self.entity_type, self.id)
    }
}

impl FromStr for Urn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Urn::parse(s)
    }
}

impl TryFrom<&str> for Urn {
    type Error = UrnError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Urn::parse(s)
    }
}
