//! Sort directive grammar and parser
//!
//! A request carries at most one sort directive of the form
//! `property:direction`, where direction is `asc` or `desc`.
//!
//! # Example
//!
//! ```rust
//! use query_directives::{parse_sort, Direction, SortCriterion, SortPolicy};
//!
//! let policy = SortPolicy::new()
//!     .with_fields(["id", "createdAt"])
//!     .with_default("id", Direction::Ascending);
//!
//! let sort = parse_sort(Some("createdAt:desc"), &policy).unwrap();
//! assert_eq!(sort, Some(SortCriterion::new("createdAt", Direction::Descending)));
//!
//! // No directive falls back to the default
//! let sort = parse_sort(None, &policy).unwrap();
//! assert_eq!(sort, Some(SortCriterion::new("id", Direction::Ascending)));
//! ```

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::policy::SortPolicy;

static SORT_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9]+):(asc|desc)$").expect("sort grammar is valid")
});

/// Sort direction
///
/// Serialized as `ascending`/`descending`; the directive tokens `asc`/`desc`
/// are accepted when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    #[serde(alias = "desc")]
    Descending,
}

impl Direction {
    /// The token used for this direction inside a directive
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(ParseError::InvalidSortSyntax(other.to_string())),
        }
    }
}

/// A validated sort directive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortCriterion {
    /// The property to order by
    pub property: String,
    /// The ordering direction
    pub direction: Direction,
}

impl SortCriterion {
    /// Create a sort criterion
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.property, self.direction)
    }
}

/// Parse an optional sort directive against `policy`
///
/// An absent or empty directive yields the policy default when it is fully
/// configured, otherwise `None`.
///
/// # Errors
///
/// - [`ParseError::InvalidSortSyntax`] when the directive does not match the grammar
/// - [`ParseError::DisallowedField`] when the property is outside the allow-list
pub fn parse_sort(raw: Option<&str>, policy: &SortPolicy) -> Result<Option<SortCriterion>, ParseError> {
    let Some(directive) = raw.filter(|directive| !directive.is_empty()) else {
        return Ok(policy.default.as_ref().and_then(|default| default.resolve()));
    };

    let result = validate_directive(directive, policy);
    match &result {
        Ok(criterion) => tracing::trace!(%criterion, "accepted sort directive"),
        Err(error) => tracing::debug!(directive, code = error.code(), "rejected sort directive"),
    }
    result.map(Some)
}

fn validate_directive(directive: &str, policy: &SortPolicy) -> Result<SortCriterion, ParseError> {
    let captures = SORT_DIRECTIVE
        .captures(directive)
        .ok_or_else(|| ParseError::InvalidSortSyntax(directive.to_string()))?;

    let (_, [property, direction]) = captures.extract();

    if !policy.allowed_fields.permits(property) {
        return Err(ParseError::DisallowedField(property.to_string()));
    }

    Ok(SortCriterion::new(property, direction.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SortDefault;

    #[test]
    fn test_direction_display() {
        assert_eq!(format!("{}", Direction::Ascending), "asc");
        assert_eq!(format!("{}", Direction::Descending), "desc");
    }

    #[test]
    fn test_direction_default() {
        assert_eq!(Direction::default(), Direction::Ascending);
    }

    #[test]
    fn test_direction_serde() {
        let asc: Direction = serde_json::from_str("\"asc\"").unwrap();
        let desc: Direction = serde_json::from_str("\"descending\"").unwrap();
        assert_eq!(asc, Direction::Ascending);
        assert_eq!(desc, Direction::Descending);

        assert_eq!(serde_json::to_string(&Direction::Ascending).unwrap(), "\"ascending\"");
        assert_eq!(serde_json::to_string(&Direction::Descending).unwrap(), "\"descending\"");
    }

    #[test]
    fn test_absent_sort_uses_default() {
        let policy = SortPolicy::new()
            .with_fields(["id"])
            .with_default("id", Direction::Ascending);
        assert_eq!(
            parse_sort(None, &policy).unwrap(),
            Some(SortCriterion::new("id", Direction::Ascending))
        );
        assert_eq!(
            parse_sort(Some(""), &policy).unwrap(),
            Some(SortCriterion::new("id", Direction::Ascending))
        );
    }

    #[test]
    fn test_absent_sort_without_default() {
        assert_eq!(parse_sort(None, &SortPolicy::new()).unwrap(), None);
    }

    #[test]
    fn test_absent_sort_with_partial_default() {
        let policy = SortPolicy {
            default: Some(SortDefault {
                property: None,
                direction: Some(Direction::Descending),
            }),
            ..SortPolicy::new()
        };
        assert_eq!(parse_sort(None, &policy).unwrap(), None);
    }

    #[test]
    fn test_valid_sort() {
        let policy = SortPolicy::new().with_fields(["name"]);
        assert_eq!(
            parse_sort(Some("name:desc"), &policy).unwrap(),
            Some(SortCriterion::new("name", Direction::Descending))
        );
    }

    #[test]
    fn test_explicit_sort_overrides_default() {
        let policy = SortPolicy::new().with_default("id", Direction::Ascending);
        assert_eq!(
            parse_sort(Some("name:desc"), &policy).unwrap(),
            Some(SortCriterion::new("name", Direction::Descending))
        );
    }

    #[test]
    fn test_disallowed_sort_field() {
        let policy = SortPolicy::new().with_fields(["id"]);
        assert_eq!(
            parse_sort(Some("name:asc"), &policy).unwrap_err(),
            ParseError::DisallowedField("name".to_string())
        );
    }

    #[test]
    fn test_invalid_sort_syntax() {
        let policy = SortPolicy::new();
        for directive in [
            "name",
            "name:up",
            "name:ASC",
            "created_at:asc",
            "name:asc:desc",
            "name:asc,id:desc",
            ":asc",
        ] {
            assert_eq!(
                parse_sort(Some(directive), &policy).unwrap_err(),
                ParseError::InvalidSortSyntax(directive.to_string()),
                "{directive} should be rejected"
            );
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        let policy = SortPolicy::new().with_fields(["id"]);
        assert_eq!(
            parse_sort(Some("id:desc"), &policy),
            parse_sort(Some("id:desc"), &policy)
        );
    }
}
