//! Filter directive grammar and parser
//!
//! A filter directive is a single `property:rule:value` or `property:rule`
//! string taken from the `filters` query parameter. The parameter may be
//! repeated, in which case every occurrence is parsed in order.
//!
//! # Grammar
//!
//! - Binary rules: `^[A-Za-z0-9_]+:(eq|neq|gt|gte|lt|lte|like|nlike|in|nin):[A-Za-z0-9\-,|]+$`
//! - Nullary rules: `^[A-Za-z0-9_]+:(isnull|isnotnull|istrue|isfalse)$`
//!
//! # Example
//!
//! ```rust
//! use query_directives::{parse_filters, FieldPolicy, FilterRule};
//!
//! let policy = FieldPolicy::new()
//!     .with_fields(["age", "status"])
//!     .with_rules([FilterRule::GreaterThanOrEquals, FilterRule::In]);
//!
//! let criteria = parse_filters(["age:gte:18", "status:in:active|pending"], &policy).unwrap();
//!
//! assert_eq!(criteria.len(), 2);
//! assert_eq!(criteria[0].rule, FilterRule::GreaterThanOrEquals);
//! assert_eq!(criteria[1].values(), vec!["active", "pending"]);
//! ```

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::policy::FieldPolicy;

static BINARY_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+:(eq|neq|gt|gte|lt|lte|like|nlike|in|nin):[A-Za-z0-9\-,|]+$")
        .expect("binary filter grammar is valid")
});

static NULLARY_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+:(isnull|isnotnull|istrue|isfalse)$")
        .expect("nullary filter grammar is valid")
});

/// Comparison rule of a filter directive
///
/// Serialized by name (`greater_than_or_equals`); the wire token (`gte`) is
/// accepted as well when deserializing, so policies can be configured either
/// way.
///
/// # Example
///
/// ```rust
/// use query_directives::FilterRule;
///
/// let rule: FilterRule = "nlike".parse().unwrap();
/// assert_eq!(rule, FilterRule::NotLike);
/// assert_eq!(rule.token(), "nlike");
/// assert!(FilterRule::IsNull.is_nullary());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterRule {
    /// `eq`
    #[serde(alias = "eq")]
    Equals,
    /// `neq`
    #[serde(alias = "neq")]
    NotEquals,
    /// `gt`
    #[serde(alias = "gt")]
    GreaterThan,
    /// `gte`
    #[serde(alias = "gte")]
    GreaterThanOrEquals,
    /// `lt`
    #[serde(alias = "lt")]
    LessThan,
    /// `lte`
    #[serde(alias = "lte")]
    LessThanOrEquals,
    /// `like`
    Like,
    /// `nlike`
    #[serde(alias = "nlike")]
    NotLike,
    /// `in`, value is a `,` or `|` delimited list
    In,
    /// `nin`, value is a `,` or `|` delimited list
    #[serde(alias = "nin")]
    NotIn,
    /// `isnull`, takes no value
    #[serde(alias = "isnull")]
    IsNull,
    /// `isnotnull`, takes no value
    #[serde(alias = "isnotnull")]
    IsNotNull,
    /// `istrue`, takes no value
    #[serde(alias = "istrue")]
    IsTrue,
    /// `isfalse`, takes no value
    #[serde(alias = "isfalse")]
    IsFalse,
}

impl FilterRule {
    /// Every rule, binary rules first
    pub const ALL: [FilterRule; 14] = [
        Self::Equals,
        Self::NotEquals,
        Self::GreaterThan,
        Self::GreaterThanOrEquals,
        Self::LessThan,
        Self::LessThanOrEquals,
        Self::Like,
        Self::NotLike,
        Self::In,
        Self::NotIn,
        Self::IsNull,
        Self::IsNotNull,
        Self::IsTrue,
        Self::IsFalse,
    ];

    /// The token used for this rule inside a directive
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Equals => "eq",
            Self::NotEquals => "neq",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEquals => "gte",
            Self::LessThan => "lt",
            Self::LessThanOrEquals => "lte",
            Self::Like => "like",
            Self::NotLike => "nlike",
            Self::In => "in",
            Self::NotIn => "nin",
            Self::IsNull => "isnull",
            Self::IsNotNull => "isnotnull",
            Self::IsTrue => "istrue",
            Self::IsFalse => "isfalse",
        }
    }

    /// The descriptive name used when serializing
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanOrEquals => "greater_than_or_equals",
            Self::LessThan => "less_than",
            Self::LessThanOrEquals => "less_than_or_equals",
            Self::Like => "like",
            Self::NotLike => "not_like",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
            Self::IsTrue => "is_true",
            Self::IsFalse => "is_false",
        }
    }

    /// Whether the rule takes no value segment
    #[must_use]
    pub const fn is_nullary(&self) -> bool {
        match self {
            Self::IsNull | Self::IsNotNull | Self::IsTrue | Self::IsFalse => true,
            Self::Equals
            | Self::NotEquals
            | Self::GreaterThan
            | Self::GreaterThanOrEquals
            | Self::LessThan
            | Self::LessThanOrEquals
            | Self::Like
            | Self::NotLike
            | Self::In
            | Self::NotIn => false,
        }
    }

    /// Whether the value segment encodes a list
    #[must_use]
    pub const fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FilterRule {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.token() == token)
            .ok_or_else(|| ParseError::UnknownRule(token.to_string()))
    }
}

/// One validated filter directive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriterion {
    /// The property being filtered
    pub property: String,
    /// How the property is compared
    pub rule: FilterRule,
    /// Raw value segment; `None` for nullary rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FilterCriterion {
    /// Create a criterion with a value segment
    pub fn new(property: impl Into<String>, rule: FilterRule, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            rule,
            value: Some(value.into()),
        }
    }

    /// Create a criterion for a nullary rule
    pub fn nullary(property: impl Into<String>, rule: FilterRule) -> Self {
        Self {
            property: property.into(),
            rule,
            value: None,
        }
    }

    /// The value segment split into list items
    ///
    /// Items are separated by `,` or `|`; empty items are dropped. For rules
    /// that do not take a list the whole value is returned as the only item.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        let Some(value) = self.value.as_deref() else {
            return Vec::new();
        };
        if self.rule.takes_list() {
            value
                .split([',', '|'])
                .filter(|item| !item.is_empty())
                .collect()
        } else {
            vec![value]
        }
    }
}

impl fmt::Display for FilterCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}:{}", self.property, self.rule, value),
            None => write!(f, "{}:{}", self.property, self.rule),
        }
    }
}

/// Parse every filter directive in `raw` against `policy`
///
/// `raw` holds the occurrences of the filter parameter: pass an `Option<&str>`
/// for a single optional value or a slice/`Vec` for a repeated one. Empty
/// occurrences are skipped.
///
/// The first invalid directive rejects the whole input; criteria parsed before
/// it are discarded. Directives on the same property are all kept, in input
/// order.
///
/// # Errors
///
/// Returns the [`ParseError`] of the first directive that fails validation.
pub fn parse_filters<I, S>(raw: I, policy: &FieldPolicy) -> Result<Vec<FilterCriterion>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|directive| parse_directive(directive.as_ref(), policy).transpose())
        .collect()
}

fn parse_directive(
    directive: &str,
    policy: &FieldPolicy,
) -> Result<Option<FilterCriterion>, ParseError> {
    if directive.is_empty() {
        return Ok(None);
    }

    let result = validate_directive(directive, policy);
    match &result {
        Ok(criterion) => tracing::trace!(%criterion, "accepted filter directive"),
        Err(error) => tracing::debug!(directive, code = error.code(), "rejected filter directive"),
    }
    result.map(Some)
}

fn validate_directive(directive: &str, policy: &FieldPolicy) -> Result<FilterCriterion, ParseError> {
    if !BINARY_DIRECTIVE.is_match(directive) && !NULLARY_DIRECTIVE.is_match(directive) {
        return Err(ParseError::InvalidFilterSyntax(directive.to_string()));
    }

    let mut segments = directive.splitn(3, ':');
    let (Some(property), Some(token)) = (segments.next(), segments.next()) else {
        return Err(ParseError::InvalidFilterSyntax(directive.to_string()));
    };
    let value = segments.next();

    if !policy.allowed_fields.permits(property) {
        return Err(ParseError::DisallowedField(property.to_string()));
    }

    let rule: FilterRule = token.parse()?;

    if !policy.allowed_rules.permits(&rule) {
        return Err(ParseError::DisallowedRule(token.to_string()));
    }

    Ok(FilterCriterion {
        property: property.to_string(),
        rule,
        value: value.map(str::to_string),
    })
}
