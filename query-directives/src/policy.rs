//! Allow-list policies for directive validation
//!
//! Every parser consults a policy declared once per endpoint. Policies are
//! immutable after construction and hold no per-request state, so a single
//! value can be shared by every request handler.
//!
//! An empty allow-list means "no restriction", never "nothing allowed".
//!
//! # Example
//!
//! ```rust
//! use query_directives::policy::{is_allowed, FieldPolicy};
//! use query_directives::FilterRule;
//!
//! assert!(is_allowed(&"anything", &[] as &[&str]));
//!
//! let policy = FieldPolicy::new()
//!     .with_fields(["age", "name"])
//!     .with_rules([FilterRule::Equals, FilterRule::GreaterThanOrEquals]);
//!
//! assert!(policy.allowed_fields.permits("age"));
//! assert!(!policy.allowed_fields.permits("email"));
//! assert!(policy.allowed_rules.permits(&FilterRule::Equals));
//! ```

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::filter::FilterRule;
use crate::sort::{Direction, SortCriterion};

/// Returns `true` when `value` may be used under `allow_list`
///
/// An empty list permits every value.
pub fn is_allowed<T, Q>(value: &Q, allow_list: &[T]) -> bool
where
    T: Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    allow_list.is_empty() || allow_list.iter().any(|item| item.borrow() == value)
}

/// An ordered set of permitted values where empty means unrestricted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList<T>(Vec<T>);

impl<T> AllowList<T> {
    /// An allow-list that permits everything
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self(Vec::new())
    }

    /// Whether this list places no restriction
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// The configured entries, in declaration order
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Check `value` against this list
    pub fn permits<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        is_allowed(value, &self.0)
    }
}

impl<T> Default for AllowList<T> {
    fn default() -> Self {
        Self::unrestricted()
    }
}

impl<T> From<Vec<T>> for AllowList<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T, U: Into<T>> FromIterator<U> for AllowList<T> {
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Which properties and rules an endpoint accepts in filter directives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldPolicy {
    /// Properties that may be filtered on
    pub allowed_fields: AllowList<String>,
    /// Rules that may be used
    pub allowed_rules: AllowList<FilterRule>,
}

impl FieldPolicy {
    /// An unrestricted policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the filterable properties
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_fields = fields.into_iter().collect();
        self
    }

    /// Restrict the usable rules
    #[must_use]
    pub fn with_rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = FilterRule>,
    {
        self.allowed_rules = rules.into_iter().collect();
        self
    }
}

/// Fallback ordering used when a request carries no sort directive
///
/// Both halves must be present for the default to apply; a partially
/// configured default is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortDefault {
    pub property: Option<String>,
    pub direction: Option<Direction>,
}

impl SortDefault {
    /// A fully configured default
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: Some(property.into()),
            direction: Some(direction),
        }
    }

    /// The criterion this default stands for, if it is complete
    #[must_use]
    pub fn resolve(&self) -> Option<SortCriterion> {
        match (self.property.as_deref(), self.direction) {
            (Some(property), Some(direction)) if !property.is_empty() => {
                Some(SortCriterion::new(property, direction))
            }
            _ => None,
        }
    }
}

/// Which properties an endpoint may be sorted by
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortPolicy {
    /// Properties that may appear in a sort directive
    pub allowed_fields: AllowList<String>,
    /// Ordering applied when the request has none
    pub default: Option<SortDefault>,
}

impl SortPolicy {
    /// An unrestricted policy without a default
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the sortable properties
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_fields = fields.into_iter().collect();
        self
    }

    /// Set the fallback ordering
    #[must_use]
    pub fn with_default(mut self, property: impl Into<String>, direction: Direction) -> Self {
        self.default = Some(SortDefault::new(property, direction));
        self
    }
}

/// Bounds for the page size
///
/// Every bound is optional and tracked explicitly, so a bound of `0` is as
/// much a configured bound as any other value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitBounds {
    /// Smallest accepted limit
    pub min: Option<i64>,
    /// Largest accepted limit
    pub max: Option<i64>,
    /// Limit used when the request does not supply a numeric one
    pub default: Option<u64>,
}

impl LimitBounds {
    /// No bounds and no default
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min: None,
            max: None,
            default: None,
        }
    }

    /// Set the smallest accepted limit
    #[must_use]
    pub const fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the largest accepted limit
    #[must_use]
    pub const fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the limit used when none is requested
    #[must_use]
    pub const fn with_default(mut self, default: u64) -> Self {
        self.default = Some(default);
        self
    }
}
