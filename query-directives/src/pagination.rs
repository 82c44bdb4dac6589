//! Pagination normalizer
//!
//! Turns the raw `page` and `limit` query values into a [`PaginationState`].
//! A missing or nonsensical page falls back to the first page; the limit is
//! checked against the endpoint's [`LimitBounds`].
//!
//! # Example
//!
//! ```rust
//! use query_directives::{parse_pagination, LimitBounds};
//!
//! let bounds = LimitBounds::new().with_min(1).with_max(100).with_default(20);
//!
//! let state = parse_pagination(Some("3"), Some("25"), &bounds).unwrap();
//! assert_eq!(state.page, 3);
//! assert_eq!(state.limit, 25);
//! assert_eq!(state.offset, 50);
//!
//! // No limit given: the default applies
//! let state = parse_pagination(None, None, &bounds).unwrap();
//! assert_eq!(state.limit, 20);
//! assert_eq!(state.page, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::policy::LimitBounds;

/// Normalized pagination parameters
///
/// `offset` is always `(page - 1) * limit` and `size` always equals `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationState {
    /// Page number (starts at 1)
    pub page: u64,
    /// Number of items per page
    pub limit: u64,
    /// Same as `limit`, under the name used by response envelopes
    pub size: u64,
    /// Number of items to skip
    pub offset: u64,
}

impl PaginationState {
    /// Build a state for `page` and `limit`
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidLimit`] when `limit` is zero
    /// - [`ParseError::OffsetOverflow`] when the offset does not fit in a `u64`
    pub fn new(page: u64, limit: u64) -> Result<Self, ParseError> {
        if limit == 0 {
            return Err(ParseError::InvalidLimit(limit.to_string()));
        }
        let page = page.max(1);
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or(ParseError::OffsetOverflow { page, limit })?;

        Ok(Self {
            page,
            limit,
            size: limit,
            offset,
        })
    }
}

/// Normalize raw `page` and `limit` query values
///
/// Numbers are read leniently: leading whitespace and an optional sign are
/// accepted, and reading stops at the first non-digit (`"12abc"` is `12`).
///
/// - A page that is not a number or is not positive becomes `1`.
/// - A limit that is not a number takes `bounds.default` when one is set;
///   bounds are not applied to the default.
/// - Otherwise the limit must satisfy `bounds.min` and `bounds.max` when
///   they are set, including bounds of `0`.
///
/// # Errors
///
/// - [`ParseError::LimitBelowMinimum`] / [`ParseError::LimitAboveMaximum`] on bound violations
/// - [`ParseError::InvalidLimit`] when no usable limit results
/// - [`ParseError::OffsetOverflow`] when the offset does not fit in a `u64`
pub fn parse_pagination(
    raw_page: Option<&str>,
    raw_limit: Option<&str>,
    bounds: &LimitBounds,
) -> Result<PaginationState, ParseError> {
    let page = raw_page
        .and_then(parse_leading_int)
        .and_then(|page| u64::try_from(page).ok())
        .filter(|page| *page > 0)
        .unwrap_or(1);

    let limit = match (raw_limit.and_then(parse_leading_int), bounds.default) {
        (None, Some(default)) => default,
        (None, None) => {
            let raw = raw_limit.unwrap_or_default();
            tracing::debug!(limit = raw, "rejected non-numeric page limit");
            return Err(ParseError::InvalidLimit(raw.to_string()));
        }
        (Some(limit), _) => {
            check_bounds(limit, bounds)?;
            u64::try_from(limit).map_err(|_| ParseError::InvalidLimit(limit.to_string()))?
        }
    };

    PaginationState::new(page, limit)
}

fn check_bounds(limit: i64, bounds: &LimitBounds) -> Result<(), ParseError> {
    if let Some(min) = bounds.min {
        if limit < min {
            tracing::debug!(limit, min, "page limit below minimum");
            return Err(ParseError::LimitBelowMinimum { limit, min });
        }
    }
    if let Some(max) = bounds.max {
        if limit > max {
            tracing::debug!(limit, max, "page limit above maximum");
            return Err(ParseError::LimitAboveMaximum { limit, max });
        }
    }
    Ok(())
}

/// Read the base-10 integer at the start of `raw`
///
/// Returns `None` when there are no digits or the value overflows an `i64`.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = unsigned
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = unsigned[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
