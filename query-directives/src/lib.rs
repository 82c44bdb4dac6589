//! # query-directives
//!
//! Filter, sort and pagination directives for list endpoints.
//!
//! A client narrows a collection with query parameters such as
//! `?filters=age:gte:18&filters=deleted_at:isnull&sort=name:desc&page=2&limit=20`.
//! This crate turns those raw values into validated, structured criteria and
//! rejects malformed or disallowed input with a precise [`ParseError`].
//! Running the criteria against a data store is left to the caller.
//!
//! ## Features
//!
//! - **Filter grammar**: `property:rule:value` and nullary `property:rule` directives
//! - **Sort grammar**: a single `property:asc|desc` directive with an optional default
//! - **Pagination**: page/limit normalization with explicit min/max/default bounds
//! - **Allow-lists**: per-endpoint field and rule policies, empty meaning unrestricted
//! - **Framework-free core**: raw values arrive through [`QuerySource`]
//! - **axum integration** (`http` feature): query extractor and `400` error responses
//!
//! ## Example
//!
//! ```rust
//! use query_directives::prelude::*;
//!
//! let filters = FieldPolicy::new()
//!     .with_fields(["age"])
//!     .with_rules([FilterRule::GreaterThanOrEquals]);
//! let criteria = parse_filters(Some("age:gte:18"), &filters).unwrap();
//! assert_eq!(criteria, vec![FilterCriterion::new("age", FilterRule::GreaterThanOrEquals, "18")]);
//!
//! let sort = SortPolicy::new().with_fields(["id"]).with_default("id", Direction::Ascending);
//! assert_eq!(
//!     parse_sort(None, &sort).unwrap(),
//!     Some(SortCriterion::new("id", Direction::Ascending))
//! );
//!
//! let page = parse_pagination(Some("0"), Some("10"), &LimitBounds::new()).unwrap();
//! assert_eq!((page.page, page.limit, page.offset), (1, 10, 0));
//!
//! let err = parse_pagination(Some("2"), Some("500"), &LimitBounds::new().with_max(100)).unwrap_err();
//! assert!(matches!(err, ParseError::LimitAboveMaximum { .. }));
//! ```

pub mod config;
pub mod directives;
pub mod error;
pub mod filter;
pub mod observability;
pub mod pagination;
pub mod policy;
pub mod response;
pub mod sort;
pub mod source;

pub use directives::{EndpointPolicy, ListDirectives, ParameterNames};
pub use error::{Error, ParseError, Result};
pub use filter::{parse_filters, FilterCriterion, FilterRule};
pub use pagination::{parse_pagination, PaginationState};
pub use policy::{is_allowed, AllowList, FieldPolicy, LimitBounds, SortDefault, SortPolicy};
pub use response::{PageMeta, PaginatedResource};
pub use sort::{parse_sort, Direction, SortCriterion};
pub use source::{QueryPairs, QuerySource, QueryValue};

/// Re-exports of commonly used types and functions
pub mod prelude {
    pub use crate::config::DirectivesConfig;
    pub use crate::directives::{EndpointPolicy, ListDirectives, ParameterNames};
    pub use crate::error::{Error, ParseError, Result};
    pub use crate::filter::{parse_filters, FilterCriterion, FilterRule};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{parse_pagination, PaginationState};
    pub use crate::policy::{FieldPolicy, LimitBounds, SortDefault, SortPolicy};
    pub use crate::response::{PageMeta, PaginatedResource};
    pub use crate::sort::{parse_sort, Direction, SortCriterion};
    pub use crate::source::{QueryPairs, QuerySource, QueryValue};

    #[cfg(feature = "http")]
    pub use crate::error::ErrorResponse;
}
