//! All directives of a list request at once
//!
//! [`ListDirectives::from_source`] runs the filter, sort and pagination
//! parsers against one [`QuerySource`] using the parameter names and policy
//! declared for an endpoint.
//!
//! # Example
//!
//! ```rust
//! use query_directives::prelude::*;
//!
//! let policy = EndpointPolicy::new()
//!     .with_filters(FieldPolicy::new().with_fields(["age"]))
//!     .with_sort(SortPolicy::new().with_fields(["id"]).with_default("id", Direction::Ascending))
//!     .with_limit(LimitBounds::new().with_max(100).with_default(20));
//!
//! let query = QueryPairs::parse("filters=age:gte:18&page=3").unwrap();
//! let directives = ListDirectives::from_source(&query, &policy, &ParameterNames::default()).unwrap();
//!
//! assert_eq!(directives.filters.len(), 1);
//! assert_eq!(directives.sort, Some(SortCriterion::new("id", Direction::Ascending)));
//! assert_eq!(directives.pagination.offset, 40);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::filter::{parse_filters, FilterCriterion};
use crate::pagination::{parse_pagination, PaginationState};
use crate::policy::{FieldPolicy, LimitBounds, SortPolicy};
use crate::sort::{parse_sort, SortCriterion};
use crate::source::{QuerySource, QueryValue};

/// Names of the query parameters carrying each directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterNames {
    pub filters: String,
    pub sort: String,
    pub page: String,
    pub limit: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            filters: "filters".to_string(),
            sort: "sort".to_string(),
            page: "page".to_string(),
            limit: "limit".to_string(),
        }
    }
}

/// Everything an endpoint declares about its list query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPolicy {
    /// Filter allow-lists
    pub filters: FieldPolicy,
    /// Sort allow-list and default
    pub sort: SortPolicy,
    /// Page size bounds
    pub limit: LimitBounds,
}

impl EndpointPolicy {
    /// An unrestricted policy without defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter allow-lists
    #[must_use]
    pub fn with_filters(mut self, filters: FieldPolicy) -> Self {
        self.filters = filters;
        self
    }

    /// Set the sort allow-list and default
    #[must_use]
    pub fn with_sort(mut self, sort: SortPolicy) -> Self {
        self.sort = sort;
        self
    }

    /// Set the page size bounds
    #[must_use]
    pub fn with_limit(mut self, limit: LimitBounds) -> Self {
        self.limit = limit;
        self
    }
}

/// The parsed filter, sort and pagination directives of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDirectives {
    /// Filter criteria in request order
    pub filters: Vec<FilterCriterion>,
    /// Requested or default ordering
    pub sort: Option<SortCriterion>,
    /// Normalized page window
    pub pagination: PaginationState,
}

impl ListDirectives {
    /// Parse every directive `source` carries
    ///
    /// `sort`, `page` and `limit` take a single value; when repeated, the
    /// first occurrence is used. Every occurrence of the filter parameter is
    /// parsed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered, checking filters, then
    /// sort, then pagination.
    pub fn from_source<Q>(
        source: &Q,
        policy: &EndpointPolicy,
        names: &ParameterNames,
    ) -> Result<Self, ParseError>
    where
        Q: QuerySource + ?Sized,
    {
        let filters = source.query_value(&names.filters);
        let sort = source.query_value(&names.sort);
        let page = source.query_value(&names.page);
        let limit = source.query_value(&names.limit);

        let filters = parse_filters(filters.iter().flat_map(|value| value.iter()), &policy.filters)?;
        let sort = parse_sort(sort.as_ref().and_then(QueryValue::first), &policy.sort)?;
        let pagination = parse_pagination(
            page.as_ref().and_then(QueryValue::first),
            limit.as_ref().and_then(QueryValue::first),
            &policy.limit,
        )?;

        Ok(Self {
            filters,
            sort,
            pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterRule;
    use crate::sort::Direction;
    use crate::source::QueryPairs;
    use std::collections::HashMap;

    fn users_policy() -> EndpointPolicy {
        EndpointPolicy::new()
            .with_filters(
                FieldPolicy::new()
                    .with_fields(["age", "name", "deleted_at"])
                    .with_rules([
                        FilterRule::GreaterThanOrEquals,
                        FilterRule::LessThan,
                        FilterRule::Like,
                        FilterRule::IsNull,
                    ]),
            )
            .with_sort(
                SortPolicy::new()
                    .with_fields(["id", "name"])
                    .with_default("id", Direction::Ascending),
            )
            .with_limit(LimitBounds::new().with_min(1).with_max(100).with_default(20))
    }

    #[test]
    fn test_full_query() {
        let query = QueryPairs::parse(
            "filters=age:gte:18&filters=age:lt:65&filters=deleted_at:isnull&sort=name:desc&page=2&limit=10",
        )
        .unwrap();
        let directives =
            ListDirectives::from_source(&query, &users_policy(), &ParameterNames::default())
                .unwrap();

        assert_eq!(
            directives.filters,
            vec![
                FilterCriterion::new("age", FilterRule::GreaterThanOrEquals, "18"),
                FilterCriterion::new("age", FilterRule::LessThan, "65"),
                FilterCriterion::nullary("deleted_at", FilterRule::IsNull),
            ]
        );
        assert_eq!(
            directives.sort,
            Some(SortCriterion::new("name", Direction::Descending))
        );
        assert_eq!(
            directives.pagination,
            PaginationState {
                page: 2,
                limit: 10,
                size: 10,
                offset: 10
            }
        );
    }

    #[test]
    fn test_empty_query_uses_defaults() {
        let directives = ListDirectives::from_source(
            &QueryPairs::default(),
            &users_policy(),
            &ParameterNames::default(),
        )
        .unwrap();

        assert!(directives.filters.is_empty());
        assert_eq!(
            directives.sort,
            Some(SortCriterion::new("id", Direction::Ascending))
        );
        assert_eq!(directives.pagination.page, 1);
        assert_eq!(directives.pagination.limit, 20);
    }

    #[test]
    fn test_first_error_wins() {
        let query = QueryPairs::parse("filters=email:eq:x&sort=bad&limit=1000").unwrap();
        let err = ListDirectives::from_source(&query, &users_policy(), &ParameterNames::default())
            .unwrap_err();
        assert_eq!(err, ParseError::DisallowedField("email".to_string()));

        let query = QueryPairs::parse("sort=bad&limit=1000").unwrap();
        let err = ListDirectives::from_source(&query, &users_policy(), &ParameterNames::default())
            .unwrap_err();
        assert_eq!(err, ParseError::InvalidSortSyntax("bad".to_string()));

        let query = QueryPairs::parse("limit=1000").unwrap();
        let err = ListDirectives::from_source(&query, &users_policy(), &ParameterNames::default())
            .unwrap_err();
        assert_eq!(err, ParseError::LimitAboveMaximum { limit: 1000, max: 100 });
    }

    #[test]
    fn test_repeated_single_value_parameter_uses_first() {
        let query = QueryPairs::parse("sort=name:asc&sort=id:desc&page=3&page=9").unwrap();
        let directives =
            ListDirectives::from_source(&query, &users_policy(), &ParameterNames::default())
                .unwrap();
        assert_eq!(
            directives.sort,
            Some(SortCriterion::new("name", Direction::Ascending))
        );
        assert_eq!(directives.pagination.page, 3);
    }

    #[test]
    fn test_custom_parameter_names() {
        let names = ParameterNames {
            filters: "filter".to_string(),
            sort: "order_by".to_string(),
            page: "p".to_string(),
            limit: "per_page".to_string(),
        };
        let mut query = HashMap::new();
        query.insert("filter".to_string(), "name:like:bob".to_string());
        query.insert("order_by".to_string(), "id:desc".to_string());
        query.insert("p".to_string(), "4".to_string());
        query.insert("per_page".to_string(), "5".to_string());

        let directives = ListDirectives::from_source(&query, &users_policy(), &names).unwrap();
        assert_eq!(directives.filters.len(), 1);
        assert_eq!(
            directives.sort,
            Some(SortCriterion::new("id", Direction::Descending))
        );
        assert_eq!(directives.pagination.offset, 15);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_axum_list_handler() {
        use crate::response::PaginatedResource;
        use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
        use tower::ServiceExt;

        async fn list_users(query: QueryPairs) -> Result<PaginatedResource<String>, ParseError> {
            let directives =
                ListDirectives::from_source(&query, &users_policy(), &ParameterNames::default())?;
            Ok(PaginatedResource::new(
                vec!["alice".to_string()],
                1,
                &directives.pagination,
            ))
        }

        let app = Router::new().route("/users", get(list_users));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/users?page=2&limit=10").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["meta"], serde_json::json!({"total": 1, "page": 2, "size": 10}));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users?filters=email%3Aeq%3Ax")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_directives_serialize() {
        let query = QueryPairs::parse("filters=age:gte:18&limit=10").unwrap();
        let directives =
            ListDirectives::from_source(&query, &users_policy(), &ParameterNames::default())
                .unwrap();
        let json = serde_json::to_value(&directives).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "filters": [{"property": "age", "rule": "greater_than_or_equals", "value": "18"}],
                "sort": {"property": "id", "direction": "ascending"},
                "pagination": {"page": 1, "limit": 10, "size": 10, "offset": 0}
            })
        );
    }
}
