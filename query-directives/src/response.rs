//! Paginated response envelope
//!
//! The collection returned to clients after a list query has run. The field
//! names are a fixed contract: `{ "results": [...], "meta": { "total", "page", "size" } }`.
//!
//! # Example
//!
//! ```rust
//! use query_directives::{parse_pagination, LimitBounds, PaginatedResource};
//!
//! let pagination = parse_pagination(Some("2"), Some("2"), &LimitBounds::new()).unwrap();
//! let response = PaginatedResource::new(vec!["carol", "dave"], 5, &pagination);
//!
//! assert_eq!(response.meta.page, 2);
//! assert_eq!(response.meta.size, 2);
//! assert_eq!(response.meta.total, 5);
//! ```

use serde::{Deserialize, Serialize};

#[cfg(feature = "http")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pagination::PaginationState;

/// Pagination metadata of a [`PaginatedResource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of items matching the filters
    pub total: u64,
    /// Current page number (starts at 1)
    pub page: u64,
    /// Requested page size
    pub size: u64,
}

impl PageMeta {
    /// Number of pages needed for `total` items
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }

    /// Whether a page follows this one
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// One page of results with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResource<T> {
    /// The items of the current page
    pub results: Vec<T>,
    /// Pagination metadata
    pub meta: PageMeta,
}

impl<T> PaginatedResource<T> {
    /// Wrap one page of `results` fetched with `pagination`
    pub fn new(results: Vec<T>, total: u64, pagination: &PaginationState) -> Self {
        Self {
            results,
            meta: PageMeta {
                total,
                page: pagination.page,
                size: pagination.size,
            },
        }
    }

    /// Map each item to a new type
    pub fn map<U, F>(self, f: F) -> PaginatedResource<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResource {
            results: self.results.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(feature = "http")]
impl<T: Serialize> IntoResponse for PaginatedResource<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(page: u64, limit: u64) -> PaginationState {
        PaginationState::new(page, limit).unwrap()
    }

    #[test]
    fn test_envelope_shape() {
        let response = PaginatedResource::new(vec![1, 2], 12, &state(3, 5));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "results": [1, 2],
                "meta": {"total": 12, "page": 3, "size": 5}
            })
        );
    }

    #[test]
    fn test_total_pages_and_next() {
        let first = PaginatedResource::new(vec![(); 5], 12, &state(1, 5));
        assert_eq!(first.meta.total_pages(), 3);
        assert!(first.meta.has_next());

        let last = PaginatedResource::new(vec![(); 2], 12, &state(3, 5));
        assert!(!last.meta.has_next());

        let empty = PaginatedResource::<()>::new(Vec::new(), 0, &state(1, 5));
        assert_eq!(empty.meta.total_pages(), 0);
        assert!(!empty.meta.has_next());
    }

    #[test]
    fn test_map_keeps_meta() {
        let response = PaginatedResource::new(vec![1, 2, 3], 3, &state(1, 10));
        let mapped = response.map(|n| n.to_string());
        assert_eq!(mapped.results, vec!["1", "2", "3"]);
        assert_eq!(mapped.meta.size, 10);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_into_response() {
        let response = PaginatedResource::new(vec!["a"], 1, &state(1, 10)).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let decoded: PaginatedResource<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded.results, vec!["a".to_string()]);
        assert_eq!(decoded.meta.total, 1);
    }
}
