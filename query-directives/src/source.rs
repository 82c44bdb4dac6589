//! Access to raw query values
//!
//! The parsers never look at a request. Callers hand them raw strings taken
//! from whatever query representation they have, through [`QuerySource`].
//!
//! # Example
//!
//! ```rust
//! use query_directives::source::{QueryPairs, QuerySource, QueryValue};
//!
//! let query = QueryPairs::parse("filters=age%3Agte%3A18&filters=name%3Alike%3Abob&page=2").unwrap();
//!
//! assert_eq!(
//!     query.query_value("filters"),
//!     Some(QueryValue::Multiple(vec![
//!         "age:gte:18".to_string(),
//!         "name:like:bob".to_string(),
//!     ]))
//! );
//! assert_eq!(query.query_value("page"), Some(QueryValue::Single("2".to_string())));
//! assert_eq!(query.query_value("sort"), None);
//! ```

use std::collections::HashMap;

use crate::error::Result;

/// The raw value(s) of one query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// The parameter appeared once
    Single(String),
    /// The parameter was repeated; values keep their order
    Multiple(Vec<String>),
}

impl QueryValue {
    /// The first value, used for parameters that only take one
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(values) => values.first().map(String::as_str),
        }
    }

    /// Every value, in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        };
        values.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            Self::Single(values.remove(0))
        } else {
            Self::Multiple(values)
        }
    }
}

/// Looks up raw query values by parameter name
///
/// Implement this for whatever holds the query of a request; the parsers
/// only ever see the values it returns.
pub trait QuerySource {
    /// The value(s) of `name`, or `None` when the parameter is absent
    fn query_value(&self, name: &str) -> Option<QueryValue>;
}

impl<T: QuerySource + ?Sized> QuerySource for &T {
    fn query_value(&self, name: &str) -> Option<QueryValue> {
        (**self).query_value(name)
    }
}

impl QuerySource for HashMap<String, String> {
    fn query_value(&self, name: &str) -> Option<QueryValue> {
        self.get(name).cloned().map(QueryValue::Single)
    }
}

impl QuerySource for HashMap<String, Vec<String>> {
    fn query_value(&self, name: &str) -> Option<QueryValue> {
        self.get(name)
            .filter(|values| !values.is_empty())
            .cloned()
            .map(QueryValue::from)
    }
}

/// Decoded `key=value` pairs of a query string, repeated keys included
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    /// Decode an `application/x-www-form-urlencoded` query string
    ///
    /// A leading `?` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`](crate::Error::Query) when the string cannot be decoded.
    pub fn parse(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        Ok(Self(pairs))
    }

    /// The decoded pairs, in query order
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(String, String)>> for QueryPairs {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryPairs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl QuerySource for QueryPairs {
    fn query_value(&self, name: &str) -> Option<QueryValue> {
        let values: Vec<String> = self
            .0
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(QueryValue::from(values))
        }
    }
}

#[cfg(feature = "http")]
mod extract {
    use axum::{extract::FromRequestParts, http::request::Parts};

    use super::QueryPairs;
    use crate::error::Error;

    /// Extracts the request's query string as [`QueryPairs`]
    ///
    /// A request without a query string yields empty pairs.
    impl<S> FromRequestParts<S> for QueryPairs
    where
        S: Send + Sync,
    {
        type Rejection = Error;

        async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
            match parts.uri.query() {
                Some(query) => QueryPairs::parse(query),
                None => Ok(QueryPairs::default()),
            }
        }
    }
}
