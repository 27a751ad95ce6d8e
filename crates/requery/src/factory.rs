//! The filter facade.
//!
//! [`FilterFactory`] is the single entry point for callers: it turns filters
//! into predicates, predicates back into filters, and assembles outbound
//! requests that carry a filter to another service.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use requery_rs::factory::{DefaultFilterFactory, FilterFactory};
//! use requery_rs::schema::{EntitySchema, SchemaRegistry};
//! use requery_rs::{FilterWrapper, ValueType};
//!
//! let registry = SchemaRegistry::new().with(
//!     EntitySchema::new("user").field("age", ValueType::Integer),
//! );
//! let factory = DefaultFilterFactory::new(Arc::new(registry));
//!
//! let wrapper =
//!     FilterWrapper::from_json(r#"{"field": "age", "operator": "gte", "value": 21}"#).unwrap();
//! let predicate = factory.to_predicate(&wrapper, "user").unwrap();
//! assert_eq!(factory.to_wrapper(&predicate, "user").unwrap(), wrapper);
//! ```

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use serde::Serialize;

use crate::dsl::{FilterWrapper, COMPLEX_FILTER_PARAM, SIMPLE_FILTER_PARAM};
use crate::error::FilterResult;
use crate::predicate::Predicate;
use crate::schema::SchemaRegistry;
use crate::{convert, reverse};

/// Converts between filters and predicates, and builds outbound requests.
pub trait FilterFactory: Send + Sync {
    /// Builds the predicate for `wrapper` against `entity`.
    ///
    /// # Errors
    ///
    /// Any conversion error aborts the build; see
    /// [`PredicateBuilder::build`](crate::convert::PredicateBuilder::build).
    fn to_predicate(&self, wrapper: &FilterWrapper, entity: &str) -> FilterResult<Predicate>;

    /// Reconstructs the filter that produces `predicate` for `entity`.
    ///
    /// # Errors
    ///
    /// See [`DslBuilder::build`](crate::reverse::DslBuilder::build).
    fn to_wrapper(&self, predicate: &Predicate, entity: &str) -> FilterResult<FilterWrapper>;

    /// Assembles an outbound request. No I/O happens here.
    fn to_request<T>(
        &self,
        body: T,
        headers: HeaderMap,
        method: Method,
        url: Url,
    ) -> OutboundRequest<T>
    where
        Self: Sized,
    {
        OutboundRequest {
            body,
            headers,
            method,
            url,
        }
    }
}

/// The default [`FilterFactory`], resolving fields through a shared registry.
#[derive(Debug, Clone)]
pub struct DefaultFilterFactory {
    registry: Arc<SchemaRegistry>,
}

impl DefaultFilterFactory {
    /// Creates a factory over `registry`.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the schema registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }
}

impl From<SchemaRegistry> for DefaultFilterFactory {
    fn from(registry: SchemaRegistry) -> Self {
        Self::new(Arc::new(registry))
    }
}

impl FilterFactory for DefaultFilterFactory {
    fn to_predicate(&self, wrapper: &FilterWrapper, entity: &str) -> FilterResult<Predicate> {
        convert::build_predicate(&self.registry, wrapper, entity)
    }

    fn to_wrapper(&self, predicate: &Predicate, entity: &str) -> FilterResult<FilterWrapper> {
        reverse::build_dsl(&self.registry, predicate, entity)
    }
}

/// A request ready to be sent: payload, headers, method and target URL.
#[derive(Debug, Clone)]
pub struct OutboundRequest<T> {
    pub body: T,
    pub headers: HeaderMap,
    pub method: Method,
    pub url: Url,
}

impl<T> OutboundRequest<T> {
    /// Puts `wrapper` into the URL's `filter` or `complexFilter` query
    /// parameter, replacing any filter already there. An empty wrapper
    /// just removes existing filter parameters.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` if the filter cannot be serialized.
    pub fn with_filter(mut self, wrapper: &FilterWrapper) -> FilterResult<Self> {
        let param = wrapper.to_query_param()?;

        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .into_owned()
            .filter(|(key, _)| key != SIMPLE_FILTER_PARAM && key != COMPLEX_FILTER_PARAM)
            .collect();

        self.url.set_query(None);
        if kept.is_empty() && param.is_none() {
            return Ok(self);
        }

        {
            let mut query = self.url.query_pairs_mut();
            query.extend_pairs(kept);
            if let Some((name, json)) = &param {
                query.append_pair(name, json);
            }
        }
        Ok(self)
    }

    /// Converts into a `reqwest` request builder on `client`, with the body
    /// serialized as JSON.
    pub fn into_reqwest(self, client: &reqwest::Client) -> reqwest::RequestBuilder
    where
        T: Serialize,
    {
        client
            .request(self.method, self.url)
            .headers(self.headers)
            .json(&self.body)
    }
}
