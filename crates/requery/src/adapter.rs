//! Extraction of filters from inbound HTTP requests.
//!
//! An [`HttpFilterAdapter`] knows how to recognize and read one way of
//! carrying a filter in a request. The [`FilterResolver`] holds an ordered
//! list of adapters and uses the first that supports the request.

use serde::{Deserialize, Serialize};

use crate::dsl::FilterWrapper;
use crate::error::{FilterError, FilterResult};

/// Filter-related query parameters of an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    /// The simple form: one condition or an array of conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// The complex form: a group.
    #[serde(
        default,
        rename = "complexFilter",
        skip_serializing_if = "Option::is_none"
    )]
    pub complex_filter: Option<String>,
}

impl FilterParams {
    /// Parses the parameters from a URL query string (without the leading
    /// `?`). Unrelated parameters are ignored.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` if the query string is malformed.
    pub fn from_query(query: &str) -> FilterResult<Self> {
        serde_urlencoded::from_str(query.trim_start_matches('?'))
            .map_err(|e| FilterError::parse(format!("invalid query string: {e}")))
    }

    /// Encodes the parameters as a URL query string.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` if encoding fails.
    pub fn to_query(&self) -> FilterResult<String> {
        serde_urlencoded::to_string(self)
            .map_err(|e| FilterError::parse(format!("cannot encode query string: {e}")))
    }
}

/// Reads a filter out of request parameters.
pub trait HttpFilterAdapter: Send + Sync {
    /// Returns true if this adapter can read a filter from `params`.
    fn supports(&self, params: &FilterParams) -> bool;

    /// Reads the filter. Adapters never fail: unreadable input yields
    /// [`FilterWrapper::Empty`].
    fn adapt(&self, params: &FilterParams) -> FilterWrapper;

    /// Name used in log events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Reads JSON filters from the `filter` and `complexFilter` parameters.
///
/// `filter` wins when both are present. Malformed JSON is logged and
/// treated as no filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHttpFilterAdapter;

impl HttpFilterAdapter for JsonHttpFilterAdapter {
    fn supports(&self, params: &FilterParams) -> bool {
        params.filter.is_some() || params.complex_filter.is_some()
    }

    fn adapt(&self, params: &FilterParams) -> FilterWrapper {
        let parsed = match (&params.filter, &params.complex_filter) {
            (Some(filter), _) => FilterWrapper::from_simple_json(filter),
            (None, Some(complex)) => FilterWrapper::from_complex_json(complex),
            (None, None) => return FilterWrapper::Empty,
        };

        parsed.unwrap_or_else(|err| {
            tracing::error!(error = %err, "ignoring unreadable filter parameter");
            FilterWrapper::Empty
        })
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Picks the first adapter that supports a request.
pub struct FilterResolver {
    adapters: Vec<Box<dyn HttpFilterAdapter>>,
}

impl Default for FilterResolver {
    /// A resolver with only the [`JsonHttpFilterAdapter`].
    fn default() -> Self {
        Self::new(vec![Box::new(JsonHttpFilterAdapter)])
    }
}

impl std::fmt::Debug for FilterResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterResolver")
            .field(
                "adapters",
                &self.adapters.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FilterResolver {
    /// Creates a resolver trying `adapters` in order.
    pub fn new(adapters: Vec<Box<dyn HttpFilterAdapter>>) -> Self {
        Self { adapters }
    }

    /// Appends an adapter with the lowest priority.
    pub fn with_adapter(mut self, adapter: impl HttpFilterAdapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    /// Resolves the filter carried by `params`, or
    /// [`FilterWrapper::Empty`] if no adapter supports them.
    pub fn resolve(&self, params: &FilterParams) -> FilterWrapper {
        for adapter in &self.adapters {
            let supported = adapter.supports(params);
            tracing::debug!(adapter = adapter.name(), supported, "probing filter adapter");
            if supported {
                return adapter.adapt(params);
            }
        }

        tracing::debug!("no filter adapter supports the request");
        FilterWrapper::Empty
    }

    /// Resolves the filter carried by a raw query string. A malformed query
    /// string is logged and yields [`FilterWrapper::Empty`].
    pub fn resolve_query(&self, query: &str) -> FilterWrapper {
        match FilterParams::from_query(query) {
            Ok(params) => self.resolve(&params),
            Err(err) => {
                tracing::error!(error = %err, "ignoring unreadable query string");
                FilterWrapper::Empty
            }
        }
    }
}
