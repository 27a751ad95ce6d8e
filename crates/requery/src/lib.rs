//! Bidirectional translation between a JSON filter DSL and query predicates.
//!
//! Callers describe ad-hoc filters as JSON: either a flat list of
//! `field`/`operator`/`value` conditions that are AND-combined, or a nested
//! group with explicit `AND`/`OR` connectives. This crate
//!
//! - parses the DSL ([`dsl`]),
//! - converts it into a typed [`Predicate`] against a registered entity
//!   schema ([`convert`], [`schema`]),
//! - converts a predicate back into the DSL that produces it ([`reverse`]),
//! - and exposes both directions through [`FilterFactory`].
//!
//! Predicates can be evaluated against JSON rows or rendered as a
//! parameterized SQL `WHERE` clause.
//!
//! # Example
//!
//! ```
//! use requery_rs::{DefaultFilterFactory, FilterFactory, FilterWrapper, ValueType};
//! use requery_rs::schema::{EntitySchema, SchemaRegistry};
//! use serde_json::json;
//!
//! let factory = DefaultFilterFactory::from(
//!     SchemaRegistry::new().with(
//!         EntitySchema::new("user")
//!             .field("status", ValueType::Text)
//!             .field("age", ValueType::Integer),
//!     ),
//! );
//!
//! let wrapper = FilterWrapper::from_json(
//!     r#"{"operator": "OR", "operations": [
//!         {"field": "status", "operator": "eq", "value": "A"},
//!         {"operator": "AND", "operations": [
//!             {"field": "status", "operator": "eq", "value": "B"},
//!             {"field": "age", "operator": "lt", "value": 30}]}]}"#,
//! )
//! .unwrap();
//!
//! let predicate = factory.to_predicate(&wrapper, "user").unwrap();
//! assert_eq!(
//!     predicate.to_string(),
//!     "status = 'A' OR (status = 'B' AND age < 30)"
//! );
//! assert!(predicate.matches(&json!({"status": "B", "age": 20})));
//! assert!(!predicate.matches(&json!({"status": "B", "age": 40})));
//! ```

pub mod adapter;
pub mod convert;
pub mod dsl;
pub mod error;
pub mod factory;
pub mod predicate;
pub mod reverse;
pub mod schema;
pub mod value;

pub use adapter::{FilterParams, FilterResolver, HttpFilterAdapter, JsonHttpFilterAdapter};
pub use dsl::{Connective, FilterCondition, FilterGroup, FilterOperation, FilterWrapper, GroupOperation};
pub use error::{FilterError, FilterResult};
pub use factory::{DefaultFilterFactory, FilterFactory, OutboundRequest};
pub use predicate::{Criterion, Predicate, SqlWhere, Test};
pub use schema::{Entity, EntitySchema, FieldType, SchemaRegistry};
pub use value::{Value, ValueType};
