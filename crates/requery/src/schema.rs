//! Entity schemas and field type resolution.
//!
//! Every entity that can be filtered is registered up front as an explicit
//! table of field names to types. A field is either a scalar with a
//! [`ValueType`] or a relation to another registered entity, which lets
//! filters address nested attributes with dotted paths such as
//! `address.city`.
//!
//! # Example
//!
//! ```
//! use requery_rs::schema::{EntitySchema, SchemaRegistry};
//! use requery_rs::ValueType;
//!
//! let registry = SchemaRegistry::new()
//!     .with(
//!         EntitySchema::new("user")
//!             .field("age", ValueType::Integer)
//!             .relation("address", "address"),
//!     )
//!     .with(EntitySchema::new("address").field("city", ValueType::Text));
//!
//! assert_eq!(
//!     registry.resolve_field_type("user", "address.city").unwrap(),
//!     ValueType::Text
//! );
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::error::{FilterError, FilterResult};
use crate::value::ValueType;

/// Maximum Levenshtein distance to consider a field name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// The declared type of one entity attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    /// A plain value column.
    Scalar(ValueType),
    /// A link to another entity, traversed by the next path segment.
    Relation {
        /// Name of the related entity.
        entity: String,
    },
}

/// The filterable fields of a single entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    name: String,
    fields: BTreeMap<String, FieldType>,
}

impl EntitySchema {
    /// Creates an entity schema with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a scalar field.
    pub fn field(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.fields.insert(name.into(), FieldType::Scalar(value_type));
        self
    }

    /// Adds a relation to another entity.
    pub fn relation(mut self, name: impl Into<String>, entity: impl Into<String>) -> Self {
        self.fields.insert(
            name.into(),
            FieldType::Relation {
                entity: entity.into(),
            },
        );
        self
    }

    /// Adds a field of either kind.
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    /// Returns the entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared fields, ordered by name.
    pub fn fields(&self) -> &BTreeMap<String, FieldType> {
        &self.fields
    }

    /// Returns the type of a direct field.
    pub fn get(&self, field: &str) -> Option<&FieldType> {
        self.fields.get(field)
    }
}

/// A type that describes its own filterable schema.
///
/// Implement this for domain structs so they can be registered with
/// [`SchemaRegistry::register`] without spelling the entity name twice.
pub trait Entity {
    /// The name filters use to address this entity.
    const NAME: &'static str;

    /// Returns the field table for this entity.
    fn schema() -> EntitySchema;
}

/// Registry of entity schemas with a memoized field resolver.
///
/// Resolution results are cached per `(entity, field)` pair. Registering a
/// schema needs `&mut self` and drops the cache; resolving only needs `&self`,
/// so a registry behind an `Arc` can be shared between threads.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    entities: HashMap<String, EntitySchema>,
    cache: RwLock<HashMap<(String, String), ValueType>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity schema, returning the registry for chaining.
    pub fn with(mut self, schema: EntitySchema) -> Self {
        self.insert(schema);
        self
    }

    /// Registers the schema of an [`Entity`] type.
    pub fn register<E: Entity>(&mut self) -> &mut Self {
        let mut schema = E::schema();
        schema.name = E::NAME.to_string();
        self.insert(schema);
        self
    }

    /// Adds or replaces an entity schema.
    pub fn insert(&mut self, schema: EntitySchema) {
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.entities.insert(schema.name.clone(), schema);
    }

    /// Returns the schema of an entity.
    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.get(name)
    }

    /// Returns all registered entities sorted by name.
    pub fn entities(&self) -> Vec<&EntitySchema> {
        let mut entities: Vec<&EntitySchema> = self.entities.values().collect();
        entities.sort_by(|a, b| a.name.cmp(&b.name));
        entities
    }

    /// Resolves a field name or dotted path to its declared scalar type.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownEntity` if `entity` (or a relation target
    /// along the path) is not registered.
    ///
    /// Returns `FilterError::UnknownField` if any segment is not declared,
    /// if a scalar is followed by further segments, or if the path ends on
    /// a relation.
    pub fn resolve_field_type(&self, entity: &str, field: &str) -> FilterResult<ValueType> {
        let key = (entity.to_string(), field.to_string());
        if let Some(value_type) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(*value_type);
        }

        let value_type = self.walk_path(entity, field)?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value_type);
        Ok(value_type)
    }

    fn walk_path(&self, entity: &str, field: &str) -> FilterResult<ValueType> {
        let mut current = self
            .entity(entity)
            .ok_or_else(|| FilterError::unknown_entity(entity))?;

        let segments: Vec<&str> = field.split('.').collect();
        let mut resolved = Vec::with_capacity(segments.len());

        for (index, segment) in segments.iter().enumerate() {
            let is_last = index + 1 == segments.len();

            let Some(field_type) = current.get(segment) else {
                let suggestion = find_similar_name(segment, current.fields.keys())
                    .map(|name| join_path(&resolved, &name));
                return Err(FilterError::UnknownField {
                    entity: entity.to_string(),
                    field: field.to_string(),
                    suggestion,
                });
            };

            match field_type {
                FieldType::Scalar(value_type) if is_last => return Ok(*value_type),
                FieldType::Scalar(_) => {
                    return Err(FilterError::unknown_field(entity, field));
                }
                FieldType::Relation { .. } if is_last => {
                    return Err(FilterError::unknown_field(entity, field));
                }
                FieldType::Relation { entity: target } => {
                    current = self
                        .entity(target)
                        .ok_or_else(|| FilterError::unknown_entity(target.as_str()))?;
                }
            }
            resolved.push(*segment);
        }

        // split always yields at least one segment
        Err(FilterError::unknown_field(entity, field))
    }
}

fn join_path(prefix: &[&str], last: &str) -> String {
    if prefix.is_empty() {
        last.to_string()
    } else {
        format!("{}.{}", prefix.join("."), last)
    }
}

/// Finds the best matching name from a list of candidates using Levenshtein distance.
///
/// Comparison is case-insensitive so that `Age` suggests `age`.
fn find_similar_name<'a>(
    query: &str,
    candidates: impl Iterator<Item = &'a String>,
) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .filter(|name| !name.is_empty() && name.as_str() != query)
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    (best_distance <= MAX_SUGGESTION_DISTANCE).then(|| best_match.clone())
}
