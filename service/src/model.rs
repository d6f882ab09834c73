//! Todo item representation.
//!
//! # Design
//! Items are schemaless: any JSON object is a valid todo. The only field the
//! service owns is `_id`, which always holds the store-assigned identifier in
//! its 24-character hex form on the way out. Whatever a caller sends under
//! `_id` is dropped on the way in.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the identifier field on every stored and returned item.
pub const ID_FIELD: &str = "_id";

/// A todo item: an open mapping of field names to JSON values.
pub type TodoItem = Map<String, Value>;

/// Store-assigned identifier of a todo item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(ObjectId);

/// The path segment could not be parsed as a todo identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a valid todo id")]
pub struct InvalidTodoId {
    pub input: String,
}

impl TodoId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for TodoId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for TodoId {
    type Err = InvalidTodoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self).map_err(|_| InvalidTodoId {
            input: s.to_string(),
        })
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// Set `_id` on `item` to the string form of `id`, replacing any existing value.
pub fn with_id(mut item: TodoItem, id: TodoId) -> TodoItem {
    item.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    item
}

/// Remove a caller-supplied `_id` so the store stays in charge of identifiers.
pub fn without_id(mut item: TodoItem) -> TodoItem {
    item.shift_remove(ID_FIELD);
    item
}
