//! Wire types for the todo API.
//!
//! # Design
//! Todos are schemaless on the server, so `Todo` keeps every field except
//! `_id` in an open JSON map. These types are defined independently from the
//! service crate; the integration test catches drift between the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A todo item as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    /// 24-character hex identifier assigned by the store.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Todo {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Form payload for `POST /token`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful `POST /token` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Error body shape shared by every failing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: String,
}
