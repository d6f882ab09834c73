use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::{Client, Collection};
use serde_json::Value;

use super::{ReplaceOutcome, StoreError, TodoStore};
use crate::model::{TodoId, TodoItem, ID_FIELD};

/// `TodoStore` backed by a single MongoDB collection.
///
/// Holds one `Client` for the whole process. The driver pools connections
/// internally, so handlers share this value through an `Arc` and never open
/// or close connections themselves.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connect to `uri` and verify the server answers a ping.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database, collection, "connected to mongodb");
        Ok(Self {
            collection: db.collection(collection),
            client,
        })
    }

    fn by_id(id: TodoId) -> Document {
        doc! { "_id": id.object_id() }
    }
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        let docs: Vec<Document> = self.collection.find(doc! {}).await?.try_collect().await?;
        docs.into_iter().map(document_to_item).collect()
    }

    async fn insert(&self, item: TodoItem) -> Result<TodoId, StoreError> {
        let result = self.collection.insert_one(item_to_document(&item)?).await?;
        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(TodoId::from(oid)),
            other => Err(StoreError::Conversion(format!(
                "expected an ObjectId from insert, got {other}"
            ))),
        }
    }

    async fn find(&self, id: TodoId) -> Result<Option<TodoItem>, StoreError> {
        self.collection
            .find_one(Self::by_id(id))
            .await?
            .map(document_to_item)
            .transpose()
    }

    async fn replace(&self, id: TodoId, item: TodoItem) -> Result<ReplaceOutcome, StoreError> {
        let result = self
            .collection
            .replace_one(Self::by_id(id), item_to_document(&item)?)
            .await?;
        Ok(ReplaceOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete(&self, id: TodoId) -> Result<u64, StoreError> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;
        Ok(result.deleted_count)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("mongodb client shut down");
    }
}

/// Convert a JSON item into a BSON document for insertion.
pub(crate) fn item_to_document(item: &TodoItem) -> Result<Document, StoreError> {
    bson::to_document(item).map_err(|e| StoreError::Conversion(e.to_string()))
}

/// Convert a stored document into a JSON item with `_id` as a plain string.
///
/// Non-identifier fields use relaxed extended JSON, so dates and other BSON
/// types come out as `{"$date": ...}` style objects.
pub(crate) fn document_to_item(mut doc: Document) -> Result<TodoItem, StoreError> {
    let id = doc.remove(ID_FIELD).map(id_to_string);
    let mut item = match Bson::Document(doc).into_relaxed_extjson() {
        Value::Object(map) => map,
        other => {
            return Err(StoreError::Conversion(format!(
                "expected a JSON object, got {other}"
            )))
        }
    };
    if let Some(id) = id {
        item.insert(ID_FIELD.to_string(), Value::String(id));
    }
    Ok(item)
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}
