use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection,
};
use service_core::error::AppError;

use super::MongoDb;

/// Schemaless persistence for the `records` collection.
#[derive(Clone)]
pub struct RecordRepository {
    collection: Collection<Document>,
}

impl RecordRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.records(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Document>, AppError> {
        let cursor = self.collection.find(doc! {}, None).await?;
        let records: Vec<Document> = cursor.try_collect().await?;
        Ok(records)
    }

    pub async fn get(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        let record = self.collection.find_one(doc! { "_id": id }, None).await?;
        Ok(record)
    }

    /// Inserts `record` under a freshly generated id and returns that id.
    pub async fn insert(&self, mut record: Document) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        record.insert("_id", id);
        self.collection.insert_one(record, None).await?;
        Ok(id)
    }

    /// Applies `fields` with `$set`. Returns `(matched, modified)` counts.
    pub async fn update(&self, id: ObjectId, fields: Document) -> Result<(u64, u64), AppError> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await?;
        Ok((result.matched_count, result.modified_count))
    }

    pub async fn delete(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count)
    }
}
