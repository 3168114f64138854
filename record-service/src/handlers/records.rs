//! CRUD handlers for `/record`.
//!
//! Records are stored as schemaless documents. Bodies must be JSON objects;
//! `_id` is owned by the server and ignored when supplied by clients.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde_json::{json, Value};
use service_core::error::AppError;

use crate::AppState;

/// Record routes, including the trailing-slash form of the collection path.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/record", get(list_records).post(create_record))
        .route("/record/", get(list_records).post(create_record))
        .route(
            "/record/:id",
            get(get_record).patch(update_record).delete(delete_record),
        )
}

pub async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let records = state.repository.list().await?;
    tracing::debug!(count = records.len(), "Listed records");

    Ok(Json(records.into_iter().map(record_to_json).collect()))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;

    let record = state
        .repository
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Record not found")))?;

    Ok(Json(record_to_json(record)))
}

pub async fn create_record(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let record = document_from_body(payload)?;
    let id = state.repository.insert(record).await?;

    tracing::info!(record_id = %id, "Created record");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "insertedId": id.to_hex() })),
    ))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let fields = document_from_body(payload)?;
    if fields.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("No fields to update")));
    }
    check_update_fields(&fields)?;

    let (matched, modified) = state.repository.update(id, fields).await?;
    if matched == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Record not found")));
    }

    tracing::info!(record_id = %id, modified, "Updated record");

    Ok(Json(json!({
        "matchedCount": matched,
        "modifiedCount": modified,
    })))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;

    let deleted = state.repository.delete(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Record not found")));
    }

    tracing::info!(record_id = %id, "Deleted record");

    Ok(Json(json!({ "deletedCount": deleted })))
}

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid record id: {}", id)))
}

/// Converts a request body into a document, dropping any client-supplied `_id`.
fn document_from_body(body: Value) -> Result<Document, AppError> {
    let Value::Object(mut fields) = body else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Request body must be a JSON object"
        )));
    };
    fields.remove("_id");

    bson::to_document(&fields)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid record: {}", e)))
}

/// `$set` refuses operator-like and dotted top-level names; reject them up front.
fn check_update_fields(fields: &Document) -> Result<(), AppError> {
    match fields
        .keys()
        .find(|key| key.starts_with('$') || key.contains('.'))
    {
        Some(key) => Err(AppError::BadRequest(anyhow::anyhow!(
            "Invalid field name: {}",
            key
        ))),
        None => Ok(()),
    }
}

/// Renders a stored document as relaxed extended JSON with `_id` as a hex string.
fn record_to_json(record: Document) -> Value {
    let id = record.get_object_id("_id").ok();
    let mut value = Bson::Document(record).into_relaxed_extjson();

    if let (Some(id), Value::Object(fields)) = (id, &mut value) {
        fields.insert("_id".to_string(), Value::String(id.to_hex()));
    }

    value
}
