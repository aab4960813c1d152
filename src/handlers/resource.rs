//! Resource CRUD handlers: list, create, read, update, delete. One monomorphized set per
//! resource type.

use crate::error::AppError;
use crate::resource::Resource;
use crate::response;
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

pub async fn list<R: Resource>(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = CrudService::list::<R>(state.store.as_ref()).await?;
    Ok(response::ok(rows))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let row = CrudService::create::<R>(state.store.as_ref(), body).await?;
    Ok(response::created(row))
}

pub async fn read<R: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = CrudService::read::<R>(state.store.as_ref(), id).await?;
    Ok(response::ok(row))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(body) = body?;
    let row = CrudService::update::<R>(state.store.as_ref(), id, body).await?;
    Ok(response::ok(row))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    CrudService::delete::<R>(state.store.as_ref(), id).await?;
    Ok(response::no_content())
}
