//! Memory CRUD 与检索处理器
//!
//! 校验在访问存储之前完成；存储错误在这里附加操作上下文后交给 [`ApiError`] 转换为响应。

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use pinmap_core::{CreateMemoryRequest, Memory, MemoryQuery, SearchParams, UpdateMemoryRequest};

use crate::error::{
    ApiError, CREATE_FAILED, DELETE_FAILED, FETCH_FAILED, SEARCH_FAILED, UPDATE_FAILED,
};
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// POST /data
pub async fn create_memory(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateMemoryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Memory>)> {
    let Json(req) = body?;
    let new = req.validate(&state.api().await.default_place)?;

    let memory = state
        .store
        .create(new)
        .await
        .map_err(ApiError::store(CREATE_FAILED))?;

    tracing::info!("Created memory {} (placeable: {})", memory.id, memory.is_placeable());
    Ok((StatusCode::CREATED, Json(memory)))
}

/// GET /data
pub async fn list_memories(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Memory>>> {
    let memories = state
        .store
        .find(&MemoryQuery::recent(state.api().await.list_limit))
        .await
        .map_err(ApiError::store(FETCH_FAILED))?;

    Ok(Json(memories))
}

/// GET /search?terms=
pub async fn search_memories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Memory>>> {
    let terms = params.terms.unwrap_or_default();
    let limit = state.api().await.search_limit;
    tracing::debug!("Searching memories for {:?}", terms);

    let memories = state
        .store
        .find(&MemoryQuery::search(terms, limit))
        .await
        .map_err(ApiError::store(SEARCH_FAILED))?;

    Ok(Json(memories))
}

/// PUT /data/:id
pub async fn update_memory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateMemoryRequest>, JsonRejection>,
) -> ApiResult<Json<Memory>> {
    let Json(req) = body?;
    let patch = req.validate(&state.api().await.default_place)?;

    let memory = state
        .store
        .update(&id, &patch)
        .await
        .map_err(ApiError::store(UPDATE_FAILED))?;

    tracing::info!("Updated memory {}", memory.id);
    Ok(Json(memory))
}

/// DELETE /data/:id
pub async fn delete_memory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Memory>> {
    let memory = state
        .store
        .delete(&id)
        .await
        .map_err(ApiError::store(DELETE_FAILED))?;

    tracing::info!("Deleted memory {}", memory.id);
    Ok(Json(memory))
}
