// handlers/category.rs - /api/category resource
//
// Each handler opens its own data context, performs one storage operation and
// commits writes before responding. The context is opened only after the
// request body has been read and validated. The only domain failure is a
// missing id, which is answered with a bare 404.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::{debug, info};

use crate::app::AppState;
use crate::database::Category;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::payload::CategoryPayload;

fn record_not_found(id: i32) -> ApiError {
    debug!(id, "Category not found");
    ApiError::not_found(format!("Category {} not found", id))
}

/// GET /api/category
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    let mut ctx = state.store.begin().await?;
    let categories = ctx.find_all().await?;
    Ok(Json(categories))
}

/// GET /api/category/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Category>, ApiError> {
    let mut ctx = state.store.begin().await?;
    ctx.find(id)
        .await?
        .map(Json)
        .ok_or_else(|| record_not_found(id))
}

/// POST /api/category
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    CategoryPayload(draft): CategoryPayload,
) -> Result<Json<Category>, ApiError> {
    let mut ctx = state.store.begin().await?;
    let category = ctx.insert(&draft).await?;
    ctx.commit().await?;

    info!(id = category.id, user = %user.subject, "Created category");
    Ok(Json(category))
}

/// PUT /api/category/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(user): Extension<AuthUser>,
    CategoryPayload(draft): CategoryPayload,
) -> Result<Json<Category>, ApiError> {
    let mut ctx = state.store.begin().await?;
    let Some(category) = ctx.update(id, &draft).await? else {
        return Err(record_not_found(id));
    };
    ctx.commit().await?;

    info!(id, user = %user.subject, "Updated category");
    Ok(Json(category))
}

/// DELETE /api/category/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Category>, ApiError> {
    let mut ctx = state.store.begin().await?;
    let Some(category) = ctx.remove(id).await? else {
        return Err(record_not_found(id));
    };
    ctx.commit().await?;

    info!(id, user = %user.subject, "Deleted category");
    Ok(Json(category))
}
