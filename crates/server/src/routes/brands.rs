//! Brand catalog routes.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use greenbasket_core::BrandId;

use crate::db::catalog::CatalogRepository;
use crate::error::{AppError, Result};
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brands))
        .route("/loved", get(loved_brands))
        .route("/{id}", get(get_brand))
}

#[derive(Debug, Default, Deserialize)]
struct BrandQuery {
    category: Option<String>,
    loved: Option<bool>,
}

async fn list_brands(
    State(state): State<AppState>,
    Query(query): Query<BrandQuery>,
) -> Result<impl IntoResponse> {
    let brands = CatalogRepository::new(state.storage()).brands()?;
    let brands: Vec<_> = brands
        .into_iter()
        .filter(|b| {
            query
                .category
                .as_ref()
                .is_none_or(|c| b.category.eq_ignore_ascii_case(c))
                && query.loved.is_none_or(|l| b.is_loved == l)
        })
        .collect();
    Ok(Json(ApiResponse::list(brands)))
}

async fn loved_brands(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let brands = CatalogRepository::new(state.storage()).brands()?;
    let loved: Vec<_> = brands.into_iter().filter(|b| b.is_loved).collect();
    Ok(Json(ApiResponse::list(loved)))
}

async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
) -> Result<impl IntoResponse> {
    let brand = CatalogRepository::new(state.storage())
        .brand(&id)?
        .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))?;
    Ok(Json(ApiResponse::ok(brand)))
}
