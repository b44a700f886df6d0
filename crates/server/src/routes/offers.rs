//! Offer catalog routes. Listings sort ascending on the display `order`.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use greenbasket_core::OfferId;

use crate::db::catalog::CatalogRepository;
use crate::error::{AppError, Result};
use crate::models::Offer;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_offers))
        .route("/banners", get(banner_offers))
        .route("/category/{category}", get(offers_by_category))
        .route("/{id}", get(get_offer))
}

#[derive(Debug, Default, Deserialize)]
struct OfferQuery {
    category: Option<String>,
    active: Option<bool>,
    banner: Option<bool>,
}

fn sorted_by_position(mut offers: Vec<Offer>) -> Vec<Offer> {
    offers.sort_by_key(|o| o.order);
    offers
}

async fn list_offers(
    State(state): State<AppState>,
    Query(query): Query<OfferQuery>,
) -> Result<impl IntoResponse> {
    let offers = CatalogRepository::new(state.storage()).offers()?;
    let offers: Vec<_> = offers
        .into_iter()
        .filter(|o| {
            query
                .category
                .as_ref()
                .is_none_or(|c| o.category.eq_ignore_ascii_case(c))
                && query.active.is_none_or(|a| o.is_active == a)
                && query.banner.is_none_or(|b| o.is_banner == b)
        })
        .collect();
    Ok(Json(ApiResponse::list(sorted_by_position(offers))))
}

async fn banner_offers(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let offers = CatalogRepository::new(state.storage()).offers()?;
    let banners: Vec<_> = offers
        .into_iter()
        .filter(|o| o.is_banner && o.is_active)
        .collect();
    Ok(Json(ApiResponse::list(sorted_by_position(banners))))
}

async fn offers_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse> {
    let offers = CatalogRepository::new(state.storage()).offers()?;
    let matched: Vec<_> = offers
        .into_iter()
        .filter(|o| o.category.eq_ignore_ascii_case(&category))
        .collect();
    Ok(Json(ApiResponse::list(sorted_by_position(matched))))
}

async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<OfferId>,
) -> Result<impl IntoResponse> {
    let offer = CatalogRepository::new(state.storage())
        .offer(&id)?
        .ok_or_else(|| AppError::NotFound("Offer not found".to_string()))?;
    Ok(Json(ApiResponse::ok(offer)))
}
