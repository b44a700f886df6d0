//! Product catalog routes.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use greenbasket_core::ProductId;

use crate::catalog::{
    ProductFilter, filter_products, sort_products_by_discount, sort_products_by_rating,
};
use crate::db::catalog::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Cap on the curated recommendation and discount feeds.
const FEED_LIMIT: usize = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/popular", get(popular_products))
        .route("/super-saver", get(super_saver_products))
        .route("/recommended", get(recommended_products))
        .route("/discounted", get(discounted_products))
        .route("/search/{query}", get(search_products))
        .route("/{id}", get(get_product))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductQuery {
    category: Option<String>,
    brand: Option<String>,
    search: Option<String>,
    #[serde(default)]
    popular: bool,
    #[serde(default)]
    super_saver: bool,
    #[serde(default)]
    recommended: bool,
    #[serde(default)]
    has_discount: bool,
}

impl ProductQuery {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            search: self.search,
            category: self.category,
            brand: self.brand,
            popular_only: self.popular,
            super_saver_only: self.super_saver,
            recommended_only: self.recommended,
            discounted_only: self.has_discount,
            in_stock_only: false,
        }
    }
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse> {
    let products = CatalogRepository::new(state.storage()).products()?;
    let products = filter_products(products, &query.into_filter());
    Ok(Json(ApiResponse::list(products)))
}

async fn popular_products(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = CatalogRepository::new(state.storage()).products()?;
    let mut products = filter_products(
        products,
        &ProductFilter {
            popular_only: true,
            ..ProductFilter::default()
        },
    );
    sort_products_by_rating(&mut products);
    Ok(Json(ApiResponse::list(products)))
}

async fn super_saver_products(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = CatalogRepository::new(state.storage()).products()?;
    let products = filter_products(
        products,
        &ProductFilter {
            super_saver_only: true,
            ..ProductFilter::default()
        },
    );
    Ok(Json(ApiResponse::list(products)))
}

async fn recommended_products(
    State(state): State<AppState>,
    RequireAuth(_user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let products = CatalogRepository::new(state.storage()).products()?;
    let mut products = filter_products(
        products,
        &ProductFilter {
            recommended_only: true,
            ..ProductFilter::default()
        },
    );
    sort_products_by_rating(&mut products);
    products.truncate(FEED_LIMIT);
    Ok(Json(ApiResponse::list(products)))
}

async fn discounted_products(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = CatalogRepository::new(state.storage()).products()?;
    let mut products = filter_products(
        products,
        &ProductFilter {
            discounted_only: true,
            ..ProductFilter::default()
        },
    );
    sort_products_by_discount(&mut products);
    products.truncate(FEED_LIMIT);
    Ok(Json(ApiResponse::list(products)))
}

async fn search_products(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<impl IntoResponse> {
    let products = CatalogRepository::new(state.storage()).products()?;
    let products = filter_products(
        products,
        &ProductFilter {
            search: Some(query),
            ..ProductFilter::default()
        },
    );
    Ok(Json(ApiResponse::list(products)))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = CatalogRepository::new(state.storage())
        .product(&id)?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(ApiResponse::ok(product)))
}
