//! Store catalog routes, including the favorites toggle.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use greenbasket_core::StoreId;

use crate::catalog::{
    StoreFilter, filter_stores, paginate, sort_stores_by_created, sort_stores_by_max_discount,
    sort_stores_by_rating,
};
use crate::db::catalog::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_PAGE_LIMIT: usize = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get-stores", get(paged_stores))
        .route("/", get(list_stores))
        .route("/popular", get(popular_stores))
        .route("/latest", get(latest_stores))
        .route("/top-offer-near-me", get(top_offer_stores))
        .route("/favorites/user", get(favorite_stores))
        .route("/{id}", get(get_store))
        .route("/{id}/favorite", post(toggle_favorite))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreQuery {
    search: Option<String>,
    #[serde(rename = "type")]
    store_type: Option<String>,
    #[serde(default)]
    is_open: bool,
    offset: Option<usize>,
    limit: Option<usize>,
}

impl StoreQuery {
    fn filter(&self) -> StoreFilter {
        StoreFilter {
            search: self.search.clone(),
            store_type: self.store_type.clone(),
            open_only: self.is_open,
        }
    }
}

/// Paginated listing. `count` in the envelope is the pre-pagination total.
async fn paged_stores(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> Result<impl IntoResponse> {
    let stores = CatalogRepository::new(state.storage()).stores()?;
    let stores = filter_stores(stores, &query.filter());
    let total = stores.len();
    let page = paginate(
        stores,
        query.offset.unwrap_or(0),
        query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    );
    Ok(Json(ApiResponse::ok(page).with_count(total)))
}

async fn list_stores(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> Result<impl IntoResponse> {
    let stores = CatalogRepository::new(state.storage()).stores()?;
    let stores = filter_stores(stores, &query.filter());
    Ok(Json(ApiResponse::list(stores)))
}

async fn popular_stores(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut stores = CatalogRepository::new(state.storage()).stores()?;
    sort_stores_by_rating(&mut stores);
    Ok(Json(ApiResponse::list(stores)))
}

async fn latest_stores(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut stores = CatalogRepository::new(state.storage()).stores()?;
    sort_stores_by_created(&mut stores);
    Ok(Json(ApiResponse::list(stores)))
}

async fn top_offer_stores(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut stores = CatalogRepository::new(state.storage()).stores()?;
    sort_stores_by_max_discount(&mut stores);
    Ok(Json(ApiResponse::list(stores)))
}

async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> Result<impl IntoResponse> {
    let store = CatalogRepository::new(state.storage())
        .store(&id)?
        .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;
    Ok(Json(ApiResponse::ok(store)))
}

/// Toggle a store in the user's favorites. Responds with the new membership.
async fn toggle_favorite(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<StoreId>,
) -> Result<impl IntoResponse> {
    CatalogRepository::new(state.storage())
        .store(&id)?
        .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

    let mut now_favorite = false;
    let updated = crate::db::users::UserRepository::new(state.storage())
        .update(&user_id, |user| {
            let stores = &mut user.favorites.stores;
            if let Some(pos) = stores.iter().position(|s| s == &id) {
                stores.remove(pos);
            } else {
                stores.push(id.clone());
                now_favorite = true;
            }
        })
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("User not found".to_string())
            }
            other => other.into(),
        })?;

    let message = if now_favorite {
        "Store added to favorites"
    } else {
        "Store removed from favorites"
    };
    Ok(Json(ApiResponse::ok_with_message(
        message,
        updated.favorites,
    )))
}

/// The user's favorited stores, resolved to full store records.
async fn favorite_stores(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = state.auth().current_user(&user_id)?;
    let stores = CatalogRepository::new(state.storage()).stores()?;
    let favorites: Vec<_> = stores
        .into_iter()
        .filter(|s| user.favorites.stores.contains(&s.id))
        .collect();
    Ok(Json(ApiResponse::list(favorites)))
}
