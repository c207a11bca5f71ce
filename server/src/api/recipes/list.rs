use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{cart_entries, favorite_entries, recipes};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::get::{load_recipe_response, RecipeResponse};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// true: only favorited recipes; false: everything but them
    pub is_favorited: Option<bool>,
    /// true: only recipes in the shopping cart; false: everything but them
    pub is_in_shopping_cart: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeResponse>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes, newest first", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recipes(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut conn = get_conn!(pool);

    let mut query = recipes::table
        .select(recipes::id)
        .order(recipes::created_at.desc())
        .into_boxed();

    if let Some(author) = params.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    // Membership filters are relative to the viewer, not the author
    if let Some(favorited) = params.is_favorited {
        let favorites = favorite_entries::table
            .filter(favorite_entries::user_id.eq(user.id))
            .select(favorite_entries::recipe_id);
        query = if favorited {
            query.filter(recipes::id.eq_any(favorites))
        } else {
            query.filter(recipes::id.ne_all(favorites))
        };
    }

    if let Some(in_cart) = params.is_in_shopping_cart {
        let cart = cart_entries::table
            .filter(cart_entries::user_id.eq(user.id))
            .select(cart_entries::recipe_id);
        query = if in_cart {
            query.filter(recipes::id.eq_any(cart))
        } else {
            query.filter(recipes::id.ne_all(cart))
        };
    }

    let ids: Vec<Uuid> = match query.limit(limit).offset(offset).load(&mut conn) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Failed to list recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    let mut items = Vec::with_capacity(ids.len());
    for id in ids {
        match load_recipe_response(&mut conn, user.id, id) {
            Ok(recipe) => items.push(recipe),
            Err(e) => {
                tracing::error!("Failed to load recipe {}: {}", id, e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to list recipes".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    }

    (StatusCode::OK, Json(ListRecipesResponse { recipes: items })).into_response()
}
