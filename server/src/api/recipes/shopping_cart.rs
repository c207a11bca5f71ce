use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewCartEntry;
use crate::schema::cart_entries;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use super::{load_minified, RecipeMinified};

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping-cart",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Recipe added to the shopping cart", body = RecipeMinified),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Recipe already in the shopping cart", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let recipe: RecipeMinified = match load_minified(&mut conn, id) {
        Ok(r) => r,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to add recipe to the shopping cart".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Concurrent toggles race on the unique constraint; the loser gets 409
    let new_entry = NewCartEntry {
        user_id: user.id,
        recipe_id: id,
    };

    match diesel::insert_into(cart_entries::table)
        .values(&new_entry)
        .execute(&mut conn)
    {
        Ok(_) => (StatusCode::CREATED, Json(recipe)).into_response(),
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Recipe is already in the shopping cart".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to add recipe to the shopping cart: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to add recipe to the shopping cart".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping-cart",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe removed from the shopping cart"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not in the cart", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    if let Err(e) = super::recipe_author(&mut conn, id) {
        return match e {
            diesel::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response(),
            _ => {
                tracing::error!("Failed to fetch recipe: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to remove recipe from the shopping cart".to_string(),
                    }),
                )
                    .into_response()
            }
        };
    }

    let deleted = match diesel::delete(
        cart_entries::table
            .filter(cart_entries::user_id.eq(user.id))
            .filter(cart_entries::recipe_id.eq(id)),
    )
    .execute(&mut conn)
    {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("Failed to remove recipe from the shopping cart: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to remove recipe from the shopping cart".to_string(),
                }),
            )
                .into_response();
        }
    };

    if deleted == 0 {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe is not in the shopping cart".to_string(),
            }),
        )
            .into_response();
    }

    StatusCode::NO_CONTENT.into_response()
}
