use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::recipe_lines::{self, LineInput};
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::create::{check_lines, validate_recipe_fields, RecipeWriteRequest};

/// Partial update payload: absent fields stay untouched, absent
/// ingredients keep the existing line set.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipePatchRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image_url: Option<String>,
    pub ingredients: Option<Vec<LineInput>>,
}

#[derive(AsChangeset)]
#[diesel(table_name = recipes)]
struct RecipeChanges<'a> {
    name: Option<&'a str>,
    text: Option<&'a str>,
    cooking_time: Option<i32>,
    image_url: Option<&'a str>,
}

impl RecipeChanges<'_> {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.text.is_none()
            && self.cooking_time.is_none()
            && self.image_url.is_none()
    }
}

/// 404 / 403 gate shared by update, patch and delete. Returns the error
/// response to bail with, or None when the requester owns the recipe.
pub(crate) fn author_gate(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    requester_id: Uuid,
) -> Result<Option<(StatusCode, String)>, diesel::result::Error> {
    match super::recipe_author(conn, recipe_id) {
        Ok(author_id) if author_id == requester_id => Ok(None),
        Ok(_) => Ok(Some((
            StatusCode::FORBIDDEN,
            "You are not the author of this recipe".to_string(),
        ))),
        Err(diesel::NotFound) => Ok(Some((
            StatusCode::NOT_FOUND,
            "Recipe not found".to_string(),
        ))),
        Err(e) => Err(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipeWriteRequest,
    responses(
        (status = 200, description = "Recipe updated successfully"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecipeWriteRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match author_gate(&mut conn, id, user.id) {
        Ok(None) => {}
        Ok(Some((status, message))) => {
            return (status, Json(ErrorResponse { error: message })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    }

    if let Err(message) = validate_recipe_fields(
        Some(&request.name),
        Some(&request.text),
        Some(request.cooking_time),
        Some(&request.image_url),
    ) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    // Validate before the delete+insert so a rejected set leaves the
    // existing lines untouched.
    match check_lines(&mut conn, &request.ingredients) {
        Ok(Ok(())) => {}
        Ok(Err(message)) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to resolve ingredients: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    }

    let result: Result<(), diesel::result::Error> = conn.transaction(|conn| {
        diesel::update(recipes::table.find(id))
            .set(&RecipeChanges {
                name: Some(&request.name),
                text: Some(&request.text),
                cooking_time: Some(request.cooking_time),
                image_url: Some(&request.image_url),
            })
            .execute(conn)?;

        recipe_lines::replace_lines(conn, id, &request.ingredients)?;

        Ok(())
    });

    match result {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!("Failed to update recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipePatchRequest,
    responses(
        (status = 200, description = "Recipe updated successfully"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn patch_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecipePatchRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match author_gate(&mut conn, id, user.id) {
        Ok(None) => {}
        Ok(Some((status, message))) => {
            return (status, Json(ErrorResponse { error: message })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    }

    if let Err(message) = validate_recipe_fields(
        request.name.as_deref(),
        request.text.as_deref(),
        request.cooking_time,
        request.image_url.as_deref(),
    ) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    if let Some(ref lines) = request.ingredients {
        match check_lines(&mut conn, lines) {
            Ok(Ok(())) => {}
            Ok(Err(message)) => {
                return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
                    .into_response()
            }
            Err(e) => {
                tracing::error!("Failed to resolve ingredients: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to update recipe".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    }

    let result: Result<(), diesel::result::Error> = conn.transaction(|conn| {
        let changes = RecipeChanges {
            name: request.name.as_deref(),
            text: request.text.as_deref(),
            cooking_time: request.cooking_time,
            image_url: request.image_url.as_deref(),
        };

        if !changes.is_empty() {
            diesel::update(recipes::table.find(id))
                .set(&changes)
                .execute(conn)?;
        }

        if let Some(ref lines) = request.ingredients {
            recipe_lines::replace_lines(conn, id, lines)?;
        }

        Ok(())
    });

    match result {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!("Failed to update recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
