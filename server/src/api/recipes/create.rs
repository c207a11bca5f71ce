use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewRecipe;
use crate::recipe_lines::{self, LineError, LineInput};
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 256;

/// Full recipe payload, shared by create and full update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeWriteRequest {
    pub name: String,
    pub text: String,
    /// Minutes, must be >= 1
    pub cooking_time: i32,
    pub image_url: String,
    pub ingredients: Vec<LineInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: Uuid,
}

/// Field validation shared by create (all fields) and partial update
/// (supplied fields only). None means "not supplied, skip".
pub(crate) fn validate_recipe_fields(
    name: Option<&str>,
    text: Option<&str>,
    cooking_time: Option<i32>,
    image_url: Option<&str>,
) -> Result<(), String> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err("Name cannot exceed 256 characters".to_string());
        }
    }

    if let Some(text) = text {
        if text.trim().is_empty() {
            return Err("Text cannot be empty".to_string());
        }
    }

    if let Some(cooking_time) = cooking_time {
        if cooking_time < 1 {
            return Err("Cooking time must be at least 1 minute".to_string());
        }
    }

    if let Some(image_url) = image_url {
        if image_url.trim().is_empty() {
            return Err("Image is required".to_string());
        }
    }

    Ok(())
}

/// Runs the full line validation: shape first, then catalog resolution.
/// Returns the 400 message on rejection, or an internal error to log.
pub(crate) fn check_lines(
    conn: &mut PgConnection,
    lines: &[LineInput],
) -> Result<Result<(), String>, diesel::result::Error> {
    if let Err(e) = recipe_lines::validate_lines(lines) {
        return Ok(Err(e.to_string()));
    }

    match recipe_lines::missing_ingredient(conn, lines)? {
        Some(id) => Ok(Err(LineError::UnknownIngredient(id).to_string())),
        None => Ok(Ok(())),
    }
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipeWriteRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<RecipeWriteRequest>,
) -> impl IntoResponse {
    if let Err(message) = validate_recipe_fields(
        Some(&request.name),
        Some(&request.text),
        Some(request.cooking_time),
        Some(&request.image_url),
    ) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    let mut conn = get_conn!(pool);

    // All validation happens before any write, so a rejected request
    // leaves no partial state behind.
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
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response();
        }
    }

    // One transaction for the recipe row and its N lines
    let result: Result<Uuid, diesel::result::Error> = conn.transaction(|conn| {
        let new_recipe = NewRecipe {
            author_id: user.id,
            name: &request.name,
            text: &request.text,
            cooking_time: request.cooking_time,
            image_url: &request.image_url,
        };

        let recipe_id: Uuid = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        recipe_lines::insert_lines(conn, recipe_id, &request.ingredients)?;

        Ok(recipe_id)
    });

    match result {
        Ok(recipe_id) => (
            StatusCode::CREATED,
            Json(CreateRecipeResponse { id: recipe_id }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let result = validate_recipe_fields(Some("  "), Some("text"), Some(10), Some("img"));
        assert_eq!(result, Err("Name cannot be empty".to_string()));
    }

    #[test]
    fn test_overlong_name_rejected() {
        let name = "x".repeat(257);
        let result = validate_recipe_fields(Some(&name), Some("text"), Some(10), Some("img"));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_cooking_time_rejected() {
        let result = validate_recipe_fields(Some("Borscht"), Some("text"), Some(0), Some("img"));
        assert_eq!(
            result,
            Err("Cooking time must be at least 1 minute".to_string())
        );
    }

    #[test]
    fn test_missing_fields_skipped_for_partial_update() {
        assert_eq!(validate_recipe_fields(None, None, None, None), Ok(()));
    }

    #[test]
    fn test_valid_fields_accepted() {
        let result =
            validate_recipe_fields(Some("Borscht"), Some("Chop and boil"), Some(90), Some("img"));
        assert_eq!(result, Ok(()));
    }
}
