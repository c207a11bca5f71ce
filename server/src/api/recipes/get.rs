use crate::api::users::UserBrief;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::{cart_entries, favorite_entries, ingredients, recipe_lines, recipes, users};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// One ingredient line as embedded in a recipe response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeLineResponse {
    /// Catalog ingredient id
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub author: UserBrief,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image_url: String,
    pub ingredients: Vec<RecipeLineResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: DateTime<Utc>,
}

/// Loads a recipe with its lines and the viewer-relative favorite/cart
/// flags. Shared by the get and list endpoints.
pub(crate) fn load_recipe_response(
    conn: &mut PgConnection,
    viewer_id: Uuid,
    recipe_id: Uuid,
) -> QueryResult<RecipeResponse> {
    let (recipe, author): (Recipe, (Uuid, String)) = recipes::table
        .inner_join(users::table)
        .filter(recipes::id.eq(recipe_id))
        .select((Recipe::as_select(), (users::id, users::username)))
        .first(conn)?;

    let lines: Vec<RecipeLineResponse> = recipe_lines::table
        .inner_join(ingredients::table)
        .filter(recipe_lines::recipe_id.eq(recipe_id))
        .order(ingredients::name.asc())
        .select((
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_lines::amount,
        ))
        .load::<(Uuid, String, String, i32)>(conn)?
        .into_iter()
        .map(|(id, name, measurement_unit, amount)| RecipeLineResponse {
            id,
            name,
            measurement_unit,
            amount,
        })
        .collect();

    let is_favorited: bool = diesel::select(exists(
        favorite_entries::table
            .filter(favorite_entries::user_id.eq(viewer_id))
            .filter(favorite_entries::recipe_id.eq(recipe_id)),
    ))
    .get_result(conn)?;

    let is_in_shopping_cart: bool = diesel::select(exists(
        cart_entries::table
            .filter(cart_entries::user_id.eq(viewer_id))
            .filter(cart_entries::recipe_id.eq(recipe_id)),
    ))
    .get_result(conn)?;

    Ok(RecipeResponse {
        id: recipe.id,
        author: UserBrief {
            id: author.0,
            username: author.1,
        },
        name: recipe.name,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        image_url: recipe.image_url,
        ingredients: lines,
        is_favorited,
        is_in_shopping_cart,
        created_at: recipe.created_at,
    })
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match load_recipe_response(&mut conn, user.id, id) {
        Ok(recipe) => (StatusCode::OK, Json(recipe)).into_response(),
        Err(diesel::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
