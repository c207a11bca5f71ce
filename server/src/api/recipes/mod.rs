pub mod create;
pub mod delete;
pub mod download_shopping_cart;
pub mod favorite;
pub mod get;
pub mod get_link;
pub mod list;
pub mod shopping_cart;
pub mod update;

use crate::schema::recipes;
use crate::AppState;
use axum::routing::{get as get_method, post};
use axum::Router;
use diesel::prelude::*;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get_method(list::list_recipes).post(create::create_recipe),
        )
        .route(
            "/download-shopping-cart",
            get_method(download_shopping_cart::download_shopping_cart),
        )
        .route(
            "/{id}",
            get_method(get::get_recipe)
                .put(update::update_recipe)
                .patch(update::patch_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/{id}/favorite",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/{id}/shopping-cart",
            post(shopping_cart::add_to_cart).delete(shopping_cart::remove_from_cart),
        )
        .route("/{id}/get-link", get_method(get_link::get_link))
}

/// Compact recipe representation returned by the toggle endpoints and
/// embedded in subscription listings.
#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeMinified {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub cooking_time: i32,
}

pub(crate) fn load_minified(
    conn: &mut PgConnection,
    recipe_id: Uuid,
) -> QueryResult<RecipeMinified> {
    recipes::table
        .find(recipe_id)
        .select(RecipeMinified::as_select())
        .first(conn)
}

pub(crate) fn load_minified_by_author(
    conn: &mut PgConnection,
    author_id: Uuid,
) -> QueryResult<Vec<RecipeMinified>> {
    recipes::table
        .filter(recipes::author_id.eq(author_id))
        .order(recipes::created_at.desc())
        .select(RecipeMinified::as_select())
        .load(conn)
}

/// Author id of an existing recipe; NotFound when the recipe is absent.
pub(crate) fn recipe_author(conn: &mut PgConnection, recipe_id: Uuid) -> QueryResult<Uuid> {
    recipes::table
        .find(recipe_id)
        .select(recipes::author_id)
        .first(conn)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        update::patch_recipe,
        delete::delete_recipe,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_cart,
        shopping_cart::remove_from_cart,
        download_shopping_cart::download_shopping_cart,
        get_link::get_link,
    ),
    components(schemas(
        RecipeMinified,
        create::RecipeWriteRequest,
        create::CreateRecipeResponse,
        get::RecipeResponse,
        get::RecipeLineResponse,
        list::ListRecipesResponse,
        update::RecipePatchRequest,
        get_link::GetLinkResponse,
    ))
)]
pub struct ApiDoc;
