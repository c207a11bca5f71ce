use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::short_links;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/s/{code}",
    tag = "short_links",
    params(
        ("code" = String, Path, description = "Short link code")
    ),
    responses(
        (status = 307, description = "Redirect to the recipe page"),
        (status = 404, description = "Unknown short link", body = ErrorResponse)
    )
)]
pub async fn resolve_short_link(
    State(pool): State<Arc<DbPool>>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let recipe_id: Uuid = match short_links::table
        .filter(short_links::short_code.eq(&code))
        .select(short_links::recipe_id)
        .first(&mut conn)
    {
        Ok(id) => id,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Unknown short link".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to resolve short link: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to resolve short link".to_string(),
                }),
            )
                .into_response();
        }
    };

    Redirect::temporary(&format!("/recipes/{}", recipe_id)).into_response()
}
