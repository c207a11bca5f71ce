use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::shopping_list;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/recipes/download-shopping-cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Aggregated shopping list (text attachment)", content_type = "text/plain"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    // A failed read must surface as an error, never as an empty list
    let rows = match shopping_list::cart_lines(&mut conn, user.id) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to collect shopping cart lines: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to build the shopping list".to_string(),
                }),
            )
                .into_response();
        }
    };

    let report = shopping_list::render_report(&shopping_list::aggregate(rows));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                shopping_list::REPORT_FILENAME
            ),
        )
        .body(Body::from(report))
        .unwrap()
        .into_response()
}
