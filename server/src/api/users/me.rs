use crate::auth::AuthUser;
use axum::{http::StatusCode, response::IntoResponse, Json};

use super::UserBrief;

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "The authenticated user", body = UserBrief),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(UserBrief {
            id: user.id,
            username: user.username,
        }),
    )
        .into_response()
}
