use crate::api::recipes::RecipeMinified;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{subscriptions, users};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// One subscribed-to author together with their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub username: String,
    pub recipes: Vec<RecipeMinified>,
    pub recipe_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionsResponse {
    pub authors: Vec<SubscriptionResponse>,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    responses(
        (status = 200, description = "Authors the user is subscribed to", body = SubscriptionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let authors: Vec<(Uuid, String)> = match subscriptions::table
        .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
        .filter(subscriptions::user_id.eq(user.id))
        .order(users::username.asc())
        .select((users::id, users::username))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list subscriptions: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list subscriptions".to_string(),
                }),
            )
                .into_response();
        }
    };

    let mut items = Vec::with_capacity(authors.len());
    for (id, username) in authors {
        let recipes = match crate::api::recipes::load_minified_by_author(&mut conn, id) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Failed to load recipes for author {}: {}", id, e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to list subscriptions".to_string(),
                    }),
                )
                    .into_response();
            }
        };

        let recipe_count = recipes.len();
        items.push(SubscriptionResponse {
            id,
            username,
            recipes,
            recipe_count,
        });
    }

    (
        StatusCode::OK,
        Json(SubscriptionsResponse { authors: items }),
    )
        .into_response()
}
