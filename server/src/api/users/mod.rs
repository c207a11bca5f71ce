pub mod me;
pub mod subscribe;
pub mod subscriptions;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me::me))
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route(
            "/{id}/subscribe",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

/// Minimal user representation embedded in recipe and subscription
/// responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserBrief {
    pub id: Uuid,
    pub username: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        me::me,
        subscribe::subscribe,
        subscribe::unsubscribe,
        subscriptions::list_subscriptions,
    ),
    components(schemas(
        UserBrief,
        subscriptions::SubscriptionResponse,
        subscriptions::SubscriptionsResponse,
    ))
)]
pub struct ApiDoc;
