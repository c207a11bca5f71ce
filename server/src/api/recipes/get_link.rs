use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewShortLink;
use crate::schema::short_links;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::env;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GetLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

/// 8 hex chars is plenty at this scale; collisions are caught by the
/// unique constraint and retried by the client.
fn generate_short_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn absolute_link(code: &str) -> String {
    let base = env::var("PUBLIC_BASE_URL").unwrap_or_default();
    format!("{}/s/{}", base.trim_end_matches('/'), code)
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Short link for the recipe", body = GetLinkResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_link(
    AuthUser(_user): AuthUser,
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
                        error: "Failed to create short link".to_string(),
                    }),
                )
                    .into_response()
            }
        };
    }

    // Get-or-create: reuse a persisted code, otherwise mint one. A race
    // on the recipe_id unique constraint falls back to re-reading.
    let existing: Option<String> = match short_links::table
        .filter(short_links::recipe_id.eq(id))
        .select(short_links::short_code)
        .first(&mut conn)
        .optional()
    {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Failed to look up short link: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create short link".to_string(),
                }),
            )
                .into_response();
        }
    };

    let code = match existing {
        Some(code) => code,
        None => {
            let code = generate_short_code();
            let new_link = NewShortLink {
                recipe_id: id,
                short_code: &code,
            };

            match diesel::insert_into(short_links::table)
                .values(&new_link)
                .execute(&mut conn)
            {
                Ok(_) => code,
                Err(diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                )) => {
                    match short_links::table
                        .filter(short_links::recipe_id.eq(id))
                        .select(short_links::short_code)
                        .first(&mut conn)
                    {
                        Ok(code) => code,
                        Err(e) => {
                            tracing::error!("Failed to re-read short link: {}", e);
                            return (
                                StatusCode::INTERNAL_SERVER_ERROR,
                                Json(ErrorResponse {
                                    error: "Failed to create short link".to_string(),
                                }),
                            )
                                .into_response();
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to create short link: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to create short link".to_string(),
                        }),
                    )
                        .into_response();
                }
            }
        }
    };

    (
        StatusCode::OK,
        Json(GetLinkResponse {
            short_link: absolute_link(&code),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_code_shape() {
        let code = generate_short_code();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_short_codes_differ() {
        assert_ne!(generate_short_code(), generate_short_code());
    }
}
