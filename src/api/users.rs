use crate::services::user_service::{self, CreateUserRequest};
use crate::utils::error::AppError;
use crate::database::MongoDB;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

/// Maps a service error to its HTTP response. Internal detail stays in the
/// server log; the caller only sees a generic message.
fn error_response(err: AppError) -> HttpResponse {
    match err {
        AppError::Validation(errors) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "errors": errors
        })),
        AppError::Conflict { .. } => HttpResponse::Conflict().json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
        AppError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "User not found"
        })),
        AppError::Database(detail) => {
            log::error!("❌ Database failure: {}", detail);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Internal server error"
            }))
        }
    }
}

/// Missing or unparsable numeric query params fall back to a default;
/// zero is rejected the same way.
fn parse_positive(value: Option<&str>, default: u64) -> u64 {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(default)
}

#[utoipa::path(
    get,
    path = "/api/v1/get-users",
    tag = "Users",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default 10)"),
        ("search" = Option<String>, Query, description = "Case-insensitive substring match on name, email or phone")
    ),
    responses(
        (status = 200, description = "Paginated users", body = user_service::UsersPage),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_users(db: web::Data<MongoDB>, query: web::Query<ListUsersQuery>) -> HttpResponse {
    let page = parse_positive(query.page.as_deref(), 1);
    let limit = parse_positive(query.limit.as_deref(), 10);

    log::info!(
        "👥 GET /get-users - page: {}, limit: {}, search: {:?}",
        page,
        limit,
        query.search
    );

    match user_service::list_users(&db, page, limit, query.search.as_deref()).await {
        Ok(result) => {
            log::info!(
                "✅ Users listed: {} of {} (page {}/{})",
                result.data.len(),
                result.total,
                result.current_page,
                result.pages
            );
            HttpResponse::Ok().json(result)
        }
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/get-user/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = crate::models::User),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    log::info!("👤 GET /get-user/{}", id);

    match user_service::get_user_by_id(&db, &id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => {
            if matches!(&e, AppError::NotFound(_)) {
                log::warn!("⚠️ User {} not found", id);
            }
            error_response(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/add-user",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = crate::models::User),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn add_user(
    db: web::Data<MongoDB>,
    request: web::Json<CreateUserRequest>,
) -> HttpResponse {
    log::info!("📝 POST /add-user - email: {}", request.email);

    match user_service::create_user(&db, request.into_inner()).await {
        Ok(user) => {
            let id = user
                .id
                .map(|oid| oid.to_hex())
                .unwrap_or_else(|| "unknown".to_string());
            log::info!("✅ User with id {} added", id);
            HttpResponse::Created().json(user)
        }
        Err(e) => {
            log::warn!("❌ Failed to add user: {}", e);
            error_response(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_fall_back_to_defaults() {
        assert_eq!(parse_positive(None, 1), 1);
        assert_eq!(parse_positive(Some("3"), 1), 3);
        assert_eq!(parse_positive(Some("abc"), 10), 10);
        assert_eq!(parse_positive(Some(""), 10), 10);
        assert_eq!(parse_positive(Some("0"), 10), 10);
        assert_eq!(parse_positive(Some("-2"), 10), 10);
    }
}
