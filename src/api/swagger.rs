use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "CRUD backend for user records.\n\n**Authentication:** listing and lookup require a JWT Bearer token; `add-user` is public."
    ),
    paths(
        crate::api::users::get_users,
        crate::api::users::get_user,
        crate::api::users::add_user,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::User,
            crate::services::user_service::CreateUserRequest,
            crate::services::user_service::UsersPage,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "User listing, lookup and registration endpoints."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
