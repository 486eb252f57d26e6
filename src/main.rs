mod api;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017/UserService".to_string());

    log::info!("🚀 Starting User Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection (also creates the unique email index)
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // 🌱 Seed synthetic users before accepting traffic
    seeds::users_seed::seed_users(&db).await;

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173") // Desktop client (Vite renderer)
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        // Unreadable JSON bodies answer in the same shape as field validation
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            let detail = err.to_string();
            actix_web::error::InternalError::from_response(
                detail.clone(),
                HttpResponse::BadRequest().json(serde_json::json!({
                    "success": false,
                    "errors": [detail]
                })),
            )
            .into()
        });

        App::new()
            .app_data(db_data.clone())
            .app_data(json_config)
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Users API
            .service(
                web::scope("/api/v1")
                    // Public: the registration form posts here without a token
                    .route("/add-user", web::post().to(api::users::add_user))
                    // Protected endpoints requiring JWT authentication
                    .service(
                        web::resource("/get-users")
                            .wrap(middleware::AuthMiddleware)
                            .route(web::get().to(api::users::get_users)),
                    )
                    .service(
                        web::resource("/get-user/{id}")
                            .wrap(middleware::AuthMiddleware)
                            .route(web::get().to(api::users::get_user)),
                    ),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
