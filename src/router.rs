use crate::handlers::{
    health::health_check,
    user_accounts::{
        count_user_accounts, delete_user_account, get_user_account, index, insert_user_account,
        list_user_accounts, method_not_allowed, search_user_accounts, update_user_account,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    http::Method,
    routing::{any, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Any origin may call the API with credentials. The request origin is
/// mirrored back because a literal `*` cannot be combined with credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(index))
        // Health check
        .route("/health", get(health_check))
        // User account reads, any method
        .route("/UserAccounts", any(list_user_accounts))
        .route("/UserAccounts/Search", any(search_user_accounts))
        .route("/UserAccounts/Count", any(count_user_accounts))
        .route("/UserAccounts/Id", any(get_user_account))
        // User account writes, POST only
        .route(
            "/UserAccounts/Insert",
            post(insert_user_account).fallback(method_not_allowed),
        )
        .route(
            "/UserAccounts/Update",
            post(update_user_account).fallback(method_not_allowed),
        )
        .route(
            "/UserAccounts/Delete",
            post(delete_user_account).fallback(method_not_allowed),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Unmatched paths get the banner
        .fallback(index)
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer()),
        )
        .with_state(state)
}
