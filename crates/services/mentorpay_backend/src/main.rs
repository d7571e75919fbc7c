// File: services/mentorpay_backend/src/main.rs
use axum::{routing::get, Router};
use mentorpay_config::load_config;
#[cfg(feature = "stripe")]
use mentorpay_stripe::routes as payment_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

#[tokio::main]
async fn main() {
    mentorpay_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));

    let api_router = Router::new().route("/", get(|| async { "Welcome to MentorPay API!" }));

    let api_router = Router::new().nest("/api", {
        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut router = api_router;
        #[cfg(feature = "stripe")]
        {
            if config.use_stripe {
                router = router.merge(payment_routes::routes(config.clone()));
            } else {
                tracing::warn!("Payment feature compiled in but disabled by config (use_stripe)");
            }
        }
        router
    });

    // These endpoints are called from browser origins other than the API's
    // own, so cross-origin requests are allowed for every route and preflight
    // OPTIONS requests are answered by the layer before any handler runs.
    #[allow(unused_mut)] // openapi merges below
    let mut app = api_router.layer(CorsLayer::permissive());

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        #[cfg(feature = "stripe")]
        use mentorpay_stripe::doc::PaymentsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        // Define the merged OpenAPI documentation struct
        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "MentorPay API",
                version = "0.1.0",
                description = "MentorPay payment service API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "MentorPay", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "stripe")]
        openapi_doc.merge(PaymentsApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
