mod doc;
mod dtos;
mod error;
mod identity;
mod routes;
mod state;
mod utils;

use crate::doc::ApiDoc;
use crate::state::AppState;
use axum::Router;
use axum::routing::{delete, get, post, put};
use database::db::create_connection;
use log::info;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let db = create_connection()
        .await
        .expect("failed to connect to database");
    let state = AppState { db };

    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/courses",
            get(routes::catalog::get_courses).post(routes::catalog::create_course),
        )
        .route("/courses/{id}", get(routes::catalog::get_course_by_id))
        .route(
            "/courses/{id}/prerequisites",
            post(routes::catalog::add_prerequisite),
        )
        .route("/departments", post(routes::catalog::create_department))
        .route(
            "/semesters",
            get(routes::catalog::list_semesters).post(routes::catalog::create_semester),
        )
        .route(
            "/sections",
            get(routes::catalog::list_sections).post(routes::catalog::create_section),
        )
        .route("/sections/{id}", delete(routes::catalog::delete_section))
        .route(
            "/sections/{id}/assessments",
            post(routes::catalog::create_assessment),
        )
        .route(
            "/sections/{id}/register",
            post(routes::enrollment::register),
        )
        .route(
            "/sections/{id}/drop",
            post(routes::enrollment::drop_registration),
        )
        .route("/sections/{id}/roster", get(routes::enrollment::roster))
        .route(
            "/sections/{id}/grades",
            get(routes::gradebook::get_grades).put(routes::gradebook::put_grades),
        )
        .route(
            "/students/{id}/transcript",
            get(routes::transcript::get_transcript),
        )
        .route("/students/{id}/sgpa", get(routes::transcript::get_sgpa))
        .route(
            "/announcements",
            get(routes::announcement::list_announcements)
                .post(routes::announcement::post_announcement),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Running axum on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown::shutdown_signal())
        .await
        .unwrap();
}
