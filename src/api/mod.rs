//! Web API and dashboard pages

pub mod auth;
pub mod guard;
pub mod handlers;
pub mod state;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use state::AppState;

/// Create the API router (mounted under `/api/v1`)
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/version", get(handlers::version::get_version))
        // Tasks API
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/tasks/{id}",
            get(handlers::tasks::get_task)
                .patch(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route("/tasks/{id}/move", post(handlers::tasks::move_task))
        // Board API
        .route("/board", get(handlers::board::get_board))
        .route("/board/drop", post(handlers::board::drop_task))
        // Items API
        .route(
            "/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/items/{id}",
            get(handlers::items::get_item)
                .patch(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
        // Auth API
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/session", get(auth::get_session))
        .route("/auth/providers", get(auth::list_providers))
}

/// Page routes, all behind the route guard
fn create_page_router(state: &AppState) -> Router<AppState> {
    use handlers::pages;

    Router::new()
        .route("/", get(pages::index))
        .route("/sign-in", get(pages::sign_in))
        .route("/sign-up", get(pages::sign_up))
        .route("/dashboard", get(pages::dashboard))
        .route("/tasks", get(pages::tasks))
        .route("/data", get(pages::data))
        .route("/profile", get(pages::profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::route_guard,
        ))
}

/// Create the full router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", create_api_router())
        .merge(create_page_router(&state))
        .layer(cors)
        .with_state(state)
}

/// Start the web server; resolves when Ctrl+C is received
pub async fn start_server(state: AppState, addr: &str) -> std::io::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "taskdeck server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .map_err(std::io::Error::other)
}
