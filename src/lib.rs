pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod types;

use axum::{
    middleware::from_fn,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth as auth_routes, companies, jobs, users};
use crate::middleware::{authenticate_jwt, ensure_admin, ensure_correct_user_or_admin, ensure_logged_in};
pub use crate::state::AppState;

/// Anonymous callers get 401, logged-in non-admins 403.
fn admin_only(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    // the last layer added runs first
    route
        .route_layer(from_fn(ensure_admin))
        .route_layer(from_fn(ensure_logged_in))
}

/// The `:username` in the path must be the caller, unless the caller is an admin.
fn self_or_admin(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route
        .route_layer(from_fn(ensure_correct_user_or_admin))
        .route_layer(from_fn(ensure_logged_in))
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        // Public auth routes
        .route("/auth/token", post(auth_routes::token))
        .route("/auth/register", post(auth_routes::register))
        .merge(company_routes())
        .merge(job_routes())
        .merge(user_routes())
        .fallback(handlers::not_found)
        // Global middleware
        .layer(from_fn(authenticate_jwt))
        .layer(CorsLayer::permissive());

    let router = if config::config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(companies::list).merge(admin_only(post(companies::create))),
        )
        .route(
            "/companies/:handle",
            get(companies::get).merge(admin_only(
                axum::routing::patch(companies::update).delete(companies::remove),
            )),
        )
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(jobs::list).merge(admin_only(post(jobs::create))))
        .route(
            "/jobs/:id",
            get(jobs::get).merge(admin_only(axum::routing::patch(jobs::update).delete(jobs::remove))),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", admin_only(get(users::list).post(users::create)))
        .route(
            "/users/:username",
            self_or_admin(get(users::get).patch(users::update).delete(users::remove)),
        )
        .route("/users/:username/jobs/:id", self_or_admin(post(users::apply)))
}
