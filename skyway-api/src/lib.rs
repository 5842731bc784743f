use axum::{http::Method, middleware::from_fn_with_state, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let client_routes = Router::new()
        .merge(handlers::auth::me_routes())
        .merge(handlers::bookings::routes())
        .merge(handlers::payments::routes())
        .merge(handlers::baggage::routes())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::client_auth,
        ));

    let admin_routes = handlers::admin::routes().layer(from_fn_with_state(
        state.clone(),
        middleware::auth::admin_auth,
    ));

    Router::new()
        .merge(handlers::auth::routes())
        .merge(handlers::flights::routes())
        .merge(client_routes)
        .nest("/api/admin", admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .with_state(state)
}
