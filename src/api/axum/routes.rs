use axum::Router;
use axum::routing::{get, post};

use super::handlers;
use crate::gate::{AuthGate, Challenge, paths};

/// The five gate endpoints. Supply the state with `.with_state(gate)`.
pub fn gate_routes<C: Challenge>() -> Router<AuthGate<C>> {
    Router::new()
        .route(paths::HOME, get(handlers::index::<C>))
        .route(paths::LOGIN, post(handlers::login::<C>))
        .route(paths::LOGOUT, get(handlers::logout::<C>))
        .route(paths::SECRET, get(handlers::secret::<C>))
        .route(paths::FORBIDDEN, get(handlers::forbidden::<C>))
}
