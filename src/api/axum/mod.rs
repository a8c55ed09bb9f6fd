//! Axum adapter for [`AuthGate`](crate::gate::AuthGate).
//!
//! ```rust,ignore
//! let gate = AuthGate::new(store, StaticCode::new("code"));
//! let app = gate_routes::<StaticCode>().with_state(gate);
//! ```

mod error;
mod handlers;
mod routes;
mod views;

pub use error::AppError;
pub use routes::gate_routes;
