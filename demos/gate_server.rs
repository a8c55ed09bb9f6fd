//! Serves the login gate over plain HTTP.
//!
//! ```sh
//! RUST_LOG=info cargo run --example gate_server --features axum_api
//! ```
//!
//! Optional environment:
//! * `CRUMBS_MAX_AGE`: cookie lifetime in seconds (default 900)
//! * `CRUMBS_ENCRYPT`: `true` to encrypt cookie bodies
//! * `CRUMBS_COOKIE_NAME`: cookie name (default `cookie-name`)
//! * `CRUMBS_ADDR`: listen address (default `127.0.0.1:3000`)

use std::env;
use std::sync::Arc;

use crumbs::api::axum::gate_routes;
use crumbs::events::EventRegistry;
use crumbs::events::listeners::LoggingListener;
use crumbs::{AuthGate, CookieStore, KeyPair, SessionConfig, StaticCode};

fn config_from_env() -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config = SessionConfig::development();

    if let Ok(max_age) = env::var("CRUMBS_MAX_AGE") {
        config.options.max_age = max_age.parse()?;
    }
    if let Ok(encrypt) = env::var("CRUMBS_ENCRYPT") {
        if matches!(encrypt.as_str(), "1" | "true" | "yes") {
            config.encryption_key_length = Some(32);
        }
    }
    if let Ok(name) = env::var("CRUMBS_COOKIE_NAME") {
        config.cookie_name = name;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config_from_env()?;
    let keys = KeyPair::generate(&config)?;
    let store = Arc::new(CookieStore::new(config, keys)?);

    let mut events = EventRegistry::new();
    events.listen(LoggingListener::new());

    let gate = AuthGate::new(store, StaticCode::new("code")).with_events(events);
    let app = gate_routes::<StaticCode>().with_state(gate);

    let addr = env::var("CRUMBS_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_owned());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!(target: "crumbs::gate", "msg=\"listening\" addr=\"{addr}\"");

    axum::serve(listener, app).await?;
    Ok(())
}
