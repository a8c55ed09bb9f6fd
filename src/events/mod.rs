//! Events fired by the gate actions.
//!
//! Decode failures are normalised to anonymous sessions before they reach a
//! handler, so events are where they stay visible: every rejected cookie
//! produces a [`SessionEvent::CookieRejected`] carrying the exact reason.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use crumbs::events::EventRegistry;
//! use crumbs::events::listeners::LoggingListener;
//! use crumbs::{AuthGate, StaticCode};
//!
//! let mut events = EventRegistry::new();
//! events.listen(LoggingListener::new());
//!
//! let gate = AuthGate::new(Arc::new(store), StaticCode::new("code")).with_events(events);
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::SessionEvent;
pub use listener::Listener;
pub use registry::EventRegistry;
