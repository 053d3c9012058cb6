//! # sessiongate
//!
//! Client-side session state and route gating in front of a hosted identity
//! service (Appwrite).
//!
//! A single [`session::SessionStore`] caches the remote session as a
//! `(principal, loading)` pair and exposes login, logout and registration.
//! [`gate::RouteGate`] decides, on every navigation, whether a route renders,
//! waits, or redirects. The [`shell`] module composes both into the
//! interactive front end shipped as the `sessiongate` binary.

pub mod gate;
pub mod identity;
pub mod principal;
pub mod session;
pub mod shell;
