//! # warden-api
//!
//! axum HTTP surface:
//!
//! | route | operation |
//! |---|---|
//! | `POST /createSuperAdmin` | one-time super-admin bootstrap |
//! | `POST /createUserAccount` | create a `client` account |
//! | `POST /updateUserRole` | change another user's role |
//! | `POST /getUserProfile` | the caller's own profile |
//! | `POST /jobs/{name}` | run a scheduled job now |
//! | `GET /health` | liveness |
//!
//! Requests pass through `warden_auth::AuthLayer` first; handlers see the
//! result as a [`Session`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod session;

pub use config::ServerConfig;
pub use error::{ApiError, Result};
pub use routes::{AppState, router};
pub use server::{app, serve};
pub use session::Session;
