//! # warden-accounts
//!
//! Account lifecycle on top of the authorization engine:
//!
//! - [`service`]: `createSuperAdmin`, `createUserAccount`, `updateUserRole`,
//!   `getUserProfile`
//! - [`lifecycle`]: settings provisioning and deletion cascade, driven by
//!   store events through a [`TriggerRunner`]
//! - [`bootstrap`]: the designated super-admin email

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bootstrap;
pub mod error;
pub mod lifecycle;
pub mod service;

pub use bootstrap::BootstrapConfig;
pub use error::{AccountError, Result};
pub use lifecycle::{CleanupReport, CleanupStep, LifecycleHooks, TriggerRunner};
pub use service::{
    AccountService, CreateAccountRequest, CreatedAccount, UpdateRoleRequest, UpdateRoleResponse,
    UserProfile,
};
