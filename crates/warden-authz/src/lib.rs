//! # warden-authz
//!
//! Role-based authorization for Warden.
//!
//! Three decisions share one ordering:
//! - [`Authorizer::has_role`]: is a role ranked at or above another
//! - [`Authorizer::assignable_roles`]: which roles a subject may hand out
//! - [`Authorizer::can_perform`]: may a role perform a named [`Action`]
//!
//! Roles and actions are closed enumerations. Untyped names are parsed at
//! the boundary and unknown ones surface as [`AuthzError`] instead of
//! silently ranking lowest.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod action;
pub mod authorizer;
pub mod error;
pub mod role;
pub mod table;

#[cfg(test)]
mod proptests;

pub use action::{Action, RoleSet};
pub use authorizer::Authorizer;
pub use error::{AuthzError, Result};
pub use role::{Role, RoleHierarchy};
pub use table::{ActionPermissionTable, PermissionsConfig};
