//! Privilege levels and their fixed total order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthzError;

/// A privilege level.
///
/// Variants are declared lowest privilege first, so the derived `Ord`
/// matches the hierarchy: `Client < Engineer < Founder < SuperAdmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// End customer; may view tasks.
    Client,
    /// May manage tasks.
    Engineer,
    /// May view analytics.
    Founder,
    /// May manage users and assign every lesser role.
    SuperAdmin,
}

impl Role {
    /// Every role, lowest privilege first.
    pub const ALL: [Role; 4] = [Role::Client, Role::Engineer, Role::Founder, Role::SuperAdmin];

    /// Zero-based rank of this role within the hierarchy.
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// Wire name of the role (`"client"`, `"super_admin"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Engineer => "engineer",
            Role::Founder => "founder",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// The highest privilege level.
    pub const fn highest() -> Role {
        Role::SuperAdmin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AuthzError::InvalidRole(s.to_string()))
    }
}

// ============================================================================
// RoleHierarchy
// ============================================================================

/// Ordered sequence of every [`Role`], lowest privilege first.
///
/// Each role appears exactly once and the sequence never changes after
/// construction. Rank lookup is a direct mapping rather than a search, so
/// there is no "not found" rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHierarchy {
    order: [Role; 4],
}

impl RoleHierarchy {
    /// The fixed `client < engineer < founder < super_admin` hierarchy.
    pub const fn standard() -> Self {
        Self { order: Role::ALL }
    }

    /// Rank of `role` within the hierarchy.
    pub fn rank_of(&self, role: Role) -> usize {
        role.rank()
    }

    /// Rank of a role given by name.
    ///
    /// Unknown names fail closed with [`AuthzError::InvalidRole`].
    pub fn rank_of_named(&self, role: &str) -> Result<usize, AuthzError> {
        role.parse::<Role>().map(|r| self.rank_of(r))
    }

    /// Iterate roles in ascending rank order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.order.iter().copied()
    }

    /// Roles ranked strictly below `role`, ascending.
    pub fn below(&self, role: Role) -> Vec<Role> {
        let rank = self.rank_of(role);
        self.iter().filter(|r| self.rank_of(*r) < rank).collect()
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::standard()
    }
}
