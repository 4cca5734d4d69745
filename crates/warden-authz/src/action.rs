//! Named capabilities and sets of roles permitted to perform them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthzError;
use crate::role::Role;

/// A named capability gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Administer other users.
    ///
    /// No built-in operation checks this action: account creation is open,
    /// and role changes are gated by [`Authorizer::can_assign`]. It stays in
    /// the table for callers that gate their own admin surfaces with
    /// [`Authorizer::can_perform`].
    ///
    /// [`Authorizer::can_assign`]: crate::Authorizer::can_assign
    /// [`Authorizer::can_perform`]: crate::Authorizer::can_perform
    ManageUsers,
    /// Read completion metrics.
    ViewAnalytics,
    /// Create, update and sweep tasks.
    ManageTasks,
    /// Read tasks.
    ViewTasks,
}

impl Action {
    /// Every known action.
    pub const ALL: [Action; 4] = [
        Action::ManageUsers,
        Action::ViewAnalytics,
        Action::ManageTasks,
        Action::ViewTasks,
    ];

    /// Wire name of the action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::ManageUsers => "manage_users",
            Action::ViewAnalytics => "view_analytics",
            Action::ManageTasks => "manage_tasks",
            Action::ViewTasks => "view_tasks",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| AuthzError::UnrecognizedAction(s.to_string()))
    }
}

// ============================================================================
// RoleSet
// ============================================================================

/// A set of roles, stored as a bitmask indexed by rank.
///
/// Sets need not be contiguous in the hierarchy; `{client, founder}` is a
/// valid set that excludes `engineer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// `role` and every role ranked above it.
    pub fn at_least(role: Role) -> Self {
        Role::ALL
            .into_iter()
            .filter(|r| *r >= role)
            .collect()
    }

    /// Add a role to the set.
    pub fn insert(&mut self, role: Role) {
        self.0 |= 1 << role.rank();
    }

    /// Whether the set contains `role`.
    pub fn contains(&self, role: Role) -> bool {
        self.0 & (1 << role.rank()) != 0
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in ascending rank order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.contains(*r))
    }

    /// Lowest-ranked member, if any.
    pub fn lowest(&self) -> Option<Role> {
        self.iter().next()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::empty();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}
