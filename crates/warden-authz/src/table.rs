//! The action → permitted-roles table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action::{Action, RoleSet};
use crate::error::{AuthzError, Result};
use crate::role::Role;

/// Mapping from [`Action`] to the set of roles permitted to perform it.
///
/// Every entry holds a non-empty [`RoleSet`]. An action with no entry is
/// permitted to nobody. The table is built once and never mutated after it
/// is handed to an [`Authorizer`](crate::Authorizer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPermissionTable {
    entries: BTreeMap<Action, RoleSet>,
}

impl ActionPermissionTable {
    /// A table with no entries; every action is denied.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The standard policy.
    ///
    /// | action | minimum role |
    /// |---|---|
    /// | `manage_users` | `super_admin` |
    /// | `view_analytics` | `founder` |
    /// | `manage_tasks` | `engineer` |
    /// | `view_tasks` | `client` |
    pub fn standard() -> Self {
        Self {
            entries: BTreeMap::from([
                (Action::ManageUsers, RoleSet::at_least(Role::SuperAdmin)),
                (Action::ViewAnalytics, RoleSet::at_least(Role::Founder)),
                (Action::ManageTasks, RoleSet::at_least(Role::Engineer)),
                (Action::ViewTasks, RoleSet::at_least(Role::Client)),
            ]),
        }
    }

    /// Return a copy of the table with `action` mapped to `roles`.
    ///
    /// Fails with [`AuthzError::EmptyRoleSet`] if `roles` is empty.
    pub fn with(mut self, action: Action, roles: RoleSet) -> Result<Self> {
        if roles.is_empty() {
            return Err(AuthzError::EmptyRoleSet(action));
        }
        self.entries.insert(action, roles);
        Ok(self)
    }

    /// Roles permitted to perform `action`, or `None` if it has no entry.
    pub fn get(&self, action: Action) -> Option<&RoleSet> {
        self.entries.get(&action)
    }

    /// Iterate entries in action order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, &RoleSet)> {
        self.entries.iter().map(|(a, r)| (*a, r))
    }

    /// Number of actions with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActionPermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Per-action overrides of the standard policy, as read from config.
///
/// ```toml
/// [permissions]
/// view_analytics = ["engineer", "founder", "super_admin"]
/// ```
///
/// Actions not listed keep their standard entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionsConfig(pub BTreeMap<Action, Vec<Role>>);

impl PermissionsConfig {
    /// Whether no overrides are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build the table this config describes.
    pub fn build(&self) -> Result<ActionPermissionTable> {
        self.0
            .iter()
            .try_fold(ActionPermissionTable::standard(), |table, (action, roles)| {
                table.with(*action, roles.iter().copied().collect())
            })
    }
}
