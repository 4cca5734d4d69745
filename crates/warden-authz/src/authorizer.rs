//! Permission decisions over the role hierarchy and action table.

use crate::action::Action;
use crate::error::Result;
use crate::role::{Role, RoleHierarchy};
use crate::table::ActionPermissionTable;

/// The authorization engine.
///
/// Holds an immutable [`RoleHierarchy`] and [`ActionPermissionTable`],
/// constructed once at startup and shared (typically behind an `Arc`) with
/// every caller. All decisions are pure, synchronous, and lock-free.
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    hierarchy: RoleHierarchy,
    table: ActionPermissionTable,
}

impl Authorizer {
    /// Create an authorizer over the standard hierarchy and the given table.
    pub fn new(table: ActionPermissionTable) -> Self {
        Self {
            hierarchy: RoleHierarchy::standard(),
            table,
        }
    }

    /// Authorizer with the standard permission table.
    pub fn standard() -> Self {
        Self::new(ActionPermissionTable::standard())
    }

    /// The role hierarchy in use.
    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    /// The permission table in use.
    pub fn table(&self) -> &ActionPermissionTable {
        &self.table
    }

    /// Whether `actual` is ranked at or above `required`.
    pub fn has_role(&self, required: Role, actual: Role) -> bool {
        self.hierarchy.rank_of(actual) >= self.hierarchy.rank_of(required)
    }

    /// [`has_role`](Self::has_role) over role names.
    ///
    /// Unknown names are an [`AuthzError::InvalidRole`](crate::AuthzError::InvalidRole), never a low rank.
    pub fn has_role_named(&self, required: &str, actual: &str) -> Result<bool> {
        let required: Role = required.parse()?;
        let actual: Role = actual.parse()?;
        Ok(self.has_role(required, actual))
    }

    /// Roles that a subject holding `actual` may assign to others.
    ///
    /// Only the highest privilege level may assign roles, and it may assign
    /// every role below itself but never its own level. The result is in
    /// ascending rank order.
    pub fn assignable_roles(&self, actual: Role) -> Vec<Role> {
        if actual != Role::highest() {
            return Vec::new();
        }
        self.hierarchy.below(actual)
    }

    /// Whether `actual` may assign `target` to another user.
    pub fn can_assign(&self, actual: Role, target: Role) -> bool {
        self.assignable_roles(actual).contains(&target)
    }

    /// Whether `actual` may perform `action`.
    ///
    /// Allowed iff `actual` satisfies [`has_role`](Self::has_role) for at
    /// least one role in the action's permitted set. Actions with no entry
    /// are denied.
    pub fn can_perform(&self, actual: Role, action: Action) -> bool {
        self.table
            .get(action)
            .is_some_and(|allowed| allowed.iter().any(|r| self.has_role(r, actual)))
    }

    /// Decide an action given by name.
    ///
    /// Returns [`AuthzError::UnrecognizedAction`](crate::AuthzError::UnrecognizedAction) when the name is not a known
    /// action so callers can tell "denied" apart from "never heard of it".
    pub fn check_action(&self, actual: Role, action: &str) -> Result<bool> {
        let action: Action = action.parse()?;
        Ok(self.can_perform(actual, action))
    }

    /// Decide an action given by name, denying unknown names.
    pub fn can_perform_action(&self, actual: Role, action: &str) -> bool {
        self.check_action(actual, action).unwrap_or(false)
    }
}
