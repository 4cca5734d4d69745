//! Callable account operations.
//!
//! Each operation takes the caller's uid (`None` when the request carries no
//! session) and a request body, and returns a response body or an
//! [`AccountError`]. The caller's role is always read from the `users`
//! document, never from session claims.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use warden_authz::{Authorizer, Role};
use warden_core::{UserId, UserRecord};
use warden_store::{DocumentStore, IdentityProvider, NewAccount};

use crate::bootstrap::BootstrapConfig;
use crate::error::{AccountError, Result};

// ============================================================================
// Request and response bodies
// ============================================================================

/// Body of `createSuperAdmin` and `createUserAccount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// Sign-in email.
    #[serde(default)]
    pub email: String,
    /// Initial password.
    #[serde(default)]
    pub password: String,
}

impl CreateAccountRequest {
    fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AccountError::invalid_input(
                "email and password are required",
            ));
        }
        Ok(())
    }
}

/// Response of the account-creating operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAccount {
    /// uid of the new account.
    pub uid: UserId,
}

/// Body of `updateUserRole`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    /// User whose role changes.
    #[serde(default)]
    pub user_id: String,
    /// Role name; parsed at the boundary.
    #[serde(default)]
    pub new_role: String,
}

/// Response of `updateUserRole`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRoleResponse {
    /// Always `true`; failures are errors.
    pub success: bool,
}

/// Response of `getUserProfile`: the user document plus its uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The caller's uid.
    pub uid: UserId,
    /// The caller's `users/{uid}` document.
    #[serde(flatten)]
    pub record: UserRecord,
}

// ============================================================================
// AccountService
// ============================================================================

/// Account operations over a document store and identity provider.
pub struct AccountService {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    authorizer: Arc<Authorizer>,
    bootstrap: BootstrapConfig,
}

impl AccountService {
    /// Create a service.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        authorizer: Arc<Authorizer>,
        bootstrap: BootstrapConfig,
    ) -> Self {
        Self {
            store,
            identity,
            authorizer,
            bootstrap,
        }
    }

    /// The authorizer decisions are made with.
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Create the single super admin.
    ///
    /// Only the configured designated email may be used, and only while no
    /// user holds `super_admin`.
    pub async fn create_super_admin(&self, req: CreateAccountRequest) -> Result<CreatedAccount> {
        req.validate()?;
        if !self.bootstrap.is_designated(&req.email) {
            tracing::warn!("Super admin bootstrap attempted with a non-designated email");
            return Err(AccountError::unauthorized(
                "only the designated super admin email is allowed",
            ));
        }
        if self.store.any_with_role(Role::SuperAdmin).await? {
            return Err(AccountError::Conflict("super admin already exists".to_string()));
        }

        let uid = self.provision(req, true, Role::SuperAdmin, None).await?;
        tracing::info!(uid = %uid, "Super admin created");
        Ok(CreatedAccount { uid })
    }

    /// Create a `client` account, recording the caller as its creator.
    pub async fn create_user_account(
        &self,
        caller: Option<&UserId>,
        req: CreateAccountRequest,
    ) -> Result<CreatedAccount> {
        req.validate()?;
        let uid = self
            .provision(req, false, Role::Client, caller.cloned())
            .await?;
        tracing::info!(uid = %uid, created_by = ?caller.map(UserId::as_str), "User account created");
        Ok(CreatedAccount { uid })
    }

    /// Change another user's role.
    ///
    /// The new role must be one the caller may assign. A target that
    /// currently holds `super_admin` cannot be changed through this path.
    /// The document is written before the session claim.
    pub async fn update_user_role(
        &self,
        caller: Option<&UserId>,
        req: UpdateRoleRequest,
    ) -> Result<UpdateRoleResponse> {
        let caller = caller.ok_or_else(|| AccountError::unauthorized("authentication required"))?;
        let caller_role = self
            .store
            .get_user(caller)
            .await?
            .map(|record| record.role)
            .ok_or_else(|| AccountError::unauthorized("caller has no user record"))?;

        let new_role: Role = req.new_role.parse()?;
        if !self.authorizer.can_assign(caller_role, new_role) {
            tracing::warn!(uid = %caller, role = %caller_role, target_role = %new_role, "Role assignment denied");
            return Err(AccountError::unauthorized(format!(
                "role '{caller_role}' may not assign '{new_role}'"
            )));
        }

        if req.user_id.trim().is_empty() {
            return Err(AccountError::invalid_input("userId is required"));
        }
        let target = UserId::new(req.user_id);
        let current = self
            .store
            .get_user(&target)
            .await?
            .ok_or_else(|| AccountError::NotFound(format!("user '{target}' not found")))?;
        if current.role == Role::SuperAdmin {
            return Err(AccountError::Conflict(
                "the super admin's role cannot be changed".to_string(),
            ));
        }

        self.store.update_role(&target, new_role, Utc::now()).await?;
        if let Err(err) = self.identity.set_role_claim(&target, new_role).await {
            tracing::error!(uid = %target, error = %err, "Role stored but session claim update failed");
            return Err(err.into());
        }

        tracing::info!(uid = %target, from = %current.role, to = %new_role, "Role updated");
        Ok(UpdateRoleResponse { success: true })
    }

    /// The caller's own profile.
    pub async fn get_user_profile(&self, caller: Option<&UserId>) -> Result<UserProfile> {
        let caller = caller.ok_or_else(|| AccountError::unauthorized("authentication required"))?;
        let record = self
            .store
            .get_user(caller)
            .await?
            .ok_or_else(|| AccountError::NotFound("user profile not found".to_string()))?;
        Ok(UserProfile {
            uid: caller.clone(),
            record,
        })
    }

    /// Create the identity account, the user document, and the role claim.
    ///
    /// If the document or claim write fails, whatever was written is removed
    /// again (document first, then identity account) so a retry with the
    /// same email, or a retried bootstrap, does not conflict.
    async fn provision(
        &self,
        req: CreateAccountRequest,
        email_verified: bool,
        role: Role,
        created_by: Option<UserId>,
    ) -> Result<UserId> {
        let account = self
            .identity
            .create_account(NewAccount {
                email: req.email,
                password: req.password,
                email_verified,
            })
            .await?;
        let uid = account.uid;

        let record = UserRecord::new(account.email, role, Utc::now()).with_created_by(created_by);
        if let Err(err) = self.store.create_user(&uid, record).await {
            tracing::error!(uid = %uid, error = %err, "Account provisioning failed");
            self.remove_identity(&uid).await;
            return Err(err.into());
        }

        if let Err(err) = self.identity.set_role_claim(&uid, role).await {
            tracing::error!(uid = %uid, error = %err, "Role claim write failed during provisioning");
            if let Err(cleanup) = self.store.delete_user(&uid).await {
                tracing::error!(uid = %uid, error = %cleanup, "Could not remove orphaned user document");
            }
            self.remove_identity(&uid).await;
            return Err(err.into());
        }
        Ok(uid)
    }

    async fn remove_identity(&self, uid: &UserId) {
        match self.identity.delete_account(uid).await {
            Ok(()) | Err(warden_store::Error::NotFound { .. }) => {}
            Err(cleanup) => {
                tracing::error!(uid = %uid, error = %cleanup, "Could not remove orphaned identity account");
            }
        }
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("bootstrap", &self.bootstrap)
            .finish_non_exhaustive()
    }
}
