//! Integration tests for the callable account operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use warden_accounts::{AccountError, AccountService, BootstrapConfig, UpdateRoleRequest};
use warden_authz::Authorizer;
use warden_core::{Role, UserId};
use warden_store::{
    IdentityAccount, IdentityProvider, MemoryIdentity, MemoryStore, NewAccount, UserStore,
};

use crate::common::{ROOT_EMAIL, TestHarness, request};

/// Identity provider whose claim writes fail while `claims_down` is set.
struct ClaimOutage {
    inner: MemoryIdentity,
    claims_down: AtomicBool,
}

#[async_trait]
impl IdentityProvider for ClaimOutage {
    async fn create_account(&self, account: NewAccount) -> warden_store::Result<IdentityAccount> {
        self.inner.create_account(account).await
    }

    async fn get_account(&self, uid: &UserId) -> warden_store::Result<Option<IdentityAccount>> {
        self.inner.get_account(uid).await
    }

    async fn set_role_claim(&self, uid: &UserId, role: Role) -> warden_store::Result<()> {
        if self.claims_down.load(Ordering::SeqCst) {
            return Err(warden_store::Error::Backend("claim service down".to_string()));
        }
        self.inner.set_role_claim(uid, role).await
    }

    async fn delete_account(&self, uid: &UserId) -> warden_store::Result<()> {
        self.inner.delete_account(uid).await
    }
}

fn update(user_id: &UserId, role: &str) -> UpdateRoleRequest {
    UpdateRoleRequest {
        user_id: user_id.to_string(),
        new_role: role.to_string(),
    }
}

// ============================================================================
// createSuperAdmin
// ============================================================================

#[tokio::test]
async fn test_create_super_admin() {
    let h = TestHarness::new();
    let uid = h.super_admin().await;

    let record = h.store.get_user(&uid).await.unwrap().unwrap();
    assert_eq!(record.role, Role::SuperAdmin);
    assert_eq!(record.email, ROOT_EMAIL);
    assert!(record.created_by.is_none());

    let account = h.identity.get_account(&uid).await.unwrap().unwrap();
    assert!(account.email_verified);
    assert_eq!(account.role_claim, Some(Role::SuperAdmin));
}

#[tokio::test]
async fn test_create_super_admin_wrong_email() {
    let h = TestHarness::new();
    let err = h
        .service
        .create_super_admin(request("mallory@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Unauthorized(_)));
    assert!(h.identity.is_empty().await);
}

#[tokio::test]
async fn test_create_super_admin_only_once() {
    let h = TestHarness::new();
    h.super_admin().await;

    let err = h
        .service
        .create_super_admin(request(ROOT_EMAIL))
        .await
        .unwrap_err();
    assert_eq!(err.category(), "conflict");
    assert_eq!(h.identity.len().await, 1);
}

#[tokio::test]
async fn test_create_super_admin_rolls_back_on_claim_failure() {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(ClaimOutage {
        inner: MemoryIdentity::new(),
        claims_down: AtomicBool::new(true),
    });
    let service = AccountService::new(
        store.clone(),
        identity.clone(),
        Arc::new(Authorizer::standard()),
        BootstrapConfig::designate(ROOT_EMAIL),
    );

    let err = service
        .create_super_admin(request(ROOT_EMAIL))
        .await
        .unwrap_err();
    assert_eq!(err.category(), "internal");
    assert!(store.list_users().await.unwrap().is_empty());
    assert!(!store.any_with_role(Role::SuperAdmin).await.unwrap());
    assert!(identity.inner.is_empty().await);

    // Bootstrap is still available once claims recover.
    identity.claims_down.store(false, Ordering::SeqCst);
    let created = service.create_super_admin(request(ROOT_EMAIL)).await.unwrap();
    let record = store.get_user(&created.uid).await.unwrap().unwrap();
    assert_eq!(record.role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_create_user_account_rolls_back_on_claim_failure() {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(ClaimOutage {
        inner: MemoryIdentity::new(),
        claims_down: AtomicBool::new(true),
    });
    let service = AccountService::new(
        store.clone(),
        identity.clone(),
        Arc::new(Authorizer::standard()),
        BootstrapConfig::default(),
    );

    assert!(service
        .create_user_account(None, request("dana@example.com"))
        .await
        .is_err());
    assert!(store.list_users().await.unwrap().is_empty());

    identity.claims_down.store(false, Ordering::SeqCst);
    assert!(service
        .create_user_account(None, request("dana@example.com"))
        .await
        .is_ok());
}

// ============================================================================
// createUserAccount
// ============================================================================

#[tokio::test]
async fn test_create_user_account_defaults_to_client() {
    let h = TestHarness::new();
    let admin = h.super_admin().await;

    let created = h
        .service
        .create_user_account(Some(&admin), request("alice@example.com"))
        .await
        .unwrap();

    let record = h.store.get_user(&created.uid).await.unwrap().unwrap();
    assert_eq!(record.role, Role::Client);
    assert_eq!(record.created_by, Some(admin));

    let account = h.identity.get_account(&created.uid).await.unwrap().unwrap();
    assert!(!account.email_verified);
    assert_eq!(account.role_claim, Some(Role::Client));
}

#[tokio::test]
async fn test_create_user_account_without_session() {
    let h = TestHarness::new();
    let created = h
        .service
        .create_user_account(None, request("bob@example.com"))
        .await
        .unwrap();
    let record = h.store.get_user(&created.uid).await.unwrap().unwrap();
    assert!(record.created_by.is_none());
}

#[tokio::test]
async fn test_create_user_account_open_to_any_session() {
    let h = TestHarness::new();
    let client = h.user_with_role("carol@example.com", Role::Client).await;
    assert!(!h
        .service
        .authorizer()
        .can_perform(Role::Client, warden_authz::Action::ManageUsers));

    let created = h
        .service
        .create_user_account(Some(&client), request("dave@example.com"))
        .await
        .unwrap();
    let record = h.store.get_user(&created.uid).await.unwrap().unwrap();
    assert_eq!(record.role, Role::Client);
    assert_eq!(record.created_by, Some(client));
}

#[tokio::test]
async fn test_create_user_account_requires_fields() {
    let h = TestHarness::new();
    let mut req = request("");
    let err = h.service.create_user_account(None, req.clone()).await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidInput(_)));

    req.email = "carol@example.com".into();
    req.password.clear();
    let err = h.service.create_user_account(None, req).await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidInput(_)));
}

#[tokio::test]
async fn test_create_user_account_duplicate_email() {
    let h = TestHarness::new();
    h.service
        .create_user_account(None, request("dup@example.com"))
        .await
        .unwrap();
    let err = h
        .service
        .create_user_account(None, request("dup@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Conflict(_)));
}

#[tokio::test]
async fn test_create_user_account_weak_password() {
    let h = TestHarness::new();
    let mut req = request("weak@example.com");
    req.password = "abc".into();
    let err = h.service.create_user_account(None, req).await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidInput(_)));
}

// ============================================================================
// updateUserRole
// ============================================================================

#[tokio::test]
async fn test_update_role_by_super_admin() {
    let h = TestHarness::new();
    let admin = h.super_admin().await;
    let target = h.user_with_role("eve@example.com", Role::Client).await;

    let resp = h
        .service
        .update_user_role(Some(&admin), update(&target, "engineer"))
        .await
        .unwrap();
    assert!(resp.success);

    let record = h.store.get_user(&target).await.unwrap().unwrap();
    assert_eq!(record.role, Role::Engineer);
    assert!(record.updated_at >= record.created_at);
    let account = h.identity.get_account(&target).await.unwrap().unwrap();
    assert_eq!(account.role_claim, Some(Role::Engineer));
}

#[tokio::test]
async fn test_update_role_requires_session() {
    let h = TestHarness::new();
    let target = h.user_with_role("eve@example.com", Role::Client).await;
    let err = h
        .service
        .update_user_role(None, update(&target, "engineer"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Unauthorized(_)));
}

#[tokio::test]
async fn test_update_role_denied_below_super_admin() {
    let h = TestHarness::new();
    let founder = h.user_with_role("founder@example.com", Role::Founder).await;
    let target = h.user_with_role("eve@example.com", Role::Client).await;

    let err = h
        .service
        .update_user_role(Some(&founder), update(&target, "engineer"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Unauthorized(_)));
    let record = h.store.get_user(&target).await.unwrap().unwrap();
    assert_eq!(record.role, Role::Client);
}

#[tokio::test]
async fn test_update_role_ignores_stale_claim() {
    // The claim says super_admin but the document says client.
    let h = TestHarness::new();
    let caller = h.user_with_role("stale@example.com", Role::Client).await;
    h.identity
        .set_role_claim(&caller, Role::SuperAdmin)
        .await
        .unwrap();
    let target = h.user_with_role("eve@example.com", Role::Client).await;

    let err = h
        .service
        .update_user_role(Some(&caller), update(&target, "founder"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Unauthorized(_)));
}

#[tokio::test]
async fn test_update_role_cannot_grant_super_admin() {
    let h = TestHarness::new();
    let admin = h.super_admin().await;
    let target = h.user_with_role("eve@example.com", Role::Founder).await;

    let err = h
        .service
        .update_user_role(Some(&admin), update(&target, "super_admin"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Unauthorized(_)));
}

#[tokio::test]
async fn test_update_role_unknown_role() {
    let h = TestHarness::new();
    let admin = h.super_admin().await;
    let target = h.user_with_role("eve@example.com", Role::Client).await;

    let err = h
        .service
        .update_user_role(Some(&admin), update(&target, "wizard"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::InvalidInput(_)));
}

#[tokio::test]
async fn test_update_role_missing_target() {
    let h = TestHarness::new();
    let admin = h.super_admin().await;
    let err = h
        .service
        .update_user_role(Some(&admin), update(&UserId::new("ghost"), "engineer"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::NotFound(_)));
}

#[tokio::test]
async fn test_update_role_super_admin_target_conflicts() {
    let h = TestHarness::new();
    let admin = h.super_admin().await;
    let err = h
        .service
        .update_user_role(Some(&admin), update(&admin, "client"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Conflict(_)));
    let record = h.store.get_user(&admin).await.unwrap().unwrap();
    assert_eq!(record.role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_update_role_claim_failure_after_store_write() {
    let h = TestHarness::new();
    let admin = h.super_admin().await;
    let target = h.user_with_role("eve@example.com", Role::Client).await;
    h.identity.fail_writes_for(target.as_str()).await;

    let err = h
        .service
        .update_user_role(Some(&admin), update(&target, "engineer"))
        .await
        .unwrap_err();
    assert_eq!(err.category(), "internal");

    // Store is the source of truth and was written first.
    let record = h.store.get_user(&target).await.unwrap().unwrap();
    assert_eq!(record.role, Role::Engineer);
}

// ============================================================================
// getUserProfile
// ============================================================================

#[tokio::test]
async fn test_get_user_profile() {
    let h = TestHarness::new();
    let uid = h.user_with_role("frank@example.com", Role::Engineer).await;

    let profile = h.service.get_user_profile(Some(&uid)).await.unwrap();
    assert_eq!(profile.uid, uid);
    assert_eq!(profile.record.role, Role::Engineer);
    assert_eq!(profile.record.email, "frank@example.com");
}

#[tokio::test]
async fn test_get_user_profile_errors() {
    let h = TestHarness::new();
    let err = h.service.get_user_profile(None).await.unwrap_err();
    assert!(matches!(err, AccountError::Unauthorized(_)));

    let err = h
        .service
        .get_user_profile(Some(&UserId::new("ghost")))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::NotFound(_)));
}
