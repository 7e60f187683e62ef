//! Unit tests for the token lifecycle service

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use kg_shared::config::TokenConfig;

use crate::domain::entities::principal::Principal;
use crate::errors::{CoreError, StoreError, TokenError};
use crate::services::token::{SigningKeyManager, TokenService};
use crate::store::{MemorySessionStore, SessionStore};

/// Session store that is permanently unreachable
struct UnavailableStore;

#[async_trait]
impl SessionStore for UnavailableStore {
    async fn put(&self, _key: &str, _value: &str, _ttl: StdDuration) -> Result<(), StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }
}

fn alice() -> Principal {
    Principal::new("alice", ["ROLE_USER"])
}

fn test_service() -> (TokenService<MemorySessionStore>, MemorySessionStore) {
    let keys = SigningKeyManager::generate().unwrap();
    let store = MemorySessionStore::new();
    let service = TokenService::new(store.clone(), &keys, TokenConfig::default());
    (service, store)
}

#[tokio::test]
async fn test_issue_token_pair() {
    let (service, _) = test_service();

    let pair = service.issue_token_pair(&alice()).await.unwrap();

    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert_eq!(pair.token_type, "Bearer");
    assert_eq!(pair.expires_in, 900);

    let claims = service.codec().verify(&pair.access_token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.scope, "ROLE_USER");
}

#[tokio::test]
async fn test_issued_token_validates_until_revoked() {
    let (service, _) = test_service();

    let pair = service.issue_token_pair(&alice()).await.unwrap();
    assert!(service.validate(&pair.access_token).await.unwrap());

    service.logout(&pair.access_token).await;

    assert!(!service.validate(&pair.access_token).await.unwrap());
    assert!(service.is_revoked(&pair.access_token).await.unwrap());
}

#[tokio::test]
async fn test_verify_reports_revocation() {
    let (service, _) = test_service();

    let pair = service.issue_token_pair(&alice()).await.unwrap();
    service.logout(&pair.access_token).await;

    let err = service.verify(&pair.access_token).await.unwrap_err();
    assert_eq!(err, CoreError::Token(TokenError::TokenRevoked));
}

#[tokio::test]
async fn test_logout_of_expired_token_writes_nothing() {
    let (service, store) = test_service();

    let minted = service
        .codec()
        .mint_at(&alice(), Utc::now() - Duration::seconds(1000))
        .unwrap();

    service.logout(&minted.token).await;

    assert!(store.is_empty().await);
    assert!(!service.is_revoked(&minted.token).await.unwrap());
}

#[tokio::test]
async fn test_logout_with_garbage_token_is_silent() {
    let (service, store) = test_service();

    service.logout("not-a-token").await;

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_expired_token_fails_validation_without_blacklist() {
    let (service, store) = test_service();

    let minted = service
        .codec()
        .mint_at(&alice(), Utc::now() - Duration::seconds(1000))
        .unwrap();

    assert!(!service.validate(&minted.token).await.unwrap());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_foreign_token_fails_validation() {
    let (service, _) = test_service();
    let (other, _) = test_service();

    let pair = other.issue_token_pair(&alice()).await.unwrap();

    assert!(!service.validate(&pair.access_token).await.unwrap());
}

#[tokio::test]
async fn test_refresh_rotates_single_use() {
    let (service, _) = test_service();

    let pair = service.issue_token_pair(&alice()).await.unwrap();
    let rotated = service.refresh(&pair.refresh_token).await.unwrap();

    assert_ne!(rotated.refresh_token, pair.refresh_token);

    // Second presentation of the rotated-away token always fails
    let err = service.refresh(&pair.refresh_token).await.unwrap_err();
    assert_eq!(err, CoreError::Token(TokenError::InvalidRefreshToken));

    // The replacement keeps working
    assert!(service.refresh(&rotated.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_refresh_with_unknown_token_fails() {
    let (service, _) = test_service();

    let err = service.refresh("never-issued").await.unwrap_err();
    assert_eq!(err, CoreError::Token(TokenError::InvalidRefreshToken));
}

#[tokio::test]
async fn test_refreshed_access_token_loses_authorities() {
    let (service, _) = test_service();

    let pair = service.issue_token_pair(&alice()).await.unwrap();
    let login_claims = service.codec().verify(&pair.access_token).unwrap();
    assert_eq!(login_claims.scope, "ROLE_USER");

    let rotated = service.refresh(&pair.refresh_token).await.unwrap();
    let refreshed_claims = service.codec().verify(&rotated.access_token).unwrap();

    // Only the subject survives the refresh-token mapping
    assert_eq!(refreshed_claims.sub, "alice");
    assert_eq!(refreshed_claims.scope, "");
}

#[tokio::test]
async fn test_refreshed_pair_validates() {
    let (service, _) = test_service();

    let pair = service.issue_token_pair(&alice()).await.unwrap();
    let rotated = service.refresh(&pair.refresh_token).await.unwrap();

    assert!(service.validate(&rotated.access_token).await.unwrap());
}

#[tokio::test]
async fn test_revoke_refresh_token() {
    let (service, _) = test_service();

    let pair = service.issue_token_pair(&alice()).await.unwrap();

    assert!(service.revoke_refresh_token(&pair.refresh_token).await.unwrap());
    assert!(!service.revoke_refresh_token(&pair.refresh_token).await.unwrap());

    let err = service.refresh(&pair.refresh_token).await.unwrap_err();
    assert_eq!(err, CoreError::Token(TokenError::InvalidRefreshToken));
}

#[tokio::test]
async fn test_store_outage_is_distinguishable_from_invalid() {
    let keys = SigningKeyManager::generate().unwrap();
    let healthy = TokenService::new(MemorySessionStore::new(), &keys, TokenConfig::default());
    let degraded = TokenService::new(UnavailableStore, &keys, TokenConfig::default());

    let pair = healthy.issue_token_pair(&alice()).await.unwrap();

    // Same keypair, so the signature checks out; only the denylist lookup fails
    let err = degraded.validate(&pair.access_token).await.unwrap_err();
    assert!(matches!(err, CoreError::Store(StoreError::Unavailable { .. })));

    let err = degraded.issue_token_pair(&alice()).await.unwrap_err();
    assert!(matches!(err, CoreError::Store(_)));

    let err = degraded.refresh("anything").await.unwrap_err();
    assert!(matches!(err, CoreError::Store(_)));
}

#[tokio::test]
async fn test_logout_swallows_store_outage() {
    let keys = SigningKeyManager::generate().unwrap();
    let healthy = TokenService::new(MemorySessionStore::new(), &keys, TokenConfig::default());
    let degraded = TokenService::new(UnavailableStore, &keys, TokenConfig::default());

    let pair = healthy.issue_token_pair(&alice()).await.unwrap();

    // Best-effort: no panic, no error to propagate
    degraded.logout(&pair.access_token).await;
}

#[tokio::test]
async fn test_is_revoked_treats_garbage_as_not_revoked() {
    let (service, _) = test_service();

    assert!(!service.is_revoked("garbage").await.unwrap());
}

#[tokio::test]
async fn test_blacklist_ttl_matches_remaining_lifetime() {
    let (service, store) = test_service();

    let pair = service.issue_token_pair(&alice()).await.unwrap();
    let claims = service.codec().verify(&pair.access_token).unwrap();

    service.logout(&pair.access_token).await;

    let key = format!("{}{}", crate::services::token::service::BLACKLIST_PREFIX, claims.jti);
    assert_eq!(store.get(&key).await.unwrap(), Some("blacklisted".to_string()));
}
