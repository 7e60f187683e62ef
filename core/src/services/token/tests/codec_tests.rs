//! Unit tests for the access token codec

use chrono::{Duration, Utc};
use kg_shared::config::TokenConfig;

use crate::domain::entities::principal::Principal;
use crate::errors::TokenError;
use crate::services::token::{SigningKeyManager, TokenCodec};

fn test_codec() -> TokenCodec {
    let keys = SigningKeyManager::generate().unwrap();
    TokenCodec::new(&keys, &TokenConfig::default())
}

fn test_principal() -> Principal {
    Principal::new("alice", ["ROLE_USER"])
}

#[test]
fn test_mint_and_verify_roundtrip() {
    let codec = test_codec();
    let minted = codec.mint(&test_principal()).unwrap();

    let claims = codec.verify(&minted.token).unwrap();
    assert_eq!(claims, minted.claims);
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.iss, "keygate");
    assert_eq!(claims.scope, "ROLE_USER");
    assert_eq!(claims.exp, claims.iat + 900);
}

#[test]
fn test_minted_tokens_are_never_identical() {
    let codec = test_codec();
    let principal = test_principal();

    let a = codec.mint(&principal).unwrap();
    let b = codec.mint(&principal).unwrap();

    assert_ne!(a.token, b.token);
    assert_ne!(a.claims.jti, b.claims.jti);
}

#[test]
fn test_scope_joins_multiple_authorities() {
    let codec = test_codec();
    let principal = Principal::new("admin", ["ROLE_USER", "ROLE_ADMIN"]);

    let minted = codec.mint(&principal).unwrap();
    assert_eq!(minted.claims.scope, "ROLE_ADMIN,ROLE_USER");
}

#[test]
fn test_header_carries_key_id() {
    let keys = SigningKeyManager::generate().unwrap();
    let codec = TokenCodec::new(&keys, &TokenConfig::default());

    let minted = codec.mint(&test_principal()).unwrap();
    let header = jsonwebtoken::decode_header(&minted.token).unwrap();

    assert_eq!(header.kid.as_deref(), Some(keys.key_id()));
}

#[test]
fn test_expired_token_is_rejected() {
    let keys = SigningKeyManager::generate().unwrap();
    let config = TokenConfig::default().with_access_expiry_seconds(5);
    let codec = TokenCodec::new(&keys, &config);

    let minted = codec
        .mint_at(&test_principal(), Utc::now() - Duration::seconds(10))
        .unwrap();

    assert_eq!(codec.verify(&minted.token), Err(TokenError::TokenExpired));
}

#[test]
fn test_foreign_keypair_is_rejected() {
    let codec_a = test_codec();
    let codec_b = test_codec();

    let minted = codec_a.mint(&test_principal()).unwrap();

    assert_eq!(
        codec_b.verify(&minted.token),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_wrong_issuer_is_rejected() {
    let keys = SigningKeyManager::generate().unwrap();
    let codec = TokenCodec::new(&keys, &TokenConfig::default());
    let other = TokenCodec::new(&keys, &TokenConfig::new("someone-else"));

    let minted = other.mint(&test_principal()).unwrap();

    // Same keypair, different configured issuer
    assert_eq!(codec.verify(&minted.token), Err(TokenError::TokenMalformed));
}

#[test]
fn test_garbage_input_fails_closed() {
    let codec = test_codec();

    for input in ["", "garbage", "a.b.c", "ey.ey.ey"] {
        assert_eq!(
            codec.verify(input),
            Err(TokenError::TokenMalformed),
            "input {:?} should be malformed",
            input
        );
    }
}

#[test]
fn test_peek_ignores_expiry_but_not_signature() {
    let keys = SigningKeyManager::generate().unwrap();
    let config = TokenConfig::default().with_access_expiry_seconds(5);
    let codec = TokenCodec::new(&keys, &config);

    let minted = codec
        .mint_at(&test_principal(), Utc::now() - Duration::seconds(10))
        .unwrap();

    // Expired: verify rejects, peek still exposes the claims
    assert_eq!(codec.verify(&minted.token), Err(TokenError::TokenExpired));
    let claims = codec.peek(&minted.token).unwrap();
    assert_eq!(claims.jti, minted.claims.jti);

    // A foreign signature stays rejected even for peek
    let other = test_codec();
    assert_eq!(
        other.peek(&minted.token),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_expiry_remaining() {
    let codec = test_codec();
    let now = Utc::now();
    let minted = codec.mint_at(&test_principal(), now).unwrap();

    let remaining = codec.expiry_remaining(&minted.token, now).unwrap();
    assert_eq!(remaining, Duration::seconds(900));

    let later = now + Duration::seconds(1000);
    let remaining = codec.expiry_remaining(&minted.token, later).unwrap();
    assert!(remaining < Duration::zero());

    assert_eq!(
        codec.expiry_remaining("garbage", now),
        Err(TokenError::TokenMalformed)
    );
}
