// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Session token codec properties
//!
//! Covers the issue/validate round trip and every rejection path: tampered
//! signatures, expired and backdated tokens, missing expiry, and tokens
//! signed with the wrong algorithm.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

use rust_identity_bridge::auth::jwt::{SessionClaims, TokenCodec};
use rust_identity_bridge::auth::AuthError;
use rust_identity_bridge::config::JwtConfig;

const TEST_SECRET: &str = "test-secret-key-for-codec-tests";

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        hmac_secret: TEST_SECRET.to_string(),
        ..JwtConfig::default()
    }
}

fn codec() -> TokenCodec {
    TokenCodec::new(&test_jwt_config()).expect("valid jwt config")
}

fn sample_claims() -> SessionClaims {
    let mut claims = SessionClaims::new("1234")
        .with_email(Some("a@b.com".to_string()))
        .with_provider("google")
        .with_issuer("identity-bridge");
    claims
        .extra
        .insert("locale".to_string(), serde_json::json!("fr-FR"));
    claims
}

/// Encode arbitrary claims with the codec's secret, bypassing `issue`.
fn encode_raw<T: Serialize>(claims: &T, algorithm: Algorithm) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("raw encoding")
}

#[test]
fn issue_then_validate_round_trips_claims() {
    let codec = codec();
    let before = Utc::now().timestamp();
    let token = codec
        .issue(sample_claims(), Duration::minutes(60))
        .expect("issuance");

    let decoded = codec.validate(&token).expect("fresh token validates");
    assert_eq!(decoded.sub, "1234");
    assert_eq!(decoded.email.as_deref(), Some("a@b.com"));
    assert_eq!(decoded.provider.as_deref(), Some("google"));
    assert_eq!(decoded.iss.as_deref(), Some("identity-bridge"));
    assert_eq!(decoded.extra["locale"], serde_json::json!("fr-FR"));

    // exp lands within the configured lifetime of the issuance instant
    let after = Utc::now().timestamp();
    assert!(decoded.exp >= before + 60 * 60);
    assert!(decoded.exp <= after + 60 * 60);
    let iat = decoded.iat.expect("iat stamped at issuance");
    assert!(iat >= before && iat <= after);
}

#[test]
fn caller_supplied_expiry_is_overwritten() {
    let codec = codec();
    let mut claims = sample_claims();
    claims.exp = 1; // long past; must not survive issuance
    let token = codec.issue(claims, Duration::minutes(5)).expect("issuance");
    let decoded = codec.validate(&token).expect("validates");
    assert!(decoded.exp > Utc::now().timestamp());
}

#[test]
fn tampered_signature_is_rejected() {
    let codec = codec();
    let token = codec
        .issue(sample_claims(), Duration::minutes(60))
        .expect("issuance");

    let (head, signature) = token.rsplit_once('.').expect("three-part token");
    // flip one signature character
    let flipped = if signature.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{}.{}{}", head, flipped, &signature[1..]);
    assert_ne!(token, tampered);

    assert!(matches!(
        codec.validate(&tampered),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn tampered_payload_is_rejected() {
    let codec = codec();
    let token = codec
        .issue(sample_claims(), Duration::minutes(60))
        .expect("issuance");

    // splice the payload of a differently-subjected token onto the
    // original signature
    let other = codec
        .issue(
            SessionClaims::new("9999").with_issuer("identity-bridge"),
            Duration::minutes(60),
        )
        .expect("issuance");
    let parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

    assert!(matches!(
        codec.validate(&spliced),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn token_expired_after_lifetime_is_rejected() {
    // A token issued with a 60 minute lifetime, seen 61 minutes later:
    // its exp is one minute in the past
    let codec = codec();
    let mut claims = sample_claims();
    claims.exp = (Utc::now() - Duration::minutes(1)).timestamp();
    let token = encode_raw(&claims, Algorithm::HS256);

    assert!(matches!(
        codec.validate(&token),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn negative_lifetime_issues_an_already_dead_token() {
    let codec = codec();
    let token = codec
        .issue(sample_claims(), Duration::minutes(-1))
        .expect("issuance itself succeeds");
    assert!(matches!(
        codec.validate(&token),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn missing_expiry_is_rejected() {
    #[derive(Serialize)]
    struct NoExpiry {
        sub: String,
    }

    let codec = codec();
    let token = encode_raw(
        &NoExpiry {
            sub: "1234".to_string(),
        },
        Algorithm::HS256,
    );
    assert!(matches!(
        codec.validate(&token),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn foreign_algorithm_is_rejected() {
    // Same secret, but HS384 instead of the configured HS256
    let codec = codec();
    let mut claims = sample_claims();
    claims.exp = (Utc::now() + Duration::minutes(60)).timestamp();
    let token = encode_raw(&claims, Algorithm::HS384);

    assert!(matches!(
        codec.validate(&token),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn wrong_secret_is_rejected() {
    let codec = codec();
    let mut claims = sample_claims();
    claims.exp = (Utc::now() + Duration::minutes(60)).timestamp();
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .expect("raw encoding");

    assert!(matches!(
        codec.validate(&token),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn empty_subject_is_refused_at_issuance() {
    let codec = codec();
    let result = codec.issue(SessionClaims::new(""), Duration::minutes(60));
    assert!(result.is_err());
}

#[test]
fn codec_refuses_unusable_configuration() {
    let mut config = test_jwt_config();
    config.hmac_secret = String::new();
    assert!(TokenCodec::new(&config).is_err());

    let mut config = test_jwt_config();
    config.algorithm = Algorithm::RS256;
    assert!(TokenCodec::new(&config).is_err());
}
