use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use kontor_common::models::auth::{Claims, Role};

/// Tokens are valid for 24 hours from issuance. There is no server-side
/// revocation; logout is a client-side delete.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Hash a password using argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Create an identity token (JWT) embedding {id, role} with a 24h expiry
pub fn create_token(account_id: i64, role: Role, jwt_secret: &str) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: account_id.to_string(),
        role,
        iat: now,
        exp: now + TOKEN_TTL_SECS,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .context("Failed to create token")
}

/// Expiry is reported separately from every other verification failure
/// so the client can tell "re-login" from "silent refresh".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

/// Validate a token's signature and expiry and return its claims.
pub fn decode_token(token: &str, jwt_secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    // No leeway: a token expired one second ago is expired
    validation.leeway = 0;

    match jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(TokenError::Expired),
            _ => Err(TokenError::Invalid),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_exp(account_id: i64, role: Role, secret: &str, iat: i64, exp: i64) -> String {
        let claims = Claims {
            sub: account_id.to_string(),
            role,
            iat,
            exp,
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_password_hash_and_verify_correct() {
        let password = "my-secure-password";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_password_verify_wrong() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_password_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash1, hash2);
        // Both still verify
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_token_create_and_decode() {
        let secret = "test-jwt-secret";
        let token = create_token(42, Role::Admin, secret).unwrap();
        let claims = decode_token(&token, secret).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_token_wrong_secret_is_invalid() {
        let token = create_token(1, Role::User, "secret-1").unwrap();
        assert_eq!(decode_token(&token, "secret-2").unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_expired_token_is_expired_not_invalid() {
        let secret = "test-jwt-secret";
        let now = chrono::Utc::now().timestamp();
        // Expired one second ago
        let token = token_with_exp(7, Role::User, secret, now - TOKEN_TTL_SECS, now - 1);
        assert_eq!(decode_token(&token, secret).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_expired_token_with_wrong_secret_is_invalid() {
        let now = chrono::Utc::now().timestamp();
        let token = token_with_exp(7, Role::User, "secret-1", now - TOKEN_TTL_SECS, now - 1);
        // Bad signature wins over expiry; the claim can't be trusted at all
        assert_eq!(decode_token(&token, "secret-2").unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert_eq!(
            decode_token("not-a-jwt", "secret").unwrap_err(),
            TokenError::Invalid
        );
    }
}
