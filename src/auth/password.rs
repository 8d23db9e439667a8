use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

/// Argon2id v19 with the crate's default cost parameters.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hashes a plaintext password into a salted PHC string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            anyhow!("hash password: {e}")
        })
}

/// Errors only when the stored hash cannot be parsed; a mismatch is `Ok(false)`.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = parse(stored)?;
    Ok(hasher().verify_password(plain.as_bytes(), &parsed).is_ok())
}

lazy_static! {
    /// Hash of a throwaway secret, compared against when the account is unknown.
    static ref DUMMY_HASH: Option<String> = hash_password("urbanlens-no-such-account").ok();
}

/// Spends the same Argon2 work as a real check without any account behind it.
pub fn verify_dummy(plain: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plain, hash);
    }
}

/// True when `stored` was produced with something other than the current
/// algorithm, so it should be replaced on the next successful login.
pub fn needs_rehash(stored: &str) -> anyhow::Result<bool> {
    let parsed = parse(stored)?;
    Ok(parsed.algorithm != Algorithm::Argon2id.ident())
}

fn parse(stored: &str) -> anyhow::Result<PasswordHash<'_>> {
    PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        anyhow!("parse password hash: {e}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_hide_plaintext() {
        let hash = hash_password("Str0ng!Pass").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("Str0ng!Pass"));
        assert!(verify_password("Str0ng!Pass", &hash).unwrap());
        assert!(!verify_password("Str0ng!Pasz", &hash).unwrap());
    }

    #[test]
    fn salts_differ_per_hash() {
        assert_ne!(
            hash_password("Str0ng!Pass").unwrap(),
            hash_password("Str0ng!Pass").unwrap()
        );
    }

    #[test]
    fn fresh_hashes_do_not_need_rehash() {
        let hash = hash_password("Str0ng!Pass").unwrap();
        assert!(!needs_rehash(&hash).unwrap());
    }

    #[test]
    fn dummy_verification_runs_argon2() {
        verify_dummy("Str0ng!Pass");
        let hash = DUMMY_HASH.as_deref().expect("dummy hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("Str0ng!Pass", hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = verify_password("x", "plaintext-in-db").unwrap_err();
        assert!(err.to_string().contains("parse password hash"));
        assert!(needs_rehash("plaintext-in-db").is_err());
    }
}
