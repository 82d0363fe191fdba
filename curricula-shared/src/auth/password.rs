/// Password hashing using Argon2id
///
/// Credentials are stored as PHC-format strings that embed the algorithm,
/// its parameters, and a per-hash random salt. Hashing the same password
/// twice therefore yields different digests, while verification recovers
/// the parameters from the stored string and compares in constant time.
///
/// Accounts provisioned through the external identity provider carry no
/// password hash at all; callers handle that case before reaching this
/// module.
///
/// # Example
///
/// ```
/// use curricula_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let digest = hash_password("correct horse battery staple")?;
/// assert!(verify_password("correct horse battery staple", &digest)?);
/// assert!(!verify_password("incorrect horse", &digest)?);
/// # Ok(())
/// # }
/// ```
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to produce a digest
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Stored digest is not a valid PHC string
    #[error("invalid password digest: {0}")]
    InvalidDigest(String),

    /// Verification failed for a reason other than a wrong password
    #[error("failed to verify password: {0}")]
    Verify(String),
}

/// Hashes a password with Argon2id and a freshly generated random salt.
///
/// Returns the digest in PHC string format
/// (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`). The salt comes from
/// the OS CSPRNG, so repeated calls with the same password produce
/// different digests.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if digest generation fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(digest.to_string())
}

/// Verifies a password against a stored PHC digest.
///
/// The hashing parameters are taken from the digest itself, and the
/// comparison is constant-time.
///
/// # Returns
///
/// `Ok(true)` when the password matches, `Ok(false)` when it does not.
///
/// # Errors
///
/// Returns [`PasswordError::InvalidDigest`] when the stored digest cannot
/// be parsed, or [`PasswordError::Verify`] for any other failure.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(digest)
        .map_err(|e| PasswordError::InvalidDigest(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_produces_phc_string() {
        let digest = hash_password("some password").expect("hash should succeed");
        assert!(digest.starts_with("$argon2id$"));
        assert!(digest.contains("v=19"));
    }

    #[test]
    fn test_hash_is_salted_per_call() {
        let a = hash_password("same input").expect("hash should succeed");
        let b = hash_password("same input").expect("hash should succeed");
        assert_ne!(a, b, "distinct salts must yield distinct digests");
    }

    #[test]
    fn test_verify_correct_password() {
        let digest = hash_password("s3cret").expect("hash should succeed");
        assert!(verify_password("s3cret", &digest).expect("verify should succeed"));
    }

    #[test]
    fn test_verify_wrong_password() {
        let digest = hash_password("s3cret").expect("hash should succeed");
        assert!(!verify_password("not-s3cret", &digest).expect("verify should succeed"));
        assert!(!verify_password("", &digest).expect("verify should succeed"));
    }

    #[test]
    fn test_verify_rejects_malformed_digest() {
        assert!(verify_password("anything", "not-a-digest").is_err());
        assert!(verify_password("anything", "$argon2id$broken").is_err());
    }

    #[test]
    fn test_roundtrip_unusual_inputs() {
        for password in ["", "with spaces", "üñíçødé-пароль", "!@#$%^&*()"] {
            let digest = hash_password(password).expect("hash should succeed");
            assert!(
                verify_password(password, &digest).expect("verify should succeed"),
                "password {:?} should verify against its own digest",
                password
            );
        }
    }
}
