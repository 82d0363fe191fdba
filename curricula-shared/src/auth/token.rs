/// Access-token issuance and verification
///
/// Session tokens are self-contained JWTs signed with a symmetric secret.
/// The signing algorithm and default lifetime come from the server
/// configuration; only the HMAC family (HS256/HS384/HS512) is accepted
/// there, since the secret is shared between signer and verifier.
///
/// Verification checks the signature and the expiry in a single
/// [`jsonwebtoken::decode`] call, so a token cannot pass the signature
/// check and then be accepted with an expiry that lapsed in between.
/// Clock-skew tolerance is fixed at zero; the library's 60-second default
/// leeway is overridden.
///
/// # Example
///
/// ```
/// use curricula_shared::auth::token::{issue_token, verify_token, Claims};
/// use chrono::Duration;
/// use jsonwebtoken::Algorithm;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-key-at-least-32-bytes-long!";
/// let claims = Claims::new(Uuid::new_v4(), Some("a@b.co".into()), Duration::minutes(30));
///
/// let token = issue_token(&claims, secret, Algorithm::HS256)?;
/// let verified = verify_token(&token, secret, Algorithm::HS256)?;
/// assert_eq!(verified.sub, claims.sub);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to encode a token
    #[error("failed to issue token: {0}")]
    Issue(String),

    /// Token expiry has passed (zero leeway)
    #[error("token has expired")]
    Expired,

    /// Signature does not match the configured secret
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Token or payload could not be parsed
    #[error("token is malformed: {0}")]
    Malformed(String),
}

/// Claims carried by an access token
///
/// `sub` holds the user id as a string; the resolver parses and validates
/// it separately so that a missing or non-UUID subject is distinguishable
/// from a token that fails signature or expiry checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id, stringified UUID. Defaults to empty when the
    /// payload omits it, which the resolver rejects as a missing subject.
    #[serde(default)]
    pub sub: String,

    /// Email at issuance time, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `user_id` expiring `ttl` from now.
    ///
    /// Callers default `ttl` from the configured
    /// `access_token_expire_minutes`; a different lifetime may be passed
    /// for special-purpose tokens.
    pub fn new(user_id: Uuid, email: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            email,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Whether the expiry has already passed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs `claims` into a compact JWT.
///
/// # Errors
///
/// Returns [`TokenError::Issue`] if encoding fails (e.g. the algorithm and
/// key type disagree).
pub fn issue_token(claims: &Claims, secret: &str, algorithm: Algorithm) -> Result<String, TokenError> {
    let header = Header::new(algorithm);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| TokenError::Issue(e.to_string()))
}

/// Verifies a token's signature and expiry, returning its claims.
///
/// Signature and expiry are validated atomically inside one decode call
/// with zero leeway: a token whose expiry passes between issuance of the
/// check and its completion is rejected, and an expiry even one second in
/// the past fails.
///
/// # Errors
///
/// - [`TokenError::Expired`] — expiry passed
/// - [`TokenError::InvalidSignature`] — wrong secret or tampered payload
/// - [`TokenError::Malformed`] — not a JWT, or payload fails to parse
pub fn verify_token(token: &str, secret: &str, algorithm: Algorithm) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    // Fixed tolerance: zero. The library defaults to 60 seconds.
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed(e.to_string()),
    })?;

    Ok(data.claims)
}
