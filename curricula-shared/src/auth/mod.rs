/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: signed, time-limited access tokens (JWT, HS* family)
/// - [`extract`]: tiered request extractors resolving bearer tokens to
///   stored users
///
/// Passwords never leave [`password`] unhashed; tokens are verified with
/// zero clock-skew tolerance; the extractors parse credentials once and
/// compose upward (optional → required → admin).
pub mod extract;
pub mod password;
pub mod token;
