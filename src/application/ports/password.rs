use secrecy::SecretString;

use crate::app_error::AppResult;

/// One-way password capability.
///
/// The orchestrator never compares credentials itself: it hands the plaintext
/// and the stored hash to the scheme and only looks at the verdict, so the
/// hashing algorithm can change without touching the login flow.
pub trait PasswordScheme: Send + Sync {
    fn hash(&self, plaintext: &str) -> AppResult<SecretString>;

    /// `Ok(false)` is a mismatch. `Err` means the stored hash could not be
    /// used at all (corrupt or unknown format).
    fn compare(&self, plaintext: &str, hash: &SecretString) -> AppResult<bool>;
}
