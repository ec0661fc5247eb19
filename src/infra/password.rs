use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::password::PasswordScheme,
};

/// Argon2id with the crate's default parameters. Hashes are PHC strings, so
/// the salt and parameters travel with the hash.
#[derive(Default)]
pub struct Argon2Passwords {
    argon2: Argon2<'static>,
}

impl Argon2Passwords {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordScheme for Argon2Passwords {
    fn hash(&self, plaintext: &str) -> AppResult<SecretString> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AppError::Storage(format!("failed to hash password: {e}")))?;
        Ok(SecretString::from(hash.to_string()))
    }

    fn compare(&self, plaintext: &str, hash: &SecretString) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash.expose_secret())
            .map_err(|e| AppError::Storage(format!("stored password hash is unreadable: {e}")))?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::Storage(format!("password check failed: {e}"))),
        }
    }
}
