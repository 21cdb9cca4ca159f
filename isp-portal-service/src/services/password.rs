use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Newtype for password to prevent accidental logging
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Hash a client password into a PHC string for `clients.password_hash`.
///
/// Argon2id with default parameters and a random salt.
pub fn hash_password(password: &Password) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored PHC string.
///
/// A stored value that is not a valid hash never matches; plain-text
/// passwords are not accepted.
pub fn verify_password(password: &Password, password_hash: &str) -> Result<(), anyhow::Error> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed_hash)
        .map_err(|_| anyhow::anyhow!("Password verification failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_password_correct() {
        let password = Password::new("pppoe-secret-1".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&password, &hash).is_ok());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password(&Password::new("pppoe-secret-1".to_string()))
            .expect("Failed to hash password");

        let wrong_password = Password::new("pppoe-secret-2".to_string());
        assert!(verify_password(&wrong_password, &hash).is_err());
    }

    #[test]
    fn test_plain_text_stored_password_never_matches() {
        let password = Password::new("pppoe-secret-1".to_string());
        assert!(verify_password(&password, "pppoe-secret-1").is_err());
    }

    #[test]
    fn test_debug_output_is_masked() {
        let password = Password::new("pppoe-secret-1".to_string());
        assert_eq!(format!("{:?}", password), "Password(***)");
    }
}
