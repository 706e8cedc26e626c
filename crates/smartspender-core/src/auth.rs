//! Password hashing and credential checks
//!
//! Passwords are stored as Argon2id PHC strings with a random per-user salt.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::User;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a password into a PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| Error::Auth(format!("Invalid stored password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn validate_registration(email: &str, name: &str, password: &str) -> Result<()> {
    let email = email.trim();
    let valid_email = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid_email {
        return Err(Error::InvalidData("Please enter a valid email".to_string()));
    }
    if name.trim().is_empty() {
        return Err(Error::InvalidData("Name is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::InvalidData(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Validate input, hash the password and create the user
pub fn register_user(db: &Database, email: &str, name: &str, password: &str) -> Result<User> {
    validate_registration(email, name, password)?;
    if db.get_user_by_email(email)?.is_some() {
        return Err(Error::Conflict("User already exists".to_string()));
    }
    let hash = hash_password(password)?;
    let user = db.create_user(email, name, &hash)?;
    info!(user_id = user.id, "Registered user");
    Ok(user)
}

/// Check credentials; unknown email and wrong password are indistinguishable
pub fn authenticate(db: &Database, email: &str, password: &str) -> Result<User> {
    let invalid = || Error::Auth("Invalid credentials".to_string());

    let Some((user, hash)) = db.get_password_hash(email)? else {
        warn!("Login attempt for unknown email");
        return Err(invalid());
    };
    if !verify_password(password, &hash)? {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(invalid());
    }
    Ok(user)
}
