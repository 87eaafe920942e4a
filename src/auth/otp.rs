use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

/// Hashes an admin OTP for storage.
pub fn hash_otp(otp: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(otp.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
pub fn verify_otp(otp: &str, hashed: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(hashed)?;

    match Argon2::default().verify_password(otp.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_original_otp() {
        let hash = hash_otp("482913").unwrap();
        assert!(verify_otp("482913", &hash).unwrap());
        assert!(!verify_otp("482914", &hash).unwrap());
        assert!(verify_otp("482913", "not-a-hash").is_err());
    }
}
