use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use once_cell::sync::Lazy;
use rand_core::OsRng;

/// Argon2id with the crate's default cost, shared by hashing and every
/// verification path.
static HASHER: Lazy<Argon2<'static>> =
    Lazy::new(|| Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()));

/// Stand-in hash checked when a username has no credential, so a miss costs
/// the same argon2 work as a hit.
static DECOY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("decoy-password-never-matches").ok());

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(HASHER.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Checks a password against a stored PHC string. Unparsable hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| HASHER.verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

/// Spends one verification on the decoy hash. Always reports no match.
pub fn verify_against_decoy(password: &str) -> bool {
    if let Some(decoy) = DECOY_HASH.as_deref() {
        let _ = verify_password(password, decoy);
    }
    false
}
