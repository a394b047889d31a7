use crate::error::AppError;
use bcrypt::{hash, verify};
use lazy_static::lazy_static;
use regex::Regex;

/// Salt rounds used when `BCRYPT_COST` is not configured.
pub const DEFAULT_COST: u32 = 10;

/// Minimum number of characters in a password.
pub const MIN_PASSWORD_LEN: u64 = 8;

/// Salt and digest of a bcrypt hash no password is checked against.
const DECOY_TAIL: &str = "N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

lazy_static! {
    static ref LOWERCASE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref UPPERCASE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
    static ref SYMBOL: Regex = Regex::new(r#"[-#!$@£%^&*()_+|~=`{}\[\]:";'<>?,./\\ ]"#).unwrap();
}

/// At least one lowercase letter, one uppercase letter, one digit and one symbol.
///
/// Length is checked separately so that each failure gets its own message.
pub fn is_strong_password(password: &str) -> bool {
    LOWERCASE.is_match(password)
        && UPPERCASE.is_match(password)
        && DIGIT.is_match(password)
        && SYMBOL.is_match(password)
}

/// Salted one-way hashing with a fixed bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    pub fn verify(&self, password: &str, hashed_password: &str) -> Result<bool, AppError> {
        verify(password, hashed_password)
            .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
    }

    /// [`hash`](Self::hash) on tokio's blocking pool, keeping bcrypt off the workers.
    pub async fn hash_blocking(self, password: String) -> Result<String, AppError> {
        tokio::task::spawn_blocking(move || self.hash(&password))
            .await
            .map_err(join_failed)?
    }

    pub async fn verify_blocking(
        self,
        password: String,
        hashed_password: String,
    ) -> Result<bool, AppError> {
        tokio::task::spawn_blocking(move || self.verify(&password, &hashed_password))
            .await
            .map_err(join_failed)?
    }

    /// A well-formed hash at this hasher's cost that matches no stored user.
    ///
    /// Verifying against it costs the same as verifying a real password, so a
    /// signin for an unknown email takes as long as one with a wrong password.
    pub fn decoy_hash(&self) -> String {
        format!("$2b${:02}${}", self.cost, DECOY_TAIL)
    }
}

fn join_failed(err: tokio::task::JoinError) -> AppError {
    AppError::InternalServerError(format!("Password worker failed: {}", err))
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let hasher = PasswordHasher::new(4);
        let password = "Str0ng!pass";
        let hashed = hasher.hash(password).unwrap();

        assert_ne!(hashed, password);
        assert!(hasher.verify(password, &hashed).unwrap());
        assert!(!hasher.verify("Wr0ng!pass", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new(4);
        let first = hasher.hash("Str0ng!pass").unwrap();
        let second = hasher.hash("Str0ng!pass").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match PasswordHasher::default().verify("Str0ng!pass", "invalidhashformat") {
            Err(AppError::InternalServerError(msg)) => {
                assert!(msg.contains("Failed to verify password"));
            }
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    #[test]
    fn test_decoy_hash_uses_the_configured_cost() {
        let hasher = PasswordHasher::new(4);
        let decoy = hasher.decoy_hash();

        assert!(decoy.starts_with("$2b$04$"));
        assert_eq!(decoy.len(), 60);
        assert_eq!(hasher.verify("Passw0rd!", &decoy), Ok(false));
        assert_eq!(hasher.verify("", &decoy), Ok(false));
        assert!(PasswordHasher::default().decoy_hash().starts_with("$2b$10$"));
    }

    #[test_log::test]
    fn test_password_strength() {
        assert!(is_strong_password("Passw0rd!"));
        assert!(is_strong_password("a B 1 c"));

        assert!(!is_strong_password("password1!"), "no uppercase");
        assert!(!is_strong_password("PASSWORD1!"), "no lowercase");
        assert!(!is_strong_password("Password!!"), "no digit");
        assert!(!is_strong_password("Password12"), "no symbol");
    }
}
