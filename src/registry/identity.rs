use validator::{validate_email, validate_length, validate_must_match};

use super::invalid;
use crate::auth::password::{is_strong_password, PasswordHasher, MIN_PASSWORD_LEN};
use crate::error::AppError;
use crate::models::{NewUser, Role, SigninRequest, SignupRequest, UserProfile};
use crate::store::Store;

const MIN_NAME_LEN: u64 = 3;

/// Account creation and credential checks.
pub struct Identity<'a> {
    store: &'a dyn Store,
    hasher: &'a PasswordHasher,
}

impl<'a> Identity<'a> {
    pub fn new(store: &'a dyn Store, hasher: &'a PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Validates the request, hashes the password and persists the user.
    ///
    /// Checks run in a fixed order and the first failure is reported.
    pub async fn signup(&self, request: SignupRequest) -> Result<UserProfile, AppError> {
        let role = validate_signup(&request)?;

        if self
            .store
            .find_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(invalid("Email already exists"));
        }

        let password_hash = self.hasher.hash_blocking(request.password).await?;
        let user = self
            .store
            .insert_user(NewUser {
                email: request.email,
                password_hash,
                name: request.name,
                role,
            })
            .await?;

        log::info!("registered user {} with role {}", user.id, user.role.code());
        Ok(user.into())
    }

    /// Checks an email/password pair.
    ///
    /// An unknown email and a wrong password produce the same error, and both
    /// pay for one bcrypt verification.
    pub async fn signin(&self, request: SigninRequest) -> Result<UserProfile, AppError> {
        check_email(&request.email)?;
        check_password_length(&request.password)?;

        let user = self.store.find_user_by_email(&request.email).await?;
        let hashed_password = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.hasher.decoy_hash(),
        };
        let matches = self
            .hasher
            .verify_blocking(request.password, hashed_password)
            .await?;

        match user {
            Some(user) if matches => Ok(user.into()),
            Some(user) => {
                log::info!("signin failed: wrong password for user {}", user.id);
                Err(invalid_credentials())
            }
            None => {
                log::info!("signin failed: unknown email");
                Err(invalid_credentials())
            }
        }
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

fn check_email(email: &str) -> Result<(), AppError> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(invalid("Invalid email format"))
    }
}

fn check_password_length(password: &str) -> Result<(), AppError> {
    if validate_length(password, Some(MIN_PASSWORD_LEN), None, None) {
        Ok(())
    } else {
        Err(invalid("Password must be at least 8 characters long"))
    }
}

fn validate_signup(request: &SignupRequest) -> Result<Role, AppError> {
    check_email(&request.email)?;
    check_password_length(&request.password)?;

    if !is_strong_password(&request.password) {
        return Err(invalid(
            "Password is not strong enough. It should contain at least 1 lowercase letter, \
             1 uppercase letter, 1 number, and 1 symbol.",
        ));
    }
    if !validate_must_match(&request.password, &request.confirmpassword) {
        return Err(invalid("Passwords do not match"));
    }
    if !validate_length(request.name.as_str(), Some(MIN_NAME_LEN), None, None) {
        return Err(invalid("Invalid name"));
    }

    request.role().ok_or_else(|| invalid("Role is not valid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn request() -> SignupRequest {
        SignupRequest {
            email: "ada@example.com".into(),
            password: "Passw0rd!".into(),
            confirmpassword: "Passw0rd!".into(),
            name: "Ada".into(),
            role: "1".into(),
        }
    }

    fn message(result: Result<Role, AppError>) -> String {
        result.unwrap_err().message().to_string()
    }

    #[test]
    fn test_signup_checks_run_in_order() {
        // Everything wrong at once: the email check wins.
        let all_wrong = SignupRequest {
            email: "nope".into(),
            password: "short".into(),
            confirmpassword: "other".into(),
            name: "A".into(),
            role: "9".into(),
        };
        assert_eq!(message(validate_signup(&all_wrong)), "Invalid email format");

        let short = SignupRequest {
            password: "Pa0!".into(),
            confirmpassword: "mismatch".into(),
            ..request()
        };
        assert_eq!(
            message(validate_signup(&short)),
            "Password must be at least 8 characters long"
        );

        let weak = SignupRequest {
            password: "password".into(),
            confirmpassword: "password".into(),
            ..request()
        };
        assert!(message(validate_signup(&weak)).starts_with("Password is not strong enough"));

        let mismatch = SignupRequest {
            confirmpassword: "Passw0rd?".into(),
            ..request()
        };
        assert_eq!(message(validate_signup(&mismatch)), "Passwords do not match");

        let short_name = SignupRequest {
            name: "Al".into(),
            ..request()
        };
        assert_eq!(message(validate_signup(&short_name)), "Invalid name");

        let bad_role = SignupRequest {
            role: "4".into(),
            ..request()
        };
        assert_eq!(message(validate_signup(&bad_role)), "Role is not valid");

        assert_eq!(validate_signup(&request()).unwrap(), Role::Member);
    }

    #[actix_rt::test]
    async fn test_signup_hashes_password_and_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::new(4);
        let identity = Identity::new(&store, &hasher);

        let profile = identity.signup(request()).await.unwrap();
        assert_eq!(profile.email, "ada@example.com");

        let stored = store.find_user(&profile.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Passw0rd!");
        assert!(hasher.verify("Passw0rd!", &stored.password_hash).unwrap());

        let err = identity.signup(request()).await.unwrap_err();
        assert_eq!(err, AppError::ValidationError("Email already exists".into()));
    }

    #[actix_rt::test]
    async fn test_signin_hides_which_part_failed() {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::new(4);
        let identity = Identity::new(&store, &hasher);
        identity.signup(request()).await.unwrap();

        let wrong_password = identity
            .signin(SigninRequest {
                email: "ada@example.com".into(),
                password: "Wr0ngPass!".into(),
            })
            .await
            .unwrap_err();
        let unknown_email = identity
            .signin(SigninRequest {
                email: "bob@example.com".into(),
                password: "Passw0rd!".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password, invalid_credentials());

        let profile = identity
            .signin(SigninRequest {
                email: "ada@example.com".into(),
                password: "Passw0rd!".into(),
            })
            .await
            .unwrap();
        assert_eq!(profile.name, "Ada");
    }

    #[actix_rt::test]
    async fn test_signin_for_unknown_email_checks_the_decoy_hash() {
        let store = MemoryStore::new();
        for cost in [4, 5] {
            let hasher = PasswordHasher::new(cost);
            let err = Identity::new(&store, &hasher)
                .signin(SigninRequest {
                    email: "nobody@example.com".into(),
                    password: "Passw0rd!".into(),
                })
                .await
                .unwrap_err();
            assert_eq!(err, invalid_credentials());
        }
    }
}
