//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{AuthResponse, LoginRequest, RegisterRequest, Role, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new account. Role is always User; admins are provisioned
    /// at bootstrap, never through registration.
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        if self
            .repository
            .users
            .username_exists(&request.username)
            .await?
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = Self::hash_password(&request.password)?;

        self.repository
            .users
            .create(&request.username, &password_hash, Role::User)
            .await
    }

    /// Authenticate by username and password and return a signed token.
    ///
    /// Unknown username and wrong password produce the same generic error so
    /// the response carries no username-enumeration signal.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<AuthResponse> {
        let invalid =
            || AppError::Authentication("Invalid username or password".to_string());

        let user = self
            .repository
            .users
            .get_by_username(&request.username)
            .await?
            .ok_or_else(invalid)?;

        if !Self::verify_password(&request.password, &user.password_hash)? {
            return Err(invalid());
        }

        let token = self.token_for(&user)?;

        Ok(AuthResponse {
            username: user.username,
            token,
            role: user.role,
        })
    }

    /// Create a JWT token for a user
    fn token_for(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Create the bootstrap admin account when configured and absent.
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let (Some(username), Some(password)) = (
            self.config.admin_username.as_deref(),
            self.config.admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        if self.repository.users.username_exists(username).await? {
            return Ok(());
        }

        let password_hash = Self::hash_password(password)?;
        self.repository
            .users
            .create(username, &password_hash, Role::Admin)
            .await?;

        tracing::info!("Created bootstrap admin user '{}'", username);
        Ok(())
    }

    /// Hash a password using Argon2 with a fresh random salt. The returned
    /// PHC string packs algorithm parameters, salt and digest.
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC string
    pub fn verify_password(password: &str, stored: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(stored)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = AuthService::hash_password("correct horse battery staple").unwrap();
        assert!(AuthService::verify_password("correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = AuthService::hash_password("s3cret-pass").unwrap();
        assert!(!AuthService::verify_password("s3cret-pass2", &hash).unwrap());
        assert!(!AuthService::verify_password("", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        // Salt is generated per call, so two hashes of one password differ
        // while both still verify.
        let first = AuthService::hash_password("duplicate").unwrap();
        let second = AuthService::hash_password("duplicate").unwrap();
        assert_ne!(first, second);
        assert!(AuthService::verify_password("duplicate", &first).unwrap());
        assert!(AuthService::verify_password("duplicate", &second).unwrap());
    }

    #[test]
    fn garbage_stored_hash_is_an_error() {
        assert!(AuthService::verify_password("whatever", "not-a-phc-string").is_err());
    }
}
