//! User management service: application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use bcrypt::DEFAULT_COST;
use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{self, AccessClaims, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password_with_cost, verify_password};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
}

/// Account creation input, password in clear text
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
}

/// User service: orchestrates all identity use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    password_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self {
            repos,
            jwt_config,
            password_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and issue an access token.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = normalize_email(email);
        let Some(user) = self.repos.users().find_by_email(&email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let access_token = jwt::sign(&AccessClaims::for_user(&user, &self.jwt_config), &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResult {
            access_token,
            expires_in: self.jwt_config.ttl_secs(),
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Create an account. Role defaults to VIEWER.
    pub async fn register(&self, input: RegisterUser) -> DomainResult<User> {
        let name = input.name.trim().to_string();
        let email = normalize_email(&input.email);

        if name.chars().count() < 2 {
            return Err(DomainError::Validation(
                "Name must be at least 2 characters".into(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if input.password.len() < 6 {
            return Err(DomainError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }

        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already in use".into()));
        }

        let password_hash = hash_password_with_cost(&input.password, self.password_cost)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repos
            .users()
            .create(NewUser {
                name,
                email,
                password_hash,
                role: input.role.unwrap_or_default(),
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "New user registered");
        Ok(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The authenticated user's profile.
    pub async fn me(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    // ── Bootstrap ───────────────────────────────────────────────

    /// Create an ADMIN account when no users exist yet. Returns whether one
    /// was created.
    pub async fn ensure_default_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<bool> {
        if self.repos.users().count().await? > 0 {
            return Ok(false);
        }

        self.register(RegisterUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Some(UserRole::Admin),
        })
        .await?;

        warn!(email = %email, "Default admin created; change its password");
        Ok(true)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
