use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;

use crate::domain::entities::{NewUser, Session, User};
use crate::domain::errors::{AppError, StoreError};
use crate::domain::pix::MAX_VALUE_LEN;
use crate::domain::ports::{Clock, SessionStore, UserStore};
use crate::use_cases::validation;

const MIN_PASSWORD_LEN: usize = 8;

// The owner's full name is the PIX merchant name (tag 59).
pub const MAX_FULL_NAME_BYTES: usize = MAX_VALUE_LEN;

// Input accepted by the registration use case.
pub struct RegisterInput {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

// Owner registration use case with injected dependencies.
pub struct RegisterUseCase<'a> {
    pub users: &'a dyn UserStore,
}

impl RegisterUseCase<'_> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, AppError> {
        let email = normalize_email(&input.email)?;
        let full_name = validate_full_name(&input.full_name)?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidContent(format!(
                "password must have at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let new_user = NewUser {
            email,
            full_name,
            password_hash: hash_password(&input.password)?,
        };
        match self.users.insert_user(new_user).await {
            Ok(user) => Ok(user),
            Err(StoreError::Conflict) => Err(AppError::AlreadyExists("user")),
            Err(err) => Err(err.into()),
        }
    }
}

// Response returned by the login use case.
pub struct LoginResponse {
    pub token: String,
    pub expires_at: u64,
    pub user: User,
}

// Owner login use case with injected dependencies.
pub struct LoginUseCase<'a> {
    pub users: &'a dyn UserStore,
    pub sessions: &'a dyn SessionStore,
    pub clock: &'a dyn Clock,
    pub ttl_seconds: u64,
}

impl LoginUseCase<'_> {
    pub async fn execute(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .filter(|user| user.is_active && verify_password(password, &user.password_hash))
            .ok_or(AppError::InvalidCredentials)?;

        let token = Uuid::new_v4().to_string();
        let expires_at = self.clock.now_epoch_seconds().saturating_add(self.ttl_seconds);
        let session = Session {
            user_id: user.id,
            email: user.email.clone(),
            session_id: Uuid::new_v4().to_string(),
            expires_at,
        };

        self.sessions.insert(token.clone(), session).await?;

        Ok(LoginResponse {
            token,
            expires_at,
            user,
        })
    }
}

// Token verification use case with injected dependencies.
pub struct VerifyTokenUseCase<'a> {
    pub sessions: &'a dyn SessionStore,
    pub clock: &'a dyn Clock,
}

impl VerifyTokenUseCase<'_> {
    pub async fn execute(&self, token: &str) -> Result<Session, AppError> {
        let session = self
            .sessions
            .get(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.expires_at <= self.clock.now_epoch_seconds() {
            // Best-effort cleanup of expired session.
            let _ = self.sessions.remove(token).await;
            return Err(AppError::SessionExpired);
        }

        Ok(session)
    }
}

// Response returned by the logout use case.
pub struct LogoutResponse {
    pub revoked: bool,
}

// Logout use case with injected dependencies.
pub struct LogoutUseCase<'a> {
    pub sessions: &'a dyn SessionStore,
}

impl LogoutUseCase<'_> {
    pub async fn execute(&self, token: &str) -> Result<LogoutResponse, AppError> {
        let revoked = self.sessions.remove(token).await?;
        Ok(LogoutResponse { revoked })
    }
}

// Loads the profile behind a verified session.
pub struct CurrentUserUseCase<'a> {
    pub users: &'a dyn UserStore,
}

impl CurrentUserUseCase<'_> {
    pub async fn execute(&self, session: &Session) -> Result<User, AppError> {
        self.users
            .find_user(session.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AppError::Unauthorized)
    }
}

fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    };
    if !valid || email.chars().count() > 255 {
        return Err(AppError::InvalidContent("email is not valid".to_string()));
    }
    Ok(email)
}

fn validate_full_name(raw: &str) -> Result<String, AppError> {
    let name = validation::bounded_text("full_name", raw, 1, 100)?;
    if name.len() > MAX_FULL_NAME_BYTES {
        return Err(AppError::InvalidContent(format!(
            "full_name must be at most {MAX_FULL_NAME_BYTES} bytes"
        )));
    }
    Ok(name)
}

// PHC string (`$argon2id$v=19$...`) with a per-password random salt.
fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
