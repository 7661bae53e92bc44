use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::DateTime as BsonDateTime;
use validator::Validate;

use crate::{
    auth::{password, token, JwtService},
    errors::{AppError, AppResult},
    mailer::Mailer,
    models::{
        domain::User,
        dto::{
            request::{ForgetPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
            response::UserDto,
        },
    },
    repositories::UserRepository,
};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    jwt: JwtService,
    mailer: Arc<Mailer>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtService, mailer: Arc<Mailer>) -> Self {
        Self { users, jwt, mailer }
    }

    /// Create an unverified account and send the verification link.
    ///
    /// The token is persisted with the user before the mail is attempted,
    /// so a failed send leaves the account registered and able to
    /// re-request verification. It never rolls back user creation.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserDto> {
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::AlreadyExists("User already exists".to_string()));
        }

        let hash = password::hash_password(&request.password)?;
        let mut user = User::new(&request.name, &request.email, &hash);

        let verification_token = token::generate_opaque_token();
        user.verification_token = Some(verification_token.clone());
        user.verification_token_expiry = Some(BsonDateTime::from_chrono(
            token::verification_expiry(Utc::now()),
        ));

        let user = self.users.create(user).await?;

        if let Err(e) = self
            .mailer
            .send_verification_email(&user.email, &user.name, &verification_token)
            .await
        {
            log::error!("Verification mail to {} failed: {}", user.email, e);
        }

        Ok(user.into())
    }

    /// Consume a verification token and issue a session.
    ///
    /// Consumption is a single atomic store operation; a second call with
    /// the same token finds nothing to match and reports an invalid link,
    /// while the account stays verified.
    pub async fn verify_email(&self, token_value: &str) -> AppResult<(UserDto, String)> {
        if !token::is_well_formed_token(token_value) {
            return Err(AppError::NotFound("Invalid link!".to_string()));
        }

        let user = self
            .users
            .consume_verification_token(token_value, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid link!".to_string()))?;

        let session = self.jwt.create_token(&user)?;
        Ok((user.into(), session))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<(UserDto, String)> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No account found with the provided email!".to_string())
            })?;

        if !password::verify_password(&request.password, &user.password)? {
            return Err(AppError::Unauthorized(
                "Email or password is incorrect!".to_string(),
            ));
        }

        let session = self.jwt.create_token(&user)?;
        Ok((user.into(), session))
    }

    /// Issue a reset token (10 minute window) and mail the link. The
    /// token is persisted first; a mail failure surfaces but the stored
    /// token remains valid, so a retry or resend still works.
    pub async fn forget_password(&self, request: ForgetPasswordRequest) -> AppResult<()> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No account found with this email address".to_string())
            })?;

        let id = user
            .id
            .ok_or_else(|| AppError::InternalError("User record is missing an id".to_string()))?;

        let reset_token = token::generate_opaque_token();
        self.users
            .set_reset_token(&id, &reset_token, token::reset_expiry(Utc::now()))
            .await?;

        self.mailer
            .send_password_reset_email(&user.email, &user.name, &reset_token)
            .await?;

        Ok(())
    }

    /// Consume a reset token and replace the password hash atomically.
    /// Expired or unknown tokens are indistinguishable to the caller.
    pub async fn reset_password(
        &self,
        token_value: &str,
        request: ResetPasswordRequest,
    ) -> AppResult<()> {
        request.validate()?;

        if !token::is_well_formed_token(token_value) {
            return Err(AppError::NotFound("Token expired! Try again".to_string()));
        }

        let hash = password::hash_password(&request.password)?;

        self.users
            .consume_reset_token(token_value, &hash, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound("Token expired! Try again".to_string()))?;

        Ok(())
    }

    /// Replace any outstanding verification token with a fresh one and
    /// resend the link. The old link stops working immediately.
    pub async fn resend_verification(&self, user: &User) -> AppResult<()> {
        if user.is_verified {
            return Err(AppError::ValidationError(
                "Email is already verified".to_string(),
            ));
        }

        let id = user
            .id
            .ok_or_else(|| AppError::InternalError("User record is missing an id".to_string()))?;

        let verification_token = token::generate_opaque_token();
        self.users
            .set_verification_token(
                &id,
                &verification_token,
                token::verification_expiry(Utc::now()),
            )
            .await?;

        self.mailer
            .send_verification_email(&user.email, &user.name, &verification_token)
            .await?;

        Ok(())
    }
}
