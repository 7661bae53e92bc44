use lettre::{
    message::{header::ContentType, Message},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use secrecy::ExposeSecret;

use crate::{
    config::MailConfig,
    errors::{AppError, AppResult},
};

/// Outbound mail. When SMTP is not configured (local development, test
/// runs) every send is skipped with a warning instead of failing the
/// request; the tokens those mails would carry are already persisted.
#[derive(Clone)]
pub struct Mailer {
    config: Option<MailConfig>,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    frontend_url: String,
}

impl Mailer {
    pub fn new(config: Option<MailConfig>, frontend_url: &str) -> AppResult<Self> {
        let transport = match &config {
            Some(mail) => {
                let creds = Credentials::new(
                    mail.smtp_user.clone(),
                    mail.smtp_pass.expose_secret().to_string(),
                );

                // Port 587 with STARTTLS, matching the usual submission setup
                let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(
                    &mail.smtp_host,
                )
                .map_err(|e| AppError::MailError(format!("SMTP setup failed: {}", e)))?
                .credentials(creds)
                .build();

                Some(transport)
            }
            None => None,
        };

        Ok(Self {
            config,
            transport,
            frontend_url: frontend_url.to_string(),
        })
    }

    /// A mailer that never sends; used where SMTP is intentionally absent.
    pub fn disabled(frontend_url: &str) -> Self {
        Self {
            config: None,
            transport: None,
            frontend_url: frontend_url.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub async fn send_verification_email(
        &self,
        to_email: &str,
        name: &str,
        token: &str,
    ) -> AppResult<()> {
        let verification_url = format!("{}/auth/verify/{}", self.frontend_url, token);

        let body = format!(
            r#"<h2>Welcome to QuizWeb, {}!</h2>
<p>Please click the link below to verify your email:</p>
<a href="{}">Verify Email</a>
<p>This link will expire in 24 hours.</p>
<p>If you didn't request this verification, please ignore this email.</p>"#,
            name, verification_url
        );

        self.send(to_email, "Verify Your Email", &body).await
    }

    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        name: &str,
        token: &str,
    ) -> AppResult<()> {
        let reset_url = format!("{}/reset-password/{}", self.frontend_url, token);

        let body = format!(
            r#"<h2>Password Reset Request</h2>
<p>Hello {},</p>
<p>We received a request to reset your password. Please click the link below to reset your password:</p>
<a href="{}">Reset Password</a>
<p>This link will expire in 10 minutes.</p>
<p>If you didn't request this password reset, please ignore this email.</p>"#,
            name, reset_url
        );

        self.send(to_email, "Reset Your Password", &body).await
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()> {
        let (Some(config), Some(transport)) = (&self.config, &self.transport) else {
            log::warn!("Mail not configured, skipping '{}' to {}", subject, to);
            return Ok(());
        };

        let from = format!("QuizWeb <{}>", config.smtp_sender);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::MailError(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::MailError(format!("Invalid to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| AppError::MailError(format!("Failed to build email: {}", e)))?;

        transport
            .send(email)
            .await
            .map_err(|e| AppError::MailError(format!("Failed to send email: {}", e)))?;

        log::info!("Sent email to {}: {}", to, subject);
        Ok(())
    }
}
