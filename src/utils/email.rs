use campus_config::EmailConfig;
use campus_core::AppError;
use campus_models::auth::DeliveryStatus;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use crate::metrics::track_email_delivery;

/// Outbound mail over SMTP. Sending never fails the caller directly: every send
/// reports a [`DeliveryStatus`] and logs the underlying error.
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, reset_token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_token: &str,
    ) -> DeliveryStatus {
        let reset_link = self.config.reset_link(reset_token);

        let html_body = reset_html(to_name, &reset_link);
        let text_body = format!(
            "Hi {to_name},\n\n\
             We received a request to reset your password.\n\n\
             Open the link below to choose a new one:\n\
             {reset_link}\n\n\
             If you didn't request this, you can ignore this email.\n\n\
             Campus Administration"
        );

        self.deliver(to_email, "Password Reset Request", &text_body, &html_body)
            .await
    }

    /// Welcome mail carrying the generated login credentials.
    #[instrument(skip(self, password))]
    pub async fn send_account_credentials(
        &self,
        to_email: &str,
        to_name: &str,
        username: &str,
        password: &str,
    ) -> DeliveryStatus {
        let html_body = credentials_html(to_name, username, to_email, password);
        let text_body = format!(
            "Hi {to_name},\n\n\
             An account has been created for you.\n\n\
             Username: {username}\n\
             Email: {to_email}\n\
             Password: {password}\n\n\
             Please change your password after your first login.\n\n\
             Campus Administration"
        );

        self.deliver(to_email, "Your Campus Account", &text_body, &html_body)
            .await
    }

    async fn deliver(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> DeliveryStatus {
        if !self.config.enabled {
            tracing::info!(subject, "SMTP disabled, email not sent");
            return DeliveryStatus::Disabled;
        }

        let status = match self.send_email(to_email, subject, text_body, html_body).await {
            Ok(()) => {
                tracing::info!(subject, "Email sent");
                DeliveryStatus::Sent
            }
            Err(e) => {
                tracing::error!(subject, error = %e, "Email delivery failed");
                DeliveryStatus::Failed
            }
        };
        track_email_delivery(status.as_str());
        status
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(format!("Invalid from email: {e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(format!("Invalid to email: {e}")))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(format!("Failed to build email: {e}")))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| AppError::internal(format!("Failed to create SMTP relay: {e}")))?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(format!("Task join error: {e}")))?
            .map_err(|e| AppError::internal(format!("Failed to send email: {e}")))?;

        Ok(())
    }
}

fn reset_html(to_name: &str, reset_link: &str) -> String {
    layout(
        "Password Reset Request",
        &format!(
            r#"<p>Hi <strong>{name}</strong>,</p>
<p>We received a request to reset your password. Use the link below to choose a new one:</p>
<p><a href="{link}">{link}</a></p>
<p>If you didn't request this, you can ignore this email.</p>"#,
            name = escape_html(to_name),
            link = escape_html(reset_link),
        ),
    )
}

fn credentials_html(to_name: &str, username: &str, to_email: &str, password: &str) -> String {
    layout(
        "Your Campus Account",
        &format!(
            r#"<p>Hi <strong>{name}</strong>,</p>
<p>An account has been created for you.</p>
<p>Username: <strong>{username}</strong><br>Email: <strong>{email}</strong><br>Password: <strong>{password}</strong></p>
<p>Please change your password after your first login.</p>"#,
            name = escape_html(to_name),
            username = escape_html(username),
            email = escape_html(to_email),
            password = escape_html(password),
        ),
    )
}

/// Escapes text for use in HTML element content and quoted attributes.
fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 24px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 8px; padding: 32px;">
        <h1 style="margin-top: 0; font-size: 22px; color: #1f2937;">{title}</h1>
        {content}
        <p style="color: #6b7280; font-size: 12px;">This is an automated email. Please do not reply.</p>
    </div>
</body>
</html>"#
    )
}
