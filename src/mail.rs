use serde_json::json;

use crate::config::MailConfig;

/// Thin client for the transactional mail API. When no API key is
/// configured the mailer logs the message instead of sending it, so local
/// and test runs never hit the network.
#[derive(Debug, Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        if self.config.api_key.is_empty() {
            tracing::info!(to, subject, "mail sending disabled, skipping");
            return Ok(());
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "from": self.config.from,
                "to": [to],
                "subject": subject,
                "html": html,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("mail provider returned {status}: {body}");
        }
        Ok(())
    }

    /// Delivery failures must never fail the request that triggered the
    /// mail, so handlers use this and the error lands in the log.
    pub fn send_in_background(&self, to: String, subject: String, html: String) {
        let mailer = self.clone();
        tokio::spawn(async move {
            if let Err(err) = mailer.send(&to, &subject, &html).await {
                tracing::warn!(to, subject, error = %err, "failed to send mail");
            }
        });
    }
}

pub fn registration_email(name: &str, email: &str, password: &str, designation: &str) -> String {
    format!(
        "<div style=\"font-family: sans-serif\">\
         <h2>Welcome, {name}!</h2>\
         <p>Your account has been created. You can sign in with:</p>\
         <ul>\
         <li><b>Email:</b> {email}</li>\
         <li><b>Password:</b> {password}</li>\
         <li><b>Designation:</b> {designation}</li>\
         </ul>\
         <p>Please change your password after your first login.</p>\
         </div>"
    )
}

pub fn account_update_email(
    name: &str,
    role: Option<&str>,
    designation: Option<&str>,
    password_changed: bool,
) -> String {
    let mut changes = String::new();
    if let Some(role) = role {
        changes.push_str(&format!("<li><b>Role:</b> {role}</li>"));
    }
    if let Some(designation) = designation {
        changes.push_str(&format!("<li><b>Designation:</b> {designation}</li>"));
    }
    if password_changed {
        changes.push_str("<li>Your password was updated.</li>");
    }
    format!(
        "<div style=\"font-family: sans-serif\">\
         <h2>Hi {name},</h2>\
         <p>Your account details were updated:</p>\
         <ul>{changes}</ul>\
         <p>If you did not expect this change, contact your administrator.</p>\
         </div>"
    )
}

pub fn otp_email(name: &str, otp: &str) -> String {
    format!(
        "<div style=\"font-family: sans-serif\">\
         <h2>Hi {name},</h2>\
         <p>Your verification code is:</p>\
         <h1 style=\"letter-spacing: 4px\">{otp}</h1>\
         <p>The code is valid for a single verification.</p>\
         </div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_email_contains_credentials() {
        let html = registration_email("Asha", "asha@example.com", "s3cret", "Engineer");
        assert!(html.contains("asha@example.com"));
        assert!(html.contains("s3cret"));
        assert!(html.contains("Engineer"));
    }

    #[test]
    fn update_email_lists_only_changed_fields() {
        let html = account_update_email("Asha", Some("Admin HR"), None, true);
        assert!(html.contains("Admin HR"));
        assert!(html.contains("password was updated"));
        assert!(!html.contains("Designation"));
    }

    #[test]
    fn otp_email_carries_the_code() {
        assert!(otp_email("Asha", "314159").contains("314159"));
    }
}
