use lettre::{
    Message, SmtpTransport, Transport,
    message::{SinglePart, header},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::{Config, SmtpSettings};
use crate::models::Project;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP is not configured. Set SMTP_HOST and SMTP_FROM.")]
    NotConfigured,

    #[error("Project has no client email")]
    NoRecipient,

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("Failed to send email: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Mail task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn share_message(settings: &SmtpSettings, project: &Project, url: &str) -> Result<Message, MailError> {
    let recipient = project
        .client_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or(MailError::NoRecipient)?;

    let body = format!(
        "Hello,\n\nYou can follow the progress of \"{}\" here:\n\n{}\n\nThe page shows the current phase, completed features, payments and recent activity.\n",
        project.name, url
    );

    let email = Message::builder()
        .from(settings.from.parse()?)
        .to(recipient.parse()?)
        .subject(format!("Project progress: {}", project.name))
        .singlepart(
            SinglePart::builder()
                .header(header::ContentType::TEXT_PLAIN)
                .body(body),
        )?;

    Ok(email)
}

/// Mails the share link of a project to its client
pub async fn email_share_link(config: &Config, project: &Project, url: &str) -> Result<(), MailError> {
    let settings = config.smtp().ok_or(MailError::NotConfigured)?;
    let email = share_message(&settings, project, url)?;

    let mut builder = SmtpTransport::relay(&settings.host)?;
    if let (Some(username), Some(password)) = (settings.username, settings.password) {
        builder = builder.credentials(Credentials::new(username, password));
    }
    let mailer = builder.build();

    // SmtpTransport blocks
    tokio::task::spawn_blocking(move || mailer.send(&email)).await??;
    tracing::info!(project_id = project.id, "share link emailed");

    Ok(())
}
