use crate::error::{NotifyError, Result};
use crate::utils::clean_recipients;
use crate::{EmailTransport, OutgoingEmail};
use async_trait::async_trait;
use aws_sdk_ses::error::DisplayErrorContext;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client;
use caseiro_common::aws::AwsSettings;
use std::sync::Arc;

const CHARSET: &str = "UTF-8";

/// Amazon SES (`SendEmail`) transport.
pub struct SesTransport {
    client: Client,
}

impl SesTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn connect(settings: &AwsSettings) -> Self {
        let sdk_config = settings.load().await;
        Self::new(Client::new(&sdk_config))
    }
}

fn content(data: &str) -> Result<Content> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| NotifyError::InvalidMessage(e.to_string()))
}

#[async_trait]
impl EmailTransport for SesTransport {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<()> {
        let message = Message::builder()
            .subject(content(&email.subject)?)
            .body(
                Body::builder()
                    .text(content(&email.text_body)?)
                    .html(content(&email.html_body)?)
                    .build(),
            )
            .build();

        let resp = self
            .client
            .send_email()
            .source(&email.from)
            .destination(
                Destination::builder()
                    .set_to_addresses(Some(email.to.clone()))
                    .build(),
            )
            .message(message)
            .send()
            .await
            .map_err(|e| NotifyError::provider("SES", DisplayErrorContext(&e)))?;

        tracing::info!(
            message_id = ?resp.message_id(),
            recipients = email.to.len(),
            "Email accepted by SES"
        );
        Ok(())
    }

    fn transport_name(&self) -> &str {
        "ses"
    }
}

/// Validates and sends multipart alert emails.
#[derive(Clone)]
pub struct EmailChannel {
    transport: Arc<dyn EmailTransport>,
}

impl EmailChannel {
    pub fn new(transport: Arc<dyn EmailTransport>) -> Self {
        Self { transport }
    }

    /// Sends one message carrying both bodies to every recipient.
    ///
    /// # Errors
    ///
    /// [`NotifyError::MissingSender`] or [`NotifyError::NoRecipients`] before
    /// the transport is called; [`NotifyError::Provider`] when delivery fails.
    pub async fn send(
        &self,
        sender: &str,
        recipients: &[String],
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<()> {
        let sender = sender.trim();
        if sender.is_empty() {
            return Err(NotifyError::MissingSender);
        }
        let to = clean_recipients(recipients);
        if to.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        let email = OutgoingEmail {
            from: sender.to_string(),
            to,
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            text_body: text_body.to_string(),
        };

        if let Err(e) = self.transport.deliver(&email).await {
            tracing::error!(
                transport = self.transport.transport_name(),
                error = %e,
                "Email send failed"
            );
            return Err(e);
        }

        tracing::info!(
            transport = self.transport.transport_name(),
            recipients = ?email.to,
            subject = %email.subject,
            "Email sent"
        );
        Ok(())
    }
}
