//! Email and SMS delivery for Caseiro alerts.
//!
//! Channels in [`channels`] validate their input and hand a finished message
//! to a transport: [`EmailTransport`] (Amazon SES) or [`SmsTransport`]
//! (Amazon SNS). One delivery attempt per call.

pub mod channels;
pub mod error;
pub mod template;
pub mod utils;


use async_trait::async_trait;
use error::Result;

pub use channels::email::{EmailChannel, SesTransport};
pub use channels::sms::{SmsChannel, SnsTransport};
pub use template::{AlertEmailRenderer, RenderedEmail};

/// A validated multipart email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingSms {
    pub phone_number: String,
    pub sender_id: String,
    pub message: String,
}

/// Sends a finished email through an external service.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<()>;

    /// Transport name (e.g. `"ses"`).
    fn transport_name(&self) -> &str;
}

/// Sends one SMS through an external service and returns the provider's
/// message id when it reports one.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn publish(&self, sms: &OutgoingSms) -> Result<Option<String>>;

    fn transport_name(&self) -> &str;
}
