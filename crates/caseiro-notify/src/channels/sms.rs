use crate::error::{NotifyError, Result};
use crate::{OutgoingSms, SmsTransport};
use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::types::MessageAttributeValue;
use aws_sdk_sns::Client;
use caseiro_common::aws::AwsSettings;
use std::sync::Arc;

const SENDER_ID_ATTR: &str = "AWS.SNS.SMS.SenderID";
const SMS_TYPE_ATTR: &str = "AWS.SNS.SMS.SMSType";
const SMS_TYPE: &str = "Transactional";

/// Amazon SNS (`Publish` to a phone number) transport.
pub struct SnsTransport {
    client: Client,
}

impl SnsTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn connect(settings: &AwsSettings) -> Self {
        let sdk_config = settings.load().await;
        Self::new(Client::new(&sdk_config))
    }
}

fn string_attr(value: &str) -> Result<MessageAttributeValue> {
    MessageAttributeValue::builder()
        .data_type("String")
        .string_value(value)
        .build()
        .map_err(|e| NotifyError::InvalidMessage(e.to_string()))
}

#[async_trait]
impl SmsTransport for SnsTransport {
    async fn publish(&self, sms: &OutgoingSms) -> Result<Option<String>> {
        let resp = self
            .client
            .publish()
            .phone_number(&sms.phone_number)
            .message(&sms.message)
            .message_attributes(SENDER_ID_ATTR, string_attr(&sms.sender_id)?)
            .message_attributes(SMS_TYPE_ATTR, string_attr(SMS_TYPE)?)
            .send()
            .await
            .map_err(|e| NotifyError::provider("SNS", DisplayErrorContext(&e)))?;

        Ok(resp.message_id().map(str::to_string))
    }

    fn transport_name(&self) -> &str {
        "sns"
    }
}

/// Sends alert text by SMS to one configured destination.
#[derive(Clone)]
pub struct SmsChannel {
    transport: Arc<dyn SmsTransport>,
    sender_id: String,
    destination: String,
}

impl SmsChannel {
    pub fn new(transport: Arc<dyn SmsTransport>, sender_id: &str, destination: &str) -> Self {
        Self {
            transport,
            sender_id: sender_id.to_string(),
            destination: destination.to_string(),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub async fn send(&self, message: &str) -> Result<Option<String>> {
        if self.destination.trim().is_empty() {
            return Err(NotifyError::MissingDestination);
        }

        let sms = OutgoingSms {
            phone_number: self.destination.trim().to_string(),
            sender_id: self.sender_id.clone(),
            message: message.to_string(),
        };

        match self.transport.publish(&sms).await {
            Ok(message_id) => {
                tracing::info!(
                    transport = self.transport.transport_name(),
                    message_id = ?message_id,
                    "SMS sent successfully"
                );
                Ok(message_id)
            }
            Err(e) => {
                tracing::error!(
                    transport = self.transport.transport_name(),
                    error = %e,
                    "Failed to send SMS"
                );
                Err(e)
            }
        }
    }
}
