use crate::domain::models::notification::{
    DeliveryOutcome, FallbackEntry, NotificationAttempt, OutboundEmail,
};
use crate::domain::ports::{FallbackLog, MailTransport};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A named transport with its own credentials.
pub struct MailChannel {
    pub name: String,
    pub transport: Arc<dyn MailTransport>,
}

/// Delivers a rendered message through an ordered list of channels,
/// falling back to the next channel when one fails and to the durable
/// fallback log when all of them do. Exhaustion is not an error: the
/// triggering business operation must never fail because email did.
pub struct NotificationDispatcher {
    channels: Vec<MailChannel>,
    fallback_log: Arc<dyn FallbackLog>,
    internal_recipient: Option<String>,
}

impl NotificationDispatcher {
    pub fn new(
        channels: Vec<MailChannel>,
        fallback_log: Arc<dyn FallbackLog>,
        internal_recipient: Option<String>,
    ) -> Self {
        Self {
            channels,
            fallback_log,
            internal_recipient,
        }
    }

    pub async fn dispatch(&self, email: OutboundEmail) -> NotificationAttempt {
        let mut channels_tried = Vec::new();

        for channel in &self.channels {
            channels_tried.push(channel.name.clone());

            match channel
                .transport
                .send(&email.recipient, &email.subject, &email.html_body)
                .await
            {
                Ok(()) => {
                    info!(
                        channel = %channel.name,
                        recipient = %email.recipient,
                        "notification delivered"
                    );
                    self.send_internal_copy(channel, &email).await;
                    return NotificationAttempt {
                        recipient: email.recipient,
                        subject: email.subject,
                        channels_tried,
                        outcome: DeliveryOutcome::Delivered {
                            channel: channel.name.clone(),
                        },
                    };
                }
                Err(e) => {
                    warn!(
                        channel = %channel.name,
                        recipient = %email.recipient,
                        error = %e,
                        "delivery failed, trying next channel"
                    );
                }
            }
        }

        let entry = FallbackEntry {
            recipient: email.recipient.clone(),
            subject: email.subject.clone(),
            html_body: email.html_body.clone(),
            booking_id: email.booking_id.clone(),
            payment_link: email.payment_link.clone(),
            queued_at: Utc::now(),
        };
        if let Err(e) = self.fallback_log.append(&entry).await {
            // Last line of defense: the undeliverable message could not
            // even be persisted. Loud log, nothing else to do.
            error!(
                recipient = %email.recipient,
                subject = %email.subject,
                error = %e,
                "failed to persist undeliverable notification to fallback log"
            );
        } else {
            warn!(
                recipient = %email.recipient,
                subject = %email.subject,
                "all channels failed, notification queued for manual delivery"
            );
        }

        NotificationAttempt {
            recipient: email.recipient,
            subject: email.subject,
            channels_tried,
            outcome: DeliveryOutcome::Manual {
                payment_link: email.payment_link,
            },
        }
    }

    /// Companion copy to the internal operator address. Failure here is
    /// logged only; it never changes the customer-facing verdict and
    /// never triggers a channel fallback on its own.
    async fn send_internal_copy(&self, channel: &MailChannel, email: &OutboundEmail) {
        let Some(internal) = &self.internal_recipient else {
            return;
        };
        let subject = format!("[copy] {}", email.subject);
        if let Err(e) = channel
            .transport
            .send(internal, &subject, &email.html_body)
            .await
        {
            warn!(
                channel = %channel.name,
                recipient = %internal,
                error = %e,
                "internal notification copy failed"
            );
        }
    }
}
