use crate::config::Config;
use crate::domain::models::booking::{Booking, BookingDraft, BookingStatus, PaymentStatus};
use crate::domain::models::notification::{NotificationAttempt, OutboundEmail};
use crate::domain::models::payment::{PaymentIntent, PaymentKind};
use crate::domain::ports::{BookingRepository, PaymentGateway};
use crate::domain::services::dispatcher::NotificationDispatcher;
use crate::domain::services::pricing;
use crate::error::AppError;
use std::sync::Arc;
use tera::{Context, Tera};
use tracing::{info, warn};

/// Owns every status / payment-status transition. Handlers never write
/// booking state directly; they go through this service so the state
/// machine is enforced in exactly one place.
pub struct LifecycleService {
    repo: Arc<dyn BookingRepository>,
    gateway: Arc<dyn PaymentGateway>,
    dispatcher: Arc<NotificationDispatcher>,
    templates: Arc<Tera>,
    config: Config,
}

impl LifecycleService {
    pub fn new(
        repo: Arc<dyn BookingRepository>,
        gateway: Arc<dyn PaymentGateway>,
        dispatcher: Arc<NotificationDispatcher>,
        templates: Arc<Tera>,
        config: Config,
    ) -> Self {
        Self {
            repo,
            gateway,
            dispatcher,
            templates,
            config,
        }
    }

    pub async fn submit_inquiry(&self, draft: BookingDraft) -> Result<Booking, AppError> {
        let booking = Booking::from_draft(draft)?;
        let created = self.repo.create(&booking).await?;
        info!(booking_id = %created.id, package = %created.package_name, "booking inquiry received");

        let ctx = self.booking_context(&created);
        self.send_booking_email(
            &created.customer_email,
            &created,
            "inquiry_received.html",
            "We received your booking inquiry",
            ctx,
            None,
        )
        .await;

        Ok(created)
    }

    /// Sends an informational quote for an open inquiry and marks the
    /// booking `quote_sent`.
    pub async fn send_quote(
        &self,
        id: &str,
    ) -> Result<(Booking, Option<NotificationAttempt>), AppError> {
        let updated = self
            .transition(id, &[BookingStatus::Inquiry], BookingStatus::QuoteSent)
            .await?;
        info!(booking_id = %updated.id, "quote sent");

        let mut ctx = self.booking_context(&updated);
        ctx.insert("quote_number", &pricing::quote_number());
        let attempt = self
            .send_booking_email(
                &updated.customer_email,
                &updated,
                "quote.html",
                "Your event quote",
                ctx,
                None,
            )
            .await;

        Ok((updated, attempt))
    }

    /// Confirms an inquiry and asks the customer for the deposit. The
    /// payment link embeds the booking id, the deposit amount and the
    /// payment-type marker.
    pub async fn confirm(
        &self,
        id: &str,
    ) -> Result<(Booking, Option<NotificationAttempt>), AppError> {
        let updated = self
            .transition(id, BookingStatus::CONFIRMABLE, BookingStatus::Confirmed)
            .await?;
        info!(booking_id = %updated.id, "booking confirmed");

        let link = self.payment_link(&updated, PaymentKind::Deposit);
        let mut ctx = self.booking_context(&updated);
        ctx.insert("payment_link", &link);
        let attempt = self
            .send_booking_email(
                &updated.customer_email,
                &updated,
                "payment_request.html",
                "Booking confirmed: deposit payment required",
                ctx,
                Some(link),
            )
            .await;

        Ok((updated, attempt))
    }

    /// Declines an open inquiry. The rejection notice is best-effort;
    /// the state change stands regardless of delivery.
    pub async fn reject(&self, id: &str) -> Result<Booking, AppError> {
        let updated = self
            .transition(id, BookingStatus::CONFIRMABLE, BookingStatus::Cancelled)
            .await?;
        info!(booking_id = %updated.id, "booking rejected");

        let ctx = self.booking_context(&updated);
        self.send_booking_email(
            &updated.customer_email,
            &updated,
            "booking_rejected.html",
            "Update on your booking request",
            ctx,
            None,
        )
        .await;

        Ok(updated)
    }

    pub async fn cancel(&self, id: &str) -> Result<Booking, AppError> {
        let updated = self
            .transition(id, BookingStatus::CANCELLABLE, BookingStatus::Cancelled)
            .await?;
        info!(booking_id = %updated.id, "booking cancelled");
        Ok(updated)
    }

    /// Operator moves a confirmed booking through `in_progress` to
    /// `completed`, one step per call.
    pub async fn advance(&self, id: &str) -> Result<Booking, AppError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

        let (from, to) = match current.booking_status() {
            Some(BookingStatus::Confirmed) => (BookingStatus::Confirmed, BookingStatus::InProgress),
            Some(BookingStatus::InProgress) => (BookingStatus::InProgress, BookingStatus::Completed),
            _ => {
                return Err(AppError::InvalidTransition(format!(
                    "Cannot advance booking from status '{}'",
                    current.status
                )))
            }
        };

        self.transition(id, &[from], to).await
    }

    /// Marks a paid booking refunded. The money movement itself happens
    /// in the gateway dashboard; this records the outcome.
    pub async fn refund(&self, id: &str) -> Result<Booking, AppError> {
        let applied = self
            .repo
            .apply_payment(
                id,
                &[PaymentStatus::DepositPaid, PaymentStatus::FullyPaid],
                PaymentStatus::Refunded,
                None,
            )
            .await?;

        match applied {
            Some(updated) => {
                info!(booking_id = %updated.id, "booking refunded");
                Ok(updated)
            }
            None => {
                let current = self
                    .repo
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;
                Err(AppError::InvalidTransition(format!(
                    "Cannot refund booking with payment status '{}'",
                    current.payment_status
                )))
            }
        }
    }

    /// Validates a gateway-reported payment and applies it to the
    /// booking. The store update is the authoritative event: the receipt
    /// notification afterwards is fire-and-log and never rolls it back.
    /// Repeating the call with an already-applied intent is a no-op.
    pub async fn record_payment_success(
        &self,
        payment_intent_id: &str,
        booking_id: &str,
    ) -> Result<(Booking, PaymentIntent), AppError> {
        let booking = self
            .repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

        let intent = self.gateway.retrieve_intent(payment_intent_id).await?;
        if !intent.succeeded() {
            return Err(AppError::PaymentNotSucceeded(format!(
                "Payment intent {} has status '{}'",
                intent.id, intent.status
            )));
        }
        if let Some(meta_id) = intent.booking_id() {
            if meta_id != booking_id {
                return Err(AppError::Validation(
                    "Payment intent does not belong to this booking".into(),
                ));
            }
        }

        let kind = PaymentKind::from_marker(intent.payment_type().unwrap_or("deposit"));
        let target = match kind {
            PaymentKind::Deposit => PaymentStatus::DepositPaid,
            PaymentKind::Final => PaymentStatus::FullyPaid,
        };

        // Amount is correlated but not enforced; a mismatch only shows
        // up in the logs.
        let expected_minor = match (kind, booking.current_payment_status()) {
            (PaymentKind::Deposit, _) => booking.deposit_amount * 100,
            (PaymentKind::Final, Some(PaymentStatus::DepositPaid)) => {
                booking.remaining_amount * 100
            }
            (PaymentKind::Final, _) => booking.total_amount * 100,
        };
        if intent.amount != expected_minor {
            warn!(
                booking_id,
                intent_id = %intent.id,
                amount = intent.amount,
                expected = expected_minor,
                "payment amount does not match the amount expected for this booking"
            );
        }

        let from: &[PaymentStatus] = match target {
            PaymentStatus::DepositPaid => &[PaymentStatus::Pending],
            _ => &[PaymentStatus::Pending, PaymentStatus::DepositPaid],
        };

        let updated = match self
            .repo
            .apply_payment(booking_id, from, target, Some(&intent.id))
            .await?
        {
            Some(updated) => {
                info!(
                    booking_id,
                    intent_id = %intent.id,
                    payment_status = %target,
                    "payment recorded"
                );

                let mut ctx = self.booking_context(&updated);
                ctx.insert("amount_paid", &(intent.amount / 100));
                self.send_booking_email(
                    &updated.customer_email,
                    &updated,
                    "payment_received.html",
                    "Payment received",
                    ctx,
                    None,
                )
                .await;

                updated
            }
            None => {
                let current = self
                    .repo
                    .find_by_id(booking_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;
                let current_status = current.current_payment_status().ok_or(AppError::Internal)?;

                if current_status == PaymentStatus::Refunded {
                    return Err(AppError::InvalidTransition(
                        "Booking has been refunded; a payment cannot be re-applied".into(),
                    ));
                }
                if current_status.rank() >= target.rank() {
                    // Repeat confirmation of an already-applied payment.
                    info!(booking_id, intent_id = %intent.id, "payment already recorded, skipping");
                    current
                } else {
                    return Err(AppError::InvalidTransition(format!(
                        "Cannot apply {} payment to booking with payment status '{}'",
                        target, current.payment_status
                    )));
                }
            }
        };

        Ok((updated, intent))
    }

    /// Renders and dispatches a payment reminder for whatever amount is
    /// still outstanding.
    pub async fn send_payment_reminder(
        &self,
        booking_id: &str,
        recipient_override: Option<String>,
    ) -> Result<NotificationAttempt, AppError> {
        let booking = self
            .repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

        let kind = match booking.current_payment_status() {
            Some(PaymentStatus::Pending) => PaymentKind::Deposit,
            Some(PaymentStatus::DepositPaid) => PaymentKind::Final,
            Some(PaymentStatus::FullyPaid) => {
                return Err(AppError::Validation("Booking is already fully paid".into()))
            }
            Some(PaymentStatus::Refunded) => {
                return Err(AppError::Validation("Booking has been refunded".into()))
            }
            None => return Err(AppError::Internal),
        };

        let link = self.payment_link(&booking, kind);
        let amount_due = match kind {
            PaymentKind::Deposit => booking.deposit_amount,
            PaymentKind::Final => booking.remaining_amount,
        };

        let mut ctx = self.booking_context(&booking);
        ctx.insert("payment_link", &link);
        ctx.insert("amount_due", &amount_due);
        let body = self.render("payment_reminder.html", &ctx)?;

        let recipient = recipient_override.unwrap_or_else(|| booking.customer_email.clone());
        let attempt = self
            .dispatcher
            .dispatch(OutboundEmail {
                recipient,
                subject: "Payment reminder for your upcoming event".to_string(),
                html_body: body,
                booking_id: Some(booking.id.clone()),
                payment_link: Some(link),
            })
            .await;

        Ok(attempt)
    }

    pub fn payment_link(&self, booking: &Booking, kind: PaymentKind) -> String {
        let amount = match kind {
            PaymentKind::Deposit => booking.deposit_amount,
            PaymentKind::Final => booking.remaining_amount,
        };
        format!(
            "{}/booking/payment?bookingId={}&amount={}&type={}",
            self.config.public_base_url.trim_end_matches('/'),
            booking.id,
            amount,
            kind.as_str()
        )
    }

    async fn transition(
        &self,
        id: &str,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> Result<Booking, AppError> {
        match self.repo.transition_status(id, from, to).await? {
            Some(updated) => Ok(updated),
            None => {
                let current = self
                    .repo
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;
                Err(AppError::InvalidTransition(format!(
                    "Cannot move booking from '{}' to '{}'",
                    current.status,
                    to.as_str()
                )))
            }
        }
    }

    fn booking_context(&self, booking: &Booking) -> Context {
        let mut ctx = Context::new();
        ctx.insert("customer_name", &booking.customer_name);
        ctx.insert("event_type", &booking.event_type);
        ctx.insert("event_date", &booking.event_date.format("%Y-%m-%d").to_string());
        ctx.insert("guest_count", &booking.guest_count);
        ctx.insert("package_name", &booking.package_name);
        ctx.insert("total_amount", &booking.total_amount);
        ctx.insert("deposit_amount", &booking.deposit_amount);
        ctx.insert("remaining_amount", &booking.remaining_amount);
        ctx
    }

    fn render(&self, template: &str, ctx: &Context) -> Result<String, AppError> {
        self.templates
            .render(template, ctx)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error ({}): {:?}", template, e)))
    }

    /// Renders and dispatches. A render failure is logged and swallowed
    /// so a broken template can never block a state transition.
    async fn send_booking_email(
        &self,
        recipient: &str,
        booking: &Booking,
        template: &str,
        subject: &str,
        ctx: Context,
        payment_link: Option<String>,
    ) -> Option<NotificationAttempt> {
        let body = match self.render(template, &ctx) {
            Ok(body) => body,
            Err(e) => {
                warn!(booking_id = %booking.id, template, error = %e, "skipping notification");
                return None;
            }
        };

        let attempt = self
            .dispatcher
            .dispatch(OutboundEmail {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                html_body: body,
                booking_id: Some(booking.id.clone()),
                payment_link,
            })
            .await;

        if !attempt.outcome.is_delivered() {
            warn!(
                booking_id = %booking.id,
                subject,
                "notification queued for manual delivery"
            );
        }

        Some(attempt)
    }
}
