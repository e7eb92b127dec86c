use crate::domain::{
    models::booking::{Booking, BookingStatus, PaymentStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use crate::infra::repositories::{payment_set, status_set};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, customer_name, customer_email, customer_phone, event_type, event_date, guest_count, message, package_name, add_ons, total_amount, deposit_amount, remaining_amount, status, payment_status, payment_intent_id, admin_notes, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.customer_phone)
            .bind(&booking.event_type).bind(booking.event_date).bind(booking.guest_count).bind(&booking.message)
            .bind(&booking.package_name).bind(&booking.add_ons).bind(booking.total_amount).bind(booking.deposit_amount)
            .bind(booking.remaining_amount).bind(&booking.status).bind(&booking.payment_status)
            .bind(&booking.payment_intent_id).bind(&booking.admin_notes).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: BookingStatus) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE status = $1 ORDER BY created_at DESC")
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_notes(&self, id: &str, notes: Option<&str>) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET admin_notes = $1, updated_at = $2 WHERE id = $3 RETURNING *"
        )
            .bind(notes)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn transition_status(
        &self,
        id: &str,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError> {
        let sql = format!(
            "UPDATE bookings SET status = $1, updated_at = $2 WHERE id = $3 AND status IN ({}) RETURNING *",
            status_set(from)
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(to.as_str())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn apply_payment(
        &self,
        id: &str,
        from: &[PaymentStatus],
        to: PaymentStatus,
        payment_intent_id: Option<&str>,
    ) -> Result<Option<Booking>, AppError> {
        let sql = format!(
            "UPDATE bookings SET payment_status = $1, payment_intent_id = COALESCE($2, payment_intent_id),
                 status = CASE WHEN status IN ('inquiry', 'quote_sent') THEN 'confirmed' ELSE status END,
                 updated_at = $3
             WHERE id = $4 AND payment_status IN ({})
             RETURNING *",
            payment_set(from)
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(to.as_str())
            .bind(payment_intent_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
