#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    venue_booking_backend::run().await;
}
