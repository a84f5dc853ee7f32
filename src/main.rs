#[tokio::main]
async fn main() {
    meetpoint_backend::run().await;
}
