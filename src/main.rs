#[tokio::main]
async fn main() {
    gigwork_backend::run().await;
}
