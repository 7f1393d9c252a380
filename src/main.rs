#[tokio::main]
async fn main() {
    linguamatch::start_server().await;
}
