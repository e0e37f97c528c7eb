#[tokio::main]
async fn main() {
    educms::start_server().await;
}
