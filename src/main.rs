#[tokio::main]
async fn main() -> std::io::Result<()> {
    wedding_server::run_with_config().await
}
