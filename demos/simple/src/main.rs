#[tokio::main]
async fn main() {
    cache_key_demo::main().await
}
