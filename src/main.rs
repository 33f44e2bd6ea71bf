#[tokio::main]
async fn main() {
    if let Err(e) = groot_lib::run().await {
        tracing::error!("{e}");
        eprintln!("groot: {e}");
        std::process::exit(1);
    }
}
