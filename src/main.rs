/// Main entry point for the depth engine
///
/// Thin wrapper that delegates to `interfaces::cli`.

use depth_engine::interfaces::cli;

#[tokio::main]
async fn main() {
    if let Err(err) = cli::run().await {
        eprintln!("depth-engine: {}", err);
        std::process::exit(2);
    }
}
