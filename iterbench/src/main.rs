#[tokio::main]
async fn main() {
    if let Err(e) = iterbench::cli::run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
