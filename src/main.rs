#[tokio::main]
async fn main() {
    if let Err(e) = pixelpipe::run().await {
        eprintln!("pixelpipe: {e}");
        std::process::exit(1);
    }
}
