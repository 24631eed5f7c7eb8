//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = sightline_cli::run().await {
        eprintln!("sightline: {err}");
        std::process::exit(1);
    }
}
