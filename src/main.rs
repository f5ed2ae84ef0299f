use anyhow::Result;
use tracing::{debug, error};

mod cli;
mod html;
mod http;
mod storage;
mod task;
mod utils;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = cli::parse_args();

    // Initialize logging
    utils::init_logging(args.verbose, args.log_file.clone())?;

    debug!("Starting aoc-scraper v{}", env!("CARGO_PKG_VERSION"));

    match cli::process_command(args).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
