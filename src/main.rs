//! tvremote - control TVs on the local network from the terminal

use anyhow::Result;
use tvremote::cli::{self, Cli};
use tvremote::utils::logging::init_cli_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse_args();
    init_cli_logging(args.verbose, args.quiet)?;
    cli::run(args).await
}
