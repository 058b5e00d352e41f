//! Entry point.

use std::process;

use structopt::StructOpt;

use live_push::client::{HttpTransport, REQUEST_TIMEOUT};
use live_push::opts::Opts;
use live_push::prelude::*;
use live_push::reporter::Reporter;
use live_push::source::Fixed;
use live_push::{logging, settings, signal};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let opts = Opts::from_args();
    logging::init(&opts)?;

    info!("Reading settings…");
    let settings = settings::read(&opts.settings)?;
    if let Err(error) = settings.check() {
        error!("{}", error);
        process::exit(1);
    }

    info!("Endpoint: {}", settings.url);
    info!("Send interval: every {} seconds", settings.interval().as_secs());
    info!("Unit: {}", settings.unit);
    info!("API key: {}", settings.masked_api_key());

    let transport = HttpTransport::new(&settings, REQUEST_TIMEOUT)?;
    let mut reporter = Reporter::new(&settings, Fixed(settings.value), transport);

    if opts.once {
        let outcome = reporter.cycle().await;
        outcome.log();
        process::exit(if outcome.is_success() { 0 } else { 1 });
    }

    info!("Starting… (Ctrl+C to stop)");
    reporter.run(signal::shutdown()).await;

    warn!("Stopped.");
    Ok(())
}
