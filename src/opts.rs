use std::path::PathBuf;

use structopt::StructOpt;

/// Command line options. Everything else lives in the settings file.
#[derive(StructOpt, Debug)]
#[structopt(name = "live-push", author, about)]
pub struct Opts {
    /// Log warnings and errors only
    #[structopt(short = "s", long, conflicts_with = "verbose")]
    pub silent: bool,

    /// Log requests and replies as well
    #[structopt(short = "v", long, conflicts_with = "silent")]
    pub verbose: bool,

    /// Omit timestamps from the log, e.g. when running under journald
    #[structopt(long)]
    pub suppress_log_timestamps: bool,

    /// Send a single value and exit with its status, useful to try the settings out
    #[structopt(long)]
    pub once: bool,

    /// Path to the TOML settings file
    #[structopt(parse(from_os_str), env = "LIVE_PUSH_SETTINGS", default_value = "live-push.toml")]
    pub settings: PathBuf,
}
