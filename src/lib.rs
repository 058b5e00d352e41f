//! Periodically reads a measurement and pushes it to a live data endpoint.

pub mod client;
pub mod logging;
pub mod opts;
pub mod outcome;
pub mod prelude;
pub mod reporter;
pub mod settings;
pub mod signal;
pub mod source;
pub mod transport;
