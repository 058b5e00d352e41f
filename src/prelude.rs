pub use anyhow::{anyhow, Context};
pub use chrono::{DateTime, Local};
pub use log::{debug, error, info, warn};
pub use serde::{Deserialize, Serialize};
pub use std::time::Duration;

pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
