//! `tracing-subscriber` bootstrap: an `EnvFilter` defaulting to `info`
//! plus the standard formatting layer, matching the density the rest of
//! the workspace logs at (one span per signal processed, per fallback
//! taken, per simulation event dispatched).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
}
