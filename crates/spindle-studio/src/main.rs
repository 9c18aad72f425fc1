use anyhow::Context;

use spindle_engine::logging::{init_logging, LoggingConfig};
use spindle_lines::{LinesApp, LinesConfig};

/// Overrides the actor count.
const COUNT_VAR: &str = "SPINDLE_LINES";

fn actor_count() -> anyhow::Result<Option<usize>> {
    match std::env::var(COUNT_VAR) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{COUNT_VAR}={raw:?} is not a valid actor count")),
        Err(_) => Ok(None),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = LinesConfig::default();
    match actor_count() {
        Ok(Some(count)) => config = config.count(count),
        Ok(None) => {}
        Err(e) => log::warn!("{e:#}; using {}", config.count),
    }

    LinesApp::new(config)
        .title("Spindle Studio")
        .size(800.0, 800.0)
        .run()
}
