//! Console logger setup.

use std::io::Write;

use env_logger::fmt::Color;
use log::{Level, LevelFilter};

const CRATE_TARGET: &str = "regionlab";

/// Verbosity count from `-v` flags to a level for this crate.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Installs the stderr logger. `RUST_LOG`, when set, overrides `verbose`.
///
/// Calling this more than once keeps the first logger.
pub fn init(verbose: u8) {
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else {
        builder.filter(None, LevelFilter::Off);
        builder.filter(Some(CRATE_TARGET), level_for_verbosity(verbose));
    }

    builder.format(|buf, record| {
        let mut level_style = buf.style();
        match record.level() {
            Level::Error => level_style.set_color(Color::Red).set_bold(true),
            Level::Warn => level_style.set_color(Color::Yellow).set_bold(true),
            Level::Info => level_style.set_color(Color::Green).set_bold(true),
            Level::Debug => level_style.set_color(Color::Blue).set_bold(true),
            Level::Trace => level_style.set_color(Color::White),
        };

        writeln!(
            buf,
            "{} {}: {}",
            level_style.value(record.level()),
            record.module_path().unwrap_or(CRATE_TARGET),
            record.args()
        )
    });

    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9), LevelFilter::Debug);
    }
}
