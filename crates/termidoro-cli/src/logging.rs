use std::fs;

use termidoro_core::storage::log_dir;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Map a `--log-level` value onto a tracing level. Unknown names fall back
/// to INFO with a warning on stderr.
fn parse_level(s: &str) -> tracing::Level {
    match s.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        _ => {
            eprintln!("Warning: Unknown log-level '{s}', defaulting to INFO");
            tracing::Level::INFO
        }
    }
}

/// Send logs to `<config dir>/logs/termidoro.log`. The terminal belongs to
/// the renderer, so nothing is logged to stdout or stderr.
///
/// Level priority: `--log-level` > `RUST_LOG` > INFO.
pub fn setup_logging(cli_log_level: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let path = log_dir()?.join("termidoro.log");
    let log_file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = match cli_log_level {
        Some(s) => EnvFilter::default().add_directive(parse_level(s).into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| e.to_string())?;

    info!(path = %path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(parse_level("debug"), tracing::Level::DEBUG);
        assert_eq!(parse_level("Warning"), tracing::Level::WARN);
        assert_eq!(parse_level("TRACE"), tracing::Level::TRACE);
    }

    #[test]
    fn unknown_level_defaults_to_info() {
        assert_eq!(parse_level("chatty"), tracing::Level::INFO);
    }
}
