//! Logging setup for the `ingot` binary.
//!
//! Everything goes to stderr: stdout carries the binary or text output of
//! the subcommands and must stay clean.
//!
//! ```rust,ignore
//! LoggingBuilder::new()
//!     .with_level(tracing::Level::DEBUG)
//!     .directive("ingot_conf=trace")
//!     .init();
//! ```

use std::fmt as std_fmt;
use std::str::FromStr;

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    #[cfg(feature = "json-log")]
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            "pretty" => Ok(Self::Pretty),
            #[cfg(feature = "json-log")]
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl std_fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        match self {
            Self::Compact => f.write_str("compact"),
            Self::Full => f.write_str("full"),
            Self::Pretty => f.write_str("pretty"),
            #[cfg(feature = "json-log")]
            Self::Json => f.write_str("json"),
        }
    }
}

/// A builder for configuring logging.
#[derive(Debug)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: tracing::Level,
    format: LogFormat,
    with_target: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
            level: tracing::Level::WARN,
            format: LogFormat::Compact,
            with_target: true,
        }
    }

    /// Maps a `-v` count onto a level: 0 warn, 1 info, 2 debug, 3+ trace.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };
        Self::new().with_level(level)
    }

    /// Set the global log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    /// Add a filter directive such as `ingot_conf=debug`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    fn build_filter(&self) -> EnvFilter {
        let base_filter = self.level.to_string().to_lowercase();

        // RUST_LOG takes precedence over the level
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base_filter));

        for directive in &self.directives {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }

        filter
    }

    /// Initialize the logging system, ignoring a subscriber already set.
    pub fn init(self) {
        let _ = self.try_init();
    }

    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();

        macro_rules! init_layer {
            ($layer:expr) => {
                tracing_subscriber::registry()
                    .with($layer.with_target(self.with_target).with_writer(std::io::stderr))
                    .with(filter)
                    .try_init()
            };
        }

        match self.format {
            LogFormat::Compact => init_layer!(fmt::layer().compact()),
            LogFormat::Full => init_layer!(fmt::layer()),
            LogFormat::Pretty => init_layer!(fmt::layer().pretty()),
            #[cfg(feature = "json-log")]
            LogFormat::Json => init_layer!(fmt::layer().json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LoggingBuilder::from_verbosity(0).level, tracing::Level::WARN);
        assert_eq!(LoggingBuilder::from_verbosity(2).level, tracing::Level::DEBUG);
        assert_eq!(LoggingBuilder::from_verbosity(9).level, tracing::Level::TRACE);
    }

    #[test]
    fn test_directives_and_target() {
        let builder = LoggingBuilder::new()
            .directive("ingot_conf=trace")
            .with_target(false);
        assert_eq!(builder.directives, vec!["ingot_conf=trace"]);
        assert!(!builder.with_target);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
