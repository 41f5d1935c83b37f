use ingot_core::{BuildContext, Buildable, ConfigResult};
use ingot_macros::register_builder;
use ingot_model::app::log::{Config, LogSpecification, LogType, Severity};
use serde::Deserialize;

/// `log` settings: access/error destinations and the error level.
///
/// An empty path logs to the console, `"none"` disables the stream.
#[register_builder(category = "service", name = "log")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogSettings {
    pub access: String,
    pub error: String,
    pub loglevel: String,
}

fn destination(path: &str) -> (LogType, String) {
    match path {
        "" => (LogType::Console, String::new()),
        "none" => (LogType::None, String::new()),
        path => (LogType::File, path.to_string()),
    }
}

impl Buildable for LogSettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        let (kind, path) = destination(&self.access);
        let access = LogSpecification {
            kind,
            level: Severity::Unknown,
            path,
        };

        let (mut kind, path) = destination(&self.error);
        let level = if self.loglevel.eq_ignore_ascii_case("none") {
            kind = LogType::None;
            Severity::Unknown
        } else {
            Severity::from_name(&self.loglevel).unwrap_or(Severity::Warning)
        };
        let error = LogSpecification { kind, level, path };

        Ok(Config {
            error: Some(error),
            access: Some(access),
        })
    }
}

/// The log module used when a document has no `log` block.
pub fn default_log_config() -> Config {
    Config {
        error: Some(LogSpecification {
            kind: LogType::Console,
            level: Severity::Warning,
            path: String::new(),
        }),
        access: Some(LogSpecification {
            kind: LogType::None,
            level: Severity::Unknown,
            path: String::new(),
        }),
    }
}
