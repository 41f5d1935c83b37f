use ingot_model::app::proxyman::MultiplexingConfig;
use serde::Deserialize;

/// Outbound multiplexing. A negative concurrency disables the block and zero
/// picks the default of 8.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MuxSettings {
    pub enabled: bool,
    pub concurrency: i16,
}

impl MuxSettings {
    pub fn build(&self) -> Option<MultiplexingConfig> {
        let concurrency = match self.concurrency {
            c if c < 0 => return None,
            0 => 8,
            c => u32::from(c.unsigned_abs()),
        };
        Some(MultiplexingConfig {
            enabled: self.enabled,
            concurrency,
        })
    }
}
