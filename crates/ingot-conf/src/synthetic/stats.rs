use ingot_core::{BuildContext, Buildable, ConfigResult};
use ingot_macros::register_builder;
use ingot_model::app::stats::Config;
use serde::Deserialize;

#[register_builder(category = "service", name = "stats")]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsSettings {}

impl Buildable for StatsSettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        Ok(Config {})
    }
}
