use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult, TypedEnvelope};
use ingot_macros::register_builder;
use ingot_model::proxy::blackhole::{Config, HttpResponse, NoneResponse};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponseSettings {
    #[serde(rename = "type")]
    pub kind: String,
}

#[register_builder(category = "outbound", name = "blackhole")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlackholeSettings {
    pub response: Option<ResponseSettings>,
}

impl Buildable for BlackholeSettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        let response = match &self.response {
            None => None,
            Some(response) => Some(match response.kind.to_ascii_lowercase().as_str() {
                "" | "none" => TypedEnvelope::from_message(&NoneResponse {})?,
                "http" => TypedEnvelope::from_message(&HttpResponse {})?,
                other => {
                    return Err(ConfigError::validation(
                        "response",
                        "BlackholeSettings",
                        format!("unknown response type '{other}'"),
                    ));
                }
            }),
        };
        Ok(Config { response })
    }
}

#[cfg(test)]
mod tests {
    use ingot_core::TypeRegistry;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_response_types() {
        let types = TypeRegistry::new();
        let ctx = BuildContext::new(&types);

        let settings: BlackholeSettings = serde_json::from_value(json!({})).unwrap();
        assert!(settings.build(&ctx).unwrap().response.is_none());

        let settings: BlackholeSettings =
            serde_json::from_value(json!({ "response": { "type": "http" } })).unwrap();
        let response = settings.build(&ctx).unwrap().response.unwrap();
        assert!(response.is::<HttpResponse>());

        let settings: BlackholeSettings =
            serde_json::from_value(json!({ "response": { "type": "teapot" } })).unwrap();
        assert!(settings.build(&ctx).is_err());
    }
}
