use ingot_conf::{SchemaVersion, assemble, default_log_config};
use ingot_core::{
    BuildContext, ConfigError, DynamicMessage, FieldDescriptor, FieldKind, FieldValue, Message,
    MessageSchema, RootAssembly, SchemaRegistry, TaggedFeatures, TypeRegistry,
};
use ingot_model::app::log;
use ingot_model::app::observatory::{BurstConfig, MultiConfig};
use ingot_model::app::proxyman::SenderConfig;
use ingot_model::transport::{tls, websocket};
use serde_json::{Value, json};

fn assemble_with(document: &Value, ctx: &BuildContext<'_>) -> Result<RootAssembly, ConfigError> {
    assemble(document, SchemaVersion::Auto, ctx)
}

fn extension_schemas() -> SchemaRegistry {
    let schemas = SchemaRegistry::new();
    schemas.register(MessageSchema::new(
        "vendor.geo.Config",
        vec![
            FieldDescriptor::new("enabled", FieldKind::Bool),
            FieldDescriptor::new("region", FieldKind::String),
            FieldDescriptor::new("ports", FieldKind::UInt).repeated(),
        ],
    ));
    schemas
}

#[test]
fn test_default_log_is_first() {
    let types = TypeRegistry::collect_all();
    let assembly = assemble_with(&json!({ "services": {} }), &BuildContext::new(&types)).unwrap();

    assert_eq!(assembly.app_types()[0], log::Config::TYPE_NAME);
    let log: log::Config = assembly.app[0].unpack().unwrap();
    assert_eq!(log, default_log_config());
}

#[test]
fn test_handlers_and_services() {
    let types = TypeRegistry::collect_all();
    let document = json!({
        "log": { "loglevel": "info" },
        "router": { "domainStrategy": "AsIs", "rules": [] },
        "inbounds": [{
            "protocol": "dokodemo-door",
            "port": 5353,
            "tag": "dns-in",
            "settings": { "address": "1.1.1.1", "port": 53, "network": "udp" }
        }],
        "outbounds": [{
            "protocol": "freedom",
            "tag": "direct",
            "streamSettings": {
                "transport": "websocket",
                "transportSettings": { "path": "/tunnel" },
                "security": "tls",
                "securitySettings": { "serverName": "example.com" }
            }
        }],
        "services": {
            "stats": {},
            "multiObservatory": {
                "observers": [
                    { "tag": "t1", "settings": { "subjectSelector": ["direct"] } },
                    { "type": "burst", "tag": "t2", "settings": {} }
                ]
            },
            "policy": { "levels": { "0": { "bufferSize": -5 } } }
        }
    });
    let assembly = assemble_with(&document, &BuildContext::new(&types)).unwrap();

    assert_eq!(
        &assembly.app_types()[4..],
        &[
            "ingot.app.router.Config",
            "ingot.app.stats.Config",
            MultiConfig::TYPE_NAME,
            "ingot.app.policy.Config",
        ]
    );

    assert_eq!(assembly.inbound[0].tag, "dns-in");
    let sender: SenderConfig = assembly
        .outbound("direct")
        .unwrap()
        .sender_settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    let stream = sender.stream_settings.unwrap();
    assert_eq!(stream.protocol_name, "websocket");
    let ws: websocket::Config = stream.transport_settings[0]
        .settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    assert_eq!(ws.path, "/tunnel");
    let tls: tls::Config = stream.security_settings[0].unpack().unwrap();
    assert_eq!(tls.server_name, "example.com");

    let multi: MultiConfig = assembly.find_app().unwrap().unwrap();
    let holders: &TaggedFeatures = &multi.holders;
    assert_eq!(holders.tags().collect::<Vec<_>>(), vec!["t1", "t2"]);
    assert!(holders.get("t2").unwrap().is::<BurstConfig>());
}

#[test]
fn test_detected_from_stream_settings() {
    let types = TypeRegistry::collect_all();
    let document = json!({
        "log": { "loglevel": "info" },
        "outbounds": [{
            "protocol": "freedom",
            "tag": "direct",
            "streamSettings": { "transport": "websocket", "transportSettings": { "path": "/tunnel" } }
        }]
    });
    let assembly = assemble_with(&document, &BuildContext::new(&types)).unwrap();

    let sender: SenderConfig = assembly
        .outbound("direct")
        .unwrap()
        .sender_settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    let stream = sender.stream_settings.unwrap();
    assert_eq!(stream.protocol_name, "websocket");
    let ws: websocket::Config = stream.transport_settings[0]
        .settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    assert_eq!(ws.path, "/tunnel");
}

#[test]
fn test_extension_service() {
    let types = TypeRegistry::collect_all();
    let schemas = extension_schemas();
    let ctx = BuildContext::new(&types).with_schemas(&schemas);

    let assembly = assemble_with(
        &json!({ "services": { "#vendor.geo.Config": { "ignored": true } } }),
        &ctx,
    )
    .unwrap();
    let envelope = assembly.app.last().unwrap();
    assert_eq!(envelope.type_name(), "vendor.geo.Config");

    let schema = schemas.schemas().into_iter().next().unwrap();
    let message = DynamicMessage::decode(&schema, envelope.payload()).unwrap();
    assert_eq!(message.get("enabled"), Some(&FieldValue::Bool(false)));
    assert_eq!(message.get("region"), Some(&FieldValue::String(String::new())));
    assert_eq!(message.get("ports"), Some(&FieldValue::List(Vec::new())));
}

#[test]
fn test_extension_without_schema() {
    let types = TypeRegistry::collect_all();
    let schemas = extension_schemas();
    let ctx = BuildContext::new(&types).with_schemas(&schemas);

    let err = assemble_with(&json!({ "services": { "#vendor.Unknown": {} } }), &ctx).unwrap_err();
    assert!(matches!(err, ConfigError::SchemaNotFound { ref name } if name == "vendor.Unknown"));
}

#[test]
fn test_duplicate_observer_tag() {
    let types = TypeRegistry::collect_all();
    let document = json!({
        "services": {
            "multiObservatory": { "observers": [{ "tag": "a" }, { "tag": "a" }] }
        }
    });
    let err = assemble_with(&document, &BuildContext::new(&types)).unwrap_err();
    assert!(matches!(err.root_cause(), ConfigError::DuplicateTag { tag, .. } if tag == "a"));
}
