use ingot_conf::{SchemaVersion, assemble};
use ingot_core::{BuildContext, ConfigError, Message, RootAssembly, TypeRegistry};
use ingot_model::app::log::{self, LogType, Severity};
use ingot_model::app::proxyman::{AllocationType, ReceiverConfig, SenderConfig};
use ingot_model::app::router::{self, RuleTarget};
use ingot_model::common::{Cidr, PortRange, SecurityType};
use ingot_model::proxy::{blackhole, dns, freedom, vmess};
use ingot_model::transport::{http, tls, websocket};
use serde_json::{Value, json};

fn assemble_v4(document: &Value) -> Result<RootAssembly, ConfigError> {
    let types = TypeRegistry::collect_all();
    assemble(document, SchemaVersion::Auto, &BuildContext::new(&types))
}

fn full_document() -> Value {
    let inbound_stream = json!({
        "network": "ws",
        "wsSettings": { "headers": { "host": "example.domain" }, "path": "" },
        "tlsSettings": { "alpn": "h2" },
        "security": "tls"
    });
    let clients = json!([{
        "alterId": 100,
        "security": "aes-128-gcm",
        "id": "0cdf8a45-303d-4fed-9780-29aa7f54175e"
    }]);
    json!({
        "outbound": { "protocol": "freedom", "settings": {} },
        "log": {
            "access": "/var/log/ingot/access.log",
            "loglevel": "error",
            "error": "/var/log/ingot/error.log"
        },
        "inbound": {
            "streamSettings": inbound_stream,
            "protocol": "vmess",
            "port": 443,
            "settings": { "clients": clients }
        },
        "inbounds": [{
            "streamSettings": inbound_stream,
            "protocol": "vmess",
            "port": "443-500",
            "allocate": { "strategy": "random", "concurrency": 3 },
            "settings": { "clients": clients }
        }],
        "outboundDetour": [
            { "tag": "blocked", "protocol": "blackhole" },
            { "protocol": "dns" }
        ],
        "routing": {
            "strategy": "rules",
            "settings": {
                "rules": [{ "ip": ["10.0.0.0/8"], "type": "field", "outboundTag": "blocked" }]
            }
        },
        "transport": { "httpSettings": { "path": "/test" } }
    })
}

#[test]
fn test_app_modules() {
    let assembly = assemble_v4(&full_document()).unwrap();

    assert_eq!(
        assembly.app_types(),
        vec![
            log::Config::TYPE_NAME,
            "ingot.app.dispatcher.Config",
            "ingot.app.proxyman.InboundConfig",
            "ingot.app.proxyman.OutboundConfig",
            router::Config::TYPE_NAME,
        ]
    );

    let log: log::Config = assembly.app[0].unpack().unwrap();
    let error = log.error.unwrap();
    assert_eq!(error.kind, LogType::File);
    assert_eq!(error.level, Severity::Error);
    assert_eq!(error.path, "/var/log/ingot/error.log");
    let access = log.access.unwrap();
    assert_eq!(access.kind, LogType::File);
    assert_eq!(access.path, "/var/log/ingot/access.log");

    let router: router::Config = assembly.find_app().unwrap().unwrap();
    assert_eq!(router.rule.len(), 1);
    assert_eq!(router.rule[0].target, RuleTarget::Tag("blocked".into()));
    assert_eq!(
        router.rule[0].cidr,
        vec![Cidr {
            ip: vec![10, 0, 0, 0],
            prefix: 8
        }]
    );
}

#[test]
fn test_outbounds_receive_global_transport() {
    let assembly = assemble_v4(&full_document()).unwrap();
    assert_eq!(assembly.outbound.len(), 3);

    let first = &assembly.outbound[0];
    let sender: SenderConfig = first.sender_settings.as_ref().unwrap().unpack().unwrap();
    let stream = sender.stream_settings.unwrap();
    assert_eq!(stream.protocol_name, "tcp");
    assert_eq!(stream.transport_settings.len(), 1);
    assert_eq!(stream.transport_settings[0].protocol_name, "http");
    let http: http::Config = stream.transport_settings[0]
        .settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    assert_eq!(http.path, "/test");

    let freedom: freedom::Config = first.proxy_settings.as_ref().unwrap().unpack().unwrap();
    assert_eq!(freedom, freedom::Config::default());

    let blocked = assembly.outbound("blocked").unwrap();
    let blackhole: blackhole::Config = blocked.proxy_settings.as_ref().unwrap().unpack().unwrap();
    assert!(blackhole.response.is_none());

    assert!(assembly.outbound[2].proxy_settings.as_ref().unwrap().is::<dns::Config>());
}

#[test]
fn test_inbound_stream_and_users() {
    let assembly = assemble_v4(&full_document()).unwrap();
    assert_eq!(assembly.inbound.len(), 2);

    let receiver: ReceiverConfig = assembly.inbound[0]
        .receiver_settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    assert_eq!(receiver.port_range, Some(PortRange::single(443)));
    let stream = receiver.stream_settings.unwrap();
    assert_eq!(stream.protocol_name, "websocket");
    let protocols: Vec<_> = stream
        .transport_settings
        .iter()
        .map(|t| t.protocol_name.as_str())
        .collect();
    assert_eq!(protocols, vec!["websocket", "http"]);
    let ws: websocket::Config = stream.transport_settings[0]
        .settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    assert_eq!(ws.header[0].key, "host");
    assert_eq!(ws.header[0].value, "example.domain");
    assert_eq!(stream.security_type, tls::Config::TYPE_NAME);
    let tls: tls::Config = stream.security_settings[0].unpack().unwrap();
    assert_eq!(tls.next_protocol, vec!["h2"]);

    let proxy: vmess::inbound::Config = assembly.inbound[0]
        .proxy_settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    let account: vmess::Account = proxy.user[0].account.as_ref().unwrap().unpack().unwrap();
    assert_eq!(account.id, "0cdf8a45-303d-4fed-9780-29aa7f54175e");
    assert_eq!(account.alter_id, 100);
    assert_eq!(account.security_settings.unwrap().kind, SecurityType::Aes128Gcm);

    let receiver: ReceiverConfig = assembly.inbound[1]
        .receiver_settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    assert_eq!(receiver.port_range, Some(PortRange { from: 443, to: 500 }));
    let allocation = receiver.allocation_strategy.unwrap();
    assert_eq!(allocation.kind, AllocationType::Random);
    assert_eq!(allocation.concurrency, Some(3));
}

#[test]
fn test_without_global_transport() {
    let assembly = assemble_v4(&json!({ "outbound": { "protocol": "freedom" } })).unwrap();
    let sender: SenderConfig = assembly.outbound[0]
        .sender_settings
        .as_ref()
        .unwrap()
        .unpack()
        .unwrap();
    assert!(sender.stream_settings.is_none());
}

#[test]
fn test_failure_yields_no_assembly() {
    let mut document = full_document();
    document["inbounds"][0]["settings"]["clients"][0]["id"] = json!("not-a-uuid");

    let err = assemble_v4(&document).unwrap_err();
    assert!(
        matches!(err.root_cause(), ConfigError::FieldValidation { field, .. } if field == "id")
    );
}
