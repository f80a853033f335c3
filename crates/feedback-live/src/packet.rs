//! Engine.IO v4 / socket.io v5 text packets
//!
//! Only the packets a listening client needs are decoded. Binary
//! attachments and acknowledgements are not used by the backend.

use serde_json::Value;

use crate::error::{LiveError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Engine.IO handshake with session parameters
    Open(Value),
    Close,
    Ping,
    Pong,
    Noop,
    /// socket.io namespace connected
    Connect,
    /// socket.io namespace disconnected by the server
    Disconnect,
    Event { event: String, payload: Value },
    ConnectError(String),
    /// Packet types this client does not act on
    Other(String),
}

impl Packet {
    pub fn parse(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        let engine_type = chars
            .next()
            .ok_or_else(|| LiveError::Protocol("empty frame".to_string()))?;
        let rest = chars.as_str();

        match engine_type {
            '0' => Ok(Packet::Open(serde_json::from_str(rest)?)),
            '1' => Ok(Packet::Close),
            '2' => Ok(Packet::Ping),
            '3' => Ok(Packet::Pong),
            '4' => parse_socket(rest),
            '6' => Ok(Packet::Noop),
            _ => Ok(Packet::Other(text.to_string())),
        }
    }
}

fn parse_socket(text: &str) -> Result<Packet> {
    let mut chars = text.chars();
    let socket_type = chars
        .next()
        .ok_or_else(|| LiveError::Protocol("empty socket.io packet".to_string()))?;
    let body = strip_namespace(chars.as_str());

    match socket_type {
        '0' => Ok(Packet::Connect),
        '1' => Ok(Packet::Disconnect),
        '2' => parse_event(body.trim_start_matches(|c: char| c.is_ascii_digit())),
        '4' => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| body.to_string());
            Ok(Packet::ConnectError(message))
        }
        _ => Ok(Packet::Other(format!("4{}", text))),
    }
}

/// Drop a `/namespace,` prefix; the default namespace has none
fn strip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        match body.find(',') {
            Some(idx) => &body[idx + 1..],
            None => "",
        }
    } else {
        body
    }
}

fn parse_event(body: &str) -> Result<Packet> {
    let args: Vec<Value> = serde_json::from_str(body)?;
    let mut args = args.into_iter();

    let event = match args.next() {
        Some(Value::String(name)) => name,
        _ => return Err(LiveError::Protocol("event packet without a name".to_string())),
    };
    let payload = args.next().unwrap_or(Value::Null);

    Ok(Packet::Event { event, payload })
}

/// Namespace connect request, carrying the auth payload when present
pub fn connect_packet(auth: Option<&Value>) -> String {
    match auth {
        Some(auth) => format!("40{}", auth),
        None => "40".to_string(),
    }
}

pub const PONG: &str = "3";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_open() {
        let packet = Packet::parse(r#"0{"sid":"abc","pingInterval":25000,"pingTimeout":20000}"#)
            .unwrap();
        match packet {
            Packet::Open(params) => assert_eq!(params["sid"], "abc"),
            other => panic!("Expected Open, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_control_packets() {
        assert_eq!(Packet::parse("2").unwrap(), Packet::Ping);
        assert_eq!(Packet::parse("3").unwrap(), Packet::Pong);
        assert_eq!(Packet::parse("1").unwrap(), Packet::Close);
        assert_eq!(Packet::parse("6").unwrap(), Packet::Noop);
        assert_eq!(Packet::parse(r#"40{"sid":"x"}"#).unwrap(), Packet::Connect);
        assert_eq!(Packet::parse("41").unwrap(), Packet::Disconnect);
    }

    #[test]
    fn test_parse_event() {
        let packet =
            Packet::parse(r#"42["statusUpdated",{"id":"66f0c1","status":"RESOLVED"}]"#).unwrap();
        assert_eq!(
            packet,
            Packet::Event {
                event: "statusUpdated".to_string(),
                payload: json!({"id": "66f0c1", "status": "RESOLVED"}),
            }
        );
    }

    #[test]
    fn test_parse_event_with_namespace_and_ack() {
        let packet = Packet::parse(r#"42/admin,17["ping"]"#).unwrap();
        assert_eq!(
            packet,
            Packet::Event {
                event: "ping".to_string(),
                payload: Value::Null,
            }
        );
    }

    #[test]
    fn test_parse_connect_error() {
        let packet = Packet::parse(r#"44{"message":"Not authorized"}"#).unwrap();
        assert_eq!(packet, Packet::ConnectError("Not authorized".to_string()));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Packet::parse("").is_err());
        assert!(Packet::parse("42{}").is_err());
        assert!(Packet::parse("42[1,2]").is_err());
        assert_eq!(Packet::parse("5").unwrap(), Packet::Other("5".to_string()));
    }

    #[test]
    fn test_connect_packet() {
        assert_eq!(connect_packet(None), "40");
        assert_eq!(
            connect_packet(Some(&json!({"token": "t0ken"}))),
            r#"40{"token":"t0ken"}"#
        );
    }
}
