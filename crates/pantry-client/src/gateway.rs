use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use pantry_types::events::PushEvent;

use crate::error::ClientError;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Consumer end of the push channel.
///
/// One connection, events yielded strictly in arrival order. There is no
/// reconnect or resume in here: when the socket dies the stream ends and
/// the embedding application decides what to do about it.
pub struct Gateway {
    socket: Socket,
}

impl Gateway {
    /// Open the push socket. The token rides as a `token` query parameter
    /// because that is the handshake the backend speaks (its browser
    /// clients cannot set headers on a WebSocket upgrade).
    pub async fn connect(url: &str, token: &str) -> Result<Self, ClientError> {
        let mut url = Url::parse(url).map_err(|e| ClientError::Config(e.to_string()))?;
        url.query_pairs_mut().append_pair("token", token);

        let (socket, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        info!("gateway connected to {}", url.host_str().unwrap_or("backend"));
        Ok(Self { socket })
    }

    /// Next decoded push event. `None` once the peer closes or the
    /// transport fails.
    ///
    /// Protocol pings are answered inline; frames that fail to decode are
    /// skipped, not fatal.
    pub async fn next_event(&mut self) -> Option<PushEvent> {
        while let Some(frame) = self.socket.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("gateway transport error: {}", e);
                    return None;
                }
            };

            match frame {
                WsMessage::Text(text) => {
                    if let Some(event) = decode_frame(&text) {
                        return Some(event);
                    }
                }
                WsMessage::Ping(payload) => {
                    if self.socket.send(WsMessage::Pong(payload)).await.is_err() {
                        return None;
                    }
                }
                WsMessage::Close(_) => {
                    info!("gateway closed by server");
                    return None;
                }
                _ => {}
            }
        }
        None
    }
}

/// Decode one text frame into a [`PushEvent`].
///
/// Unknown event names and malformed payloads are logged at warn and
/// dropped — one bad frame must never take the consumer down.
pub fn decode_frame(text: &str) -> Option<PushEvent> {
    match serde_json::from_str::<PushEvent>(text) {
        Ok(event) => {
            debug!("push event: {}", event.name());
            Some(event)
        }
        Err(e) => {
            // The cut must land on a char boundary or the slice panics.
            let mut cut = text.len().min(200);
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            warn!("dropping undecodable push frame: {} -- raw: {}", e, &text[..cut]);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_known_frame() {
        let frame = r#"{ "event": "food-uploads-complete", "data": { "count": 2 } }"#;
        match decode_frame(frame) {
            Some(PushEvent::UploadsComplete { count }) => assert_eq!(count, 2),
            other => panic!("expected uploads-complete, got {:?}", other),
        }
    }

    #[test]
    fn unknown_event_names_are_skipped() {
        let frame = r#"{ "event": "started-typing", "data": { "userId": "u1" } }"#;
        assert!(decode_frame(frame).is_none());
    }

    #[test]
    fn malformed_json_is_skipped() {
        assert!(decode_frame("{ not json").is_none());
        assert!(decode_frame("").is_none());
    }

    #[test]
    fn oversized_multibyte_frame_is_skipped() {
        // 301 bytes of junk; byte 200 falls inside a two-byte character, so
        // the truncated warn log has to back up to a boundary instead of
        // panicking mid-codepoint.
        let frame = format!("x{}", "é".repeat(150));
        assert!(frame.len() > 200 && !frame.is_char_boundary(200));
        assert!(decode_frame(&frame).is_none());
    }

    #[test]
    fn payload_shape_mismatch_is_skipped() {
        // Right event name, wrong payload shape.
        let frame = r#"{ "event": "food-uploads-complete", "data": { "count": "many" } }"#;
        assert!(decode_frame(frame).is_none());
    }
}
