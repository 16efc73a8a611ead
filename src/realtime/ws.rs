use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        http::header::AUTHORIZATION,
        protocol::Message as WsMessage,
    },
};
use url::Url;

use crate::{
    domain::events::{ClientEvent, ServerEvent},
    infra::secrets::BearerToken,
};

use super::transport::{EventTransport, TransportError, TransportEvent};

const READER_STARTED: &str = "REALTIME_WS_READER_STARTED";
const READER_STOPPED: &str = "REALTIME_WS_READER_STOPPED";
const READER_FRAME_DECODE_FAILED: &str = "REALTIME_WS_FRAME_DECODE_FAILED";
const READER_SOCKET_CLOSED: &str = "REALTIME_WS_SOCKET_CLOSED";
const WRITER_SEND_FAILED: &str = "REALTIME_WS_WRITER_SEND_FAILED";

/// WebSocket implementation of the session transport.
///
/// The bearer credential rides on the upgrade request as an Authorization
/// header; after the handshake the socket carries JSON event frames both
/// ways. A reader task decodes inbound frames (undecodable frames are
/// logged and skipped) and a writer task drains the outbound queue.
pub struct WsTransport {
    events_url: Url,
    outgoing: Option<mpsc::UnboundedSender<WsMessage>>,
    stop_tx: Option<watch::Sender<bool>>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl WsTransport {
    pub fn new(events_url: Url) -> Self {
        Self {
            events_url,
            outgoing: None,
            stop_tx: None,
            reader: None,
            writer: None,
        }
    }

    fn handshake_error(&self, detail: impl std::fmt::Display) -> TransportError {
        TransportError::Handshake {
            url: self.events_url.to_string(),
            detail: detail.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EventTransport for WsTransport {
    async fn connect(
        &mut self,
        credential: &BearerToken,
    ) -> Result<mpsc::UnboundedReceiver<TransportEvent>, TransportError> {
        self.disconnect().await;

        let mut request = self
            .events_url
            .as_str()
            .into_client_request()
            .map_err(|error| self.handshake_error(error))?;
        let bearer = format!("Bearer {}", credential.expose());
        request.headers_mut().insert(
            AUTHORIZATION,
            bearer
                .parse()
                .map_err(|_| self.handshake_error("credential is not a valid header value"))?,
        );

        let (socket, _response) = connect_async(request)
            .await
            .map_err(|error| self.handshake_error(error))?;
        let (sink, stream) = socket.split();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        self.writer = Some(tokio::spawn(run_writer(sink, out_rx)));
        self.reader = Some(tokio::spawn(run_reader(
            stream,
            event_tx,
            out_tx.clone(),
            stop_rx,
        )));
        self.outgoing = Some(out_tx);
        self.stop_tx = Some(stop_tx);

        tracing::info!(code = READER_STARTED, url = %self.events_url, "event socket up");
        Ok(event_rx)
    }

    fn emit(&mut self, event: &ClientEvent) -> Result<(), TransportError> {
        let outgoing = self.outgoing.as_ref().ok_or(TransportError::NotConnected)?;
        let frame = serde_json::to_string(event).map_err(TransportError::Encode)?;
        outgoing
            .send(WsMessage::Text(frame))
            .map_err(|_| TransportError::NotConnected)
    }

    async fn disconnect(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        self.outgoing = None;

        if let Some(reader) = self.reader.take() {
            let _ = reader.await;
        }
        if let Some(writer) = self.writer.take() {
            let _ = writer.await;
        }
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

async fn run_writer(
    mut sink: impl Sink<WsMessage> + Unpin,
    mut out_rx: mpsc::UnboundedReceiver<WsMessage>,
) {
    while let Some(frame) = out_rx.recv().await {
        if sink.send(frame).await.is_err() {
            tracing::warn!(code = WRITER_SEND_FAILED, "outbound frame rejected by socket");
            return;
        }
    }
}

async fn run_reader(
    mut stream: impl Stream<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
    out_tx: mpsc::UnboundedSender<WsMessage>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    tracing::info!(code = READER_STOPPED, "event socket reader stopped");
                    return;
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        match serde_json::from_str::<ServerEvent>(&text) {
                            Ok(event) => {
                                if event_tx.send(TransportEvent::Server(event)).is_err() {
                                    return;
                                }
                            }
                            Err(error) => {
                                tracing::warn!(
                                    code = READER_FRAME_DECODE_FAILED,
                                    error = %error,
                                    "skipping undecodable event frame"
                                );
                            }
                        }
                    }
                    Some(Ok(WsMessage::Ping(payload))) => {
                        let _ = out_tx.send(WsMessage::Pong(payload));
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        tracing::info!(code = READER_SOCKET_CLOSED, "event socket closed by peer");
                        let _ = event_tx.send(TransportEvent::Dropped {
                            reason: "connection closed by server".to_owned(),
                        });
                        return;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        let _ = event_tx.send(TransportEvent::Dropped {
                            reason: error.to_string(),
                        });
                        return;
                    }
                }
            }
        }
    }
}
