use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::Settings;
use crate::error::AppError;
use crate::ui::View;
use crate::websocket::endpoint::{self, UrlMode};
use crate::websocket::{ConnectionWidget, UiEvent, DEFAULT_SUBPROTOCOL};
use crate::Result;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub page_url: String,
    pub suffix: String,
    pub subprotocol: String,
    pub url_mode: UrlMode,
}

impl ClientConfig {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            suffix: String::new(),
            subprotocol: DEFAULT_SUBPROTOCOL.to_string(),
            url_mode: UrlMode::default(),
        }
    }
}

impl From<&Settings> for ClientConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            page_url: settings.page.url.clone(),
            suffix: settings.page.suffix.clone(),
            subprotocol: settings.connection.subprotocol.clone(),
            url_mode: settings.connection.url_mode,
        }
    }
}

/// Owns the single socket of a console session and pumps events between it
/// and a [`ConnectionWidget`].
pub struct WebSocketClient {
    config: ClientConfig,
}

impl WebSocketClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> Result<Url> {
        endpoint::derive(self.config.url_mode, &self.config.page_url, &self.config.suffix)
    }

    /// Opens the socket, announcing the configured subprotocol.
    pub async fn connect(&self) -> Result<WsStream> {
        let url = self.endpoint()?;
        let mut request = url.as_str().into_client_request()?;
        let protocol = HeaderValue::from_str(&self.config.subprotocol).map_err(|e| {
            AppError::ValidationError(format!(
                "subprotocol '{}': {}",
                self.config.subprotocol, e
            ))
        })?;
        request.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, protocol);

        info!("Connecting to {} ({})", url, self.config.subprotocol);
        let (ws_stream, response) = connect_async(request).await?;
        debug!("Handshake completed with status {}", response.status());

        Ok(ws_stream)
    }

    /// Runs one console session to completion.
    ///
    /// Returns once the server closes the socket, the transport fails or the
    /// event source goes away. A failed connect is alerted and returned; it is
    /// never retried. Events are applied as they arrive, so anything sent
    /// while the handshake is pending hits disabled controls and is dropped.
    pub async fn run<V: View>(
        &self,
        widget: &mut ConnectionWidget<V>,
        mut events: mpsc::UnboundedReceiver<UiEvent>,
    ) -> Result<()> {
        let connect = self.connect();
        tokio::pin!(connect);

        // Controls are still disabled here, so dispatch drops whatever arrives.
        let ws_stream = loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Some(event) => {
                        if let Err(e) = widget.dispatch(event) {
                            warn!("Event on connection {} failed: {}", widget.id(), e);
                        }
                    }
                    None => {
                        info!("Event source gone before connection {} opened", widget.id());
                        widget.handle_close();
                        return Ok(());
                    }
                },
                result = &mut connect => match result {
                    Ok(ws) => break ws,
                    Err(e) => {
                        widget.handle_construction_error(&e);
                        return Err(e);
                    }
                },
            }
        };

        let (ws_sink, mut ws_stream) = ws_stream.split();
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = widget.id();

        widget.attach(tx);
        widget.handle_open();

        // Forward queued frames to the socket; closes it once the queue is dropped.
        let send_task = tokio::spawn(async move {
            let mut ws_sink = ws_sink;
            let mut rx = rx;

            while let Some(message) = rx.recv().await {
                if let Err(e) = ws_sink.send(message).await {
                    error!("Error sending WebSocket message: {}", e);
                    break;
                }
            }

            if let Err(e) = ws_sink.close().await {
                debug!("Error closing WebSocket connection: {}", e);
            }
        });

        loop {
            tokio::select! {
                frame = ws_stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => widget.handle_message(&text),
                    Some(Ok(Message::Binary(bin))) => {
                        warn!("Dropping {} byte binary frame on connection {}", bin.len(), connection_id);
                    }
                    Some(Ok(Message::Close(reason))) => {
                        info!("Server closed connection {}: {:?}", connection_id, reason);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("Error receiving WebSocket message: {}", e);
                        break;
                    }
                    None => break,
                },
                event = events.recv() => match event {
                    Some(event) => {
                        if let Err(e) = widget.dispatch(event) {
                            warn!("Event on connection {} failed: {}", connection_id, e);
                        }
                    }
                    None => {
                        info!("Event source gone, closing connection {}", connection_id);
                        break;
                    }
                },
            }
        }

        widget.handle_close();
        widget.detach();

        if let Err(e) = send_task.await {
            error!("Send task for connection {} failed: {}", connection_id, e);
        }

        Ok(())
    }
}
