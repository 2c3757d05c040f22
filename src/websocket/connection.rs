use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{AppError, WebSocketError};
use crate::ui::{ElementIds, View};
use crate::Result;

/// Subprotocol announced to the daemon front end.
pub const DEFAULT_SUBPROTOCOL: &str = "otdb";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Input from whoever is operating the controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SetPath(String),
    SetRequest(String),
    /// Activation of the send control.
    Click,
    /// Type a request and click send in one go.
    Submit(String),
}

/// The console widget: one connection, one view, the three lifecycle
/// handlers and the send action.
pub struct ConnectionWidget<V: View> {
    id: Uuid,
    view: V,
    ids: ElementIds,
    state: ConnectionState,
    tx: Option<mpsc::UnboundedSender<Message>>,
    opened_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
}

impl<V: View> ConnectionWidget<V> {
    pub fn new(mut view: V, ids: ElementIds) -> Self {
        for id in ids.gated() {
            view.set_disabled(id, true);
        }

        Self {
            id: Uuid::new_v4(),
            view,
            ids,
            state: ConnectionState::Connecting,
            tx: None,
            opened_at: None,
            closed_at: None,
        }
    }

    /// Hands the widget the outbound half of the socket.
    pub fn attach(&mut self, tx: mpsc::UnboundedSender<Message>) {
        self.tx = Some(tx);
    }

    /// Drops the outbound half, letting the writer shut the socket.
    pub fn detach(&mut self) {
        self.tx = None;
    }

    pub fn handle_open(&mut self) {
        if self.state != ConnectionState::Connecting {
            warn!("Ignoring open on connection {} in state {:?}", self.id, self.state);
            return;
        }

        self.state = ConnectionState::Open;
        self.opened_at = Some(Utc::now());
        for id in self.ids.gated() {
            self.view.set_disabled(id, false);
        }
        info!("Connection {} open", self.id);
    }

    pub fn handle_message(&mut self, payload: &str) {
        debug!("Connection {} received {} bytes", self.id, payload.len());
        self.view
            .append_value(&self.ids.response, &format!("{}\n", payload));
        self.view.scroll_to_end(&self.ids.response);
    }

    pub fn handle_close(&mut self) {
        for id in self.ids.gated() {
            self.view.set_disabled(id, true);
        }

        if self.state != ConnectionState::Closed {
            self.state = ConnectionState::Closed;
            let closed_at = Utc::now();
            self.closed_at = Some(closed_at);
            match self.opened_at {
                Some(opened_at) => info!(
                    "Connection {} closed after {}s",
                    self.id,
                    (closed_at - opened_at).num_seconds()
                ),
                None => info!("Connection {} closed before opening", self.id),
            }
        }
    }

    /// Sends the request control's contents as one text frame, then clears it.
    ///
    /// Whether sending makes sense is decided by the gated controls, not here.
    pub fn send_action(&mut self) -> Result<()> {
        let request = self.view.value(&self.ids.request);
        let tx = self
            .tx
            .as_ref()
            .ok_or(WebSocketError::NotConnected)?;

        tx.send(Message::Text(request))
            .map_err(|e| WebSocketError::SendError(e.to_string()))?;

        self.view.set_value(&self.ids.request, "");
        Ok(())
    }

    pub fn submit(&mut self, request: &str) -> Result<()> {
        self.view.set_value(&self.ids.request, request);
        self.send_action()
    }

    /// Applies an operator event, honouring disabled controls.
    pub fn dispatch(&mut self, event: UiEvent) -> Result<()> {
        let target = match &event {
            UiEvent::SetPath(_) => &self.ids.path,
            UiEvent::SetRequest(_) => &self.ids.request,
            UiEvent::Click | UiEvent::Submit(_) => &self.ids.send,
        };
        if self.view.is_disabled(target) {
            debug!("Dropping {:?}: control '{}' is disabled", event, target);
            return Ok(());
        }

        match event {
            UiEvent::SetPath(path) => {
                self.view.set_value(&self.ids.path, &path);
                Ok(())
            }
            UiEvent::SetRequest(request) => {
                self.view.set_value(&self.ids.request, &request);
                Ok(())
            }
            UiEvent::Click => self.send_action(),
            UiEvent::Submit(request) => self.submit(&request),
        }
    }

    pub fn handle_construction_error(&mut self, err: &AppError) {
        error!("Failed to open connection {}: {}", self.id, err);
        self.view.alert(&err.alert_text());
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        self.opened_at
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    pub fn ids(&self) -> &ElementIds {
        &self.ids
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}
