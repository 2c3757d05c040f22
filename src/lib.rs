pub mod config;
pub mod error;
pub mod ui;
pub mod websocket;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use ui::{ElementIds, IdVariant, MemoryView, TerminalView, View};
pub use websocket::{
    ClientConfig, ConnectionState, ConnectionWidget, UiEvent, UrlMode, WebSocketClient,
};

/// Builds a widget and client from loaded settings.
pub fn session<V: View>(settings: &Settings, view: V) -> (ConnectionWidget<V>, WebSocketClient) {
    let ids = ElementIds::from(settings.ui.element_ids);
    let widget = ConnectionWidget::new(view, ids);
    let client = WebSocketClient::new(ClientConfig::from(settings));
    (widget, client)
}
