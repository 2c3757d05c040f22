//! WebSocket module for the otdb console
//!
//! This module derives the socket endpoint, drives the single console
//! connection, and maps its lifecycle onto the console controls.

mod client;
mod connection;
pub mod endpoint;

pub use client::{ClientConfig, WebSocketClient, WsStream};
pub use connection::{ConnectionState, ConnectionWidget, UiEvent, DEFAULT_SUBPROTOCOL};
pub use endpoint::UrlMode;
