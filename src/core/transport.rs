//! Remote shell passthrough.
//!
//! While a [`Transport`] is attached, keystrokes go to it verbatim instead
//! of the line editor. The channel itself (a WebSocket in the browser) lives
//! outside the core; only the message format and connection status are
//! defined here.

use serde::{Deserialize, Serialize};

use crate::core::error::TransportError;

/// A message sent to the remote shell.
///
/// Encoded as `{"type":"input","data":"ls\r"}` or
/// `{"type":"resize","data":{"cols":80,"rows":24}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum TransportMessage {
    Input(String),
    Resize { cols: u16, rows: u16 },
}

impl TransportMessage {
    pub fn encode(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A bidirectional channel to a remote shell.
pub trait Transport {
    fn send(&self, message: &TransportMessage) -> Result<(), TransportError>;

    fn status(&self) -> ConnectionStatus;

    fn close(&self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    Failed,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};

    use super::*;

    /// Records what was sent.
    pub(crate) struct RecordingTransport {
        pub sent: RefCell<Vec<TransportMessage>>,
        pub closed: Cell<bool>,
        pub status: Cell<ConnectionStatus>,
    }

    impl RecordingTransport {
        pub(crate) fn connected() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                closed: Cell::new(false),
                status: Cell::new(ConnectionStatus::Connected),
            }
        }
    }

    impl Transport for RecordingTransport {
        fn send(&self, message: &TransportMessage) -> Result<(), TransportError> {
            if !self.status.get().is_connected() {
                return Err(TransportError::NotConnected);
            }
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }

        fn status(&self) -> ConnectionStatus {
            self.status.get()
        }

        fn close(&self) {
            self.closed.set(true);
            self.status.set(ConnectionStatus::Disconnected);
        }
    }
}
