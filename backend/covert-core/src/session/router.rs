//! Inbound frame handling.
//!
//! Every frame produces exactly one [`SessionEvent`]. Frames that make no
//! sense in the current state are logged and ignored rather than treated as
//! errors; the service is the authority on what it sends.

use crate::protocol::{Acknowledgement, ConfigResponse, InboundMessage, OpCode};
use crate::registry::CatalogKind;
use crate::session::{Session, SessionEvent, SessionState};

use log::{debug, warn};

const CONNECTED: &str = "Connection to server established.";
const RELOADED: &str = "Server configuration reloaded.";
const OPENED: &str = "Covert channel successfully opened.";
const CLOSED: &str = "Covert channel closed.";
const SENT: &str = "Covert message sent.";

impl Session {
    /// Decode a raw frame payload and apply it.
    ///
    /// A payload that cannot be decoded is reported in the status log and
    /// otherwise ignored.
    pub fn handle_frame(&mut self, payload: &[u8]) -> SessionEvent {
        match InboundMessage::decode(payload) {
            Ok(message) => self.handle_inbound(message),
            Err(e) => {
                warn!("Session {}: dropping malformed frame: {e}", self.id);
                let reason = e.to_string();
                self.log
                    .push_error(&format!("Unable to read server message: {reason}"));
                SessionEvent::Malformed { reason }
            }
        }
    }

    /// Apply one decoded inbound message.
    pub fn handle_inbound(&mut self, message: InboundMessage) -> SessionEvent {
        if self.state == SessionState::Disconnected
            && let Some(op_code) = message.op_code()
        {
            return self.unexpected(op_code);
        }

        match message {
            InboundMessage::Config(response) => self.on_config(response),
            InboundMessage::Open(ack) => self.on_open(ack),
            InboundMessage::Close(ack) => self.on_close(ack),
            InboundMessage::Write(ack) => self.on_write(ack),
            InboundMessage::Read { message } => {
                self.log.push_received(&message);
                SessionEvent::MessageReceived { message }
            }
            InboundMessage::Error { message } => {
                warn!("Session {}: server error while {}: {message}", self.id, self.state);
                self.log.push_error(&message);
                SessionEvent::ProtocolError { message }
            }
            InboundMessage::Unknown { op_code } => {
                warn!("Session {}: ignoring unknown operation '{op_code}'", self.id);
                SessionEvent::UnknownOperation { op_code }
            }
        }
    }

    fn on_config(&mut self, response: ConfigResponse) -> SessionEvent {
        let status = match self.state {
            SessionState::AwaitingSchema => CONNECTED,
            SessionState::Ready => RELOADED,
            _ => return self.unexpected(OpCode::Config),
        };

        let ConfigResponse { defaults, channel } = response;
        self.registry.load(defaults);
        self.store.rebase(&self.registry);

        if let Some(active) = channel
            && self.store.channel().is_none()
            && self.registry.contains(CatalogKind::Channel, &active.type_name)
        {
            match active.properties() {
                Ok(Some(properties)) => {
                    debug!(
                        "Session {}: seeding channel '{}' from the server",
                        self.id, active.type_name
                    );
                    if let Err(e) =
                        self.store
                            .seed_channel(&self.registry, &active.type_name, &properties)
                    {
                        warn!("Session {}: not seeding channel: {e}", self.id);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Session {}: not seeding channel: {e}", self.id),
            }
        }

        self.log.push_status(status);
        self.transition(SessionState::Ready);

        SessionEvent::SchemaLoaded {
            channels: self.registry.len(CatalogKind::Channel),
            processors: self.registry.len(CatalogKind::Processor),
        }
    }

    fn on_open(&mut self, ack: Acknowledgement) -> SessionEvent {
        if self.state != SessionState::Opening {
            return self.unexpected(OpCode::Open);
        }
        self.trace_ack(OpCode::Open, &ack);
        self.log.push_status(OPENED);
        self.transition(SessionState::Open);
        SessionEvent::ChannelOpened
    }

    /// A close acknowledgement is honoured while `Open` too, so a channel the
    /// service tears down on its own is reflected locally.
    fn on_close(&mut self, ack: Acknowledgement) -> SessionEvent {
        if !matches!(self.state, SessionState::Closing | SessionState::Open) {
            return self.unexpected(OpCode::Close);
        }
        self.trace_ack(OpCode::Close, &ack);
        self.log.push_status(CLOSED);
        self.transition(SessionState::Ready);
        SessionEvent::ChannelClosed
    }

    fn on_write(&mut self, ack: Acknowledgement) -> SessionEvent {
        if self.state != SessionState::Open {
            return self.unexpected(OpCode::Write);
        }
        self.trace_ack(OpCode::Write, &ack);
        self.log.push_status(SENT);
        SessionEvent::MessageSent
    }

    fn trace_ack(&self, op_code: OpCode, ack: &Acknowledgement) {
        if let Some(text) = &ack.message {
            debug!("Session {}: {op_code} acknowledged: {text}", self.id);
        }
    }

    fn unexpected(&self, op_code: OpCode) -> SessionEvent {
        warn!(
            "Session {}: ignoring '{op_code}' received while {}",
            self.id, self.state
        );
        SessionEvent::Unexpected {
            op_code,
            state: self.state,
        }
    }
}
