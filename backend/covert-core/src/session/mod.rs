//! The session: one connection's worth of protocol state.
//!
//! [`Session`] owns the schema registry, the operator's working
//! configuration, the lifecycle state and the status log. It performs no
//! I/O. Operator actions return the [`OutboundMessage`](crate::protocol::OutboundMessage)
//! to put on the wire (see `dispatcher`), and inbound frames are fed to
//! [`Session::handle_inbound`] (see `router`). The transport actor is the
//! only thing that moves bytes.
//!
//! Every operator action either succeeds completely or returns a
//! [`SessionError`] with the session left exactly as it was.

mod dispatcher;
mod event;
mod router;
mod status;
mod state;

pub use event::SessionEvent;
pub use status::{LogEntry, LogKind, SessionLog};
pub use state::{PendingAck, SessionState};

use crate::error::session::SessionError;
use crate::option::OptionValue;
use crate::registry::{CatalogKind, SchemaRegistry};
use crate::store::{ConfigStore, ProcessorSelection};

use std::time::Duration;

use log::{info, warn};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    state: SessionState,
    registry: SchemaRegistry,
    store: ConfigStore,
    log: SessionLog,
    compose: String,
}

impl Session {
    /// A session for a transport that has been created but not yet opened.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Connecting,
            registry: SchemaRegistry::new(),
            store: ConfigStore::new(),
            log: SessionLog::default(),
            compose: String::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Text the operator is composing; cleared when it is sent.
    pub fn compose(&self) -> &str {
        &self.compose
    }

    pub fn set_compose(&mut self, text: impl Into<String>) {
        self.compose = text.into();
    }

    // ------------------------------------------------------------------
    // Configuration editing
    // ------------------------------------------------------------------

    pub fn select_channel(&mut self, name: &str) -> Result<(), SessionError> {
        self.store.select_channel(&self.registry, name)
    }

    pub fn set_channel_option(&mut self, key: &str, value: OptionValue) -> Result<(), SessionError> {
        self.ensure_channel_known()?;
        self.store.set_channel_option(key, value)
    }

    pub fn set_channel_option_from_str(
        &mut self,
        key: &str,
        input: &str,
    ) -> Result<(), SessionError> {
        self.ensure_channel_known()?;
        self.store.set_channel_option_from_str(key, input)
    }

    pub fn set_channel_option_json(&mut self, key: &str, raw: Value) -> Result<(), SessionError> {
        self.ensure_channel_known()?;
        self.store.set_channel_option_json(key, raw)
    }

    pub fn add_processor(&mut self) -> usize {
        self.store.add_processor()
    }

    pub fn select_processor(&mut self, index: usize, name: &str) -> Result<(), SessionError> {
        self.store.select_processor(&self.registry, index, name)
    }

    /// The processor in slot `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::UnknownType`](crate::error::RegistryError::UnknownType)
    /// if the slot names a processor the current schema no longer publishes.
    pub fn processor(&self, index: usize) -> Result<&ProcessorSelection, SessionError> {
        let slot = self
            .store
            .processors()
            .get(index)
            .ok_or_else(|| SessionError::processor_index(index, self.store.processors().len()))?;
        if let Some(type_name) = slot.type_name() {
            self.registry.ensure_known(CatalogKind::Processor, type_name)?;
        }
        Ok(slot)
    }

    pub fn set_processor_option(
        &mut self,
        index: usize,
        key: &str,
        value: OptionValue,
    ) -> Result<(), SessionError> {
        self.processor(index)?;
        self.store.set_processor_option(index, key, value)
    }

    pub fn set_processor_option_from_str(
        &mut self,
        index: usize,
        key: &str,
        input: &str,
    ) -> Result<(), SessionError> {
        self.processor(index)?;
        self.store.set_processor_option_from_str(index, key, input)
    }

    pub fn remove_processor(&mut self, index: usize) -> Result<ProcessorSelection, SessionError> {
        self.store.remove_processor(index)
    }

    // ------------------------------------------------------------------
    // Transport and acknowledgement bookkeeping
    // ------------------------------------------------------------------

    /// The transport dropped. Terminal: a new session is needed to reconnect.
    pub fn transport_lost(&mut self, reason: &str) {
        if self.state == SessionState::Disconnected {
            return;
        }
        warn!("Session {}: transport lost while {}: {reason}", self.id, self.state);
        self.log
            .push_error(&format!("Connection to server lost: {reason}"));
        self.transition(SessionState::Disconnected);
    }

    /// Stop waiting for an `open` or `close` acknowledgement.
    ///
    /// `Opening` returns to `Ready` and `Closing` returns to `Open`, so the
    /// operator can issue the command again.
    pub fn abandon_pending(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Opening => self.stop_waiting(PendingAck::Open),
            SessionState::Closing => self.stop_waiting(PendingAck::Close),
            state => return Err(SessionError::invalid_state("abandon a pending request", state)),
        }
        Ok(())
    }

    /// An acknowledgement timer armed for `pending` expired.
    ///
    /// Stale timers (the session has moved on) are ignored. Returns whether
    /// the timeout was applied.
    pub fn ack_timed_out(&mut self, pending: PendingAck, waited: Duration) -> bool {
        if self.state.pending() != Some(pending) {
            return false;
        }

        warn!(
            "Session {}: no {} acknowledgement after {waited:?}",
            self.id,
            pending.op_code()
        );
        self.log.push_error(&format!(
            "No {} acknowledgement from server after {waited:?}",
            pending.op_code()
        ));

        match pending {
            PendingAck::Schema => self
                .log
                .push_status("Request the schema again to retry."),
            PendingAck::Open | PendingAck::Close => self.stop_waiting(pending),
        }
        true
    }

    /// Return from a pending state to the one the request was made in.
    fn stop_waiting(&mut self, pending: PendingAck) {
        let previous = match pending {
            PendingAck::Schema => return,
            PendingAck::Open => SessionState::Ready,
            PendingAck::Close => SessionState::Open,
        };
        self.log.push_status(format!(
            "Stopped waiting for the {} acknowledgement.",
            pending.op_code()
        ));
        self.transition(previous);
    }

    fn ensure_channel_known(&self) -> Result<(), SessionError> {
        match self.store.channel() {
            Some(channel) => Ok(self
                .registry
                .ensure_known(CatalogKind::Channel, channel.type_name())?),
            None => Err(SessionError::no_channel_selected()),
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            info!("Session {}: {} -> {}", self.id, self.state, next);
            self.state = next;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
