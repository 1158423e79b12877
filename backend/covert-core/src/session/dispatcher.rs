//! Outbound commands.
//!
//! Each command checks the lifecycle state first and returns the message to
//! transmit; the session only changes once the command is known to be valid.

use crate::error::session::SessionError;
use crate::protocol::{ChannelPayload, OutboundMessage, ProcessorPayload};
use crate::registry::CatalogKind;
use crate::session::{Session, SessionState};

use log::debug;

impl Session {
    /// Ask the service for its configuration schema.
    ///
    /// Valid right after the transport opens and, to re-ask, while still
    /// waiting for the answer.
    pub fn request_schema(&mut self) -> Result<OutboundMessage, SessionError> {
        self.expect_state(
            "request the schema",
            &[SessionState::Connecting, SessionState::AwaitingSchema],
        )?;
        self.transition(SessionState::AwaitingSchema);
        Ok(OutboundMessage::Config)
    }

    /// Open the covert channel with the current selections.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidState`] unless the session is `Ready`
    /// - [`SessionError::NoChannelSelected`] if no channel was picked
    /// - [`SessionError::ProcessorUnselected`] if a processor slot is empty
    /// - [`SessionError::Registry`] if a selection names a type the schema
    ///   no longer publishes
    pub fn open_channel(&mut self) -> Result<OutboundMessage, SessionError> {
        self.expect_state("open a channel", &[SessionState::Ready])?;

        let channel = self
            .store
            .channel()
            .ok_or_else(SessionError::no_channel_selected)?;
        self.registry
            .ensure_known(CatalogKind::Channel, channel.type_name())?;

        let mut processors = Vec::with_capacity(self.store.processors().len());
        for (index, slot) in self.store.processors().iter().enumerate() {
            let (Some(type_name), Some(data)) = (slot.type_name(), slot.data()) else {
                return Err(SessionError::processor_unselected(index));
            };
            self.registry
                .ensure_known(CatalogKind::Processor, type_name)?;
            processors.push(ProcessorPayload {
                type_name: type_name.to_string(),
                data: data.clone(),
            });
        }

        let message = OutboundMessage::Open {
            processors,
            channel: ChannelPayload::new(channel.type_name(), channel.properties().clone()),
        };
        debug!(
            "Session {}: open with channel '{}' and {} processors",
            self.id,
            channel.type_name(),
            self.store.processors().len()
        );

        self.transition(SessionState::Opening);
        Ok(message)
    }

    pub fn close_channel(&mut self) -> Result<OutboundMessage, SessionError> {
        self.expect_state("close the channel", &[SessionState::Open])?;
        self.transition(SessionState::Closing);
        Ok(OutboundMessage::Close)
    }

    /// Send `text` over the open channel.
    ///
    /// The compose buffer is cleared as soon as the message is emitted,
    /// without waiting for the `write` acknowledgement.
    pub fn send_message(&mut self, text: impl Into<String>) -> Result<OutboundMessage, SessionError> {
        self.expect_state("send a message", &[SessionState::Open])?;
        self.compose.clear();
        Ok(OutboundMessage::Write {
            message: text.into(),
        })
    }

    /// Send whatever is in the compose buffer.
    pub fn send_composed(&mut self) -> Result<OutboundMessage, SessionError> {
        self.expect_state("send a message", &[SessionState::Open])?;
        let text = std::mem::take(&mut self.compose);
        self.send_message(text)
    }

    #[track_caller]
    fn expect_state(
        &self,
        action: &'static str,
        allowed: &[SessionState],
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::invalid_state(action, self.state))
        }
    }
}
