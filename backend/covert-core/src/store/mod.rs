//! The operator's working configuration: one channel and an ordered
//! processor chain, each holding a private copy of its schema template.

mod selection;

pub use selection::{ChannelSelection, ProcessorSelection};

use crate::error::session::SessionError;
use crate::option::{OptionSet, OptionValue};
use crate::registry::{CatalogKind, SchemaRegistry};

use log::{debug, warn};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    channel: Option<ChannelSelection>,
    processors: Vec<ProcessorSelection>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self) -> Option<&ChannelSelection> {
        self.channel.as_ref()
    }

    pub fn processors(&self) -> &[ProcessorSelection] {
        &self.processors
    }

    /// Pick channel `name`, replacing any previous choice and its edits.
    pub fn select_channel(
        &mut self,
        registry: &SchemaRegistry,
        name: &str,
    ) -> Result<(), SessionError> {
        let properties = registry.lookup(CatalogKind::Channel, name)?;
        debug!("Selected channel '{name}' ({} options)", properties.len());
        self.channel = Some(ChannelSelection::new(name, properties));
        Ok(())
    }

    /// Select channel `name` with values taken from `active` where they fit
    /// the published template.
    pub(crate) fn seed_channel(
        &mut self,
        registry: &SchemaRegistry,
        name: &str,
        active: &OptionSet,
    ) -> Result<(), SessionError> {
        let mut properties = registry.lookup(CatalogKind::Channel, name)?;
        for key in properties.adopt_values(active) {
            warn!("Not seeding option '{key}' of channel '{name}': it does not match the schema");
        }
        self.channel = Some(ChannelSelection::new(name, properties));
        Ok(())
    }

    /// Move every selection onto the templates of a freshly loaded schema.
    ///
    /// Edited values survive where the new template still has the key with
    /// the same type. Selections whose type is no longer published are left
    /// alone; the session refuses to use them.
    pub(crate) fn rebase(&mut self, registry: &SchemaRegistry) {
        if let Some(channel) = self.channel.as_mut()
            && let Ok(mut properties) = registry.lookup(CatalogKind::Channel, channel.type_name())
        {
            for key in properties.adopt_values(channel.properties()) {
                warn!(
                    "Dropping option '{key}' of channel '{}' after schema reload",
                    channel.type_name()
                );
            }
            channel.replace_properties(properties);
        }

        for (index, slot) in self.processors.iter_mut().enumerate() {
            let (Some(name), Some(data)) = (slot.type_name(), slot.data()) else {
                continue;
            };
            let Ok(mut fresh) = registry.lookup(CatalogKind::Processor, name) else {
                continue;
            };
            for key in fresh.adopt_values(data) {
                warn!("Dropping option '{key}' of processor #{index} '{name}' after schema reload");
            }
            let name = name.to_string();
            slot.select(name, fresh);
        }
    }

    pub fn set_channel_option(&mut self, key: &str, value: OptionValue) -> Result<(), SessionError> {
        Ok(self.channel_options()?.set(key, value)?)
    }

    pub fn set_channel_option_from_str(
        &mut self,
        key: &str,
        input: &str,
    ) -> Result<(), SessionError> {
        Ok(self.channel_options()?.set_from_str(key, input)?)
    }

    pub fn set_channel_option_json(&mut self, key: &str, raw: Value) -> Result<(), SessionError> {
        Ok(self.channel_options()?.set_json(key, raw)?)
    }

    /// Append an empty processor slot and return its index.
    pub fn add_processor(&mut self) -> usize {
        self.processors.push(ProcessorSelection::default());
        self.processors.len() - 1
    }

    /// Pick processor type `name` for slot `index`, discarding earlier edits.
    pub fn select_processor(
        &mut self,
        registry: &SchemaRegistry,
        index: usize,
        name: &str,
    ) -> Result<(), SessionError> {
        let data = registry.lookup(CatalogKind::Processor, name)?;
        self.slot_mut(index)?.select(name, data);
        debug!("Selected processor '{name}' for slot #{index}");
        Ok(())
    }

    pub fn set_processor_option(
        &mut self,
        index: usize,
        key: &str,
        value: OptionValue,
    ) -> Result<(), SessionError> {
        Ok(self.processor_options(index)?.set(key, value)?)
    }

    pub fn set_processor_option_from_str(
        &mut self,
        index: usize,
        key: &str,
        input: &str,
    ) -> Result<(), SessionError> {
        Ok(self.processor_options(index)?.set_from_str(key, input)?)
    }

    pub fn remove_processor(&mut self, index: usize) -> Result<ProcessorSelection, SessionError> {
        if index >= self.processors.len() {
            return Err(SessionError::processor_index(index, self.processors.len()));
        }
        Ok(self.processors.remove(index))
    }

    pub fn clear(&mut self) {
        self.channel = None;
        self.processors.clear();
    }

    fn channel_options(&mut self) -> Result<&mut OptionSet, SessionError> {
        self.channel
            .as_mut()
            .map(ChannelSelection::properties_mut)
            .ok_or_else(SessionError::no_channel_selected)
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut ProcessorSelection, SessionError> {
        let len = self.processors.len();
        self.processors
            .get_mut(index)
            .ok_or_else(|| SessionError::processor_index(index, len))
    }

    fn processor_options(&mut self, index: usize) -> Result<&mut OptionSet, SessionError> {
        self.slot_mut(index)?
            .data_mut()
            .ok_or_else(|| SessionError::processor_unselected(index))
    }
}
