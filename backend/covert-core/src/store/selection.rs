use crate::option::OptionSet;

/// The channel the operator picked, with a working copy of its options.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSelection {
    type_name: String,
    properties: OptionSet,
}

impl ChannelSelection {
    pub(crate) fn new(type_name: impl Into<String>, properties: OptionSet) -> Self {
        Self {
            type_name: type_name.into(),
            properties,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn properties(&self) -> &OptionSet {
        &self.properties
    }

    pub(crate) fn replace_properties(&mut self, properties: OptionSet) {
        self.properties = properties;
    }

    pub(crate) fn properties_mut(&mut self) -> &mut OptionSet {
        &mut self.properties
    }
}

/// One slot in the processor chain.
///
/// A freshly added slot has neither a type nor data until the operator picks
/// a processor for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessorSelection {
    type_name: Option<String>,
    data: Option<OptionSet>,
}

impl ProcessorSelection {
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn data(&self) -> Option<&OptionSet> {
        self.data.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.type_name.is_some()
    }

    pub(crate) fn select(&mut self, type_name: impl Into<String>, data: OptionSet) {
        self.type_name = Some(type_name.into());
        self.data = Some(data);
    }

    pub(crate) fn data_mut(&mut self) -> Option<&mut OptionSet> {
        self.data.as_mut()
    }
}
