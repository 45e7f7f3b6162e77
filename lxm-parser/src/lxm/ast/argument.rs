//! Command arguments
//!
//! An argument is always owned by one command. Its identity (the schema descriptor, and with
//! it the name) is fixed when the command is created. Only the value and the string override
//! change afterwards.

use crate::lxm::schema::ArgumentDescriptor;

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    descriptor: ArgumentDescriptor,
    pub value: Option<String>,
    /// Render the value as a plain string instead of type hinted.
    pub as_string_override: bool,
}

impl Argument {
    /// An unset argument for the given slot.
    pub fn new(descriptor: ArgumentDescriptor) -> Self {
        Self {
            descriptor,
            value: None,
            as_string_override: false,
        }
    }

    pub fn with_value(descriptor: ArgumentDescriptor, value: impl Into<String>) -> Self {
        Self {
            descriptor,
            value: Some(value.into()),
            as_string_override: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ArgumentDescriptor {
        &self.descriptor
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// The value formatted for display, see [`ArgumentDescriptor::format_value`].
    pub fn display_value(&self) -> Option<String> {
        self.value
            .as_deref()
            .map(|value| self.descriptor.format_value(value, self.as_string_override))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lxm::schema::{Hint, ValueType};

    #[test]
    fn test_display_value_respects_override() {
        let descriptor = ArgumentDescriptor::new("mode")
            .with_type(ValueType::Hinted)
            .with_hints(vec![Hint::new(1, "on")]);
        let mut arg = Argument::with_value(descriptor, "1");
        assert_eq!(arg.display_value().as_deref(), Some("on"));

        arg.as_string_override = true;
        assert_eq!(arg.display_value().as_deref(), Some("1"));
    }

    #[test]
    fn test_unset_argument() {
        let arg = Argument::new(ArgumentDescriptor::new("task"));
        assert_eq!(arg.name(), "task");
        assert!(!arg.is_set());
        assert_eq!(arg.display_value(), None);
    }
}
