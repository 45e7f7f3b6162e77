//! Checks shared by the serializers
//!
//! A serializer must refuse a tree it cannot write faithfully rather than write text that
//! reads back as something else.

use crate::error::FormatError;
use lxm_parser::lxm::parsing::tree_builder::is_reserved_meta;
use lxm_parser::lxm::NodeHeader;

pub fn check_single_line(text: &str, what: &str) -> Result<(), FormatError> {
    if text.contains(|c| c == '\n' || c == '\r') {
        return Err(FormatError::Serialization(format!(
            "{} contains a line break: {:?}",
            what, text
        )));
    }
    Ok(())
}

/// Metadata that reads back as the display name or as string overrides cannot be written.
pub fn check_metadata(header: &NodeHeader) -> Result<(), FormatError> {
    match header
        .metadata
        .iter()
        .find(|(key, value)| is_reserved_meta(key, value))
    {
        Some((key, _)) => Err(FormatError::Serialization(format!(
            "metadata key `{}` is reserved",
            key
        ))),
        None => Ok(()),
    }
}
