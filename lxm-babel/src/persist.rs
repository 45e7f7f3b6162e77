//! Loading and saving documents
//!
//! Files are read whole and written through a temporary file in the target's directory that
//! replaces the target once fully written, so a failed save never leaves a truncated macro
//! behind. Handles are scoped to each call and closed on every exit path, errors included.

use crate::error::FormatError;
use crate::format::Format;
use crate::registry::FormatRegistry;
use lxm_parser::lxm::{CommandSchemaProvider, MacroDocument, ParseOptions, ParseOutput};
use std::io::Write;
use std::path::Path;

/// Read and parse `path`. The format comes from the extension, or from the content when the
/// extension is unknown. The document records where it came from and starts out saved.
pub fn load(
    registry: &FormatRegistry,
    path: &Path,
    schema: &dyn CommandSchemaProvider,
    options: &ParseOptions,
) -> Result<ParseOutput, FormatError> {
    let source = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, e))?;
    let format = match registry.for_path(path) {
        Ok(format) => format,
        Err(error) => registry.detect(&source).ok_or(error)?,
    };
    log::debug!("loading {} as {}", path.display(), format.name());

    let mut options = options.clone();
    if options.file_name.is_none() {
        options.file_name = Some(path.display().to_string());
    }
    let mut output = format.parse(&source, schema, &options)?;
    let doc = &mut output.document;
    doc.file_path = Some(path.to_path_buf());
    doc.file_format = format.file_format().or(doc.file_format);
    doc.unsaved_changes = false;
    Ok(output)
}

/// Write the document back to its own path in its own format.
pub fn save(registry: &FormatRegistry, doc: &mut MacroDocument) -> Result<(), FormatError> {
    let (Some(path), Some(file_format)) = (doc.file_path.clone(), doc.file_format) else {
        return Err(FormatError::MissingTarget);
    };
    let format = registry.get(file_format.name())?;
    write(format, doc, &path)?;
    doc.unsaved_changes = false;
    Ok(())
}

/// Write the document to `path`, in the named format or the one the extension selects.
/// On success the document is retargeted to the new file.
pub fn save_as(
    registry: &FormatRegistry,
    doc: &mut MacroDocument,
    path: &Path,
    format: Option<&str>,
) -> Result<(), FormatError> {
    let format = match format {
        Some(name) => registry.get(name)?,
        None => registry.for_path(path)?,
    };
    write(format, doc, path)?;
    doc.file_path = Some(path.to_path_buf());
    doc.file_format = format.file_format();
    doc.unsaved_changes = false;
    Ok(())
}

fn write(format: &dyn Format, doc: &MacroDocument, path: &Path) -> Result<(), FormatError> {
    if !format.supports_serialization() {
        return Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            format.name()
        )));
    }
    let text = format.serialize(doc)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| FormatError::io(dir, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| FormatError::io(file.path(), e))?;
    file.persist(path)
        .map_err(|e| FormatError::io(path, e.error))?;
    log::debug!("saved {} as {}", path.display(), format.name());
    Ok(())
}
