//! Formats for LXM macros
//!
//!     This crate renders a [`MacroDocument`](lxm_parser::lxm::MacroDocument) to text and reads
//!     it back, for every representation a macro can be stored in:
//!
//!     - `lxm`: the `#LXMacro#` command script
//!     - `python`: a `# python` script whose command lines are eval calls
//!     - `json` and `yaml`: structured records, one per node
//!
//!     It is a pure lib: nothing here prints, reads env vars or assumes a shell. The `lxm` CLI
//!     is one consumer, hosts embedding the engine are another.
//!
//! Architecture
//!
//!     - Format trait: uniform interface for all formats (parsing and/or serialization)
//!     - FormatRegistry: discovery and selection of formats, by name, extension or content
//!     - persist: loading and saving documents through the registry
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── persist.rs              # load / save / save_as
//!     ├── common.rs               # Checks shared by the serializers
//!     ├── formats
//!     │   ├── lxm                 # Script form, and the line serializer both script dialects share
//!     │   ├── python              # Embedded script form
//!     │   └── structured          # JSON / YAML records
//!     └── lib.rs
//!
//! Round Trips
//!
//!     Every format parses what it serializes. Parsing goes through the parser crate's
//!     builder, so all formats produce trees the same way. Serializers are written against the
//!     canonical form: rendering a canonical source parsed by the same format gives back the
//!     same bytes. Exporting part of a document is done by filtering the document first
//!     ([`MacroDocument::filtered`](lxm_parser::lxm::MacroDocument::filtered)), never by a
//!     separate serializer path.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod persist;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use registry::FormatRegistry;
