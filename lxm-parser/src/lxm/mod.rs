//! Main module for lxm library functionality

pub mod ast;
pub mod editing;
pub mod error;
pub mod lexing;
pub mod parsing;
pub mod schema;
pub mod testing;
pub mod undo;

pub use ast::{
    Argument, Block, Command, FileFormat, MacroDocument, Node, NodeHeader, NodePath, NodeRef,
    Prefix,
};
pub use error::{
    ArgumentParseError, BuildError, LxmError, SchemaLookupError, SyntaxError, SyntaxErrorKind,
};
pub use parsing::{parse_macro, ParseOptions, ParseOutput};
pub use schema::{ArgumentDescriptor, CommandSchema, CommandSchemaProvider, ValueType};
