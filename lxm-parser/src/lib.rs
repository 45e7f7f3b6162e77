//! # lxm
//!
//! Document engine for LXM command macros.
//!
//! A macro is an ordered list of host commands, optionally grouped into named blocks, that
//! users record, edit and replay. This crate owns the part of that workflow that does not
//! depend on the host application:
//!
//! File Layout
//!
//!     src/lxm
//!       ├── ast        The macro tree: documents, commands, blocks, arguments and paths
//!       ├── schema     The command schema collaborator (argument slots, types, hints)
//!       ├── lexing     Argument tokenizer and the per-line classifier
//!       ├── parsing    The line state machine, the builder interface and the tree builder
//!       ├── editing    Tree mutations and the selection model
//!       ├── undo       Reversible edits and the undo stack
//!       └── testing    Fake schema, sample macros and fluent assertions
//!
//! Rendering the tree back to text lives in the `lxm-babel` crate, which treats every
//! supported representation (script, embedded script, structured records) as a format.

#![allow(rustdoc::invalid_html_tags)]

pub mod lxm;
