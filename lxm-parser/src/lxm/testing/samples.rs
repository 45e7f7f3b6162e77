//! Vetted macro sources
//!
//! The fixtures live in `lxm-parser/tests/fixtures` and are compiled in, so every crate of
//! the workspace can use them. All of them except [`Samples::loose`] are canonical: parsing
//! and rendering them again gives back the same bytes.

use super::sample_schema;
use crate::lxm::ast::MacroDocument;
use crate::lxm::error::LxmError;
use crate::lxm::parsing::{parse_macro, ParseOptions, ParseOutput};

/// One fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub name: &'static str,
    pub source: &'static str,
}

impl Sample {
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Parse strictly against [`sample_schema`]. Panics on error.
    pub fn parse(&self) -> MacroDocument {
        match self.try_parse(&ParseOptions::default().with_file_name(self.name)) {
            Ok(output) => output.document,
            Err(error) => panic!("sample {} does not parse: {}", self.name, error),
        }
    }

    pub fn try_parse(&self, options: &ParseOptions) -> Result<ParseOutput, LxmError> {
        parse_macro(self.source, &sample_schema(), options)
    }
}

pub struct Samples;

impl Samples {
    /// Two plain commands.
    pub fn basic() -> Sample {
        Sample {
            name: "basic.LXM",
            source: include_str!("../../../tests/fixtures/basic.LXM"),
        }
    }

    /// Comments, metadata, nested blocks, suppressed commands and a suppressed block.
    pub fn blocks() -> Sample {
        Sample {
            name: "blocks.LXM",
            source: include_str!("../../../tests/fixtures/blocks.LXM"),
        }
    }

    /// The eval-call dialect.
    pub fn embedded() -> Sample {
        Sample {
            name: "embedded.py",
            source: include_str!("../../../tests/fixtures/embedded.py"),
        }
    }

    /// Blank lines, dangling comments and a line with too many arguments. Not canonical,
    /// and only parses permissively.
    pub fn loose() -> Sample {
        Sample {
            name: "loose.LXM",
            source: include_str!("../../../tests/fixtures/loose.LXM"),
        }
    }

    /// The canonical fixtures.
    pub fn canonical() -> Vec<Sample> {
        vec![Self::basic(), Self::blocks(), Self::embedded()]
    }
}
