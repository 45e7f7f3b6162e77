//! Testing utilities
//!
//!     Macro text is easy to get subtly wrong by hand: a missing `#` on a suppressed line or a
//!     block end with a typo makes a test check the wrong thing. Tests therefore follow two
//!     rules:
//!
//!         1. Take macro sources from the vetted fixtures in [`samples::Samples`], which are
//!            canonical (they render back byte for byte).
//!         2. Check trees with the fluent [`assert_macro`] API instead of walking nodes by
//!            hand.
//!
//!     ```rust,ignore
//!     use lxm_parser::lxm::testing::{assert_macro, samples::Samples};
//!
//!     let doc = Samples::blocks().parse();
//!     assert_macro(&doc)
//!         .item_count(4)
//!         .node(1, |node| {
//!             node.assert_block()
//!                 .name("Setup")
//!                 .child(0, |child| child.suppressed(true).assert_command().name("select.drop"))
//!         });
//!     ```
//!
//!     Commands need a schema. [`sample_schema`] is an in-memory stand-in for the host's
//!     command registry that knows every command the fixtures use.

mod assertions;
pub mod samples;

pub use assertions::{
    assert_macro, BlockAssertion, CommandAssertion, DocumentAssertion, NodeAssertion,
};
pub use samples::Samples;

use crate::lxm::ast::{Block, Command, MacroDocument, Node};
use crate::lxm::schema::{ArgumentDescriptor, Hint, InMemorySchemaProvider, ValueType};

/// Schema for the commands used across tests and fixtures.
pub fn sample_schema() -> InMemorySchemaProvider {
    let string = |name: &str| ArgumentDescriptor::new(name);
    InMemorySchemaProvider::new()
        .with_command(
            "tool.set",
            vec![
                string("preset").with_username("Preset"),
                ArgumentDescriptor::new("mode")
                    .with_username("Mode")
                    .with_type(ValueType::Hinted)
                    .with_type_name("mode")
                    .with_hints(vec![Hint::new(0, "off"), Hint::new(1, "on")]),
                string("task").with_desc("Task to run"),
            ],
        )
        .with_command("select.drop", vec![string("type").with_example("item")])
        .with_command(
            "item.name",
            vec![string("name").with_username("Name"), string("type")],
        )
        .with_command(
            "tool.attr",
            vec![string("tool"), string("attr"), string("value")],
        )
        .with_command(
            "transform.channel",
            vec![
                string("name"),
                ArgumentDescriptor::new("value").with_type(ValueType::Float),
            ],
        )
        .with_command("tool.doApply", vec![])
}

/// A fresh command from [`sample_schema`], every argument unset.
///
/// Panics for commands the sample schema does not know.
pub fn command(name: &str) -> Node {
    use crate::lxm::schema::CommandSchemaProvider;
    match sample_schema().schema_for(name) {
        Ok(schema) => Node::Command(Command::from_schema(&schema)),
        Err(error) => panic!("{}", error),
    }
}

/// A small tree built in code:
///
/// ```text
/// [0]       tool.set preset:"prim.cube" mode:on
/// [1]       Block "Setup"
/// [1;0]       Block "Inner"
/// [1;0;0]       select.drop type:item
/// [1;1]       item.name name:Cube
/// [2]       select.drop type:polygon
/// [3]       transform.channel name:pos.X value:0.5
/// ```
pub fn sample_document() -> MacroDocument {
    let with = |name: &str, args: &[(&str, &str)]| {
        let mut node = command(name);
        if let Node::Command(cmd) = &mut node {
            for (arg, value) in args {
                cmd.set_argument(arg, *value);
            }
        }
        node
    };

    let inner = Block::with_children("Inner", vec![with("select.drop", &[("type", "item")])]);
    let setup = Block::with_children(
        "Setup",
        vec![Node::Block(inner), with("item.name", &[("name", "Cube")])],
    );
    MacroDocument::with_children(vec![
        with("tool.set", &[("preset", "prim.cube"), ("mode", "on")]),
        Node::Block(setup),
        with("select.drop", &[("type", "polygon")]),
        with("transform.channel", &[("name", "pos.X"), ("value", "0.5")]),
    ])
}
