//! Parsing the vetted fixtures into trees

use lxm_parser::lxm::testing::{assert_macro, sample_schema, Samples};
use lxm_parser::lxm::{parse_macro, ArgumentParseError, FileFormat, LxmError, ParseOptions, Prefix};
use serde_json::json;

#[test]
fn test_basic_fixture() {
    let doc = Samples::basic().parse();
    assert_macro(&doc)
        .format(FileFormat::Script)
        .item_count(2)
        .node(0, |node| {
            node.suppressed(false)
                .assert_command()
                .name("tool.set")
                .prefix(Prefix::None)
                .argument_count(3)
                .argument("preset", Some("prim.cube"))
                .argument("mode", Some("on"))
                .argument("task", None)
                .as_string("preset", false)
        })
        .node(1, |node| node.assert_command().name("select.drop").argument("type", Some("item")));
}

#[test]
fn test_blocks_fixture() {
    let doc = Samples::blocks().parse();
    assert_macro(&doc)
        .item_count(4)
        .node(0, |node| {
            node.comments(&["Build the primitive"])
                .display_name("Make Cube")
                .assert_command()
                .name("tool.set")
        })
        .node(1, |node| {
            node.suppressed(false)
                .assert_block()
                .name("Setup")
                .child_count(2)
                .child(0, |child| {
                    child
                        .suppressed(true)
                        .effectively_suppressed(true)
                        .assert_command()
                        .name("select.drop")
                })
                .child(1, |child| {
                    child.assert_block().name("Naming").child(0, |cmd| {
                        cmd.effectively_suppressed(false)
                            .assert_command()
                            .name("item.name")
                            .argument("name", Some("Box 01"))
                            .argument("type", Some("mesh"))
                    })
                })
        })
        .node(2, |node| {
            node.suppressed(true).assert_block().name("Disabled").child(0, |child| {
                child
                    .suppressed(false)
                    .effectively_suppressed(true)
                    .comments(&["inner note"])
                    .assert_command()
                    .prefix(Prefix::Bang)
                    .argument("tool", Some("prim.cube"))
                    .argument("attr", Some("sizeX"))
                    .argument("value", Some("500 500"))
            })
        })
        .node(3, |node| {
            node.meta("color", json!("red"))
                .meta("tags", json!(["a", "b"]))
                .assert_command()
                .name("tool.doApply")
                .argument_count(0)
        });

    let keys: Vec<&String> = doc.children[3].header().metadata.keys().collect();
    assert_eq!(keys, ["color", "tags"]);
}

#[test]
fn test_embedded_fixture() {
    let doc = Samples::embedded().parse();
    assert_macro(&doc)
        .format(FileFormat::EmbeddedScript)
        .item_count(2)
        .node(0, |node| {
            node.comments(&["Build the primitive"])
                .assert_command()
                .argument("preset", Some("prim.cube"))
                .argument("mode", Some("on"))
        })
        .node(1, |node| {
            node.assert_block()
                .name("Cleanup")
                .child(0, |child| child.suppressed(true).assert_command().name("select.drop"))
                .child(1, |child| child.assert_command().prefix(Prefix::DoubleBang))
        });
}

#[test]
fn test_loose_fixture_needs_permissive_mode() {
    let strict = Samples::loose().try_parse(&ParseOptions::default());
    assert!(matches!(
        strict,
        Err(LxmError::Argument {
            line: 7,
            error: ArgumentParseError::TooManyArguments { .. },
            ..
        })
    ));

    let output = Samples::loose()
        .try_parse(&ParseOptions::permissive())
        .unwrap();
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].line, 7);

    assert_macro(&output.document)
        .item_count(2)
        .node(0, |node| {
            node.comments(&[])
                .assert_command()
                .argument("type", Some("vertex"))
                .as_string("type", true)
        })
        .node(1, |node| {
            node.comments(&[""])
                .assert_block()
                .name("Tail")
                .child_count(1)
                .child(0, |child| child.comments(&[]))
        });
}

#[test]
fn test_positional_arguments_fill_schema_order() {
    let source = "#LXMacro#\ntool.attr prim.cube sizeX value:2\n";
    let doc = parse_macro(source, &sample_schema(), &ParseOptions::default())
        .unwrap()
        .document;
    assert_macro(&doc).node(0, |node| {
        node.assert_command()
            .argument("tool", Some("prim.cube"))
            .argument("attr", Some("sizeX"))
            .argument("value", Some("2"))
    });
}
