//! Tree listing printed by `lxm inspect`
//!
//! One line per node in document order: the node's path, then the node indented by depth.
//! Argument values are shown the way the host displays them, so hinted integers appear as
//! their labels. Effective suppression is shown, not just the local flag.

use lxm_parser::lxm::{MacroDocument, Node};

pub fn render_tree(doc: &MacroDocument) -> String {
    let mut out = String::new();
    doc.visit(|path, node, suppressed| {
        let indent = "  ".repeat(path.depth().saturating_sub(1));
        let mut line = format!("{:<10}{}", path.to_string(), indent);
        match node {
            Node::Command(command) => {
                line.push_str(command.prefix.as_str());
                line.push_str(&command.name);
                for arg in &command.arguments {
                    if let Some(value) = arg.display_value() {
                        line.push_str(&format!(" {}={}", arg.name(), value));
                    }
                }
            }
            Node::Block(block) => line.push_str(&format!("[{}]", block.name)),
        }
        let header = node.header();
        if !header.display_name.is_empty() {
            line.push_str(&format!("  \"{}\"", header.display_name));
        }
        if suppressed {
            line.push_str("  (suppressed)");
        }
        out.push_str(&line);
        out.push('\n');
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lxm_parser::lxm::testing::Samples;

    #[test]
    fn test_render_tree() {
        let listing = render_tree(&Samples::blocks().parse());
        assert_eq!(
            listing,
            "\
0         tool.set preset=prim.cube mode=on  \"Make Cube\"
1         [Setup]
1;0         select.drop type=item  (suppressed)
1;1         [Naming]
1;1;0         item.name name=Box 01 type=mesh
2         [Disabled]  (suppressed)
2;0         !tool.attr tool=prim.cube attr=sizeX value=500 500  (suppressed)
3         tool.doApply
"
        );
    }
}
