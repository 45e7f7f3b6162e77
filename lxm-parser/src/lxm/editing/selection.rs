//! Selection and the primary node
//!
//! Selection is plain node state: every node carries a `selected` flag, and at most one
//! selected node is the primary, the anchor for "insert after". The flags live in the nodes,
//! so they follow them through every mutation. The primary's path is looked up on demand.

use super::error::EditError;
use crate::lxm::ast::{MacroDocument, Node, NodeHeader, NodePath};

pub(super) fn walk_headers_mut(nodes: &mut [Node], f: &mut dyn FnMut(&mut NodeHeader)) {
    for node in nodes {
        f(node.header_mut());
        if let Some(children) = node.children_mut() {
            walk_headers_mut(children, f);
        }
    }
}

impl MacroDocument {
    /// Select or deselect one node. Deselecting the primary node also clears the primary.
    pub fn select(&mut self, path: &NodePath, selected: bool) -> Result<(), EditError> {
        let header = self
            .node_at_mut(path)
            .map(Node::header_mut)
            .ok_or_else(|| EditError::InvalidPath(path.clone()))?;
        header.selected = selected;
        if !selected {
            header.primary = false;
        }
        Ok(())
    }

    pub fn deselect_all(&mut self) {
        walk_headers_mut(&mut self.children, &mut |header| {
            header.selected = false;
            header.primary = false;
        });
    }

    /// Make the node at `path` the primary node. It becomes selected too.
    pub fn set_primary(&mut self, path: &NodePath) -> Result<(), EditError> {
        if self.node_at(path).is_none() {
            return Err(EditError::InvalidPath(path.clone()));
        }
        self.clear_primary();
        if let Some(node) = self.node_at_mut(path) {
            let header = node.header_mut();
            header.selected = true;
            header.primary = true;
        }
        Ok(())
    }

    pub fn clear_primary(&mut self) {
        walk_headers_mut(&mut self.children, &mut |header| header.primary = false);
    }

    pub fn primary(&self) -> Option<NodePath> {
        self.find_path(|node| node.header().is_primary())
    }

    /// Paths of all selected nodes, in document order.
    pub fn selected_paths(&self) -> Vec<NodePath> {
        let mut paths = Vec::new();
        self.visit(|path, node, _| {
            if node.header().selected {
                paths.push(path.clone());
            }
        });
        paths
    }

    /// Where new nodes go: right after the primary node, or at the end of the root.
    pub fn insertion_point(&self) -> (NodePath, usize) {
        match self.primary() {
            Some(primary) => (
                primary.parent().unwrap_or_default(),
                primary.last().map_or(0, |index| index + 1),
            ),
            None => (NodePath::root(), self.children.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lxm::testing::{command, sample_document};

    #[test]
    fn test_single_primary() {
        let mut doc = sample_document();
        doc.set_primary(&NodePath::from([0])).unwrap();
        doc.set_primary(&NodePath::from([1, 1])).unwrap();
        assert_eq!(doc.primary(), Some(NodePath::from([1, 1])));
        assert_eq!(
            doc.selected_paths(),
            vec![NodePath::from([0]), NodePath::from([1, 1])]
        );
    }

    #[test]
    fn test_primary_follows_its_node() {
        let mut doc = sample_document();
        doc.set_primary(&NodePath::from([2])).unwrap();
        doc.insert(&NodePath::root(), 0, command("select.drop"))
            .unwrap();
        assert_eq!(doc.primary(), Some(NodePath::from([3])));
        doc.delete(&NodePath::from([3])).unwrap();
        assert_eq!(doc.primary(), None);
    }

    #[test]
    fn test_insertion_point() {
        let mut doc = sample_document();
        assert_eq!(doc.insertion_point(), (NodePath::root(), doc.children.len()));
        doc.set_primary(&NodePath::from([1, 0])).unwrap();
        assert_eq!(doc.insertion_point(), (NodePath::from([1]), 1));
    }

    #[test]
    fn test_deselect_clears_primary() {
        let mut doc = sample_document();
        doc.set_primary(&NodePath::from([0])).unwrap();
        doc.select(&NodePath::from([0]), false).unwrap();
        assert_eq!(doc.primary(), None);

        doc.set_primary(&NodePath::from([2])).unwrap();
        doc.deselect_all();
        assert!(doc.selected_paths().is_empty());
        assert_eq!(doc.primary(), None);
    }

    #[test]
    fn test_cloned_primary_is_not_duplicated() {
        let mut doc = sample_document();
        doc.set_primary(&NodePath::from([0])).unwrap();
        let copy = doc.children[0].clone();
        doc.insert(&NodePath::root(), 0, copy).unwrap();
        assert_eq!(doc.primary(), Some(NodePath::from([1])));
    }
}
