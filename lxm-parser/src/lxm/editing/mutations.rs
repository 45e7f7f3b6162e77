//! Structural mutations and attribute setters
//!
//!     Structural edits address nodes by path and work on the parent's child list:
//!
//!     - `insert` / `insert_many`: new nodes at an index of a container
//!     - `delete` / `delete_many`: removal together with all descendants
//!     - `collapse`: removal of a block whose children take its place
//!     - `move_node`: removal then insertion, the subtree travels unchanged
//!     - `wrap` / `unwrap`: grouping siblings into a new block and putting them back
//!
//!     Attribute setters swap one field and hand back the previous value.

use super::error::EditError;
use super::selection::walk_headers_mut;
use crate::lxm::ast::{Block, Command, MacroDocument, Node, NodeHeader, NodePath, Prefix};
use serde_json::{Map, Value};

/// A block removed by [`MacroDocument::collapse`]. Its children stayed in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedBlock {
    /// The block with an empty child list.
    pub shell: Block,
    pub child_count: usize,
}

/// Nodes that could not be put back, returned to the caller untouched.
#[derive(Debug)]
pub(crate) struct RestoreFailure {
    pub error: EditError,
    pub entries: Vec<(NodePath, Node)>,
}

/// Split a node path into its parent and sibling index.
fn split(path: &NodePath) -> Result<(NodePath, usize), EditError> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(EditError::InvalidPath(path.clone())),
    }
}

fn has_primary(node: &Node) -> bool {
    node.header().is_primary() || node.children().iter().any(has_primary)
}

/// Sort, deduplicate and drop paths that lie below another path of the set.
pub fn normalize_paths(paths: &[NodePath]) -> Vec<NodePath> {
    let mut sorted = paths.to_vec();
    sorted.sort();
    sorted.dedup();
    let mut kept: Vec<NodePath> = Vec::with_capacity(sorted.len());
    for path in sorted {
        // Ancestors sort first, so only the last kept path can contain this one
        if !kept.last().is_some_and(|last| last.is_ancestor_of(&path)) {
            kept.push(path);
        }
    }
    kept
}

impl MacroDocument {
    fn container_len(&self, parent: &NodePath) -> Result<usize, EditError> {
        if !parent.is_root() && self.node_at(parent).is_none() {
            return Err(EditError::InvalidPath(parent.clone()));
        }
        self.children_at(parent)
            .map(<[Node]>::len)
            .ok_or_else(|| EditError::NotAContainer(parent.clone()))
    }

    fn container_mut(&mut self, parent: &NodePath) -> Result<&mut Vec<Node>, EditError> {
        if !parent.is_root() && self.node_at(parent).is_none() {
            return Err(EditError::InvalidPath(parent.clone()));
        }
        self.children_at_mut(parent)
            .ok_or_else(|| EditError::NotAContainer(parent.clone()))
    }

    fn ensure_node(&self, path: &NodePath) -> Result<&Node, EditError> {
        self.node_at(path)
            .ok_or_else(|| EditError::InvalidPath(path.clone()))
    }

    fn header_at_mut(&mut self, path: &NodePath) -> Result<&mut NodeHeader, EditError> {
        self.node_at_mut(path)
            .map(Node::header_mut)
            .ok_or_else(|| EditError::InvalidPath(path.clone()))
    }

    fn command_at_mut(&mut self, path: &NodePath) -> Result<&mut Command, EditError> {
        match self.node_at_mut(path) {
            Some(Node::Command(command)) => Ok(command),
            Some(_) => Err(EditError::NotACommand(path.clone())),
            None => Err(EditError::InvalidPath(path.clone())),
        }
    }

    fn block_at_mut(&mut self, path: &NodePath) -> Result<&mut Block, EditError> {
        match self.node_at_mut(path) {
            Some(Node::Block(block)) => Ok(block),
            Some(_) => Err(EditError::NotABlock(path.clone())),
            None => Err(EditError::InvalidPath(path.clone())),
        }
    }

    /// Check that `index` is a valid insertion index of the container at `parent`.
    pub fn check_insert(&self, parent: &NodePath, index: usize) -> Result<(), EditError> {
        let len = self.container_len(parent)?;
        if index > len {
            return Err(EditError::IndexOutOfRange {
                parent: parent.clone(),
                index,
                len,
            });
        }
        Ok(())
    }

    /// Insert `node` as child `index` of the container at `parent`.
    ///
    /// Selection flags are kept, except that an inserted primary mark is dropped when the
    /// document already has a primary node.
    pub fn insert(
        &mut self,
        parent: &NodePath,
        index: usize,
        node: Node,
    ) -> Result<NodePath, EditError> {
        self.insert_many(parent, index, vec![node])?;
        Ok(parent.child(index))
    }

    /// Insert consecutive children starting at `index`. Returns their paths.
    pub fn insert_many(
        &mut self,
        parent: &NodePath,
        index: usize,
        mut nodes: Vec<Node>,
    ) -> Result<Vec<NodePath>, EditError> {
        self.check_insert(parent, index)?;
        let mut primary_taken = self.primary().is_some();
        for node in &mut nodes {
            if primary_taken {
                walk_headers_mut(std::slice::from_mut(node), &mut |header| {
                    header.primary = false
                });
            } else {
                primary_taken = has_primary(node);
            }
        }

        let count = nodes.len();
        let siblings = self.container_mut(parent)?;
        siblings.splice(index..index, nodes);
        self.unsaved_changes = true;
        Ok((index..index + count).map(|i| parent.child(i)).collect())
    }

    /// Remove the node at `path` with all its descendants.
    pub fn delete(&mut self, path: &NodePath) -> Result<Node, EditError> {
        let (parent, index) = split(path)?;
        self.ensure_node(path)?;
        let node = self.container_mut(&parent)?.remove(index);
        self.unsaved_changes = true;
        Ok(node)
    }

    /// Remove several nodes at once. Paths below another given path go with their ancestor.
    ///
    /// Returns the removed nodes with their original paths, in document order. Putting them
    /// back in that order restores the tree.
    pub fn delete_many(
        &mut self,
        paths: &[NodePath],
    ) -> Result<Vec<(NodePath, Node)>, EditError> {
        if paths.is_empty() {
            return Err(EditError::EmptySelection);
        }
        for path in paths {
            self.ensure_node(path)?;
        }
        let targets = normalize_paths(paths);
        let mut removed = Vec::with_capacity(targets.len());
        // Removing from the back keeps the earlier paths valid
        for path in targets.iter().rev() {
            removed.push((path.clone(), self.delete(path)?));
        }
        removed.reverse();
        Ok(removed)
    }

    /// Put back nodes taken out by [`delete_many`](Self::delete_many).
    ///
    /// On failure the nodes already reinserted are taken out again and every entry is handed
    /// back, so the document is unchanged.
    pub(crate) fn restore_nodes(
        &mut self,
        entries: Vec<(NodePath, Node)>,
    ) -> Result<(), RestoreFailure> {
        let mut pending = entries.into_iter();
        let mut inserted: Vec<NodePath> = Vec::new();

        while let Some((path, node)) = pending.next() {
            let checked =
                split(&path).and_then(|(parent, index)| self.check_insert(&parent, index));
            if let Err(error) = checked {
                let mut entries = Vec::new();
                for done in inserted.iter().rev() {
                    if let Ok(node) = self.delete(done) {
                        entries.push((done.clone(), node));
                    }
                }
                entries.reverse();
                entries.push((path, node));
                entries.extend(pending);
                return Err(RestoreFailure { error, entries });
            }
            if let Ok((parent, index)) = split(&path) {
                if let Some(siblings) = self.children_at_mut(&parent) {
                    siblings.insert(index, node);
                }
            }
            inserted.push(path);
        }
        self.unsaved_changes = true;
        Ok(())
    }

    /// Remove the block at `path`, moving its children into its place.
    pub fn collapse(&mut self, path: &NodePath) -> Result<CollapsedBlock, EditError> {
        let (parent, index) = split(path)?;
        if !self.ensure_node(path)?.is_block() {
            return Err(EditError::NotABlock(path.clone()));
        }
        let siblings = self.container_mut(&parent)?;
        let mut shell = match siblings.remove(index) {
            Node::Block(block) => block,
            other => {
                siblings.insert(index, other);
                return Err(EditError::NotABlock(path.clone()));
            }
        };
        let children = std::mem::take(&mut shell.children);
        let child_count = children.len();
        siblings.splice(index..index, children);
        self.unsaved_changes = true;
        Ok(CollapsedBlock { shell, child_count })
    }

    /// Inverse of [`collapse`](Self::collapse): move `count` siblings starting at `first` into
    /// `block`, which takes their place. The block's own children are replaced.
    pub fn group_range(
        &mut self,
        first: &NodePath,
        count: usize,
        mut block: Block,
    ) -> Result<NodePath, EditError> {
        let (parent, index) = split(first)?;
        let len = self.container_len(&parent)?;
        if index + count > len {
            return Err(EditError::IndexOutOfRange {
                parent,
                index: index + count,
                len,
            });
        }
        let siblings = self.container_mut(&parent)?;
        block.children = siblings.drain(index..index + count).collect();
        siblings.insert(index, Node::Block(block));
        self.unsaved_changes = true;
        Ok(first.clone())
    }

    /// Move the node at `from` to child `to_index` of `to_parent`.
    ///
    /// The destination is addressed in the tree as it is once the node has been taken out,
    /// so a node can never be moved below itself. Returns the node's new path.
    pub fn move_node(
        &mut self,
        from: &NodePath,
        to_parent: &NodePath,
        to_index: usize,
    ) -> Result<NodePath, EditError> {
        let (from_parent, _) = split(from)?;
        self.ensure_node(from)?;

        let parent_now = to_parent.before_removal(from);
        let mut len = match self.container_len(&parent_now) {
            Ok(len) => len,
            Err(EditError::NotAContainer(_)) => {
                return Err(EditError::NotAContainer(to_parent.clone()))
            }
            Err(_) => return Err(EditError::InvalidPath(to_parent.clone())),
        };
        if parent_now == from_parent {
            len -= 1;
        }
        if to_index > len {
            return Err(EditError::IndexOutOfRange {
                parent: to_parent.clone(),
                index: to_index,
                len,
            });
        }

        let node = self.delete(from)?;
        self.container_mut(to_parent)?.insert(to_index, node);
        Ok(to_parent.child(to_index))
    }

    /// Group sibling nodes into a new block named `name`.
    ///
    /// The nodes need not be contiguous. The block takes the place of the first of them and
    /// holds them in their original order. Returns the block's path.
    pub fn wrap(&mut self, paths: &[NodePath], name: &str) -> Result<NodePath, EditError> {
        self.wrap_with(paths, Block::new(name))
    }

    /// [`wrap`](Self::wrap) into a prepared block. The block's own children are replaced.
    pub fn wrap_with(&mut self, paths: &[NodePath], mut block: Block) -> Result<NodePath, EditError> {
        let targets = self.sibling_set(paths)?;
        let (parent, first) = split(&targets[0])?;
        let siblings = self.container_mut(&parent)?;

        let mut wrapped = Vec::with_capacity(targets.len());
        for index in targets.iter().rev().filter_map(NodePath::last) {
            wrapped.push(siblings.remove(index));
        }
        wrapped.reverse();
        block.children = wrapped;
        siblings.insert(first, Node::Block(block));
        self.unsaved_changes = true;
        Ok(parent.child(first))
    }

    /// Inverse of [`wrap`](Self::wrap): remove the block at `path` and put its children back
    /// at `originals`, the sibling paths they had before wrapping. Returns the empty block.
    pub fn unwrap(&mut self, path: &NodePath, originals: &[NodePath]) -> Result<Block, EditError> {
        let (parent, index) = split(path)?;
        let count = match self.ensure_node(path)? {
            Node::Block(block) => block.children.len(),
            _ => return Err(EditError::NotABlock(path.clone())),
        };
        if originals.len() != count {
            return Err(EditError::ChildCountMismatch {
                path: path.clone(),
                expected: originals.len(),
                found: count,
            });
        }

        let remaining = self.container_len(&parent)? - 1;
        let mut previous: Option<usize> = None;
        for (k, original) in originals.iter().enumerate() {
            if original.parent().as_ref() != Some(&parent) {
                return Err(EditError::NotSiblings(path.clone(), original.clone()));
            }
            let target = original.last().unwrap_or_default();
            if previous.is_some_and(|p| target <= p) || target > remaining + k {
                return Err(EditError::IndexOutOfRange {
                    parent: parent.clone(),
                    index: target,
                    len: remaining + k,
                });
            }
            previous = Some(target);
        }

        let siblings = self.container_mut(&parent)?;
        let mut block = match siblings.remove(index) {
            Node::Block(block) => block,
            other => {
                siblings.insert(index, other);
                return Err(EditError::NotABlock(path.clone()));
            }
        };
        let children = std::mem::take(&mut block.children);
        for (child, target) in children.into_iter().zip(originals.iter().filter_map(NodePath::last)) {
            siblings.insert(target, child);
        }
        self.unsaved_changes = true;
        Ok(block)
    }

    fn sibling_set(&self, paths: &[NodePath]) -> Result<Vec<NodePath>, EditError> {
        let first = paths.first().ok_or(EditError::EmptySelection)?;
        for path in paths {
            self.ensure_node(path)?;
            if path.parent() != first.parent() {
                return Err(EditError::NotSiblings(first.clone(), path.clone()));
            }
        }
        let mut targets = paths.to_vec();
        targets.sort();
        targets.dedup();
        Ok(targets)
    }

    pub fn set_suppressed(&mut self, path: &NodePath, suppressed: bool) -> Result<bool, EditError> {
        let header = self.header_at_mut(path)?;
        let previous = std::mem::replace(&mut header.suppressed_directly, suppressed);
        self.unsaved_changes = true;
        Ok(previous)
    }

    /// Set argument `index` of the command at `path`. Returns the previous value and string
    /// override. An unset argument carries no override.
    pub fn set_argument(
        &mut self,
        path: &NodePath,
        index: usize,
        value: Option<String>,
        as_string: bool,
    ) -> Result<(Option<String>, bool), EditError> {
        let command = self.command_at_mut(path)?;
        let argument = command
            .arguments
            .get_mut(index)
            .ok_or_else(|| EditError::ArgumentOutOfRange {
                path: path.clone(),
                index,
            })?;
        let previous = (
            std::mem::replace(&mut argument.value, value),
            std::mem::replace(
                &mut argument.as_string_override,
                as_string && argument.value.is_some(),
            ),
        );
        self.unsaved_changes = true;
        Ok(previous)
    }

    pub fn set_prefix(&mut self, path: &NodePath, prefix: Prefix) -> Result<Prefix, EditError> {
        let command = self.command_at_mut(path)?;
        let previous = std::mem::replace(&mut command.prefix, prefix);
        self.unsaved_changes = true;
        Ok(previous)
    }

    pub fn rename_block(
        &mut self,
        path: &NodePath,
        name: impl Into<String>,
    ) -> Result<String, EditError> {
        let block = self.block_at_mut(path)?;
        let previous = std::mem::replace(&mut block.name, name.into());
        self.unsaved_changes = true;
        Ok(previous)
    }

    pub fn set_display_name(
        &mut self,
        path: &NodePath,
        name: impl Into<String>,
    ) -> Result<String, EditError> {
        let header = self.header_at_mut(path)?;
        let previous = std::mem::replace(&mut header.display_name, name.into());
        self.unsaved_changes = true;
        Ok(previous)
    }

    pub fn set_comments(
        &mut self,
        path: &NodePath,
        comments: Vec<String>,
    ) -> Result<Vec<String>, EditError> {
        let header = self.header_at_mut(path)?;
        let previous = std::mem::replace(&mut header.comments_before, comments);
        self.unsaved_changes = true;
        Ok(previous)
    }

    /// Replace the whole metadata map, which keeps entry order exact across undo.
    pub fn set_metadata(
        &mut self,
        path: &NodePath,
        metadata: Map<String, Value>,
    ) -> Result<Map<String, Value>, EditError> {
        let header = self.header_at_mut(path)?;
        let previous = std::mem::replace(&mut header.metadata, metadata);
        self.unsaved_changes = true;
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lxm::testing::{command, sample_document};

    fn names(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(Node::label).collect()
    }

    #[test]
    fn test_insert_shifts_later_siblings() {
        let mut doc = sample_document();
        let before = doc.paths();
        let path = doc
            .insert(&NodePath::root(), 1, command("select.drop"))
            .unwrap();
        assert_eq!(path, NodePath::from([1]));
        for old in before {
            let node = doc.node_at(&old.after_insert(&path)).map(Node::label);
            assert!(node.is_some(), "lost {}", old);
        }
        assert!(doc.unsaved_changes);
    }

    #[test]
    fn test_insert_rejects_bad_targets() {
        let mut doc = sample_document();
        let len = doc.children.len();
        assert_eq!(
            doc.insert(&NodePath::root(), len + 1, command("select.drop")),
            Err(EditError::IndexOutOfRange {
                parent: NodePath::root(),
                index: len + 1,
                len
            })
        );
        assert_eq!(
            doc.insert(&NodePath::from([0]), 0, command("select.drop")),
            Err(EditError::NotAContainer(NodePath::from([0])))
        );
        assert_eq!(
            doc.insert(&NodePath::from([9]), 0, command("select.drop")),
            Err(EditError::InvalidPath(NodePath::from([9])))
        );
    }

    #[test]
    fn test_delete_discards_descendants_and_collapse_keeps_them() {
        let mut deleted = sample_document();
        let mut collapsed = sample_document();
        let block = NodePath::from([1]);
        let block_children = deleted.node_at(&block).unwrap().children().len();
        let total = deleted.children.len();

        deleted.delete(&block).unwrap();
        assert_eq!(deleted.children.len(), total - 1);

        let result = collapsed.collapse(&block).unwrap();
        assert_eq!(result.child_count, block_children);
        assert!(result.shell.children.is_empty());
        assert_eq!(collapsed.children.len(), total - 1 + block_children);
    }

    #[test]
    fn test_collapse_then_group_range_restores() {
        let original = sample_document();
        let mut doc = original.clone();
        let block = NodePath::from([1]);
        let collapsed = doc.collapse(&block).unwrap();
        doc.group_range(&block, collapsed.child_count, collapsed.shell)
            .unwrap();
        doc.unsaved_changes = false;
        assert_eq!(doc, original);
    }

    #[test]
    fn test_delete_many_then_restore() {
        let original = sample_document();
        let mut doc = original.clone();
        let removed = doc
            .delete_many(&[
                NodePath::from([2]),
                NodePath::from([0]),
                NodePath::from([1, 0]),
                NodePath::from([1, 0, 0]),
            ])
            .unwrap();
        assert_eq!(removed.len(), 3);
        doc.restore_nodes(removed).unwrap();
        doc.unsaved_changes = false;
        assert_eq!(doc, original);
    }

    #[test]
    fn test_move_node_within_and_across_containers() {
        let mut doc = sample_document();
        let first = doc.children[0].clone();
        // Down by one at the root
        let landed = doc.move_node(&NodePath::from([0]), &NodePath::root(), 1).unwrap();
        assert_eq!(landed, NodePath::from([1]));
        assert_eq!(doc.children[1], first);

        // Into the block, which sits at [0] once the moved node is out of the way
        let landed = doc
            .move_node(&NodePath::from([1]), &NodePath::from([0]), 0)
            .unwrap();
        assert_eq!(landed, NodePath::from([0, 0]));
        assert_eq!(doc.node_at(&landed), Some(&first));
    }

    #[test]
    fn test_move_validates_before_removing() {
        let original = sample_document();
        let mut doc = original.clone();
        let len = doc.children.len();
        assert!(matches!(
            doc.move_node(&NodePath::from([0]), &NodePath::root(), len),
            Err(EditError::IndexOutOfRange { .. })
        ));
        assert_eq!(doc, original);
    }

    #[test]
    fn test_wrap_non_contiguous_then_unwrap() {
        let original = sample_document();
        let mut doc = original.clone();
        let targets = [NodePath::from([0]), NodePath::from([2])];
        let labels = vec![
            original.children[0].label().to_string(),
            original.children[2].label().to_string(),
        ];

        let block = doc.wrap(&targets, "Grouped").unwrap();
        assert_eq!(block, NodePath::from([0]));
        assert_eq!(names(doc.node_at(&block).unwrap().children()), labels);
        assert_eq!(doc.children[1], original.children[1]);

        let shell = doc.unwrap(&block, &targets).unwrap();
        assert_eq!(shell.name, "Grouped");
        doc.unsaved_changes = false;
        assert_eq!(doc, original);
    }

    #[test]
    fn test_wrap_requires_siblings() {
        let mut doc = sample_document();
        assert_eq!(doc.wrap(&[], "X"), Err(EditError::EmptySelection));
        assert!(matches!(
            doc.wrap(&[NodePath::from([0]), NodePath::from([1, 0])], "X"),
            Err(EditError::NotSiblings(..))
        ));
    }

    #[test]
    fn test_attribute_setters_return_previous_values() {
        let mut doc = sample_document();
        let cmd = NodePath::from([0]);
        assert_eq!(doc.set_suppressed(&cmd, true), Ok(false));
        assert_eq!(doc.set_prefix(&cmd, Prefix::Bang), Ok(Prefix::None));
        let (value, _) = doc
            .set_argument(&cmd, 0, Some("prim.sphere".into()), false)
            .unwrap();
        assert_eq!(value.as_deref(), Some("prim.cube"));
        doc.set_argument(&cmd, 2, None, true).unwrap();
        assert!(!doc.children[0].as_command().unwrap().arguments[2].as_string_override);
        assert_eq!(
            doc.set_argument(&cmd, 99, None, false),
            Err(EditError::ArgumentOutOfRange {
                path: cmd.clone(),
                index: 99
            })
        );
        assert_eq!(
            doc.rename_block(&cmd, "nope"),
            Err(EditError::NotABlock(cmd.clone()))
        );
        assert_eq!(doc.rename_block(&NodePath::from([1]), "Renamed"), Ok("Setup".into()));
        assert_eq!(
            doc.set_prefix(&NodePath::from([1]), Prefix::Bang),
            Err(EditError::NotACommand(NodePath::from([1])))
        );
    }

    #[test]
    fn test_normalize_paths() {
        let paths = [
            NodePath::from([1, 2]),
            NodePath::from([1]),
            NodePath::from([0]),
            NodePath::from([0]),
            NodePath::from([2, 0]),
        ];
        assert_eq!(
            normalize_paths(&paths),
            vec![NodePath::from([0]), NodePath::from([1]), NodePath::from([2, 0])]
        );
    }
}
