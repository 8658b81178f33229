//! Plain-text tree display via `termtree`.

use termtree::Tree as TextTree;

use crate::application::labels::{node_label, Labeler};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Tree;

/// Deepest tree, in levels, the text display accepts.
///
/// `termtree` nests one value per level and recurses when printing and
/// dropping, so deeper trees are rejected up front.
pub const MAX_TEXT_DEPTH: usize = 512;

/// Build a printable text tree; `None` for an empty tree.
///
/// Lines of a multi-line label are joined with " / "; a node whose label
/// could not be produced at all is shown as "?". Trees taller than
/// [`MAX_TEXT_DEPTH`] fail with [`ApplicationError::TooDeep`].
pub fn text_tree<I, P, L>(
    tree: &Tree<I, P>,
    labeler: &L,
) -> ApplicationResult<Option<TextTree<String>>>
where
    L: Labeler<I, P> + ?Sized,
{
    let Some(root) = tree.root.as_ref() else {
        return Ok(None);
    };
    let height = root.height();
    if height > MAX_TEXT_DEPTH {
        return Err(ApplicationError::TooDeep {
            height,
            limit: MAX_TEXT_DEPTH,
        });
    }

    let mut finished: Vec<TextTree<String>> = Vec::new();

    for (node, _) in root.iter_postorder() {
        let lines = node_label(node, labeler);
        let label = if lines.is_empty() {
            "?".to_string()
        } else {
            lines.join(" / ")
        };
        let leaves = finished.split_off(finished.len() - node.children.len());
        finished.push(TextTree::new(label).with_leaves(leaves));
    }

    Ok(finished.pop())
}
