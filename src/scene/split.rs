use crate::scene::tree::{NodeId, SceneTree};

/// Class given to each generated word span.
pub const WORD_CLASS: &str = "word";

/// Split an element's own text into one `span.word` child per whitespace-separated word.
///
/// Words stay in flow (no absolute positioning). Calling this again on an already split
/// element returns the existing spans, so the result is stable across calls.
pub fn split_words(tree: &mut SceneTree, node: NodeId) -> Vec<NodeId> {
    let existing: Vec<NodeId> = tree
        .children(node)
        .iter()
        .copied()
        .filter(|&c| tree.has_class(c, WORD_CLASS))
        .collect();
    if !existing.is_empty() {
        return existing;
    }

    let text = tree.text(node).to_owned();
    let mut words = Vec::new();
    for word in text.split_whitespace() {
        match tree.append_text_element(node, "span", &[WORD_CLASS], word) {
            Ok(id) => words.push(id),
            Err(e) => {
                tracing::warn!(node = node.0, error = %e, "word split stopped early");
                break;
            }
        }
    }
    if !words.is_empty() {
        tree.set_text(node, "");
    }
    words
}

/// Split every element in `nodes`, concatenating their words in order.
pub fn split_all(tree: &mut SceneTree, nodes: &[NodeId]) -> Vec<NodeId> {
    nodes.iter().flat_map(|&n| split_words(tree, n)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/split.rs"]
mod tests;
