use log::{debug, trace};
use thiserror::Error;

use crate::ast::{ListItem, Node, Phrasing, Root};
use crate::block::{self, Annotations, Block, RichText};
use crate::inline::{Style, resolve_children};
use crate::paragraph::segment_paragraph;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// Inline-only conversion needs a document made of exactly one paragraph.
    #[error("unsupported markdown for inline text: expected a single paragraph, found {found}")]
    UnsupportedInput { found: String },
}

/// Convert every top-level node of a document into blocks.
pub fn convert_document(root: &Root) -> Vec<Block> {
    let blocks: Vec<Block> = root.children.iter().flat_map(dispatch_node).collect();
    debug!(
        "converted {} top-level nodes into {} blocks",
        root.children.len(),
        blocks.len()
    );
    blocks
}

/// Convert a single-paragraph document into rich text, for targets such as
/// page titles that accept no block structure.
pub fn convert_inline_only(root: &Root) -> Result<Vec<RichText>, ConvertError> {
    match root.children.as_slice() {
        [Node::Paragraph { children }] => Ok(inline_text(children)),
        [other] => Err(ConvertError::UnsupportedInput {
            found: format!("a single `{}` node", other.kind()),
        }),
        children => Err(ConvertError::UnsupportedInput {
            found: format!("{} top-level nodes", children.len()),
        }),
    }
}

/// Map one block-level node to zero or more output blocks.
pub fn dispatch_node(node: &Node) -> Vec<Block> {
    match node {
        Node::Heading { depth, children } => vec![heading(*depth, inline_text(children))],
        Node::Paragraph { children } => segment_paragraph(children),
        Node::Code { value, .. } => vec![code(value)],
        // Blockquotes have no block of their own; their content is flattened
        Node::Blockquote { children } => children.iter().flat_map(dispatch_node).collect(),
        Node::List { start, children } => list(start.is_some(), children),
        other => {
            trace!("skipping block node `{}`", other.kind());
            Vec::new()
        }
    }
}

fn inline_text(children: &[Phrasing]) -> Vec<RichText> {
    resolve_children(children, Style::default())
}

fn heading(depth: u8, text: Vec<RichText>) -> Block {
    match depth {
        1 => block::heading_one(text),
        2 => block::heading_two(text),
        _ => block::heading_three(text),
    }
}

fn code(value: &str) -> Block {
    let annotations = Annotations {
        code: true,
        ..Default::default()
    };
    block::paragraph(vec![RichText::new(value, annotations, None)])
}

fn list(ordered: bool, items: &[ListItem]) -> Vec<Block> {
    items
        .iter()
        .filter_map(|item| {
            // Only the leading paragraph of an item is converted; list items
            // get no image splitting.
            let Some(Node::Paragraph { children }) = item.children.first() else {
                trace!("skipping list item without a leading paragraph");
                return None;
            };
            let text = inline_text(children);

            Some(if ordered {
                block::numbered_list_item(text)
            } else if let Some(checked) = item.checked {
                block::to_do(checked, text)
            } else {
                block::bulleted_list_item(text)
            })
        })
        .collect()
}
