//! Splitting a paragraph into text blocks and standalone images.
//!
//! Markdown lets an image sit inside a paragraph like any other inline node.
//! The block API cannot put an image inside rich text, so each image child
//! becomes its own block and the text around it is grouped into paragraphs.

use crate::ast::Phrasing;
use crate::block::{self, Block, RichText};
use crate::inline::{Style, resolve_inline};

/// One output unit of a split paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    RichText(Vec<RichText>),
    Image(String),
}

impl From<Segment> for Block {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::RichText(text) => block::paragraph(text),
            Segment::Image(url) => block::image(url),
        }
    }
}

/// Split a paragraph's direct children into paragraph and image blocks,
/// preserving left-to-right order.
pub fn segment_paragraph(children: &[Phrasing]) -> Vec<Block> {
    segments(children).into_iter().map(Block::from).collect()
}

fn segments(children: &[Phrasing]) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut pending: Vec<RichText> = Vec::new();

    for child in children {
        match child {
            Phrasing::Image { url, .. } => {
                if !pending.is_empty() {
                    out.push(Segment::RichText(std::mem::take(&mut pending)));
                }
                out.push(Segment::Image(url.clone()));
            }
            other => pending.extend(resolve_inline(other, Style::default())),
        }
    }

    if !pending.is_empty() {
        out.push(Segment::RichText(pending));
    }

    out
}
