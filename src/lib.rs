//! Convert markdown into block objects for a block-based content API.
//!
//! ```
//! let blocks = md2notion::markdown_to_blocks("# Title\n\nSome **bold** text.");
//! assert_eq!(blocks[0].kind(), "heading_1");
//! assert_eq!(blocks[1].kind(), "paragraph");
//! ```

pub mod ast;
pub mod block;
mod config;
mod convert;
mod inline;
mod paragraph;
mod parser;

pub use ast::{ListItem, Node, Phrasing, Root};
pub use block::{Annotations, Block, RichText};
pub use config::{Config, ConfigError, MarkdownConfig, OutputConfig};
pub use convert::{ConvertError, convert_document, convert_inline_only, dispatch_node};
pub use inline::{Style, resolve_children, resolve_inline};
pub use paragraph::segment_paragraph;

/// Parse markdown text into a document tree using default config.
pub fn parse(markdown: &str) -> Root {
    parse_with_config(markdown, &Config::compiled_default())
}

/// Parse markdown text into a document tree with custom config.
pub fn parse_with_config(markdown: &str, config: &Config) -> Root {
    parser::parse(markdown, &config.markdown)
}

/// Convert markdown to blocks using default config.
pub fn markdown_to_blocks(markdown: &str) -> Vec<Block> {
    markdown_to_blocks_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to blocks with custom config.
pub fn markdown_to_blocks_with_config(markdown: &str, config: &Config) -> Vec<Block> {
    convert_document(&parse_with_config(markdown, config))
}

/// Convert single-paragraph markdown to rich text using default config.
pub fn markdown_to_rich_text(markdown: &str) -> Result<Vec<RichText>, ConvertError> {
    markdown_to_rich_text_with_config(markdown, &Config::compiled_default())
}

/// Convert single-paragraph markdown to rich text with custom config.
pub fn markdown_to_rich_text_with_config(
    markdown: &str,
    config: &Config,
) -> Result<Vec<RichText>, ConvertError> {
    convert_inline_only(&parse_with_config(markdown, config))
}
