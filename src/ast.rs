//! Typed markdown tree consumed by the converter.
//!
//! Node names and JSON shape follow mdast, so a tree produced by any
//! mdast-compatible parser can be fed in directly.

use serde::{Deserialize, Serialize};

/// Document root
///
/// The `type` tag is written on serialization and accepted on input, but
/// not checked: `{"children": []}` also reads as a root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "root")]
pub struct Root {
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Block-level (flow) content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Heading {
        #[serde(default = "default_depth")]
        depth: u8,
        #[serde(default)]
        children: Vec<Phrasing>,
    },
    Paragraph {
        #[serde(default)]
        children: Vec<Phrasing>,
    },
    Code {
        #[serde(default)]
        lang: Option<String>,
        #[serde(default)]
        value: String,
    },
    Blockquote {
        #[serde(default)]
        children: Vec<Node>,
    },
    List {
        #[serde(default)]
        start: Option<u64>,
        #[serde(default)]
        children: Vec<ListItem>,
    },
    ThematicBreak,
    Html {
        #[serde(default)]
        value: String,
    },
    #[serde(other)]
    Unknown,
}

/// A single list entry
///
/// As with [`Root`], the `listItem` tag is written but not enforced on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "listItem")]
pub struct ListItem {
    /// None = not a task, Some(false) = unchecked, Some(true) = checked
    #[serde(default)]
    pub checked: Option<bool>,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Inline (phrasing) content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Phrasing {
    Text {
        #[serde(default)]
        value: String,
    },
    Emphasis {
        #[serde(default)]
        children: Vec<Phrasing>,
    },
    Strong {
        #[serde(default)]
        children: Vec<Phrasing>,
    },
    Delete {
        #[serde(default)]
        children: Vec<Phrasing>,
    },
    InlineCode {
        #[serde(default)]
        value: String,
    },
    Link {
        #[serde(default)]
        url: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        children: Vec<Phrasing>,
    },
    Image {
        // A missing url becomes an image block with an empty url
        #[serde(default)]
        url: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        alt: String,
    },
    Break,
    Html {
        #[serde(default)]
        value: String,
    },
    #[serde(other)]
    Unknown,
}

// Headings without a depth land on the lowest heading block
fn default_depth() -> u8 {
    3
}

impl Node {
    /// The mdast type name of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Heading { .. } => "heading",
            Node::Paragraph { .. } => "paragraph",
            Node::Code { .. } => "code",
            Node::Blockquote { .. } => "blockquote",
            Node::List { .. } => "list",
            Node::ThematicBreak => "thematicBreak",
            Node::Html { .. } => "html",
            Node::Unknown => "unknown",
        }
    }
}

impl Phrasing {
    pub fn text(value: impl Into<String>) -> Self {
        Phrasing::Text {
            value: value.into(),
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Phrasing::Image {
            url: url.into(),
            title: None,
            alt: String::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Phrasing::Text { .. } => "text",
            Phrasing::Emphasis { .. } => "emphasis",
            Phrasing::Strong { .. } => "strong",
            Phrasing::Delete { .. } => "delete",
            Phrasing::InlineCode { .. } => "inlineCode",
            Phrasing::Link { .. } => "link",
            Phrasing::Image { .. } => "image",
            Phrasing::Break => "break",
            Phrasing::Html { .. } => "html",
            Phrasing::Unknown => "unknown",
        }
    }
}
