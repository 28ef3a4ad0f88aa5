use log::trace;

use crate::ast::Phrasing;
use crate::block::{Annotations, RichText};

/// Formatting inherited from enclosing inline containers.
///
/// Passed by value: each container derives its own copy, so a flag set
/// inside one subtree never reaches its siblings.
///
/// ```
/// use md2notion::{Phrasing, Style, resolve_inline};
///
/// let runs = resolve_inline(&Phrasing::text("x"), Style::default().bold().link("https://a"));
/// assert!(runs[0].annotations.bold);
/// assert_eq!(runs[0].url.as_deref(), Some("https://a"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub annotations: Annotations,
    pub url: Option<String>,
}

impl Style {
    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    pub fn link(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    fn run(self, text: &str) -> RichText {
        RichText::new(text, self.annotations, self.url)
    }
}

/// Flatten one phrasing node into styled runs, in document order.
pub fn resolve_inline(node: &Phrasing, style: Style) -> Vec<RichText> {
    match node {
        Phrasing::Text { value } => vec![style.run(value)],
        Phrasing::InlineCode { value } => vec![style.code().run(value)],
        Phrasing::Emphasis { children } => resolve_children(children, style.italic()),
        Phrasing::Strong { children } => resolve_children(children, style.bold()),
        Phrasing::Delete { children } => resolve_children(children, style.strikethrough()),
        Phrasing::Link { url, children, .. } => resolve_children(children, style.link(url)),
        // An image in text position degrades to a label
        Phrasing::Image { url, title, .. } => vec![style.run(title.as_deref().unwrap_or(url))],
        other => {
            trace!("skipping inline node `{}`", other.kind());
            Vec::new()
        }
    }
}

/// Resolve a sibling sequence with a shared inherited style.
pub fn resolve_children(children: &[Phrasing], style: Style) -> Vec<RichText> {
    children
        .iter()
        .flat_map(|child| resolve_inline(child, style.clone()))
        .collect()
}
