use log::trace;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag};

use crate::ast::{ListItem, Node, Phrasing, Root};
use crate::config::MarkdownConfig;

/// Strip YAML frontmatter from the beginning of markdown content.
///
/// Frontmatter opens with a line that is exactly `---`, is followed directly
/// by a non-blank line, and closes with another line that is exactly `---`.
/// Anything else (such as a leading thematic break) is left alone.
fn strip_frontmatter(markdown: &str) -> &str {
    let Some(body) = markdown
        .strip_prefix("---\n")
        .or_else(|| markdown.strip_prefix("---\r\n"))
    else {
        return markdown;
    };
    if body.lines().next().is_none_or(|line| line.trim().is_empty()) {
        return markdown;
    }

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end_matches(['\n', '\r']) == "---" {
            return body[offset..].trim_start_matches(['\n', '\r']);
        }
    }
    markdown
}

/// Parse markdown text into a document tree
pub fn parse(markdown: &str, config: &MarkdownConfig) -> Root {
    let markdown = if config.frontmatter {
        strip_frontmatter(markdown)
    } else {
        markdown
    };

    let mut options = Options::empty();
    if config.strikethrough {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if config.tasklists {
        options.insert(Options::ENABLE_TASKLISTS);
    }

    let mut state = ParseState::default();
    for event in Parser::new_ext(markdown, options) {
        state.process_event(event);
    }

    Root {
        children: state.finish(),
    }
}

/// A container whose Start event has been seen but not its End.
enum Frame {
    Paragraph(Vec<Phrasing>),
    Heading(u8, Vec<Phrasing>),
    BlockQuote(Vec<Node>),
    List(Option<u64>, Vec<ListItem>),
    Item {
        checked: Option<bool>,
        children: Vec<Node>,
        // Tight items carry inline content without a paragraph wrapper
        inline: Vec<Phrasing>,
    },
    CodeBlock(Option<String>, String),
    HtmlBlock(String),
    Emphasis(Vec<Phrasing>),
    Strong(Vec<Phrasing>),
    Strikethrough(Vec<Phrasing>),
    Link {
        url: String,
        title: Option<String>,
        children: Vec<Phrasing>,
    },
    Image {
        url: String,
        title: Option<String>,
        alt: String,
    },
    // Containers with no tree representation; their content is discarded
    Skip,
}

#[derive(Default)]
struct ParseState {
    // Finished top-level nodes
    root: Vec<Node>,
    // Open containers, innermost last. Every Start pushes one, every End pops one.
    stack: Vec<Frame>,
}

impl ParseState {
    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close(),

            Event::Text(text) => self.text(text),
            Event::Code(code) => self.push_inline(Phrasing::InlineCode {
                value: code.into_string(),
            }),
            Event::Html(html) => self.text(html),
            Event::InlineHtml(html) => self.push_inline(Phrasing::Html {
                value: html.into_string(),
            }),

            // Soft/hard breaks
            Event::SoftBreak => self.push_inline(Phrasing::text(" ")),
            Event::HardBreak => self.push_inline(Phrasing::Break),

            Event::Rule => self.push_node(Node::ThematicBreak),

            // Task list checkboxes belong to the nearest open item
            Event::TaskListMarker(checked) => {
                for frame in self.stack.iter_mut().rev() {
                    if let Frame::Item { checked: slot, .. } = frame {
                        *slot = Some(checked);
                        break;
                    }
                }
            }

            other => trace!("ignoring markdown event {other:?}"),
        }
    }

    fn open(&mut self, tag: Tag) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading(heading_level_to_u8(level), Vec::new()),
            Tag::BlockQuote(_) => Frame::BlockQuote(Vec::new()),
            Tag::List(start) => Frame::List(start, Vec::new()),
            Tag::Item => Frame::Item {
                checked: None,
                children: Vec::new(),
                inline: Vec::new(),
            },
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) => {
                        let lang = lang.into_string();
                        if lang.is_empty() { None } else { Some(lang) }
                    }
                    CodeBlockKind::Indented => None,
                };
                Frame::CodeBlock(lang, String::new())
            }
            Tag::HtmlBlock => Frame::HtmlBlock(String::new()),
            Tag::Emphasis => Frame::Emphasis(Vec::new()),
            Tag::Strong => Frame::Strong(Vec::new()),
            Tag::Strikethrough => Frame::Strikethrough(Vec::new()),
            Tag::Link {
                dest_url, title, ..
            } => Frame::Link {
                url: dest_url.into_string(),
                title: non_empty(title),
                children: Vec::new(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Frame::Image {
                url: dest_url.into_string(),
                title: non_empty(title),
                alt: String::new(),
            },
            other => {
                trace!("skipping markdown container {other:?}");
                Frame::Skip
            }
        };
        self.stack.push(frame);
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame {
            Frame::Paragraph(children) => self.push_node(Node::Paragraph { children }),
            Frame::Heading(depth, children) => self.push_node(Node::Heading { depth, children }),
            Frame::BlockQuote(children) => self.push_node(Node::Blockquote { children }),
            Frame::List(start, children) => self.push_node(Node::List { start, children }),
            Frame::Item {
                checked,
                mut children,
                mut inline,
            } => {
                flush_inline(&mut children, &mut inline);
                if let Some(Frame::List(_, items)) = self.stack.last_mut() {
                    items.push(ListItem { checked, children });
                }
            }
            Frame::CodeBlock(lang, mut value) => {
                if value.ends_with('\n') {
                    value.pop();
                }
                self.push_node(Node::Code { lang, value });
            }
            Frame::HtmlBlock(value) => self.push_node(Node::Html { value }),
            Frame::Emphasis(children) => self.push_inline(Phrasing::Emphasis { children }),
            Frame::Strong(children) => self.push_inline(Phrasing::Strong { children }),
            Frame::Strikethrough(children) => self.push_inline(Phrasing::Delete { children }),
            Frame::Link {
                url,
                title,
                children,
            } => self.push_inline(Phrasing::Link {
                url,
                title,
                children,
            }),
            Frame::Image { url, title, alt } => self.push_inline(Phrasing::Image { url, title, alt }),
            Frame::Skip => {}
        }
    }

    fn text(&mut self, text: CowStr) {
        match self.stack.last_mut() {
            Some(Frame::CodeBlock(_, value)) | Some(Frame::HtmlBlock(value)) => {
                value.push_str(&text)
            }
            _ => self.push_inline(Phrasing::text(text.into_string())),
        }
    }

    fn push_inline(&mut self, node: Phrasing) {
        match self.stack.last_mut() {
            Some(Frame::Paragraph(children))
            | Some(Frame::Heading(_, children))
            | Some(Frame::Emphasis(children))
            | Some(Frame::Strong(children))
            | Some(Frame::Strikethrough(children))
            | Some(Frame::Link { children, .. })
            | Some(Frame::Item {
                inline: children, ..
            }) => children.push(node),
            // Image descriptions flatten to plain alt text
            Some(Frame::Image { alt, .. }) => push_plain_text(&node, alt),
            _ => {}
        }
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.root.push(node),
            Some(Frame::BlockQuote(children)) => children.push(node),
            Some(Frame::Item {
                children, inline, ..
            }) => {
                flush_inline(children, inline);
                children.push(node);
            }
            Some(_) => trace!("dropping `{}` inside an unsupported container", node.kind()),
        }
    }

    fn finish(mut self) -> Vec<Node> {
        // Unbalanced input cannot come from pulldown-cmark, but close anything left open.
        while !self.stack.is_empty() {
            self.close();
        }
        self.root
    }
}

fn flush_inline(children: &mut Vec<Node>, inline: &mut Vec<Phrasing>) {
    if !inline.is_empty() {
        children.push(Node::Paragraph {
            children: std::mem::take(inline),
        });
    }
}

fn push_plain_text(node: &Phrasing, out: &mut String) {
    match node {
        Phrasing::Text { value } | Phrasing::InlineCode { value } => out.push_str(value),
        Phrasing::Emphasis { children }
        | Phrasing::Strong { children }
        | Phrasing::Delete { children }
        | Phrasing::Link { children, .. } => {
            for child in children {
                push_plain_text(child, out);
            }
        }
        Phrasing::Image { alt, .. } => out.push_str(alt),
        Phrasing::Break => out.push(' '),
        Phrasing::Html { .. } | Phrasing::Unknown => {}
    }
}

fn non_empty(value: CowStr) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.into_string())
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_default(markdown: &str) -> Vec<Node> {
        parse(markdown, &MarkdownConfig::default()).children
    }

    fn text(value: &str) -> Phrasing {
        Phrasing::text(value)
    }

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(
            parse_default("## Title\n\nHello *world*"),
            vec![
                Node::Heading {
                    depth: 2,
                    children: vec![text("Title")],
                },
                Node::Paragraph {
                    children: vec![
                        text("Hello "),
                        Phrasing::Emphasis {
                            children: vec![text("world")],
                        },
                    ],
                },
            ]
        );
    }

    #[test]
    fn strikethrough_link_and_code() {
        assert_eq!(
            parse_default("~~old~~ [site](https://a \"A\") `x`"),
            vec![Node::Paragraph {
                children: vec![
                    Phrasing::Delete {
                        children: vec![text("old")],
                    },
                    text(" "),
                    Phrasing::Link {
                        url: "https://a".to_string(),
                        title: Some("A".to_string()),
                        children: vec![text("site")],
                    },
                    text(" "),
                    Phrasing::InlineCode {
                        value: "x".to_string(),
                    },
                ],
            }]
        );
    }

    #[test]
    fn strikethrough_can_be_disabled() {
        let config = MarkdownConfig {
            strikethrough: false,
            ..Default::default()
        };
        let root = parse("~~old~~", &config);
        assert!(matches!(
            &root.children[0],
            Node::Paragraph { children } if children.iter().all(|c| matches!(c, Phrasing::Text { .. }))
        ));
    }

    #[test]
    fn image_in_paragraph() {
        assert_eq!(
            parse_default("a ![the *logo*](u1.png) b"),
            vec![Node::Paragraph {
                children: vec![
                    text("a "),
                    Phrasing::Image {
                        url: "u1.png".to_string(),
                        title: None,
                        alt: "the logo".to_string(),
                    },
                    text(" b"),
                ],
            }]
        );
    }

    #[test]
    fn soft_and_hard_breaks() {
        assert_eq!(
            parse_default("one\ntwo  \nthree"),
            vec![Node::Paragraph {
                children: vec![
                    text("one"),
                    text(" "),
                    text("two"),
                    Phrasing::Break,
                    text("three"),
                ],
            }]
        );
    }

    #[test]
    fn fenced_code_drops_trailing_newline() {
        assert_eq!(
            parse_default("```rust\nlet x = 1;\n```"),
            vec![Node::Code {
                lang: Some("rust".to_string()),
                value: "let x = 1;".to_string(),
            }]
        );
    }

    #[test]
    fn tight_list_items_get_a_paragraph() {
        assert_eq!(
            parse_default("- one\n- two"),
            vec![Node::List {
                start: None,
                children: vec![
                    ListItem {
                        checked: None,
                        children: vec![Node::Paragraph {
                            children: vec![text("one")],
                        }],
                    },
                    ListItem {
                        checked: None,
                        children: vec![Node::Paragraph {
                            children: vec![text("two")],
                        }],
                    },
                ],
            }]
        );
    }

    #[test]
    fn ordered_list_start() {
        let children = parse_default("3. three\n4. four");
        assert!(matches!(
            &children[0],
            Node::List { start: Some(3), children } if children.len() == 2
        ));
    }

    #[test]
    fn task_list_markers() {
        let children = parse_default("- [x] done\n- [ ] todo\n- plain");
        let Node::List { children: items, .. } = &children[0] else {
            panic!("expected a list, got {children:?}");
        };
        let checked: Vec<Option<bool>> = items.iter().map(|item| item.checked).collect();
        assert_eq!(checked, vec![Some(true), Some(false), None]);
        assert_eq!(
            items[0].children,
            vec![Node::Paragraph {
                children: vec![text("done")],
            }]
        );
    }

    #[test]
    fn nested_list_follows_item_text() {
        let children = parse_default("- outer\n  - inner");
        let Node::List { children: items, .. } = &children[0] else {
            panic!("expected a list, got {children:?}");
        };
        assert!(matches!(items[0].children[0], Node::Paragraph { .. }));
        assert!(matches!(items[0].children[1], Node::List { .. }));
    }

    #[test]
    fn blockquote_and_rule() {
        assert_eq!(
            parse_default("> quoted\n\n---"),
            vec![
                Node::Blockquote {
                    children: vec![Node::Paragraph {
                        children: vec![text("quoted")],
                    }],
                },
                Node::ThematicBreak,
            ]
        );
    }

    #[test]
    fn frontmatter_is_stripped() {
        assert_eq!(
            parse_default("---\ntitle: x\n---\n\nBody"),
            vec![Node::Paragraph {
                children: vec![text("Body")],
            }]
        );
    }

    #[test]
    fn html_block() {
        assert!(matches!(
            &parse_default("<div>hi</div>")[0],
            Node::Html { value } if value.starts_with("<div>")
        ));
    }

    #[test]
    fn leading_thematic_break_is_not_frontmatter() {
        assert_eq!(
            parse_default("---\n\nPara one\n\n---\n\nPara two"),
            vec![
                Node::ThematicBreak,
                Node::Paragraph {
                    children: vec![text("Para one")],
                },
                Node::ThematicBreak,
                Node::Paragraph {
                    children: vec![text("Para two")],
                },
            ]
        );
    }

    #[test]
    fn frontmatter_needs_exact_delimiters() {
        assert_eq!(strip_frontmatter("---\ntitle: x\n---\nBody"), "Body");
        assert_eq!(strip_frontmatter("---\r\ntitle: x\r\n---\r\nBody"), "Body");
        // unterminated
        assert_eq!(strip_frontmatter("---\ntitle: x\n"), "---\ntitle: x\n");
        // closing line must be exactly `---`
        assert_eq!(
            strip_frontmatter("---\ntitle: x\n----\nBody"),
            "---\ntitle: x\n----\nBody"
        );
        assert_eq!(strip_frontmatter("----\na\n---\nb"), "----\na\n---\nb");
        assert_eq!(strip_frontmatter("---"), "---");
    }
}
