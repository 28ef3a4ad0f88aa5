use serde::ser::{Serialize, SerializeMap, Serializer};

/// Inline formatting flags carried by a run of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// One contiguous styled span of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    pub text: String,
    pub annotations: Annotations,
    pub url: Option<String>,
}

impl RichText {
    pub fn new(text: impl Into<String>, annotations: Annotations, url: Option<String>) -> Self {
        Self {
            text: text.into(),
            annotations,
            url,
        }
    }

    /// A run with no formatting and no link.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Annotations::default(), None)
    }
}

/// Output blocks, one per entry in the target API's `children` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<RichText>),
    HeadingOne(Vec<RichText>),
    HeadingTwo(Vec<RichText>),
    HeadingThree(Vec<RichText>),
    BulletedListItem(Vec<RichText>),
    NumberedListItem(Vec<RichText>),
    ToDo { checked: bool, text: Vec<RichText> },
    Image { url: String },
}

impl Block {
    /// Discriminator used for both the `type` field and the payload key.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::HeadingOne(_) => "heading_1",
            Block::HeadingTwo(_) => "heading_2",
            Block::HeadingThree(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::ToDo { .. } => "to_do",
            Block::Image { .. } => "image",
        }
    }

    /// Rich text of a text-bearing block, None for images.
    pub fn text(&self) -> Option<&[RichText]> {
        match self {
            Block::Paragraph(text)
            | Block::HeadingOne(text)
            | Block::HeadingTwo(text)
            | Block::HeadingThree(text)
            | Block::BulletedListItem(text)
            | Block::NumberedListItem(text)
            | Block::ToDo { text, .. } => Some(text),
            Block::Image { .. } => None,
        }
    }
}

pub fn paragraph(text: Vec<RichText>) -> Block {
    Block::Paragraph(text)
}

pub fn heading_one(text: Vec<RichText>) -> Block {
    Block::HeadingOne(text)
}

pub fn heading_two(text: Vec<RichText>) -> Block {
    Block::HeadingTwo(text)
}

pub fn heading_three(text: Vec<RichText>) -> Block {
    Block::HeadingThree(text)
}

pub fn bulleted_list_item(text: Vec<RichText>) -> Block {
    Block::BulletedListItem(text)
}

pub fn numbered_list_item(text: Vec<RichText>) -> Block {
    Block::NumberedListItem(text)
}

pub fn to_do(checked: bool, text: Vec<RichText>) -> Block {
    Block::ToDo { checked, text }
}

pub fn image(url: impl Into<String>) -> Block {
    Block::Image { url: url.into() }
}

// Wire shapes. Kept private so the public model stays free of API noise
// such as the always-false `underline` flag.

#[derive(serde::Serialize)]
struct TextPayload<'a> {
    text: &'a [RichText],
    #[serde(skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
}

#[derive(serde::Serialize)]
struct ImagePayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    external: ExternalUrl<'a>,
}

#[derive(serde::Serialize)]
struct ExternalUrl<'a> {
    url: &'a str,
}

#[derive(serde::Serialize)]
struct RichTextWire<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextContent<'a>,
    annotations: AnnotationsWire,
}

#[derive(serde::Serialize)]
struct TextContent<'a> {
    content: &'a str,
    link: Option<LinkWire<'a>>,
}

#[derive(serde::Serialize)]
struct LinkWire<'a> {
    url: &'a str,
}

#[derive(serde::Serialize)]
struct AnnotationsWire {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    underline: bool,
    code: bool,
}

impl Serialize for RichText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let a = self.annotations;
        RichTextWire {
            kind: "text",
            text: TextContent {
                content: &self.text,
                link: self.url.as_deref().map(|url| LinkWire { url }),
            },
            annotations: AnnotationsWire {
                bold: a.bold,
                italic: a.italic,
                strikethrough: a.strikethrough,
                underline: false,
                code: a.code,
            },
        }
        .serialize(serializer)
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", kind)?;
        match self {
            Block::ToDo { checked, text } => map.serialize_entry(
                kind,
                &TextPayload {
                    text,
                    checked: Some(*checked),
                },
            )?,
            Block::Image { url } => map.serialize_entry(
                kind,
                &ImagePayload {
                    kind: "external",
                    external: ExternalUrl { url },
                },
            )?,
            Block::Paragraph(text)
            | Block::HeadingOne(text)
            | Block::HeadingTwo(text)
            | Block::HeadingThree(text)
            | Block::BulletedListItem(text)
            | Block::NumberedListItem(text) => {
                map.serialize_entry(kind, &TextPayload { text, checked: None })?
            }
        }
        map.end()
    }
}
