use serde::Serialize;
use serde_json::Value;

use super::choices::SpacerSize;
use super::kinds::{
    ButtonBlock, CalloutBlock, CodeBlock, EmbedBlock, GalleryBlock, HeadingBlock, ImageBlock,
    RichText, SectionBlock, StructBlock,
};
use super::stream::StreamBlock;
use super::validate::{TextRule, Validator};

/// Block types allowed anywhere a stream is allowed.
pub const LEAF_TYPES: &[&str] = &[
    "heading",
    "paragraph",
    "image",
    "quote",
    "embed",
    "callout",
    "code",
    "button",
    "divider",
    "spacer",
    "gallery",
];

/// Every block type a top-level body accepts.
pub const BODY_TYPES: &[&str] = &[
    "heading",
    "paragraph",
    "image",
    "quote",
    "embed",
    "callout",
    "code",
    "button",
    "divider",
    "spacer",
    "gallery",
    "section",
];

/// A block that may appear both in a body and inside a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LeafBlock {
    Heading(HeadingBlock),
    Paragraph(RichText),
    Image(ImageBlock),
    Quote(String),
    Embed(EmbedBlock),
    Callout(CalloutBlock),
    Code(CodeBlock),
    Button(ButtonBlock),
    Divider,
    Spacer(SpacerSize),
    Gallery(GalleryBlock),
}

impl StreamBlock for LeafBlock {
    fn type_name(&self) -> &'static str {
        match self {
            LeafBlock::Heading(_) => "heading",
            LeafBlock::Paragraph(_) => "paragraph",
            LeafBlock::Image(_) => "image",
            LeafBlock::Quote(_) => "quote",
            LeafBlock::Embed(_) => "embed",
            LeafBlock::Callout(_) => "callout",
            LeafBlock::Code(_) => "code",
            LeafBlock::Button(_) => "button",
            LeafBlock::Divider => "divider",
            LeafBlock::Spacer(_) => "spacer",
            LeafBlock::Gallery(_) => "gallery",
        }
    }
}

/// A top-level body block. Sections hold leaf blocks only, so a section
/// inside a section cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Block {
    Leaf(LeafBlock),
    Section(SectionBlock),
}

impl StreamBlock for Block {
    fn type_name(&self) -> &'static str {
        match self {
            Block::Leaf(leaf) => leaf.type_name(),
            Block::Section(_) => "section",
        }
    }
}

fn read_struct<B: StructBlock>(value: &Value, cx: &mut Validator<'_>, path: &str) -> Option<B> {
    let mut fields = cx.fields(path, value)?;
    B::read(&mut fields)
}

/// Reads one leaf block of a known type. `path` addresses the block's value.
pub(crate) fn read_leaf(
    block_type: &str,
    value: &Value,
    cx: &mut Validator<'_>,
    path: &str,
) -> Option<LeafBlock> {
    let block = match block_type {
        "heading" => LeafBlock::Heading(read_struct::<HeadingBlock>(value, cx, path)?),
        "paragraph" => {
            LeafBlock::Paragraph(RichText(cx.text_value(path, Some(value), TextRule::required())))
        }
        "image" => LeafBlock::Image(read_struct::<ImageBlock>(value, cx, path)?),
        "quote" => LeafBlock::Quote(cx.text_value(path, Some(value), TextRule::required())),
        "embed" => LeafBlock::Embed(read_struct::<EmbedBlock>(value, cx, path)?),
        "callout" => LeafBlock::Callout(read_struct::<CalloutBlock>(value, cx, path)?),
        "code" => LeafBlock::Code(read_struct::<CodeBlock>(value, cx, path)?),
        "button" => LeafBlock::Button(read_struct::<ButtonBlock>(value, cx, path)?),
        "divider" => LeafBlock::Divider,
        "spacer" => LeafBlock::Spacer(cx.choice_value(path, Some(value))),
        "gallery" => LeafBlock::Gallery(read_struct::<GalleryBlock>(value, cx, path)?),
        _ => return None,
    };
    Some(block)
}
