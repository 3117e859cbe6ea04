use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use super::kinds::{SectionBlock, StructBlock};
use super::types::{Block, LEAF_TYPES, LeafBlock, read_leaf};
use super::validate::{ValidationErrors, Validator};
use crate::models::image::{ImageId, ImageSource};

/// A stored body: blocks in their `{type, id, value}` storage encoding,
/// not yet checked against the schema.
pub type RawBody = Vec<RawBlock>;

/// One block in storage encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub value: Value,
}

impl RawBlock {
    pub fn new(block_type: impl Into<String>, value: Value) -> Self {
        Self {
            block_type: block_type.into(),
            id: None,
            value,
        }
    }
}

/// Anything that can sit in a stream and name its own block type.
pub trait StreamBlock {
    fn type_name(&self) -> &'static str;
}

/// A validated block together with its stable id.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamItem<B> {
    pub id: Uuid,
    pub block: B,
}

impl<B: StreamBlock + Serialize> Serialize for StreamItem<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut item = serializer.serialize_struct("StreamItem", 3)?;
        item.serialize_field("type", self.block.type_name())?;
        item.serialize_field("id", &self.id)?;
        item.serialize_field("value", &self.block)?;
        item.end()
    }
}

/// A page body: an ordered, validated sequence of blocks.
///
/// Serializes back to the same `{type, id, value}` encoding it was read from.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Body {
    items: Vec<StreamItem<Block>>,
}

impl Body {
    pub fn new(items: Vec<StreamItem<Block>>) -> Self {
        Self { items }
    }

    /// Validates a stored body on its own, requiring every image to resolve.
    pub fn validate(raw: &[RawBlock], images: &dyn ImageSource) -> Result<Self, ValidationErrors> {
        let mut cx = Validator::new(images);
        let body = read_body(raw, &mut cx, "body");
        cx.finish(body)
    }

    pub fn items(&self) -> &[StreamItem<Block>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &StreamItem<Block>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Image references in hero-fallback order: image blocks first (section
    /// content included), then gallery images.
    pub fn image_candidates(&self) -> Vec<ImageId> {
        let leaves: Vec<&LeafBlock> = self
            .items
            .iter()
            .flat_map(|item| match &item.block {
                Block::Leaf(leaf) => vec![leaf],
                Block::Section(section) => section.inner.iter().map(|i| &i.block).collect(),
            })
            .collect();

        let singles = leaves.iter().filter_map(|leaf| match leaf {
            LeafBlock::Image(image) => Some(image.image),
            _ => None,
        });
        let galleries = leaves.iter().flat_map(|leaf| match leaf {
            LeafBlock::Gallery(gallery) => gallery.images.clone(),
            _ => Vec::new(),
        });
        singles.chain(galleries).collect()
    }
}

/// Reads a top-level body stream. Errors go to `cx`; the returned body only
/// holds the blocks that could be read.
pub fn read_body(raw: &[RawBlock], cx: &mut Validator<'_>, path: &str) -> Body {
    let mut items = Vec::with_capacity(raw.len());
    for (i, block) in raw.iter().enumerate() {
        let item_path = format!("{path}[{i}]");
        let value_path = format!("{item_path}.value");
        let read = match block.block_type.as_str() {
            "section" => cx
                .fields(&value_path, &block.value)
                .and_then(|mut fields| SectionBlock::read(&mut fields))
                .map(Block::Section),
            name if LEAF_TYPES.contains(&name) => {
                read_leaf(name, &block.value, cx, &value_path).map(Block::Leaf)
            }
            name => {
                cx.error(
                    format!("{item_path}.type"),
                    format!("Unknown block type `{name}`."),
                );
                None
            }
        };
        if let Some(read) = read {
            items.push(StreamItem {
                id: block.id.unwrap_or_else(Uuid::new_v4),
                block: read,
            });
        }
    }
    Body { items }
}

/// Reads the inner stream of a section. Sections are not allowed here, which
/// bounds nesting to one level.
pub(crate) fn read_inner_stream(
    raw: &[(usize, RawBlock)],
    cx: &mut Validator<'_>,
    path: &str,
) -> Vec<StreamItem<LeafBlock>> {
    let mut items = Vec::with_capacity(raw.len());
    for (i, block) in raw {
        let item_path = format!("{path}[{i}]");
        let read = match block.block_type.as_str() {
            "section" => {
                cx.error(
                    format!("{item_path}.type"),
                    "Sections cannot be nested inside a section.",
                );
                None
            }
            name if LEAF_TYPES.contains(&name) => {
                read_leaf(name, &block.value, cx, &format!("{item_path}.value"))
            }
            name => {
                cx.error(
                    format!("{item_path}.type"),
                    format!("Unknown block type `{name}`."),
                );
                None
            }
        };
        if let Some(read) = read {
            items.push(StreamItem {
                id: block.id.unwrap_or_else(Uuid::new_v4),
                block: read,
            });
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::choices::{GalleryColumns, SectionBackground, SpacerSize};
    use crate::tests::TestImages;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn raw(block_type: &str, value: Value) -> RawBlock {
        RawBlock::new(block_type, value)
    }

    fn gallery_of(count: u32) -> RawBlock {
        raw(
            "gallery",
            json!({ "images": (1..=count).collect::<Vec<_>>() }),
        )
    }

    #[test]
    fn valid_body_keeps_storage_order() {
        let images = TestImages::with_ids(&[1]);
        let stored = vec![
            raw("heading", json!({"text": "Intro"})),
            raw("paragraph", json!("<p>Hello</p>")),
            raw("image", json!({"image": 1})),
            raw("divider", Value::Null),
            raw("spacer", json!("lg")),
        ];

        let body = Body::validate(&stored, &images).unwrap();

        let types: Vec<_> = body.iter().map(|i| i.block.type_name()).collect();
        assert_eq!(types, vec!["heading", "paragraph", "image", "divider", "spacer"]);
        assert!(matches!(
            body.items()[4].block,
            Block::Leaf(LeafBlock::Spacer(SpacerSize::Large))
        ));
    }

    #[test]
    fn unknown_block_type_is_a_validation_error() {
        let images = TestImages::default();
        let err = Body::validate(&[raw("carousel", json!({}))], &images).unwrap_err();
        assert_eq!(err.paths(), vec!["body[0].type"]);
        assert_eq!(err.errors[0].message, "Unknown block type `carousel`.");
    }

    #[rstest]
    #[case(1, false)]
    #[case(2, true)]
    #[case(12, true)]
    #[case(13, false)]
    fn gallery_cardinality_is_bounded(#[case] count: u32, #[case] accepted: bool) {
        let images = TestImages::with_ids(&(1..=13).collect::<Vec<_>>());
        let result = Body::validate(&[gallery_of(count)], &images);
        assert_eq!(result.is_ok(), accepted, "{count} images");
        if let Err(err) = result {
            assert_eq!(err.paths(), vec!["body[0].value.images"]);
        }
    }

    #[test]
    fn nested_section_is_rejected() {
        let images = TestImages::default();
        let stored = vec![raw(
            "section",
            json!({
                "background": "soft",
                "inner": [
                    {"type": "paragraph", "value": "<p>ok</p>"},
                    {"type": "section", "value": {"inner": []}}
                ]
            }),
        )];

        let err = Body::validate(&stored, &images).unwrap_err();
        assert_eq!(err.paths(), vec!["body[0].value.inner[1].type"]);
    }

    #[test]
    fn section_reads_inner_blocks() {
        let images = TestImages::default();
        let stored = vec![raw(
            "section",
            json!({
                "background": "contrast",
                "inner": [
                    {"type": "quote", "value": "Simplicity is prerequisite for reliability."},
                    {"type": "button", "value": {"text": "Read more", "url": "https://example.com"}}
                ]
            }),
        )];

        let body = Body::validate(&stored, &images).unwrap();
        let Block::Section(section) = &body.items()[0].block else {
            panic!("expected a section");
        };
        assert_eq!(section.background, SectionBackground::Contrast);
        assert_eq!(section.inner.len(), 2);
        assert_eq!(section.inner[1].block.type_name(), "button");
    }

    #[test]
    fn every_failing_field_is_reported() {
        let images = TestImages::default();
        let stored = vec![
            raw("heading", json!({"level": "h1", "text": ""})),
            raw("button", json!({"text": "Go", "url": "not a url"})),
            raw(
                "section",
                json!({"inner": [{"type": "code", "value": {"language": "rust", "code": "fn main() {}"}}]}),
            ),
        ];

        let err = Body::validate(&stored, &images).unwrap_err();
        assert_eq!(
            err.paths(),
            vec![
                "body[0].value.level",
                "body[0].value.text",
                "body[1].value.url",
                "body[2].value.inner[0].value.language",
            ]
        );
    }

    #[test]
    fn missing_ids_are_assigned_and_existing_ids_kept() {
        let images = TestImages::default();
        let id = Uuid::new_v4();
        let mut with_id = raw("quote", json!("kept"));
        with_id.id = Some(id);

        let body = Body::validate(&[with_id, raw("quote", json!("fresh"))], &images).unwrap();
        assert_eq!(body.items()[0].id, id);
        assert_ne!(body.items()[1].id, id);
    }

    #[test]
    fn serializes_back_to_storage_encoding() {
        let images = TestImages::with_ids(&[3, 4]);
        let id = Uuid::new_v4();
        let mut gallery = raw("gallery", json!({"images": [3, 4], "columns": "3"}));
        gallery.id = Some(id);

        let body = Body::validate(&[gallery, raw("divider", json!({}))], &images).unwrap();
        let encoded = serde_json::to_value(&body).unwrap();

        assert_eq!(encoded[0]["type"], "gallery");
        assert_eq!(encoded[0]["id"], id.to_string());
        assert_eq!(encoded[0]["value"]["images"], json!([3, 4]));
        assert_eq!(encoded[0]["value"]["columns"], "3");
        assert_eq!(encoded[1]["value"], Value::Null);

        let reread: RawBody = serde_json::from_value(encoded).unwrap();
        let again = Body::validate(&reread, &images).unwrap();
        assert_eq!(again, body);
        let Block::Leaf(LeafBlock::Gallery(g)) = &again.items()[0].block else {
            panic!("expected a gallery");
        };
        assert_eq!(g.columns, GalleryColumns::Three);
    }

    #[test]
    fn image_candidates_prefer_image_blocks_over_galleries() {
        let images = TestImages::with_ids(&[1, 2, 3, 9]);
        let stored = vec![
            raw("gallery", json!({"images": [1, 2]})),
            raw(
                "section",
                json!({"inner": [{"type": "image", "value": {"image": 9}}]}),
            ),
            raw("image", json!({"image": 3})),
        ];
        let body = Body::validate(&stored, &images).unwrap();
        assert_eq!(
            body.image_candidates(),
            vec![ImageId(9), ImageId(3), ImageId(1), ImageId(2)]
        );
    }
}
