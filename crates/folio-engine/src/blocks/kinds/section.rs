use serde::Serialize;

use super::StructBlock;
use crate::blocks::choices::SectionBackground;
use crate::blocks::fields::FieldReader;
use crate::blocks::stream::StreamItem;
use crate::blocks::types::LeafBlock;

/// A container with a background style and its own stream of leaf blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionBlock {
    pub background: SectionBackground,
    pub inner: Vec<StreamItem<LeafBlock>>,
}

impl StructBlock for SectionBlock {
    fn read(fields: &mut FieldReader<'_, '_, '_>) -> Option<Self> {
        let background = fields.choice("background");
        let inner = fields.leaf_stream("inner");
        Some(Self { background, inner })
    }
}
