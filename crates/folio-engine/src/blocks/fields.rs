use serde::Deserialize;
use serde_json::{Map, Value};

use super::choices::Choice;
use super::stream::{RawBlock, StreamItem, read_inner_stream};
use super::types::LeafBlock;
use super::validate::{REQUIRED, TextRule, Validator};
use crate::models::image::ImageId;

/// Reads the fields of one struct block, reporting failures under the
/// block's path.
pub struct FieldReader<'v, 'c, 'm> {
    path: String,
    map: Option<&'v Map<String, Value>>,
    cx: &'c mut Validator<'m>,
}

impl<'v, 'c, 'm> FieldReader<'v, 'c, 'm> {
    pub(crate) fn new(
        path: String,
        map: Option<&'v Map<String, Value>>,
        cx: &'c mut Validator<'m>,
    ) -> Self {
        Self { path, map, cx }
    }

    pub fn path(&self, key: &str) -> String {
        format!("{}.{key}", self.path)
    }

    /// A field's stored value. Null counts as missing.
    pub fn raw(&self, key: &str) -> Option<&'v Value> {
        self.map
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    pub fn text(&mut self, key: &str, rule: TextRule) -> String {
        let path = self.path(key);
        let value = self.raw(key);
        self.cx.text_value(&path, value, rule)
    }

    pub fn choice<C: Choice>(&mut self, key: &str) -> C {
        let path = self.path(key);
        let value = self.raw(key);
        self.cx.choice_value(&path, value)
    }

    pub fn url(&mut self, key: &str, required: bool) -> Option<String> {
        let path = self.path(key);
        match self.raw(key) {
            None => {
                if required {
                    self.cx.error(path, REQUIRED);
                }
                None
            }
            Some(Value::String(s)) => self.cx.url(&path, s, required),
            Some(_) => {
                self.cx.error(path, "Enter a valid URL.");
                None
            }
        }
    }

    pub fn flag(&mut self, key: &str) -> bool {
        match self.raw(key) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                let path = self.path(key);
                self.cx.error(path, "Expected true or false.");
                false
            }
        }
    }

    pub fn image(&mut self, key: &str, required: bool) -> Option<ImageId> {
        let path = self.path(key);
        match self.raw(key) {
            None => {
                if required {
                    self.cx.error(path, REQUIRED);
                }
                None
            }
            Some(value) => self.cx.image_value(&path, value),
        }
    }

    /// A list of image references with bounded cardinality.
    pub fn images(&mut self, key: &str, min: usize, max: usize) -> Vec<ImageId> {
        let path = self.path(key);
        let items: &[Value] = match self.raw(key) {
            None => &[],
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.cx.error(path, "Expected a list of images.");
                return Vec::new();
            }
        };

        if items.len() < min {
            self.cx
                .error(path.clone(), format!("The minimum number of items is {min}"));
        } else if items.len() > max {
            self.cx
                .error(path.clone(), format!("The maximum number of items is {max}"));
        }

        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.cx.image_value(&format!("{path}[{i}]"), item))
            .collect()
    }

    /// A nested stream of leaf blocks, as held by a section.
    pub fn leaf_stream(&mut self, key: &str) -> Vec<StreamItem<LeafBlock>> {
        let path = self.path(key);
        let items: &[Value] = match self.raw(key) {
            None => &[],
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.cx.error(path, "Expected a list of blocks.");
                return Vec::new();
            }
        };

        let mut raw = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match RawBlock::deserialize(item) {
                Ok(block) => raw.push((i, block)),
                Err(e) => self.cx.error(format!("{path}[{i}]"), e.to_string()),
            }
        }
        read_inner_stream(&raw, self.cx, &path)
    }
}
