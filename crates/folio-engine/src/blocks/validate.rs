use std::fmt;

use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::choices::Choice;
use super::fields::FieldReader;
use crate::models::image::{ImageId, ImageSource};

pub const REQUIRED: &str = "This field is required.";

/// One failing field, addressed by its path inside the saved entity
/// (for example `body[3].value.images`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every field error found while validating one save.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("content failed validation: {}", join_errors(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                path: path.into(),
                message: message.into(),
            }],
        }
    }

    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn find(&self, path: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.path == path)
    }
}

/// Whether image references have to resolve against the media library.
///
/// Authoring saves require it. Loading already-saved content skips it so a
/// since-deleted image degrades at render time instead of failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCheck {
    Require,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRule {
    pub required: bool,
    pub max_len: Option<usize>,
}

impl TextRule {
    pub const fn required() -> Self {
        Self {
            required: true,
            max_len: None,
        }
    }

    pub const fn optional() -> Self {
        Self {
            required: false,
            max_len: None,
        }
    }

    pub const fn max(self, max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            ..self
        }
    }
}

/// Collects field errors for a single save.
pub struct Validator<'m> {
    images: &'m dyn ImageSource,
    media: MediaCheck,
    errors: Vec<FieldError>,
}

impl<'m> Validator<'m> {
    pub fn new(images: &'m dyn ImageSource) -> Self {
        Self::with_media_check(images, MediaCheck::Require)
    }

    pub fn with_media_check(images: &'m dyn ImageSource, media: MediaCheck) -> Self {
        Self {
            images,
            media,
            errors: Vec::new(),
        }
    }

    pub fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `value` when nothing failed, otherwise every collected error.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }

    pub fn text(&mut self, path: &str, value: &str, rule: TextRule) {
        if rule.required && value.trim().is_empty() {
            self.error(path, REQUIRED);
            return;
        }
        if let Some(max) = rule.max_len {
            let len = value.chars().count();
            if len > max {
                self.error(
                    path,
                    format!("Ensure this value has at most {max} characters (it has {len})."),
                );
            }
        }
    }

    /// Checks an optional or required URL, returning it when non-empty.
    pub fn url(&mut self, path: &str, value: &str, required: bool) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            if required {
                self.error(path, REQUIRED);
            }
            return None;
        }
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Some(value.to_string())
            }
            _ => {
                self.error(path, "Enter a valid URL.");
                None
            }
        }
    }

    pub fn image(&mut self, path: &str, id: ImageId) {
        if self.media == MediaCheck::Require && !self.images.contains(id) {
            self.error(path, format!("Image {id} does not exist."));
        }
    }

    pub fn text_value(&mut self, path: &str, value: Option<&Value>, rule: TextRule) -> String {
        match value {
            None | Some(Value::Null) => {
                self.text(path, "", rule);
                String::new()
            }
            Some(Value::String(s)) => {
                self.text(path, s, rule);
                s.clone()
            }
            Some(_) => {
                self.error(path, "Expected text.");
                String::new()
            }
        }
    }

    pub fn choice_value<C: Choice>(&mut self, path: &str, value: Option<&Value>) -> C {
        match value {
            None | Some(Value::Null) => C::default(),
            Some(Value::String(s)) if s.is_empty() => C::default(),
            Some(Value::String(s)) => C::from_value(s).unwrap_or_else(|| {
                self.error(
                    path,
                    format!(
                        "Select a valid choice. {s} is not one of the available choices ({}).",
                        C::expected()
                    ),
                );
                C::default()
            }),
            Some(other) => {
                self.error(
                    path,
                    format!("Select a valid choice. {other} is not one of the available choices."),
                );
                C::default()
            }
        }
    }

    pub fn image_value(&mut self, path: &str, value: &Value) -> Option<ImageId> {
        let id = match value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            // List items may be stored in the `{type, id, value}` item form.
            Value::Object(map) => map
                .get("value")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
            _ => None,
        };
        match id {
            Some(id) => {
                let id = ImageId(id);
                self.image(path, id);
                Some(id)
            }
            None => {
                self.error(path, "Expected an image id.");
                None
            }
        }
    }

    /// Opens a struct value for field-by-field reading.
    ///
    /// A null value reads as an empty struct so every field falls back to its
    /// default or reports itself as required.
    pub fn fields<'v, 's>(
        &'s mut self,
        path: &str,
        value: &'v Value,
    ) -> Option<FieldReader<'v, 's, 'm>> {
        match value {
            Value::Object(map) => Some(FieldReader::new(path.to_string(), Some(map), self)),
            Value::Null => Some(FieldReader::new(path.to_string(), None, self)),
            _ => {
                self.error(path, "Expected an object.");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::choices::ButtonVariant;
    use crate::tests::TestImages;
    use serde_json::json;

    #[test]
    fn required_text_rejects_blank() {
        let images = TestImages::default();
        let mut cx = Validator::new(&images);
        cx.text("title", "   ", TextRule::required());
        let err = cx.finish(()).unwrap_err();
        assert_eq!(err.find("title").unwrap().message, REQUIRED);
    }

    #[test]
    fn max_length_counts_characters() {
        let images = TestImages::default();
        let mut cx = Validator::new(&images);
        cx.text("caption", &"é".repeat(5), TextRule::optional().max(5));
        assert!(!cx.has_errors());
        cx.text("caption", &"é".repeat(6), TextRule::optional().max(5));
        let err = cx.finish(()).unwrap_err();
        assert!(err.errors[0].message.contains("at most 5 characters (it has 6)"));
    }

    #[test]
    fn urls_must_be_absolute_http() {
        let images = TestImages::default();
        let mut cx = Validator::new(&images);
        assert_eq!(
            cx.url("url", "https://example.com/a", true),
            Some("https://example.com/a".to_string())
        );
        assert_eq!(cx.url("link", "", false), None);
        assert!(!cx.has_errors());

        assert_eq!(cx.url("bad", "javascript:alert(1)", false), None);
        assert_eq!(cx.url("relative", "/about/", false), None);
        let err = cx.finish(()).unwrap_err();
        assert_eq!(err.paths(), vec!["bad", "relative"]);
    }

    #[test]
    fn missing_choice_takes_default_and_unknown_choice_errors() {
        let images = TestImages::default();
        let mut cx = Validator::new(&images);
        let variant: ButtonVariant = cx.choice_value("variant", None);
        assert_eq!(variant, ButtonVariant::Primary);

        let variant: ButtonVariant = cx.choice_value("variant", Some(&json!("ghost")));
        assert_eq!(variant, ButtonVariant::Primary);
        let err = cx.finish(()).unwrap_err();
        assert!(err.errors[0].message.contains("ghost is not one of"));
    }

    #[test]
    fn image_references_must_resolve_unless_skipped() {
        let images = TestImages::with_ids(&[1]);
        let mut cx = Validator::new(&images);
        assert_eq!(cx.image_value("image", &json!(1)), Some(ImageId(1)));
        assert_eq!(cx.image_value("image", &json!(7)), Some(ImageId(7)));
        let err = cx.finish(()).unwrap_err();
        assert_eq!(err.errors[0].message, "Image 7 does not exist.");

        let mut lenient = Validator::with_media_check(&images, MediaCheck::Skip);
        lenient.image_value("image", &json!(7));
        assert!(!lenient.has_errors());
    }

    #[test]
    fn list_item_form_is_accepted_for_images() {
        let images = TestImages::with_ids(&[4]);
        let mut cx = Validator::new(&images);
        let id = cx.image_value("images[0]", &json!({"type": "item", "value": 4, "id": "x"}));
        assert_eq!(id, Some(ImageId(4)));
        assert!(!cx.has_errors());
    }
}
