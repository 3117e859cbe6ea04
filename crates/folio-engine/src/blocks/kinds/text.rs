use serde::Serialize;

/// Rich text as produced by the editor: an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RichText(pub String);

impl RichText {
    pub fn as_html(&self) -> &str {
        &self.0
    }
}
