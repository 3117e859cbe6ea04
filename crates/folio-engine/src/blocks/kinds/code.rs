use serde::Serialize;

use super::StructBlock;
use crate::blocks::choices::CodeLanguage;
use crate::blocks::fields::FieldReader;
use crate::blocks::validate::TextRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Optional filename or label shown above the code.
    pub title: String,
    pub language: CodeLanguage,
    pub code: String,
}

impl StructBlock for CodeBlock {
    fn read(fields: &mut FieldReader<'_, '_, '_>) -> Option<Self> {
        let title = fields.text("title", TextRule::optional().max(120));
        let language = fields.choice("language");
        let code = fields.text("code", TextRule::required());
        Some(Self {
            title,
            language,
            code,
        })
    }
}
