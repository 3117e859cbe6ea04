//! Editable snippets of site text and images, keyed by where they appear.

use relative_path::{RelativePath, RelativePathBuf};
use serde::{Deserialize, Serialize};

use crate::blocks::choices::choice;
use crate::blocks::{TextRule, Validator};
use crate::media::FileFields;

choice! {
    CopyKey {
        AboutTitle => ("about_title", "About: Section Title"),
        AboutLead => ("about_lead", "About: Lead Paragraph"),
        AboutIntroHeadline => ("about_intro_headline", "About: Intro Headline"),
        AboutIntroBody => ("about_intro_body", "About: Intro Body"),
        SkillsTitle => ("skills_title", "Skills: Section Title"),
        SkillsLead => ("skills_lead", "Skills: Lead Paragraph"),
        AboutQuote => ("about_quote", "About: Quote"),
    }
    default AboutTitle
}

choice! {
    AssetKey {
        AboutProfile => ("about_profile", "About: Profile Image"),
        HomeProfile => ("home_profile", "Home: Profile Image"),
    }
    default AboutProfile
}

/// A keyed row of which only one may be active per key.
pub trait Keyed {
    type Key: PartialEq + Copy + std::fmt::Display;

    fn id(&self) -> u32;
    fn key(&self) -> Self::Key;
    fn is_active(&self) -> bool;
}

/// The active row for `key`, if any.
pub fn active_for<T: Keyed>(rows: &[T], key: T::Key) -> Option<&T> {
    rows.iter().find(|row| row.is_active() && row.key() == key)
}

/// Reports a conflict when `row` is active and another active row already
/// holds its key.
pub fn check_single_active<T: Keyed>(cx: &mut Validator<'_>, row: &T, rows: &[T], noun: &str) {
    if !row.is_active() {
        return;
    }
    let taken = rows
        .iter()
        .any(|other| other.id() != row.id() && other.is_active() && other.key() == row.key());
    if taken {
        cx.error(
            "key",
            format!("Only one active {noun} is allowed for key='{}'.", row.key()),
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCopy {
    /// Zero for a row not yet saved.
    #[serde(default)]
    pub id: u32,
    pub key: CopyKey,
    pub text: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl SiteCopy {
    pub fn validate(&self, cx: &mut Validator<'_>, rows: &[SiteCopy]) {
        cx.text("text", &self.text, TextRule::required());
        check_single_active(cx, self, rows, "entry");
    }
}

impl Keyed for SiteCopy {
    type Key = CopyKey;

    fn id(&self) -> u32 {
        self.id
    }
    fn key(&self) -> CopyKey {
        self.key
    }
    fn is_active(&self) -> bool {
        self.active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAsset {
    #[serde(default)]
    pub id: u32,
    pub key: AssetKey,
    pub image: RelativePathBuf,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl SiteAsset {
    pub fn validate(&self, cx: &mut Validator<'_>, rows: &[SiteAsset]) {
        cx.text("image", self.image.as_str(), TextRule::required());
        cx.text("alt_text", &self.alt_text, TextRule::optional().max(160));
        check_single_active(cx, self, rows, "asset");
    }
}

impl Keyed for SiteAsset {
    type Key = AssetKey;

    fn id(&self) -> u32 {
        self.id
    }
    fn key(&self) -> AssetKey {
        self.key
    }
    fn is_active(&self) -> bool {
        self.active
    }
}

impl FileFields for SiteAsset {
    fn file_names(&self) -> Vec<&RelativePath> {
        vec![self.image.as_relative_path()]
    }
}

fn default_true() -> bool {
    true
}
