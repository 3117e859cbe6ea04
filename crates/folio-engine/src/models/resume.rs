use serde::{Deserialize, Serialize};

use crate::blocks::{TextRule, Validator};

const NAME: TextRule = TextRule::required().max(200);
const LOCATION: TextRule = TextRule::optional().max(200);

/// Shared by education and experience entries.
pub trait Dated {
    fn start_year(&self) -> u32;
    /// `None` while still ongoing.
    fn end_year(&self) -> Option<u32>;
    fn order(&self) -> u32;

    /// `"2019 – 2023"` or `"2021 – Present"`.
    fn years(&self) -> String {
        match self.end_year() {
            Some(end) => format!("{} – {end}", self.start_year()),
            None => format!("{} – Present", self.start_year()),
        }
    }
}

/// Ascending `order`, then most recent start first.
pub fn sort_dated<T: Dated>(entries: &mut [T]) {
    entries.sort_by(|a, b| {
        a.order()
            .cmp(&b.order())
            .then(b.start_year().cmp(&a.start_year()))
    });
}

fn validate_years(cx: &mut Validator<'_>, start_year: u32, end_year: Option<u32>) {
    if let Some(end) = end_year
        && end < start_year
    {
        cx.error("end_year", "End year cannot be before the start year.");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub id: u32,
    pub title: String,
    pub institution: String,
    #[serde(default)]
    pub location: String,
    pub start_year: u32,
    #[serde(default)]
    pub end_year: Option<u32>,
    /// Markdown.
    #[serde(default)]
    pub blurb: String,
    #[serde(default)]
    pub order: u32,
}

impl Education {
    pub fn validate(&self, cx: &mut Validator<'_>) {
        cx.text("title", &self.title, NAME);
        cx.text("institution", &self.institution, NAME);
        cx.text("location", &self.location, LOCATION);
        validate_years(cx, self.start_year, self.end_year);
    }
}

impl Dated for Education {
    fn start_year(&self) -> u32 {
        self.start_year
    }
    fn end_year(&self) -> Option<u32> {
        self.end_year
    }
    fn order(&self) -> u32 {
        self.order
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    #[serde(default)]
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub id: u32,
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub start_year: u32,
    #[serde(default)]
    pub end_year: Option<u32>,
    #[serde(default)]
    pub blurb: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub bullets: Vec<Bullet>,
}

impl Experience {
    pub fn validate(&self, cx: &mut Validator<'_>) {
        cx.text("role", &self.role, NAME);
        cx.text("company", &self.company, NAME);
        cx.text("location", &self.location, LOCATION);
        validate_years(cx, self.start_year, self.end_year);
        for (i, bullet) in self.bullets.iter().enumerate() {
            cx.text(
                &format!("bullets[{i}].text"),
                &bullet.text,
                TextRule::required().max(300),
            );
        }
    }

    /// Bullets by `(order, id)`.
    pub fn sorted_bullets(&self) -> Vec<&Bullet> {
        let mut bullets: Vec<&Bullet> = self.bullets.iter().collect();
        bullets.sort_by_key(|b| (b.order, b.id));
        bullets
    }
}

impl Dated for Experience {
    fn start_year(&self) -> u32 {
        self.start_year
    }
    fn end_year(&self) -> Option<u32> {
        self.end_year
    }
    fn order(&self) -> u32 {
        self.order
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Optional icon class, e.g. `bi-code-slash`.
    #[serde(default)]
    pub icon: String,
}

fn default_true() -> bool {
    true
}

impl Skill {
    pub fn validate(&self, cx: &mut Validator<'_>) {
        cx.text("name", &self.name, TextRule::required().max(80));
        cx.text("description", &self.description, TextRule::optional().max(240));
        cx.text("icon", &self.icon, TextRule::optional().max(64));
    }
}

/// Skills by `(order, id)`.
pub fn sort_skills(skills: &mut [Skill]) {
    skills.sort_by_key(|s| (s.order, s.id));
}

/// Active skills by `(order, id)`.
pub fn active_skills(skills: &[Skill]) -> Vec<&Skill> {
    let mut active: Vec<&Skill> = skills.iter().filter(|s| s.active).collect();
    active.sort_by_key(|s| (s.order, s.id));
    active
}
