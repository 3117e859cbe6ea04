use std::cmp::Reverse;

use crate::models::page::Project;
use crate::models::portfolio_item::PortfolioItem;
use crate::models::tag::{Tag, distinct_tags};

#[derive(Debug)]
pub struct PortfolioListing<'a> {
    pub projects: Vec<&'a Project>,
    pub active_tag: Option<String>,
    /// Older hand-built entries, shown only on the unfiltered listing.
    pub legacy_items: Vec<&'a PortfolioItem>,
    pub active_category: Option<String>,
}

impl PortfolioListing<'_> {
    /// Narrows the legacy items to one category slug. A blank category
    /// counts as no filter.
    pub fn narrow_to_category(mut self, category: Option<&str>) -> Self {
        if let Some(slug) = category.map(str::trim).filter(|c| !c.is_empty()) {
            self.legacy_items.retain(|item| item.in_category(slug));
            self.active_category = Some(slug.to_string());
        }
        self
    }
}

/// Live projects, newest first.
pub fn live_projects(projects: &[Project]) -> Vec<&Project> {
    let mut live: Vec<&Project> = projects.iter().filter(|p| p.live).collect();
    live.sort_by_key(|p| (Reverse(p.first_published_at), p.slug.clone()));
    live
}

/// The portfolio index, optionally narrowed to one tag. A blank tag counts
/// as no filter.
pub fn portfolio_index<'a>(
    projects: &'a [Project],
    items: &'a [PortfolioItem],
    tag: Option<&str>,
) -> PortfolioListing<'a> {
    let tag = tag.map(str::trim).filter(|t| !t.is_empty());
    let live = live_projects(projects);
    match tag {
        Some(tag) => PortfolioListing {
            projects: live.into_iter().filter(|p| p.has_tag(tag)).collect(),
            active_tag: Some(tag.to_string()),
            legacy_items: Vec::new(),
            active_category: None,
        },
        None => PortfolioListing {
            projects: live,
            active_tag: None,
            legacy_items: active_items(items),
            active_category: None,
        },
    }
}

/// Active legacy items by `(order, id)`.
pub fn active_items(items: &[PortfolioItem]) -> Vec<&PortfolioItem> {
    let mut active: Vec<&PortfolioItem> = items.iter().filter(|i| i.active).collect();
    active.sort_by_key(|i| (i.order, i.id));
    active
}

/// Distinct tags over live projects, by name.
pub fn project_tags(projects: &[Project]) -> Vec<&Tag> {
    distinct_tags(projects.iter().filter(|p| p.live).flat_map(|p| &p.tags))
}
