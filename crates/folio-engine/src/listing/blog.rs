use std::cmp::Reverse;

use super::paginator::{Page, paginate};
use crate::models::page::BlogPost;
use crate::models::tag::{Tag, distinct_tags};

/// Everything the blog index template needs.
#[derive(Debug)]
pub struct BlogListing<'a> {
    pub featured_post: Option<&'a BlogPost>,
    pub posts: Page<&'a BlogPost>,
    /// Set on the tag route.
    pub filtered_tag_slug: Option<String>,
}

/// Live posts, newest first.
pub fn live_posts(posts: &[BlogPost]) -> Vec<&BlogPost> {
    let mut live: Vec<&BlogPost> = posts.iter().filter(|p| p.live).collect();
    live.sort_by_key(|p| (Reverse(p.first_published_at), Reverse(p.date), p.slug.clone()));
    live
}

/// The first post flagged featured, otherwise the newest.
pub fn featured_post<'a>(live: &[&'a BlogPost]) -> Option<&'a BlogPost> {
    live.iter()
        .find(|p| p.featured)
        .or_else(|| live.first())
        .copied()
}

/// The index: the featured post on its own, the rest paginated.
pub fn blog_index<'a>(posts: &'a [BlogPost], per_page: usize, page: Option<&str>) -> BlogListing<'a> {
    let live = live_posts(posts);
    let featured = featured_post(&live);
    let rest: Vec<&BlogPost> = live
        .into_iter()
        .filter(|p| featured.is_none_or(|f| f.slug != p.slug))
        .collect();

    BlogListing {
        featured_post: featured,
        posts: paginate(rest, per_page, page),
        filtered_tag_slug: None,
    }
}

/// Posts carrying `tag_slug`, paginated. The featured post stays in this
/// list; `featured_post` is still chosen from all live posts.
pub fn blog_by_tag<'a>(
    posts: &'a [BlogPost],
    tag_slug: &str,
    per_page: usize,
    page: Option<&str>,
) -> BlogListing<'a> {
    let live = live_posts(posts);
    let featured = featured_post(&live);
    let tagged: Vec<&BlogPost> = live.into_iter().filter(|p| p.has_tag(tag_slug)).collect();

    BlogListing {
        featured_post: featured,
        posts: paginate(tagged, per_page, page),
        filtered_tag_slug: Some(tag_slug.to_string()),
    }
}

/// Adjacent live posts in publication order.
#[derive(Debug, Default, PartialEq)]
pub struct Neighbours<'a> {
    /// Published just before.
    pub previous: Option<&'a BlogPost>,
    /// Published just after.
    pub next: Option<&'a BlogPost>,
}

pub fn neighbours<'a>(posts: &'a [BlogPost], slug: &str) -> Neighbours<'a> {
    let live = live_posts(posts);
    let Some(i) = live.iter().position(|p| p.slug == slug) else {
        return Neighbours::default();
    };
    Neighbours {
        previous: live.get(i + 1).copied(),
        next: i.checked_sub(1).and_then(|j| live.get(j)).copied(),
    }
}

/// Distinct tags over live posts, by name.
pub fn post_tags(posts: &[BlogPost]) -> Vec<&Tag> {
    distinct_tags(posts.iter().filter(|p| p.live).flat_map(|p| &p.tags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Body;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    /// Post `n` is published `n` days after the first.
    fn post(n: i64, featured: bool, tags: &[&str]) -> BlogPost {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        BlogPost {
            slug: format!("post-{n}"),
            title: format!("Post {n}"),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n),
            first_published_at: Some(start + Duration::days(n)),
            intro: String::new(),
            featured,
            reading_time_minutes: None,
            hero_image: None,
            hero_caption: String::new(),
            tags: tags.iter().map(|t| Tag::new(*t)).collect(),
            body: Body::default(),
            live: true,
        }
    }

    fn slugs(page: &Page<&BlogPost>) -> Vec<String> {
        page.items.iter().map(|p| p.slug.clone()).collect()
    }

    #[test]
    fn flagged_post_is_featured_and_excluded() {
        let posts: Vec<_> = (1..=10).map(|n| post(n, n == 4, &[])).collect();

        let listing = blog_index(&posts, 9, None);

        assert_eq!(listing.featured_post.unwrap().slug, "post-4");
        assert_eq!(listing.posts.count, 9);
        assert_eq!(listing.posts.num_pages, 1);
        assert!(!slugs(&listing.posts).contains(&"post-4".to_string()));
        assert_eq!(listing.posts.items[0].slug, "post-10");
    }

    #[test]
    fn newest_post_is_featured_when_none_flagged() {
        let posts: Vec<_> = (1..=3).map(|n| post(n, false, &[])).collect();
        let listing = blog_index(&posts, 9, None);
        assert_eq!(listing.featured_post.unwrap().slug, "post-3");
        assert_eq!(slugs(&listing.posts), vec!["post-2", "post-1"]);
    }

    #[test]
    fn drafts_are_not_listed() {
        let mut posts: Vec<_> = (1..=3).map(|n| post(n, false, &[])).collect();
        posts[2].live = false;
        let listing = blog_index(&posts, 9, None);
        assert_eq!(listing.featured_post.unwrap().slug, "post-2");
        assert_eq!(slugs(&listing.posts), vec!["post-1"]);
    }

    #[test]
    fn pages_of_nine() {
        let posts: Vec<_> = (1..=20).map(|n| post(n, false, &[])).collect();
        let listing = blog_index(&posts, 9, Some("3"));
        assert_eq!(listing.posts.number, 3);
        assert_eq!(slugs(&listing.posts), vec!["post-1"]);
        let listing = blog_index(&posts, 9, Some("nope"));
        assert_eq!(listing.posts.number, 1);
    }

    #[test]
    fn tag_route_keeps_featured_post_in_list() {
        let posts = vec![
            post(1, false, &["Rust"]),
            post(2, true, &["Rust", "Web"]),
            post(3, false, &["Web"]),
        ];

        let listing = blog_by_tag(&posts, "rust", 9, None);

        assert_eq!(listing.featured_post.unwrap().slug, "post-2");
        assert_eq!(slugs(&listing.posts), vec!["post-2", "post-1"]);
        assert_eq!(listing.filtered_tag_slug.as_deref(), Some("rust"));
    }

    #[test]
    fn unknown_tag_gives_empty_listing() {
        let posts = vec![post(1, false, &["Rust"])];
        let listing = blog_by_tag(&posts, "cobol", 9, None);
        assert!(listing.posts.is_empty());
        assert_eq!(listing.posts.num_pages, 1);
        assert!(listing.featured_post.is_some());
    }

    #[test]
    fn neighbours_follow_publication_order() {
        let posts: Vec<_> = (1..=3).map(|n| post(n, false, &[])).collect();

        let middle = neighbours(&posts, "post-2");
        assert_eq!(middle.previous.unwrap().slug, "post-1");
        assert_eq!(middle.next.unwrap().slug, "post-3");

        let newest = neighbours(&posts, "post-3");
        assert_eq!(newest.next, None);
        assert_eq!(neighbours(&posts, "missing"), Neighbours::default());
    }

    #[test]
    fn tags_are_distinct_and_sorted() {
        let posts = vec![post(1, false, &["Web", "Rust"]), post(2, false, &["Rust"])];
        let names: Vec<_> = post_tags(&posts).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Web"]);
    }

    #[test]
    fn tags_differing_only_in_case_collapse() {
        let posts = vec![post(1, false, &["Rust", "Web"]), post(2, false, &["rust"])];
        let tags = post_tags(&posts);
        let slugs: Vec<_> = tags.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["rust", "web"]);
        assert_eq!(tags[0].name, "Rust");
    }
}
