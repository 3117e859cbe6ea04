//! Listing pages: which posts and projects appear, in what order, and how
//! they are paged.

pub mod blog;
pub mod paginator;
pub mod portfolio;

pub use blog::{BlogListing, Neighbours, blog_by_tag, blog_index, live_posts, neighbours};
pub use paginator::{Page, paginate};
pub use portfolio::{PortfolioListing, live_projects, portfolio_index};

/// Posts per blog index page unless configured otherwise.
pub const DEFAULT_POSTS_PER_PAGE: usize = 9;
