pub mod image;
pub mod page;
pub mod portfolio_item;
pub mod resume;
pub mod site_copy;
pub mod tag;

pub use image::{Image, ImageId, ImageSource, LibraryImages, MediaLibrary, ResolvedImage};
pub use page::{
    BlogIndex, BlogPost, BlogPostDraft, HomePage, PortfolioIndex, Project, ProjectDraft,
};
pub use portfolio_item::{PortfolioCategory, PortfolioItem};
pub use resume::{Bullet, Dated, Education, Experience, Skill};
pub use site_copy::{AssetKey, CopyKey, SiteAsset, SiteCopy};
pub use tag::{Tag, slugify};
