pub mod cache;
pub mod explore;
pub mod filter;
pub mod render;

pub use cache::TreeCache;
pub use explore::{ExploreOptions, explore};
pub use render::{RenderOptions, write_children};
