//! Content views: the home page, category listings and the sample mount.

/// Landing page.
pub mod home;
/// Directory of one category's samples.
pub mod listing;
/// Mounted sample, panel and surface.
pub mod mount;

pub use home::HomeView;
pub use listing::{ListingView, SampleCard};
pub use mount::{MountKey, MountView, Mounted, SampleMount, SourceView};
