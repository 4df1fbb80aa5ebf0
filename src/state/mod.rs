// State management module.
// Menu hierarchy navigation and the projections shown at each level.

pub mod filters;
pub mod navigation;

pub use filters::UpcomingAssignment;
pub use navigation::{BreadcrumbNode, NavigationStack, ViewLevel};
