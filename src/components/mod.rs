//! Shared UI components
//!
//! Fragments that recur across screens. Every page exposes all of them
//! through [`Page`](crate::pages::Page); each holds the same
//! [`PageContext`](crate::pages::PageContext) as the page it came from.

pub mod cart_modal;
pub mod category_sidebar;
pub mod footer;
pub mod header;
pub mod product_grid;
pub mod scroll_up;

pub use cart_modal::CartModal;
pub use category_sidebar::CategorySidebar;
pub use footer::Footer;
pub use header::Header;
pub use product_grid::ProductGrid;
pub use scroll_up::ScrollUp;
