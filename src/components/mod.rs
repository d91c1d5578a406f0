//! UI Components
//!
//! Reusable Leptos components.

mod new_item_form;
mod page_header;
mod sync_banner;
mod todo_board;
mod todo_item;
mod view_selector;

pub use new_item_form::NewItemForm;
pub use page_header::PageHeader;
pub use sync_banner::SyncBanner;
pub use todo_board::TodoBoard;
pub use todo_item::TodoItem;
pub use view_selector::ViewSelector;
