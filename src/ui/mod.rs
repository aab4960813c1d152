//! Client-side list pages: view state, table rendering and pt-BR formatting for the four
//! resources. Rendering itself is left to the embedding frontend.

pub mod format;
pub mod page;
pub mod table;

pub use page::{ListPage, MutationOutcome, Notification, PageState, Severity};
pub use table::{PageMessages, TableView};
