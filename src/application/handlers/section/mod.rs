//! Section command and query handlers.

mod create_section;
mod delete_section;
mod list_sections;

pub use create_section::{CreateSectionCommand, CreateSectionHandler};
pub use delete_section::{DeleteSectionCommand, DeleteSectionHandler};
pub use list_sections::ListSectionsHandler;
