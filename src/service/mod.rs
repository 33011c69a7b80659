//! Entity services over the `EntityStore` seam.

mod crud;
mod posts;
mod site;
pub use crud::{CrudService, ENTRY_NOT_FOUND};
pub use posts::{save_post, slugify};
pub use site::SiteService;
