//! Backend list grids: filter submission, cookie-persisted filter state, query and pagination.

pub mod filter;
pub mod paginate;
pub mod render;
pub mod state;

pub use filter::*;
pub use paginate::*;
pub use render::*;
pub use state::*;
