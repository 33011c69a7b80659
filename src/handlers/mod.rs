//! HTTP handlers for backend grids, generic actions, post forms and theme options.

pub mod actions;
pub mod grid;
pub mod posts;
pub mod themes;
pub use actions::*;
pub use grid::*;
pub use posts::*;
pub use themes::*;
