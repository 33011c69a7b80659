//! Safe SQL builder: identifiers from entity metadata and validated grid config, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
