pub mod bundle;
pub mod category;
pub mod geo;
pub mod geo_filter;
pub mod manifest;
pub mod source;
pub mod tables;

pub use bundle::*;
pub use category::*;
pub use geo::*;
pub use geo_filter::*;
pub use manifest::*;
pub use source::*;
pub use tables::*;
