pub mod buckets;
pub mod lookup;
pub mod statistics;
pub mod totals;
pub mod trend;

pub use buckets::*;
pub use lookup::*;
pub use statistics::*;
pub use totals::*;
pub use trend::*;
