//! Domain types: bars and the validated price series.

mod bar;
mod series;

pub use bar::Bar;
pub use series::{PriceSeries, SeriesError, SeriesHash};
