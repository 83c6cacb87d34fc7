pub mod charts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod render;
pub mod style;

#[cfg(test)]
pub(crate) mod test_support;

pub use charts::{aggregate, Chart, ChartId, Router};
pub use dataset::{DatasetCache, PreparedTable};
pub use error::{ChartError, ChartResult, DataLoadError};
