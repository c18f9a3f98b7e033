pub mod engine;
pub mod error;

pub mod momentum;
pub mod trend;

pub use engine::IndicatorEngine;
pub use error::IndicatorError;
