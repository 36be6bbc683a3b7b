pub mod analysis;
pub mod features;
pub mod smoothing;

pub use analysis::{AggregationPlan, SpectrumAggregator, StaleBandPolicy, ANALYSIS_UPPER_HZ};
pub use features::{BandLevels, SpectrumFrame};
pub use smoothing::LevelSmoother;
