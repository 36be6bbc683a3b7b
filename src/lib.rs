//! Equalizer band planning and spectrum-to-band level aggregation for an
//! audio player's visualizer.

pub mod audio;
pub mod config;
pub mod equalizer;
pub mod error;
pub mod replay;
pub mod session;

pub use audio::{
    AggregationPlan, BandLevels, LevelSmoother, SpectrumAggregator, SpectrumFrame,
    StaleBandPolicy, ANALYSIS_UPPER_HZ,
};
pub use equalizer::{plan_bands, EqualizerBandSpec, MAX_BAND_COUNT};
pub use error::{Error, Result};
pub use session::Session;
