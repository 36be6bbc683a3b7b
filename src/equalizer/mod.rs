pub mod bands;

pub use bands::{plan_bands, EqualizerBandSpec, MAX_BAND_COUNT};
