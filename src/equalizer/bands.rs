use serde::Serialize;
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Peak depth of the cosine preset, as a fraction of half the gain range.
const SMILE_DEPTH: f64 = 0.4;

/// Octave bands past this many leave any audible range.
pub const MAX_BAND_COUNT: usize = 32;

/// One equalizer channel: where it sits and the gain it starts with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EqualizerBandSpec {
    pub center_frequency: f64,
    pub bandwidth: f64,
    pub initial_gain: f64,
}

impl EqualizerBandSpec {
    /// Caption for the band, e.g. `"500 Hz"` or `"2.0 kHz"`.
    pub fn label(&self) -> String {
        if self.center_frequency < 1000.0 {
            format!("{:.0} Hz", self.center_frequency)
        } else {
            format!("{:.1} kHz", self.center_frequency / 1000.0)
        }
    }
}

/// Lay out `band_count` octave-spaced bands starting at `start_frequency`,
/// with initial gains following a "smile" preset: highest at both ends,
/// lowest at the middle band.
///
/// Gains stay between the midpoint of `[gain_min, gain_max]` and
/// `gain_max - 0.2 * (gain_max - gain_min) / 2`.
pub fn plan_bands(
    start_frequency: f64,
    band_count: usize,
    gain_min: f64,
    gain_max: f64,
) -> Result<Vec<EqualizerBandSpec>> {
    if band_count == 0 {
        return Err(Error::InvalidArgument("band count must be at least 1".into()));
    }
    if band_count > MAX_BAND_COUNT {
        return Err(Error::InvalidArgument(format!(
            "band count {} exceeds the maximum of {}",
            band_count, MAX_BAND_COUNT
        )));
    }
    if !start_frequency.is_finite() || start_frequency <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "start frequency must be positive, got {}",
            start_frequency
        )));
    }
    if !(gain_max > gain_min) || !gain_min.is_finite() || !gain_max.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "gain range [{}, {}] is empty",
            gain_min, gain_max
        )));
    }

    let mid = (gain_max - gain_min) / 2.0;
    let mut freq = start_frequency;
    let mut bands = Vec::with_capacity(band_count);

    for j in 0..band_count {
        // 0..2π across the bands, so cos() dips once in the middle
        let theta = if band_count == 1 {
            0.0
        } else {
            j as f64 / (band_count - 1) as f64 * (2.0 * PI)
        };
        let scale = SMILE_DEPTH * (1.0 + theta.cos());

        bands.push(EqualizerBandSpec {
            center_frequency: freq,
            bandwidth: freq / 2.0,
            initial_gain: gain_min + mid + mid * scale,
        });
        freq *= 2.0;
    }

    log::debug!(
        "Planned {} bands from {:.1} Hz, gain range [{}, {}]",
        band_count,
        start_frequency,
        gain_min,
        gain_max
    );

    Ok(bands)
}
