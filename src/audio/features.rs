use serde::Serialize;

/// One analyzer callback's worth of spectrum data (analyzer output, dB scale)
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumFrame {
    /// Stream time of the frame in seconds
    pub timestamp: f64,
    /// Length of audio the frame covers, in seconds
    pub duration: f64,
    /// Per-bin magnitudes in dB, lowest frequency first
    pub magnitudes_db: Vec<f32>,
    /// Baseline subtracted from every magnitude in this frame
    pub noise_floor_db: f64,
}

impl SpectrumFrame {
    pub fn new(timestamp: f64, duration: f64, magnitudes_db: Vec<f32>, noise_floor_db: f64) -> Self {
        Self {
            timestamp,
            duration,
            magnitudes_db,
            noise_floor_db,
        }
    }

    /// A frame where every bin sits exactly on the noise floor.
    pub fn silent(raw_bin_count: usize, noise_floor_db: f64) -> Self {
        Self::new(0.0, 0.0, vec![noise_floor_db as f32; raw_bin_count], noise_floor_db)
    }
}

/// Aggregated level per equalizer band, in band order
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BandLevels {
    pub values: Vec<f64>,
}

impl BandLevels {
    pub fn zeros(band_count: usize) -> Self {
        Self {
            values: vec![0.0; band_count],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
