use serde::{Deserialize, Serialize};

use super::features::{BandLevels, SpectrumFrame};
use crate::equalizer::{EqualizerBandSpec, MAX_BAND_COUNT};
use crate::error::{Error, Result};

/// Upper edge of the analyzer's frequency range. Bins are assumed to cover
/// 0..22 050 Hz evenly, whatever the stream's real sample rate is.
pub const ANALYSIS_UPPER_HZ: f64 = 22_050.0;

/// Divisor growth seed: band `j` is divided by `1 + NORM_SEED * 2^j`.
const NORM_SEED: f64 = 0.05;

/// What a band gets when its bucket is empty because the bins ran out
/// before reaching it. Under `Retain`, levels also survive a reconfigure
/// that keeps the band count, so a band the new plan can't reach keeps
/// the last level the old plan gave it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleBandPolicy {
    /// Write 0.0.
    #[default]
    Reset,
    /// Keep whatever the previous frame (or the previous plan) left there.
    Retain,
}

/// Static bin-to-band tables for one analyzer session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregationPlan {
    pub raw_bin_count: usize,
    /// Consecutive raw bins summed into each band, lowest band first
    pub bucket_counts: Vec<usize>,
    /// Divisor applied to each band's sum
    pub norm_divisors: Vec<f64>,
}

impl AggregationPlan {
    pub fn build(start_frequency: f64, raw_bin_count: usize, band_count: usize) -> Result<Self> {
        if raw_bin_count == 0 {
            return Err(Error::InvalidConfiguration(
                "raw bin count must be positive".into(),
            ));
        }
        if band_count == 0 {
            return Err(Error::InvalidConfiguration("no equalizer bands given".into()));
        }
        if band_count > MAX_BAND_COUNT {
            return Err(Error::InvalidConfiguration(format!(
                "{} bands requested, at most {} supported",
                band_count, MAX_BAND_COUNT
            )));
        }
        if !start_frequency.is_finite() || start_frequency <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "start frequency must be positive, got {}",
                start_frequency
            )));
        }

        Ok(Self {
            raw_bin_count,
            bucket_counts: bucket_counts(start_frequency, raw_bin_count, band_count),
            norm_divisors: norm_divisors(band_count),
        })
    }

    pub fn band_count(&self) -> usize {
        self.bucket_counts.len()
    }

    /// Bins that land in some band. Anything past this is ignored.
    pub fn assigned_bins(&self) -> usize {
        self.bucket_counts.iter().sum()
    }
}

/// Walk the bins upwards, moving to the next band whenever a bin's center
/// passes 1.5x the current band frequency. Stops as soon as the bands are
/// used up, so trailing bins are dropped and the last band tends to be wide.
fn bucket_counts(start_frequency: f64, raw_bin_count: usize, band_count: usize) -> Vec<usize> {
    let bin_width = ANALYSIS_UPPER_HZ / raw_bin_count as f64;
    let mut counts = vec![0usize; band_count];

    let mut eq_freq = start_frequency / 2.0;
    let mut cutoff = 0.0;
    let mut band: Option<usize> = None;

    for i in 0..raw_bin_count {
        let center = bin_width * i as f64 + bin_width / 2.0;
        if center > cutoff {
            let next = band.map_or(0, |b| b + 1);
            if next == band_count {
                break;
            }
            band = Some(next);
            eq_freq *= 2.0;
            cutoff = eq_freq * 1.5;
        }
        if let Some(b) = band {
            counts[b] += 1;
        }
    }

    counts
}

fn norm_divisors(band_count: usize) -> Vec<f64> {
    let mut norm = NORM_SEED;
    (0..band_count)
        .map(|_| {
            let divisor = 1.0 + norm;
            norm *= 2.0;
            divisor
        })
        .collect()
}

/// Folds analyzer frames into one level per equalizer band.
///
/// Starts unconfigured; frames are rejected with [`Error::NotConfigured`]
/// until [`configure`](Self::configure) succeeds. Reconfiguring replaces the
/// plan wholesale.
#[derive(Debug, Default)]
pub struct SpectrumAggregator {
    plan: Option<AggregationPlan>,
    policy: StaleBandPolicy,
    levels: BandLevels,
}

impl SpectrumAggregator {
    pub fn new(policy: StaleBandPolicy) -> Self {
        Self {
            plan: None,
            policy,
            levels: BandLevels::default(),
        }
    }

    pub fn configure(
        &mut self,
        start_frequency: f64,
        raw_bin_count: usize,
        band_specs: &[EqualizerBandSpec],
    ) -> Result<AggregationPlan> {
        let plan = AggregationPlan::build(start_frequency, raw_bin_count, band_specs.len())?;

        log::debug!(
            "Aggregation plan: {} bins -> {} bands, buckets {:?} ({} bins dropped)",
            raw_bin_count,
            plan.band_count(),
            plan.bucket_counts,
            raw_bin_count - plan.assigned_bins()
        );

        let carry = self.policy == StaleBandPolicy::Retain
            && self.levels.len() == plan.band_count();
        if !carry {
            self.levels = BandLevels::zeros(plan.band_count());
        }
        self.plan = Some(plan.clone());
        Ok(plan)
    }

    /// Drop the current plan. Frames are rejected until the next `configure`.
    pub fn reset(&mut self) {
        self.plan = None;
        self.levels = BandLevels::default();
    }

    pub fn is_ready(&self) -> bool {
        self.plan.is_some()
    }

    pub fn plan(&self) -> Option<&AggregationPlan> {
        self.plan.as_ref()
    }

    pub fn policy(&self) -> StaleBandPolicy {
        self.policy
    }

    pub fn aggregate(&mut self, frame: &SpectrumFrame) -> Result<BandLevels> {
        let plan = self.plan.as_ref().ok_or(Error::NotConfigured)?;
        if frame.magnitudes_db.len() != plan.raw_bin_count {
            return Err(Error::FrameShapeMismatch {
                expected: plan.raw_bin_count,
                actual: frame.magnitudes_db.len(),
            });
        }

        // subtract in the magnitudes' own precision so bins on the floor give exactly 0
        let noise_floor = frame.noise_floor_db as f32;
        let mut bins = frame.magnitudes_db.iter();

        for ((level, &count), &divisor) in self
            .levels
            .values
            .iter_mut()
            .zip(&plan.bucket_counts)
            .zip(&plan.norm_divisors)
        {
            if count == 0 {
                if self.policy == StaleBandPolicy::Reset {
                    *level = 0.0;
                }
                continue;
            }
            let sum: f64 = bins
                .by_ref()
                .take(count)
                .map(|&m| f64::from(m - noise_floor))
                .sum();
            *level = sum / divisor;
        }

        log::trace!("t={:.3}s levels={:?}", frame.timestamp, self.levels.values);
        Ok(self.levels.clone())
    }
}
