use super::features::BandLevels;

/// Exponential moving average over successive [`BandLevels`].
///
/// `smoothing` is the weight kept from the previous output: 0.0 passes
/// levels straight through, values near 1.0 respond slowly.
#[derive(Clone, Debug)]
pub struct LevelSmoother {
    alpha: f64,
    state: Option<Vec<f64>>,
}

impl LevelSmoother {
    pub fn new(smoothing: f64) -> Self {
        let smoothing = if smoothing.is_finite() {
            smoothing.clamp(0.0, 0.99)
        } else {
            0.0
        };
        Self {
            alpha: 1.0 - smoothing,
            state: None,
        }
    }

    /// Fold in one frame's levels and return the smoothed result.
    /// A change in band count restarts the average.
    pub fn apply(&mut self, levels: &BandLevels) -> BandLevels {
        let alpha = self.alpha;
        match &mut self.state {
            Some(prev) if prev.len() == levels.len() => {
                for (p, &v) in prev.iter_mut().zip(&levels.values) {
                    *p = alpha * v + (1.0 - alpha) * *p;
                }
            }
            state => *state = Some(levels.values.clone()),
        }

        BandLevels {
            values: self.state.clone().unwrap_or_default(),
        }
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}
