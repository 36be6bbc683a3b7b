use crate::audio::{AggregationPlan, BandLevels, LevelSmoother, SpectrumAggregator, SpectrumFrame};
use crate::config::Config;
use crate::equalizer::{plan_bands, EqualizerBandSpec};
use crate::error::Result;

/// Band plan, aggregator and smoother wired together for one analyzer session.
pub struct Session {
    start_frequency: f64,
    bands: Vec<EqualizerBandSpec>,
    plan: AggregationPlan,
    aggregator: SpectrumAggregator,
    smoother: LevelSmoother,
    noise_floor_db: f64,
    interval: f64,
}

impl Session {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let eq = &cfg.equalizer;
        let bands = plan_bands(eq.start_frequency, eq.band_count, eq.gain_min, eq.gain_max)?;

        let mut aggregator = SpectrumAggregator::new(cfg.levels.stale_bands);
        let plan = aggregator.configure(eq.start_frequency, cfg.spectrum.bands, &bands)?;

        log::info!(
            "Session: {} bands from {:.0} Hz, {} analyzer bins every {:.0} ms, noise floor {} dB",
            bands.len(),
            eq.start_frequency,
            cfg.spectrum.bands,
            cfg.spectrum.interval * 1000.0,
            cfg.spectrum.threshold
        );

        Ok(Self {
            start_frequency: eq.start_frequency,
            bands,
            plan,
            aggregator,
            smoother: LevelSmoother::new(cfg.levels.smoothing),
            noise_floor_db: cfg.spectrum.threshold,
            interval: cfg.spectrum.interval,
        })
    }

    pub fn bands(&self) -> &[EqualizerBandSpec] {
        &self.bands
    }

    pub fn plan(&self) -> &AggregationPlan {
        &self.plan
    }

    /// Analyzer threshold used for frames that don't carry their own.
    pub fn noise_floor_db(&self) -> f64 {
        self.noise_floor_db
    }

    /// Analyzer frame interval in seconds, the duration of frames that don't state one.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Rebuild the aggregation tables for a new analyzer bin count,
    /// e.g. after switching decoders. Smoothing restarts from scratch.
    /// On error the previous plan stays in effect.
    pub fn reconfigure(&mut self, raw_bin_count: usize) -> Result<&AggregationPlan> {
        let plan = self
            .aggregator
            .configure(self.start_frequency, raw_bin_count, &self.bands)?;
        self.smoother.reset();
        self.plan = plan;
        Ok(&self.plan)
    }

    pub fn process(&mut self, frame: &SpectrumFrame) -> Result<BandLevels> {
        let levels = self.aggregator.aggregate(frame)?;
        Ok(self.smoother.apply(&levels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::error::Error;

    #[test]
    fn default_session_matches_player_layout() {
        let session = Session::from_config(&Config::default()).unwrap();
        assert_eq!(session.bands().len(), 7);
        assert_eq!(session.plan().bucket_counts, vec![2, 2, 5, 8, 18, 35, 58]);
        assert_eq!(session.noise_floor_db(), -60.0);
    }

    #[test]
    fn bad_equalizer_settings_surface_as_invalid_argument() {
        let cfg = parse_config("[equalizer]\nband_count = 0").unwrap();
        assert!(matches!(
            Session::from_config(&cfg),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn bad_bin_count_surfaces_as_invalid_configuration() {
        let cfg = parse_config("[spectrum]\nbands = 0").unwrap();
        assert!(matches!(
            Session::from_config(&cfg),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn reconfigure_switches_bin_count() {
        let mut session = Session::from_config(&Config::default()).unwrap();
        let plan = session.reconfigure(512).unwrap();
        assert_eq!(plan.bucket_counts, vec![9, 8, 18, 35, 69, 140, 233]);

        assert!(session.process(&SpectrumFrame::silent(128, -60.0)).is_err());
        let levels = session.process(&SpectrumFrame::silent(512, -60.0)).unwrap();
        assert_eq!(levels.values, vec![0.0; 7]);
    }

    #[test]
    fn failed_reconfigure_keeps_previous_plan() {
        let mut session = Session::from_config(&Config::default()).unwrap();
        assert!(matches!(
            session.reconfigure(0),
            Err(Error::InvalidConfiguration(_))
        ));

        assert_eq!(session.plan().bucket_counts, vec![2, 2, 5, 8, 18, 35, 58]);
        let levels = session.process(&SpectrumFrame::silent(128, -60.0)).unwrap();
        assert_eq!(levels.values, vec![0.0; 7]);
    }

    #[test]
    fn retain_carries_levels_through_session_reconfigure() {
        let cfg = parse_config("[levels]\nstale_bands = \"retain\"").unwrap();
        let mut session = Session::from_config(&cfg).unwrap();
        let before = session
            .process(&SpectrumFrame::new(0.0, 0.1, vec![-50.0; 128], -60.0))
            .unwrap();

        session.reconfigure(4).unwrap();
        let after = session.process(&SpectrumFrame::silent(4, -60.0)).unwrap();
        assert_eq!(&after.values[..4], &[0.0; 4]);
        assert_eq!(&after.values[4..], &before.values[4..]);
        assert!(after.values[6] > 0.0);
    }

    #[test]
    fn interval_comes_from_config() {
        let session = Session::from_config(&Config::default()).unwrap();
        assert_eq!(session.interval(), 0.1);
        let cfg = parse_config("[spectrum]\ninterval = 0.025").unwrap();
        assert_eq!(Session::from_config(&cfg).unwrap().interval(), 0.025);
    }

    #[test]
    fn smoothing_applies_downstream() {
        let cfg = parse_config("[levels]\nsmoothing = 0.5").unwrap();
        let mut session = Session::from_config(&cfg).unwrap();

        session.process(&SpectrumFrame::silent(128, -60.0)).unwrap();
        let levels = session
            .process(&SpectrumFrame::new(0.1, 0.1, vec![-50.0; 128], -60.0))
            .unwrap();
        assert!((levels.values[0] - 0.5 * 20.0 / 1.05).abs() < 1e-9);
    }
}
