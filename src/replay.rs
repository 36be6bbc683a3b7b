use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

use crate::audio::{BandLevels, SpectrumFrame};

/// One recorded analyzer callback, as stored in a JSON-lines capture.
#[derive(Debug, Deserialize)]
pub struct FrameRecord {
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default)]
    pub duration: Option<f64>,
    pub magnitudes_db: Vec<f32>,
    /// Carried by the analyzer callback but not used for levels
    #[serde(default)]
    pub phases: Vec<f32>,
    #[serde(default)]
    pub noise_floor_db: Option<f64>,
}

impl FrameRecord {
    pub fn into_frame(self, default_noise_floor_db: f64, default_interval: f64) -> SpectrumFrame {
        SpectrumFrame::new(
            self.timestamp,
            self.duration.unwrap_or(default_interval),
            self.magnitudes_db,
            self.noise_floor_db.unwrap_or(default_noise_floor_db),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct LevelRecord<'a> {
    pub timestamp: f64,
    pub levels: &'a BandLevels,
}

/// Parse a JSON-lines capture. Blank lines are skipped; frames without a
/// noise floor get `default_noise_floor_db`, frames without a duration
/// get the analyzer's `default_interval`.
pub fn read_frames<R: BufRead>(
    reader: R,
    default_noise_floor_db: f64,
    default_interval: f64,
) -> Result<Vec<SpectrumFrame>> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: FrameRecord = serde_json::from_str(&line)
            .with_context(|| format!("malformed frame on line {}", idx + 1))?;
        frames.push(record.into_frame(default_noise_floor_db, default_interval));
    }
    Ok(frames)
}

pub fn write_levels<W: Write>(writer: &mut W, timestamp: f64, levels: &BandLevels) -> Result<()> {
    serde_json::to_writer(&mut *writer, &LevelRecord { timestamp, levels })?;
    writer.write_all(b"\n")?;
    Ok(())
}
