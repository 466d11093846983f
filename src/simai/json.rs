//! JSON interchange model for parsed simai charts
//!
//! A chart arrives as a JSON document mirroring the simai model: a `bpms`
//! list and a `notes` list, each note tagged by `"type"`. Deserialization
//! is lenient about optional flags; `into_chart` replays everything
//! through the `SimaiChart` builder so the usual construction checks
//! apply. Entries with an unrecognized type tag are logged and dropped
//! rather than failing the whole chart.

use serde::Deserialize;

use super::note::SlidePattern;
use super::SimaiChart;
use crate::error::Result;
use crate::ma2::TouchSize;

/// Top-level interchange document
#[derive(Debug, Clone, Deserialize)]
pub struct ChartJson {
    #[serde(default)]
    pub bpms: Vec<BpmJson>,
    #[serde(default)]
    pub notes: Vec<NoteJson>,
}

/// BPM event record
#[derive(Debug, Clone, Deserialize)]
pub struct BpmJson {
    pub measure: f64,
    pub bpm: f64,
}

/// Note record, tagged by kind
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteJson {
    Tap {
        measure: f64,
        position: u8,
        #[serde(default)]
        is_star: bool,
        #[serde(default)]
        is_break: bool,
        #[serde(default)]
        is_ex: bool,
    },
    Hold {
        measure: f64,
        position: u8,
        duration: f64,
        #[serde(default)]
        is_break: bool,
        #[serde(default)]
        is_ex: bool,
    },
    Slide {
        measure: f64,
        position: u8,
        end_position: u8,
        duration: f64,
        pattern: String,
        #[serde(default = "default_slide_delay")]
        delay: f64,
        #[serde(default)]
        is_break: bool,
        #[serde(default)]
        is_ex: bool,
        #[serde(default)]
        is_connect: bool,
        #[serde(default)]
        reflect_position: Option<u8>,
    },
    TouchTap {
        measure: f64,
        position: u8,
        region: char,
        #[serde(default)]
        is_firework: bool,
        #[serde(default)]
        size: TouchSize,
    },
    TouchHold {
        measure: f64,
        position: u8,
        region: char,
        duration: f64,
        #[serde(default)]
        is_firework: bool,
        #[serde(default)]
        size: TouchSize,
    },
    /// Anything this converter does not know about
    #[serde(other)]
    Unknown,
}

/// Slides appear a quarter measure after their star by default
fn default_slide_delay() -> f64 {
    0.25
}

impl ChartJson {
    /// Replay the records through the chart builder
    pub fn into_chart(self) -> Result<SimaiChart> {
        let mut chart = SimaiChart::new();

        for bpm in &self.bpms {
            chart.set_bpm(bpm.measure, bpm.bpm)?;
        }

        for record in self.notes {
            match record {
                NoteJson::Tap {
                    measure,
                    position,
                    is_star,
                    is_break,
                    is_ex,
                } => chart.add_tap(measure, position, is_star, is_break, is_ex)?,
                NoteJson::Hold {
                    measure,
                    position,
                    duration,
                    is_break,
                    is_ex,
                } => chart.add_hold(measure, position, duration, is_break, is_ex)?,
                NoteJson::Slide {
                    measure,
                    position,
                    end_position,
                    duration,
                    pattern,
                    delay,
                    is_break,
                    is_ex,
                    is_connect,
                    reflect_position,
                } => {
                    let pattern = SlidePattern::from_symbol(&pattern)?;
                    chart.add_slide(
                        measure,
                        position,
                        end_position,
                        duration,
                        pattern,
                        delay,
                        is_break,
                        is_ex,
                        is_connect,
                        reflect_position,
                    )?
                }
                NoteJson::TouchTap {
                    measure,
                    position,
                    region,
                    is_firework,
                    size,
                } => chart.add_touch_tap(measure, position, region, is_firework, size)?,
                NoteJson::TouchHold {
                    measure,
                    position,
                    region,
                    duration,
                    is_firework,
                    size,
                } => chart.add_touch_hold(measure, position, region, duration, is_firework, size)?,
                NoteJson::Unknown => {
                    log::warn!("skipping note entry with unknown type");
                }
            }
        }

        Ok(chart)
    }
}
