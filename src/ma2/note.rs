//! Ma2 note and event model
//!
//! Ma2 lines are tab-separated columns. Time is an (integer measure,
//! integer tick) pair, with `resolution` ticks to a measure; the
//! resolution is a chart-wide serialization parameter, so every note and
//! event formats itself through `to_line(resolution)` instead of storing
//! ticks directly.

use crate::error::{Error, Result};
use crate::ring;
use serde::Deserialize;

/// Pattern names for slide codes 1-13, as they appear in a slide line
pub const SLIDE_NAMES: [&str; 13] = [
    "SI_", "SCL", "SCR", "SUL", "SUR", "SSL", "SSR", "SV_", "SXL", "SXR", "SLL", "SLR", "SF_",
];

/// Footprint tag of a touch note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TouchSize {
    #[default]
    M1,
    L1,
}

impl TouchSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TouchSize::M1 => "M1",
            TouchSize::L1 => "L1",
        }
    }
}

/// Convert a decimal measure to ma2's (measure, tick) pair.
///
/// The integer part is kept as the measure index; the fractional part is
/// scaled by the resolution and rounded to the nearest tick, ties to even.
pub fn measure_to_tick(measure: f64, resolution: i32) -> Result<(i32, i32)> {
    if measure < 0.0 {
        return Err(Error::NegativeMeasure(measure));
    }

    let whole = measure.trunc() as i32;
    let tick = (measure.fract() * resolution as f64).round_ties_even() as i32;
    Ok((whole, tick))
}

/// Reject slide pattern/position combinations the target format leaves
/// undefined.
///
/// Code 1 (SI_) needs a reach longer than one button in both directions,
/// codes 6/7/13 (SSL/SSR/SF_) only connect antipodal buttons, code 8 (SV_)
/// degenerates when start and end coincide, and codes 11/12 (SLL/SLR) are
/// bounded by how far their loop can wrap.
pub fn check_slide(pattern: i32, start_position: u8, end_position: u8) -> Result<()> {
    if !(0 < pattern && pattern < 14) {
        return Err(Error::UnknownPattern(pattern.to_string()));
    }
    if start_position > 7 {
        return Err(Error::InvalidPosition(start_position));
    }
    if end_position > 7 {
        return Err(Error::InvalidPosition(end_position));
    }

    let distance_cw = ring::distance(start_position, end_position, true);
    let distance_ccw = ring::distance(start_position, end_position, false);

    match pattern {
        1 if !(distance_cw > 1 && distance_ccw > 1) => Err(Error::IllegalSlide(format!(
            "SI_ needs more than one button between {} and {}",
            start_position, end_position
        ))),
        6 | 7 | 13 if distance_cw != 4 => Err(Error::IllegalSlide(format!(
            "SSL, SSR and SF_ need opposite buttons, got {} and {}",
            start_position, end_position
        ))),
        8 if start_position == end_position => Err(Error::IllegalSlide(format!(
            "SV_ cannot start and end on button {}",
            start_position
        ))),
        11 if !(0 < distance_cw && distance_cw < 5) => Err(Error::IllegalSlide(format!(
            "SLL clockwise distance must be between 0 and 5, got {}",
            distance_cw
        ))),
        12 if !(0 < distance_ccw && distance_ccw < 5) => Err(Error::IllegalSlide(format!(
            "SLR counter-clockwise distance must be between 0 and 5, got {}",
            distance_ccw
        ))),
        _ => Ok(()),
    }
}

/// Line prefix encoding the break/ex bits
fn flag_prefix(is_break: bool, is_ex: bool) -> &'static str {
    if is_ex && is_break {
        "BX"
    } else if is_ex {
        "EX"
    } else if is_break {
        "BR"
    } else {
        "NM"
    }
}

/// Ma2 tap note
#[derive(Debug, Clone, PartialEq)]
pub struct TapNote {
    pub measure: f64,
    pub position: u8,
    pub is_star: bool,
    pub is_break: bool,
    pub is_ex: bool,
}

impl TapNote {
    pub fn new(measure: f64, position: u8, is_star: bool, is_break: bool, is_ex: bool) -> Result<Self> {
        if measure < 0.0 {
            return Err(Error::NegativeMeasure(measure));
        }
        if position > 7 {
            return Err(Error::InvalidPosition(position));
        }

        Ok(Self {
            measure,
            position,
            is_star,
            is_break,
            is_ex,
        })
    }

    pub fn to_line(&self, resolution: i32) -> Result<String> {
        let (measure, tick) = measure_to_tick(self.measure, resolution)?;
        let prefix = flag_prefix(self.is_break, self.is_ex);
        let suffix = if self.is_star { "STR" } else { "TAP" };
        Ok(format!(
            "{}{}\t{}\t{}\t{}",
            prefix, suffix, measure, tick, self.position
        ))
    }
}

/// Ma2 hold note
#[derive(Debug, Clone, PartialEq)]
pub struct HoldNote {
    pub measure: f64,
    pub position: u8,
    pub duration: f64,
    pub is_break: bool,
    pub is_ex: bool,
}

impl HoldNote {
    pub fn new(measure: f64, position: u8, duration: f64, is_break: bool, is_ex: bool) -> Result<Self> {
        if measure < 0.0 {
            return Err(Error::NegativeMeasure(measure));
        }
        if position > 7 {
            return Err(Error::InvalidPosition(position));
        }
        if duration < 0.0 {
            return Err(Error::NegativeDuration(duration));
        }

        Ok(Self {
            measure,
            position,
            duration,
            is_break,
            is_ex,
        })
    }

    pub fn to_line(&self, resolution: i32) -> Result<String> {
        let (measure, tick) = measure_to_tick(self.measure, resolution)?;
        let prefix = flag_prefix(self.is_break, self.is_ex);
        let duration = (self.duration * resolution as f64).round_ties_even() as i64;
        Ok(format!(
            "{}HLD\t{}\t{}\t{}\t{}",
            prefix, measure, tick, self.position, duration
        ))
    }
}

/// Ma2 slide note
///
/// The duration covers the moving part only; the delay between the star
/// appearing and the slide moving is a separate column. The connect flag
/// marks a segment that chains off the previous slide and has no column of
/// its own.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideNote {
    pub measure: f64,
    pub position: u8,
    pub end_position: u8,
    pub pattern: i32,
    pub duration: f64,
    pub delay: f64,
    pub is_break: bool,
    pub is_ex: bool,
    pub is_connect: bool,
}

impl SlideNote {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        measure: f64,
        position: u8,
        end_position: u8,
        pattern: i32,
        duration: f64,
        delay: f64,
        is_break: bool,
        is_ex: bool,
        is_connect: bool,
    ) -> Result<Self> {
        if measure < 0.0 {
            return Err(Error::NegativeMeasure(measure));
        }
        if duration <= 0.0 {
            return Err(Error::NonPositiveDuration(duration));
        }
        if delay < 0.0 {
            return Err(Error::NegativeDelay(delay));
        }
        check_slide(pattern, position, end_position)?;

        Ok(Self {
            measure,
            position,
            end_position,
            pattern,
            duration,
            delay,
            is_break,
            is_ex,
            is_connect,
        })
    }

    pub fn to_line(&self, resolution: i32) -> Result<String> {
        let (measure, tick) = measure_to_tick(self.measure, resolution)?;
        let name = SLIDE_NAMES
            .get((self.pattern - 1) as usize)
            .ok_or_else(|| Error::UnknownPattern(self.pattern.to_string()))?;
        let prefix = flag_prefix(self.is_break, self.is_ex);
        let delay = (self.delay * resolution as f64).round_ties_even() as i64;
        let duration = (self.duration * resolution as f64).round_ties_even() as i64;
        Ok(format!(
            "{}{}\t{}\t{}\t{}\t{}\t{}\t{}",
            prefix, name, measure, tick, self.position, delay, duration, self.end_position
        ))
    }
}

/// Ma2 touch tap note
#[derive(Debug, Clone, PartialEq)]
pub struct TouchTapNote {
    pub measure: f64,
    pub position: u8,
    pub region: char,
    pub is_firework: bool,
    pub size: TouchSize,
}

impl TouchTapNote {
    pub fn new(
        measure: f64,
        position: u8,
        region: char,
        is_firework: bool,
        size: TouchSize,
    ) -> Result<Self> {
        if measure < 0.0 {
            return Err(Error::NegativeMeasure(measure));
        }
        if position > 7 {
            return Err(Error::InvalidPosition(position));
        }

        Ok(Self {
            measure,
            position,
            region,
            is_firework,
            size,
        })
    }

    pub fn to_line(&self, resolution: i32) -> Result<String> {
        let (measure, tick) = measure_to_tick(self.measure, resolution)?;
        let firework = if self.is_firework { 1 } else { 0 };
        Ok(format!(
            "NMTTP\t{}\t{}\t{}\t{}\t{}\t{}",
            measure,
            tick,
            self.position,
            self.region,
            firework,
            self.size.as_str()
        ))
    }
}

/// Ma2 touch hold note
#[derive(Debug, Clone, PartialEq)]
pub struct TouchHoldNote {
    pub measure: f64,
    pub position: u8,
    pub region: char,
    pub duration: f64,
    pub is_firework: bool,
    pub size: TouchSize,
}

impl TouchHoldNote {
    pub fn new(
        measure: f64,
        position: u8,
        region: char,
        duration: f64,
        is_firework: bool,
        size: TouchSize,
    ) -> Result<Self> {
        if measure < 0.0 {
            return Err(Error::NegativeMeasure(measure));
        }
        if position > 7 {
            return Err(Error::InvalidPosition(position));
        }
        if duration < 0.0 {
            return Err(Error::NegativeDuration(duration));
        }

        // Touch hold durations are kept at 4 decimal places
        let duration = (duration * 10000.0).round_ties_even() / 10000.0;

        Ok(Self {
            measure,
            position,
            region,
            duration,
            is_firework,
            size,
        })
    }

    pub fn to_line(&self, resolution: i32) -> Result<String> {
        let (measure, tick) = measure_to_tick(self.measure, resolution)?;
        let duration = (self.duration * resolution as f64).round_ties_even() as i64;
        let firework = if self.is_firework { 1 } else { 0 };
        Ok(format!(
            "NMTHO\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            measure,
            tick,
            self.position,
            duration,
            self.region,
            firework,
            self.size.as_str()
        ))
    }
}

/// Ma2 BPM event
#[derive(Debug, Clone, PartialEq)]
pub struct Bpm {
    pub measure: f64,
    pub bpm: f64,
}

impl Bpm {
    pub fn new(measure: f64, bpm: f64) -> Result<Self> {
        if measure < 0.0 {
            return Err(Error::NegativeMeasure(measure));
        }
        if bpm <= 0.0 {
            return Err(Error::NonPositiveBpm(bpm));
        }

        Ok(Self { measure, bpm })
    }

    pub fn to_line(&self, resolution: i32) -> Result<String> {
        let (measure, tick) = if self.measure == 0.0 {
            (0, 0)
        } else {
            measure_to_tick(self.measure, resolution)?
        };
        Ok(format!("BPM\t{}\t{}\t{:.3}", measure, tick, self.bpm))
    }
}

/// Ma2 meter signature event
#[derive(Debug, Clone, PartialEq)]
pub struct Meter {
    pub measure: f64,
    pub numerator: i32,
    pub denominator: i32,
}

impl Meter {
    pub fn new(measure: f64, numerator: i32, denominator: i32) -> Result<Self> {
        if measure < 0.0 {
            return Err(Error::NegativeMeasure(measure));
        }
        if numerator <= 0 || denominator <= 0 {
            return Err(Error::InvalidMeter {
                numerator,
                denominator,
            });
        }

        Ok(Self {
            measure,
            numerator,
            denominator,
        })
    }

    pub fn to_line(&self, resolution: i32) -> Result<String> {
        let (measure, tick) = if self.measure == 0.0 {
            (0, 0)
        } else {
            measure_to_tick(self.measure, resolution)?
        };
        Ok(format!(
            "MET\t{}\t{}\t{}\t{}",
            measure, tick, self.numerator, self.denominator
        ))
    }
}

/// A note in a ma2 chart
#[derive(Debug, Clone, PartialEq)]
pub enum Ma2Note {
    Tap(TapNote),
    Hold(HoldNote),
    Slide(SlideNote),
    TouchTap(TouchTapNote),
    TouchHold(TouchHoldNote),
}

impl Ma2Note {
    /// Measure where the note starts
    pub fn measure(&self) -> f64 {
        match self {
            Ma2Note::Tap(note) => note.measure,
            Ma2Note::Hold(note) => note.measure,
            Ma2Note::Slide(note) => note.measure,
            Ma2Note::TouchTap(note) => note.measure,
            Ma2Note::TouchHold(note) => note.measure,
        }
    }

    pub fn to_line(&self, resolution: i32) -> Result<String> {
        match self {
            Ma2Note::Tap(note) => note.to_line(resolution),
            Ma2Note::Hold(note) => note.to_line(resolution),
            Ma2Note::Slide(note) => note.to_line(resolution),
            Ma2Note::TouchTap(note) => note.to_line(resolution),
            Ma2Note::TouchHold(note) => note.to_line(resolution),
        }
    }
}
