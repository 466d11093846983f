//! Simai note and event model
//!
//! Simai time is a decimal measure count. Values are canonicalized to five
//! decimal places on construction so that notes authored as fractions
//! (thirds, sixths, ...) compare and order stably.

use crate::error::{Error, Result};
use crate::ma2::TouchSize;

/// Canonicalize a measure-valued quantity to 5 decimal places, ties to even
fn canonical(value: f64) -> f64 {
    (value * 100000.0).round_ties_even() / 100000.0
}

/// The simai slide shape alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlidePattern {
    /// `-`: straight line between two buttons
    Straight,
    /// `^`: arc along the shorter way around the ring
    Arc,
    /// `>`: arc that leaves a top button clockwise (counter-clockwise from a bottom one)
    ArcRight,
    /// `<`: mirror of `>`
    ArcLeft,
    /// `p`: curve looping counter-clockwise around the center
    CurveP,
    /// `q`: curve looping clockwise around the center
    CurveQ,
    /// `s`: s-shaped zigzag through the center
    ZigzagS,
    /// `z`: z-shaped zigzag through the center
    ZigzagZ,
    /// `v`: bends at the center button
    Corner,
    /// `pp`: grand counter-clockwise loop
    LoopP,
    /// `qq`: grand clockwise loop
    LoopQ,
    /// `V`: bends at a reflection button on the ring
    Reflect,
    /// `w`: fan of three parallel lanes
    Fan,
}

impl SlidePattern {
    /// The glyph used in simai chart text
    pub fn as_symbol(&self) -> &'static str {
        match self {
            SlidePattern::Straight => "-",
            SlidePattern::Arc => "^",
            SlidePattern::ArcRight => ">",
            SlidePattern::ArcLeft => "<",
            SlidePattern::CurveP => "p",
            SlidePattern::CurveQ => "q",
            SlidePattern::ZigzagS => "s",
            SlidePattern::ZigzagZ => "z",
            SlidePattern::Corner => "v",
            SlidePattern::LoopP => "pp",
            SlidePattern::LoopQ => "qq",
            SlidePattern::Reflect => "V",
            SlidePattern::Fan => "w",
        }
    }

    pub fn from_symbol(symbol: &str) -> Result<Self> {
        match symbol {
            "-" => Ok(SlidePattern::Straight),
            "^" => Ok(SlidePattern::Arc),
            ">" => Ok(SlidePattern::ArcRight),
            "<" => Ok(SlidePattern::ArcLeft),
            "p" => Ok(SlidePattern::CurveP),
            "q" => Ok(SlidePattern::CurveQ),
            "s" => Ok(SlidePattern::ZigzagS),
            "z" => Ok(SlidePattern::ZigzagZ),
            "v" => Ok(SlidePattern::Corner),
            "pp" => Ok(SlidePattern::LoopP),
            "qq" => Ok(SlidePattern::LoopQ),
            "V" => Ok(SlidePattern::Reflect),
            "w" => Ok(SlidePattern::Fan),
            _ => Err(Error::UnknownPattern(symbol.to_string())),
        }
    }
}

/// Simai tap note
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
            measure: canonical(measure),
            position,
            is_star,
            is_break,
            is_ex,
        })
    }
}

/// Simai hold note
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
            measure: canonical(measure),
            position,
            duration: canonical(duration),
            is_break,
            is_ex,
        })
    }
}

/// Simai slide note
///
/// The star appears at `measure`, waits `delay` measures, then traces the
/// pattern for `duration` measures. A connect slide is one segment of a
/// longer chain and inherits its star from the previous segment.
/// `reflect_position` is set exactly for the reflected (`V`) pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideNote {
    pub measure: f64,
    pub position: u8,
    pub end_position: u8,
    pub duration: f64,
    pub pattern: SlidePattern,
    pub delay: f64,
    pub is_break: bool,
    pub is_ex: bool,
    pub is_connect: bool,
    pub reflect_position: Option<u8>,
}

impl SlideNote {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        measure: f64,
        start_position: u8,
        end_position: u8,
        duration: f64,
        pattern: SlidePattern,
        delay: f64,
        is_break: bool,
        is_ex: bool,
        is_connect: bool,
        reflect_position: Option<u8>,
    ) -> Result<Self> {
        if measure < 0.0 {
            return Err(Error::NegativeMeasure(measure));
        }
        if start_position > 7 {
            return Err(Error::InvalidPosition(start_position));
        }
        if end_position > 7 {
            return Err(Error::InvalidPosition(end_position));
        }
        if duration <= 0.0 {
            return Err(Error::NonPositiveDuration(duration));
        }
        if delay < 0.0 {
            return Err(Error::NegativeDelay(delay));
        }
        match (pattern, reflect_position) {
            (SlidePattern::Reflect, None) => return Err(Error::MissingReflection),
            (SlidePattern::Reflect, Some(reflect)) if reflect > 7 => {
                return Err(Error::InvalidPosition(reflect))
            }
            (pattern, Some(_)) if pattern != SlidePattern::Reflect => {
                return Err(Error::IllegalSlide(format!(
                    "pattern {} takes no reflection button",
                    pattern.as_symbol()
                )))
            }
            _ => {}
        }

        Ok(Self {
            measure: canonical(measure),
            position: start_position,
            end_position,
            duration: canonical(duration),
            pattern,
            delay: canonical(delay),
            is_break,
            is_ex,
            is_connect,
            reflect_position,
        })
    }
}

/// Simai touch tap note
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
            measure: canonical(measure),
            position,
            region,
            is_firework,
            size,
        })
    }
}

/// Simai touch hold note
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

        Ok(Self {
            measure: canonical(measure),
            position,
            region,
            duration: canonical(duration),
            is_firework,
            size,
        })
    }
}

/// Simai BPM event
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

        Ok(Self {
            measure: canonical(measure),
            bpm,
        })
    }
}

/// A note in a simai chart
#[derive(Debug, Clone, PartialEq)]
pub enum SimaiNote {
    Tap(TapNote),
    Hold(HoldNote),
    Slide(SlideNote),
    TouchTap(TouchTapNote),
    TouchHold(TouchHoldNote),
}

impl SimaiNote {
    /// Measure where the note starts
    pub fn measure(&self) -> f64 {
        match self {
            SimaiNote::Tap(note) => note.measure,
            SimaiNote::Hold(note) => note.measure,
            SimaiNote::Slide(note) => note.measure,
            SimaiNote::TouchTap(note) => note.measure,
            SimaiNote::TouchHold(note) => note.measure,
        }
    }
}
