//! Slide pattern codec
//!
//! Maps the simai shape alphabet onto ma2 pattern codes 1-13 and back.
//! Most shapes go through a fixed table; the arcs and the reflected shape
//! depend on ring geometry. The forward and inverse directions each carry
//! their own case analysis for codes 2/3; the two tables are not derivable
//! from one another and are kept as enumerated cases.
//!
//! A reflected slide whose reflection button is antipodal to its start has
//! no ma2 code at all; encoding one yields `PatternCode::Split` and the
//! slide must be rewritten as two straight segments.

use super::note::{SlideNote, SlidePattern};
use crate::error::{Error, Result};
use crate::ring;

/// Ring buttons counted as the "top" half when disambiguating arcs
const TOP_POSITIONS: [u8; 4] = [0, 1, 6, 7];

/// Outcome of encoding a slide shape as a ma2 pattern code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternCode {
    /// The shape maps onto this ma2 code
    Direct(i32),
    /// 180-degree reflected slide: no ma2 code exists, split it instead
    Split,
}

fn is_top(position: u8) -> bool {
    TOP_POSITIONS.contains(&position)
}

/// Encode a simai slide shape as a ma2 pattern code.
///
/// The `^` arc resolves by the shorter way around the ring; `>` and `<`
/// resolve by whether the slide leaves a top button. A reflected slide
/// resolves by the direction of its reflection button, unless that button
/// is antipodal, in which case `Split` is returned instead of a code.
pub fn pattern_to_code(note: &SlideNote) -> Result<PatternCode> {
    let code = match note.pattern {
        SlidePattern::Straight => 1,
        SlidePattern::CurveP => 4,
        SlidePattern::CurveQ => 5,
        SlidePattern::ZigzagS => 6,
        SlidePattern::ZigzagZ => 7,
        SlidePattern::Corner => 8,
        SlidePattern::LoopP => 9,
        SlidePattern::LoopQ => 10,
        SlidePattern::Fan => 13,
        SlidePattern::Arc => {
            if ring::is_clockwise(note.position, note.end_position) {
                3
            } else {
                2
            }
        }
        SlidePattern::ArcRight => {
            if is_top(note.position) {
                3
            } else {
                2
            }
        }
        SlidePattern::ArcLeft => {
            if is_top(note.position) {
                2
            } else {
                3
            }
        }
        SlidePattern::Reflect => {
            let reflect = note.reflect_position.ok_or(Error::MissingReflection)?;
            if is_antipodal_reflect(note) {
                return Ok(PatternCode::Split);
            }
            if ring::is_clockwise(note.position, reflect) {
                12
            } else {
                11
            }
        }
    };

    Ok(PatternCode::Direct(code))
}

/// Decode a ma2 pattern code back into a simai shape.
///
/// Codes 2/3 re-derive the glyph from the directed distance: up to three
/// steps is the plain `^` arc; a full circle and the longer arcs pick `>`
/// or `<` from the direction and the start button's ring half. Codes 11/12
/// recover the reflection button two steps from the start.
pub fn pattern_from_code(
    code: i32,
    start_position: u8,
    end_position: u8,
) -> Result<(SlidePattern, Option<u8>)> {
    match code {
        1 => Ok((SlidePattern::Straight, None)),
        4 => Ok((SlidePattern::CurveP, None)),
        5 => Ok((SlidePattern::CurveQ, None)),
        6 => Ok((SlidePattern::ZigzagS, None)),
        7 => Ok((SlidePattern::ZigzagZ, None)),
        8 => Ok((SlidePattern::Corner, None)),
        9 => Ok((SlidePattern::LoopP, None)),
        10 => Ok((SlidePattern::LoopQ, None)),
        13 => Ok((SlidePattern::Fan, None)),
        2 | 3 => {
            let clockwise = code == 3;
            let distance = ring::distance(start_position, end_position, clockwise);
            let top = is_top(start_position);

            if 0 < distance && distance <= 3 {
                return Ok((SlidePattern::Arc, None));
            }
            if distance == 0 {
                let pattern = match (top, clockwise) {
                    (true, true) => SlidePattern::ArcRight,
                    (true, false) => SlidePattern::ArcLeft,
                    (false, true) => SlidePattern::ArcLeft,
                    (false, false) => SlidePattern::ArcRight,
                };
                return Ok((pattern, None));
            }
            if (top && clockwise) || !(top || clockwise) {
                Ok((SlidePattern::ArcRight, None))
            } else {
                Ok((SlidePattern::ArcLeft, None))
            }
        }
        11 => {
            let reflect = (start_position + ring::RING_SIZE - 2) % ring::RING_SIZE;
            Ok((SlidePattern::Reflect, Some(reflect)))
        }
        12 => {
            let reflect = (start_position + 2) % ring::RING_SIZE;
            Ok((SlidePattern::Reflect, Some(reflect)))
        }
        _ => Err(Error::UnknownPattern(code.to_string())),
    }
}

/// Whether a reflected slide folds straight back through the center
pub fn is_antipodal_reflect(note: &SlideNote) -> bool {
    match (note.pattern, note.reflect_position) {
        (SlidePattern::Reflect, Some(reflect)) => {
            (reflect as i32 - note.position as i32).abs() == 4
        }
        _ => false,
    }
}

/// Rewrite a 180-degree reflected slide as two straight slides.
///
/// The first segment runs from the start to the reflection button, keeping
/// the delay and taking half the duration. The second runs from the
/// reflection button to the end, starts when the first finishes moving,
/// has no delay of its own and is always a connect segment.
pub fn split_antipodal_reflect(note: &SlideNote) -> Result<(SlideNote, SlideNote)> {
    if !is_antipodal_reflect(note) {
        return Err(Error::IllegalSlide(
            "only a 180-degree reflected slide can be split".to_string(),
        ));
    }
    let reflect = note.reflect_position.ok_or(Error::MissingReflection)?;

    let first = SlideNote::new(
        note.measure,
        note.position,
        reflect,
        note.duration / 2.0,
        SlidePattern::Straight,
        note.delay,
        note.is_break,
        note.is_ex,
        note.is_connect,
        None,
    )?;

    let second = SlideNote::new(
        note.measure + note.delay + note.duration / 2.0,
        reflect,
        note.end_position,
        note.duration / 2.0,
        SlidePattern::Straight,
        0.0,
        note.is_break,
        note.is_ex,
        true,
        None,
    )?;

    Ok((first, second))
}
