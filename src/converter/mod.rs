//! Simai to ma2 conversion
//!
//! Walks a parsed simai chart and rebuilds it in the ma2 model: notes are
//! dispatched by kind through the pattern codec, tempo events are copied
//! with the first one re-based to the chart origin, and a 4/4 meter is
//! stamped at measure zero. When the chart carries more than one tempo, a
//! second pass rebuilds every timed note with tick-true durations.

use crate::error::{Error, Result};
use crate::ma2::note::{Bpm, HoldNote, SlideNote as Ma2SlideNote, TouchHoldNote};
use crate::ma2::{Ma2Chart, Ma2Note};
use crate::simai::{
    pattern_to_code, split_antipodal_reflect, PatternCode, SimaiChart, SimaiNote, SlideNote,
};

/// Measure offset used to sample the tempo on one side of a BPM change
const BPM_SAMPLE_EPSILON: f64 = 0.0001;

/// Convert a parsed simai chart into a ma2 chart
pub fn simai_to_ma2(simai: &SimaiChart) -> Result<Ma2Chart> {
    let mut ma2 = Ma2Chart::new();

    for bpm in &simai.bpms {
        // The first ma2 tempo always starts at the chart origin
        let measure = if bpm.measure <= 1.0 { 0.0 } else { bpm.measure };
        ma2.set_bpm(measure, bpm.bpm)?;
    }

    ma2.set_meter(0.0, 4, 4)?;
    convert_notes(&mut ma2, &simai.notes)?;

    if ma2.bpms.len() != 1 {
        ma2 = compensate_durations(ma2)?;
    }

    Ok(ma2)
}

fn convert_notes(ma2: &mut Ma2Chart, notes: &[SimaiNote]) -> Result<()> {
    for simai_note in notes {
        match simai_note {
            SimaiNote::Tap(tap) => {
                ma2.add_tap(tap.measure, tap.position, tap.is_star, tap.is_break, tap.is_ex)?
            }
            SimaiNote::Hold(hold) => {
                ma2.add_hold(hold.measure, hold.position, hold.duration, hold.is_break, hold.is_ex)?
            }
            SimaiNote::Slide(slide) => convert_slide(ma2, slide)?,
            SimaiNote::TouchTap(tap) => {
                ma2.add_touch_tap(tap.measure, tap.position, tap.region, tap.is_firework, tap.size)?
            }
            SimaiNote::TouchHold(hold) => ma2.add_touch_hold(
                hold.measure,
                hold.position,
                hold.region,
                hold.duration,
                hold.is_firework,
                hold.size,
            )?,
        }
    }

    Ok(())
}

fn convert_slide(ma2: &mut Ma2Chart, slide: &SlideNote) -> Result<()> {
    match pattern_to_code(slide)? {
        PatternCode::Direct(pattern) => ma2.add_slide(
            slide.measure,
            slide.position,
            slide.end_position,
            pattern,
            slide.duration,
            slide.delay,
            slide.is_break,
            slide.is_ex,
            slide.is_connect,
        ),
        PatternCode::Split => {
            let (first, second) = split_antipodal_reflect(slide)?;
            log::info!(
                "split 180-degree reflected slide {}-{}-{}",
                slide.position + 1,
                first.end_position + 1,
                slide.end_position + 1
            );
            add_straight_segment(ma2, &first)?;
            add_straight_segment(ma2, &second)
        }
    }
}

fn add_straight_segment(ma2: &mut Ma2Chart, segment: &SlideNote) -> Result<()> {
    match pattern_to_code(segment)? {
        PatternCode::Direct(pattern) => ma2.add_slide(
            segment.measure,
            segment.position,
            segment.end_position,
            pattern,
            segment.duration,
            segment.delay,
            segment.is_break,
            segment.is_ex,
            segment.is_connect,
        ),
        PatternCode::Split => Err(Error::IllegalSlide(format!(
            "segment {}-{} still has no ma2 pattern code",
            segment.position, segment.end_position
        ))),
    }
}

/// Rebuild the note list with tick-true durations.
///
/// Simai spans assume the tempo at their start holds for the whole span;
/// ma2 ticks track real time, so a span crossing a BPM change is scaled
/// piecewise by the tempo in force in each sub-segment. Hold and touch
/// hold durations, slide durations and slide delays are each their own
/// span starting at the note's measure.
fn compensate_durations(ma2: Ma2Chart) -> Result<Ma2Chart> {
    let mut notes = Vec::with_capacity(ma2.notes.len());

    for chart_note in &ma2.notes {
        let rebuilt = match chart_note {
            Ma2Note::Hold(hold) => {
                let duration = compensate_span(&ma2, hold.measure, hold.duration)?;
                Ma2Note::Hold(HoldNote {
                    duration,
                    ..hold.clone()
                })
            }
            Ma2Note::TouchHold(hold) => {
                let duration = compensate_span(&ma2, hold.measure, hold.duration)?;
                Ma2Note::TouchHold(TouchHoldNote {
                    duration,
                    ..hold.clone()
                })
            }
            Ma2Note::Slide(slide) => {
                let duration = compensate_span(&ma2, slide.measure, slide.duration)?;
                let delay = compensate_span(&ma2, slide.measure, slide.delay)?;
                Ma2Note::Slide(Ma2SlideNote {
                    duration,
                    delay,
                    ..slide.clone()
                })
            }
            other => other.clone(),
        };
        notes.push(rebuilt);
    }

    Ok(Ma2Chart {
        notes,
        bpms: ma2.bpms,
        meters: ma2.meters,
    })
}

/// Tick-true length of the span `[start, start + duration)`. Spans that
/// cross no tempo boundary come back unchanged.
fn compensate_span(ma2: &Ma2Chart, start: f64, duration: f64) -> Result<f64> {
    let changes = changes_within(&ma2.bpms, start, duration);
    if changes.is_empty() {
        return Ok(duration);
    }

    let base_bpm = ma2.bpm_at(start)?;
    let mut new_duration = 0.0;
    let mut segment_start = start;

    for change in &changes {
        // Sample just before the boundary so the new tempo is not picked up early
        new_duration += ma2.bpm_at(change.measure - BPM_SAMPLE_EPSILON)?
            * (change.measure - segment_start)
            / base_bpm;
        segment_start = change.measure;
    }

    if segment_start < start + duration {
        new_duration += ma2.bpm_at(segment_start + BPM_SAMPLE_EPSILON)?
            * (start + duration - segment_start)
            / base_bpm;
    }

    Ok(new_duration)
}

/// Tempo changes strictly inside the open span, in time order
fn changes_within(bpms: &[Bpm], start: f64, duration: f64) -> Vec<&Bpm> {
    let mut changes: Vec<&Bpm> = bpms
        .iter()
        .filter(|bpm| start < bpm.measure && bpm.measure < start + duration)
        .collect();
    changes.sort_by(|a, b| a.measure.total_cmp(&b.measure));
    changes
}
