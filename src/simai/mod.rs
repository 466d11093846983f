//! Simai chart model
//!
//! `SimaiChart` is the in-memory form a chart parser produces: notes in
//! authoring order plus the BPM event list. The `add_*` mutators run the
//! construction-time checks, so downstream code can trust every note it
//! sees.

pub mod json;
pub mod note;
pub mod pattern;

pub use json::ChartJson;
pub use note::{Bpm, HoldNote, SimaiNote, SlideNote, SlidePattern, TapNote, TouchHoldNote, TouchTapNote};
pub use pattern::{
    is_antipodal_reflect, pattern_from_code, pattern_to_code, split_antipodal_reflect, PatternCode,
};

use crate::error::Result;
use crate::ma2::TouchSize;

/// A parsed simai chart
#[derive(Debug, Clone, Default)]
pub struct SimaiChart {
    pub notes: Vec<SimaiNote>,
    pub bpms: Vec<Bpm>,
}

impl SimaiChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tempo at a measure, replacing any event already there
    pub fn set_bpm(&mut self, measure: f64, bpm: f64) -> Result<()> {
        let event = Bpm::new(measure, bpm)?;
        self.bpms.retain(|existing| existing.measure != event.measure);
        self.bpms.push(event);
        Ok(())
    }

    pub fn add_tap(
        &mut self,
        measure: f64,
        position: u8,
        is_star: bool,
        is_break: bool,
        is_ex: bool,
    ) -> Result<()> {
        let tap = TapNote::new(measure, position, is_star, is_break, is_ex)?;
        self.notes.push(SimaiNote::Tap(tap));
        Ok(())
    }

    pub fn add_hold(
        &mut self,
        measure: f64,
        position: u8,
        duration: f64,
        is_break: bool,
        is_ex: bool,
    ) -> Result<()> {
        let hold = HoldNote::new(measure, position, duration, is_break, is_ex)?;
        self.notes.push(SimaiNote::Hold(hold));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_slide(
        &mut self,
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
    ) -> Result<()> {
        let slide = SlideNote::new(
            measure,
            start_position,
            end_position,
            duration,
            pattern,
            delay,
            is_break,
            is_ex,
            is_connect,
            reflect_position,
        )?;
        self.notes.push(SimaiNote::Slide(slide));
        Ok(())
    }

    pub fn add_touch_tap(
        &mut self,
        measure: f64,
        position: u8,
        region: char,
        is_firework: bool,
        size: TouchSize,
    ) -> Result<()> {
        let tap = TouchTapNote::new(measure, position, region, is_firework, size)?;
        self.notes.push(SimaiNote::TouchTap(tap));
        Ok(())
    }

    pub fn add_touch_hold(
        &mut self,
        measure: f64,
        position: u8,
        region: char,
        duration: f64,
        is_firework: bool,
        size: TouchSize,
    ) -> Result<()> {
        let hold = TouchHoldNote::new(measure, position, region, duration, is_firework, size)?;
        self.notes.push(SimaiNote::TouchHold(hold));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_authoring_order() {
        let mut chart = SimaiChart::new();
        chart.set_bpm(0.0, 120.0).unwrap();
        chart.add_tap(2.0, 0, false, false, false).unwrap();
        chart.add_tap(1.0, 1, false, false, false).unwrap();

        let measures: Vec<f64> = chart.notes.iter().map(|n| n.measure()).collect();
        assert_eq!(measures, vec![2.0, 1.0]);
    }

    #[test]
    fn test_set_bpm_replaces_same_measure() {
        let mut chart = SimaiChart::new();
        chart.set_bpm(1.0, 120.0).unwrap();
        chart.set_bpm(1.0, 180.0).unwrap();
        assert_eq!(chart.bpms.len(), 1);
        assert_eq!(chart.bpms[0].bpm, 180.0);
    }

    #[test]
    fn test_builder_propagates_construction_errors() {
        let mut chart = SimaiChart::new();
        assert!(chart.add_tap(-1.0, 0, false, false, false).is_err());
        assert!(chart.add_hold(0.0, 9, 1.0, false, false).is_err());
        assert!(chart.set_bpm(0.0, 0.0).is_err());
        assert!(chart.notes.is_empty());
        assert!(chart.bpms.is_empty());
    }
}
