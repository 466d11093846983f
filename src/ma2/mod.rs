//! Ma2 chart model
//!
//! A chart owns its notes in authoring order plus the BPM and meter event
//! lists. The `add_*`/`set_*` mutators run every construction-time check,
//! so a chart that builds is a chart that serializes.

pub mod note;

pub use note::{
    Bpm, HoldNote, Ma2Note, Meter, SlideNote, TapNote, TouchHoldNote, TouchTapNote, TouchSize,
};

use crate::error::{Error, Result};

/// Default ticks per measure when exporting
pub const DEFAULT_RESOLUTION: i32 = 384;

/// A ma2 chart under construction
#[derive(Debug, Clone, Default)]
pub struct Ma2Chart {
    pub notes: Vec<Ma2Note>,
    pub bpms: Vec<Bpm>,
    pub meters: Vec<Meter>,
}

impl Ma2Chart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tempo at a measure, replacing any event already there
    pub fn set_bpm(&mut self, measure: f64, bpm: f64) -> Result<()> {
        let event = Bpm::new(measure, bpm)?;
        self.bpms.retain(|existing| existing.measure != measure);
        self.bpms.push(event);
        Ok(())
    }

    /// Set the meter signature at a measure, replacing any event already there
    pub fn set_meter(&mut self, measure: f64, numerator: i32, denominator: i32) -> Result<()> {
        let event = Meter::new(measure, numerator, denominator)?;
        self.meters.retain(|existing| existing.measure != measure);
        self.meters.push(event);
        Ok(())
    }

    /// Tempo in force at a measure: the latest BPM event at or before it,
    /// or the earliest event for queries before the first one.
    pub fn bpm_at(&self, measure: f64) -> Result<f64> {
        let mut current: Option<&Bpm> = None;
        for bpm in &self.bpms {
            if bpm.measure <= measure
                && current.map_or(true, |active| bpm.measure >= active.measure)
            {
                current = Some(bpm);
            }
        }

        match current {
            Some(bpm) => Ok(bpm.bpm),
            None => {
                let mut earliest: Option<&Bpm> = None;
                for bpm in &self.bpms {
                    if earliest.map_or(true, |first| bpm.measure < first.measure) {
                        earliest = Some(bpm);
                    }
                }
                earliest.map(|bpm| bpm.bpm).ok_or(Error::MissingBpm)
            }
        }
    }

    pub fn add_tap(
        &mut self,
        measure: f64,
        position: u8,
        is_star: bool,
        is_break: bool,
        is_ex: bool,
    ) -> Result<()> {
        let note = TapNote::new(measure, position, is_star, is_break, is_ex)?;
        self.notes.push(Ma2Note::Tap(note));
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
        let note = HoldNote::new(measure, position, duration, is_break, is_ex)?;
        self.notes.push(Ma2Note::Hold(note));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_slide(
        &mut self,
        measure: f64,
        start_position: u8,
        end_position: u8,
        pattern: i32,
        duration: f64,
        delay: f64,
        is_break: bool,
        is_ex: bool,
        is_connect: bool,
    ) -> Result<()> {
        let note = SlideNote::new(
            measure,
            start_position,
            end_position,
            pattern,
            duration,
            delay,
            is_break,
            is_ex,
            is_connect,
        )?;
        self.notes.push(Ma2Note::Slide(note));
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
        let note = TouchTapNote::new(measure, position, region, is_firework, size)?;
        self.notes.push(Ma2Note::TouchTap(note));
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
        let note = TouchHoldNote::new(measure, position, region, duration, is_firework, size)?;
        self.notes.push(Ma2Note::TouchHold(note));
        Ok(())
    }

    /// Render the chart as ma2 text: BPM events, meter events, then notes
    /// in authoring order, one line each.
    pub fn export(&self, resolution: i32) -> Result<String> {
        let mut lines = Vec::with_capacity(self.bpms.len() + self.meters.len() + self.notes.len());

        for bpm in &self.bpms {
            lines.push(bpm.to_line(resolution)?);
        }
        for meter in &self.meters {
            lines.push(meter.to_line(resolution)?);
        }
        for chart_note in &self.notes {
            lines.push(chart_note.to_line(resolution)?);
        }

        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }
}
