//! Integration tests for simai to ma2 conversion
//!
//! These build simai charts through the public builder (or the JSON
//! interchange model), convert them and verify the ma2 model and its
//! exported text.

use maiconv::ma2::{Ma2Chart, Ma2Note, DEFAULT_RESOLUTION};
use maiconv::simai::{ChartJson, SimaiChart, SlidePattern};
use maiconv::simai_to_ma2;
use tempfile::tempdir;

/// Helper to convert a chart, panicking on failure
fn convert(simai: &SimaiChart) -> Ma2Chart {
    simai_to_ma2(simai).expect("conversion failed")
}

/// Helper to pull every slide out of a converted chart
fn slides(ma2: &Ma2Chart) -> Vec<&maiconv::ma2::SlideNote> {
    ma2.notes
        .iter()
        .filter_map(|chart_note| match chart_note {
            Ma2Note::Slide(slide) => Some(slide),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Event handling
// =============================================================================

#[test]
fn test_first_tempo_rebased_to_origin() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(1.0, 174.0).unwrap();
    simai.add_tap(1.0, 0, false, false, false).unwrap();

    let ma2 = convert(&simai);
    assert_eq!(ma2.bpms.len(), 1);
    assert_eq!(ma2.bpms[0].measure, 0.0);
    assert_eq!(ma2.bpms[0].bpm, 174.0);
}

#[test]
fn test_late_tempo_events_keep_their_measure() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.5, 120.0).unwrap();
    simai.set_bpm(4.0, 240.0).unwrap();

    let ma2 = convert(&simai);
    let mut measures: Vec<f64> = ma2.bpms.iter().map(|bpm| bpm.measure).collect();
    measures.sort_by(f64::total_cmp);
    assert_eq!(measures, vec![0.0, 4.0]);
}

#[test]
fn test_meter_is_always_four_four_at_origin() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();

    let ma2 = convert(&simai);
    assert_eq!(ma2.meters.len(), 1);
    assert_eq!(ma2.meters[0].measure, 0.0);
    assert_eq!(ma2.meters[0].numerator, 4);
    assert_eq!(ma2.meters[0].denominator, 4);
}

// =============================================================================
// Note dispatch
// =============================================================================

#[test]
fn test_taps_and_holds_copy_flags() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai.add_tap(1.0, 0, true, true, false).unwrap();
    simai.add_hold(2.0, 3, 0.5, false, true).unwrap();

    let ma2 = convert(&simai);
    assert_eq!(ma2.notes.len(), 2);

    match &ma2.notes[0] {
        Ma2Note::Tap(tap) => {
            assert!(tap.is_star);
            assert!(tap.is_break);
            assert!(!tap.is_ex);
        }
        other => panic!("expected tap, got {:?}", other),
    }
    match &ma2.notes[1] {
        Ma2Note::Hold(hold) => {
            assert_eq!(hold.duration, 0.5);
            assert!(hold.is_ex);
        }
        other => panic!("expected hold, got {:?}", other),
    }
}

#[test]
fn test_touch_notes_copy_region_and_size() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai
        .add_touch_tap(1.0, 2, 'B', true, maiconv::ma2::TouchSize::M1)
        .unwrap();
    simai
        .add_touch_hold(2.0, 0, 'C', 1.5, false, maiconv::ma2::TouchSize::L1)
        .unwrap();

    let ma2 = convert(&simai);
    match &ma2.notes[0] {
        Ma2Note::TouchTap(tap) => {
            assert_eq!(tap.region, 'B');
            assert!(tap.is_firework);
        }
        other => panic!("expected touch tap, got {:?}", other),
    }
    match &ma2.notes[1] {
        Ma2Note::TouchHold(hold) => {
            assert_eq!(hold.region, 'C');
            assert_eq!(hold.duration, 1.5);
            assert_eq!(hold.size, maiconv::ma2::TouchSize::L1);
        }
        other => panic!("expected touch hold, got {:?}", other),
    }
}

#[test]
fn test_slide_pattern_is_encoded() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai
        .add_slide(1.0, 0, 4, 1.0, SlidePattern::Straight, 0.25, false, false, false, None)
        .unwrap();
    simai
        .add_slide(1.0, 0, 2, 1.0, SlidePattern::Arc, 0.25, false, false, false, None)
        .unwrap();

    let ma2 = convert(&simai);
    let converted = slides(&ma2);
    assert_eq!(converted.len(), 2);
    assert_eq!(converted[0].pattern, 1);
    assert_eq!(converted[1].pattern, 3);
}

#[test]
fn test_illegal_slide_aborts_conversion() {
    // A straight slide between adjacent buttons has no legal ma2 encoding
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai
        .add_slide(1.0, 0, 1, 1.0, SlidePattern::Straight, 0.25, false, false, false, None)
        .unwrap();

    assert!(simai_to_ma2(&simai).is_err());
}

// =============================================================================
// 180-degree reflected slides
// =============================================================================

#[test]
fn test_antipodal_reflect_splits_into_two_straights() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai
        .add_slide(10.0, 0, 2, 2.0, SlidePattern::Reflect, 0.25, false, true, false, Some(4))
        .unwrap();

    let ma2 = convert(&simai);
    let measures: Vec<f64> = ma2.notes.iter().map(|chart_note| chart_note.measure()).collect();
    assert_eq!(measures, vec![10.0, 11.25]);

    let converted = slides(&ma2);
    assert_eq!(converted.len(), 2);

    let first = converted[0];
    assert_eq!(first.measure, 10.0);
    assert_eq!(first.position, 0);
    assert_eq!(first.end_position, 4);
    assert_eq!(first.pattern, 1);
    assert_eq!(first.duration, 1.0);
    assert_eq!(first.delay, 0.25);
    assert!(first.is_ex);
    assert!(!first.is_connect);

    let second = converted[1];
    assert_eq!(second.measure, 11.25);
    assert_eq!(second.position, 4);
    assert_eq!(second.end_position, 2);
    assert_eq!(second.pattern, 1);
    assert_eq!(second.duration, 1.0);
    assert_eq!(second.delay, 0.0);
    assert!(second.is_ex);
    assert!(second.is_connect);
}

#[test]
fn test_plain_reflect_keeps_single_note() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai
        .add_slide(1.0, 0, 4, 1.0, SlidePattern::Reflect, 0.25, false, false, false, Some(2))
        .unwrap();

    let ma2 = convert(&simai);
    let converted = slides(&ma2);
    assert_eq!(converted.len(), 1);
    assert_eq!(converted[0].pattern, 12);
}

// =============================================================================
// Tempo compensation
// =============================================================================

#[test]
fn test_single_tempo_durations_unchanged() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai.add_hold(0.0, 0, 4.0, false, false).unwrap();
    simai
        .add_slide(1.0, 0, 4, 1.5, SlidePattern::Straight, 0.25, false, false, false, None)
        .unwrap();

    let ma2 = convert(&simai);
    match &ma2.notes[0] {
        Ma2Note::Hold(hold) => assert_eq!(hold.duration, 4.0),
        other => panic!("expected hold, got {:?}", other),
    }
    match &ma2.notes[1] {
        Ma2Note::Slide(slide) => {
            assert_eq!(slide.duration, 1.5);
            assert_eq!(slide.delay, 0.25);
        }
        other => panic!("expected slide, got {:?}", other),
    }
}

#[test]
fn test_hold_crossing_tempo_change_is_stretched() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai.set_bpm(2.0, 240.0).unwrap();
    simai.add_hold(0.0, 0, 4.0, false, false).unwrap();

    let ma2 = convert(&simai);
    match &ma2.notes[0] {
        // 120*(2-0)/120 + 240*(4-2)/120
        Ma2Note::Hold(hold) => assert!((hold.duration - 6.0).abs() < 1e-9),
        other => panic!("expected hold, got {:?}", other),
    }
}

#[test]
fn test_touch_hold_crossing_tempo_change_is_stretched() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai.set_bpm(2.0, 60.0).unwrap();
    simai
        .add_touch_hold(1.0, 0, 'C', 2.0, false, maiconv::ma2::TouchSize::M1)
        .unwrap();

    let ma2 = convert(&simai);
    match &ma2.notes[0] {
        // 120*(2-1)/120 + 60*(3-2)/120
        Ma2Note::TouchHold(hold) => assert!((hold.duration - 1.5).abs() < 1e-9),
        other => panic!("expected touch hold, got {:?}", other),
    }
}

#[test]
fn test_slide_duration_and_delay_compensate_independently() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai.set_bpm(2.5, 240.0).unwrap();
    simai
        .add_slide(2.0, 0, 4, 1.0, SlidePattern::Straight, 1.0, false, false, false, None)
        .unwrap();

    let ma2 = convert(&simai);
    let converted = slides(&ma2);
    // Both spans start at the note and cross the change at 2.5:
    // 120*0.5/120 + 240*0.5/120 = 1.5
    assert!((converted[0].duration - 1.5).abs() < 1e-9);
    assert!((converted[0].delay - 1.5).abs() < 1e-9);
}

#[test]
fn test_notes_clear_of_tempo_changes_are_untouched() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai.set_bpm(8.0, 240.0).unwrap();
    simai.add_hold(1.0, 0, 2.0, false, false).unwrap();

    let ma2 = convert(&simai);
    match &ma2.notes[0] {
        Ma2Note::Hold(hold) => assert_eq!(hold.duration, 2.0),
        other => panic!("expected hold, got {:?}", other),
    }
}

// =============================================================================
// JSON interchange
// =============================================================================

#[test]
fn test_json_chart_end_to_end() {
    let text = r#"{
        "bpms": [
            {"measure": 1.0, "bpm": 120.0},
            {"measure": 2.0, "bpm": 240.0}
        ],
        "notes": [
            {"type": "tap", "measure": 1.0, "position": 0, "is_break": true},
            {"type": "hold", "measure": 0.0, "position": 2, "duration": 4.0},
            {"type": "slide", "measure": 1.0, "position": 0, "end_position": 4,
             "duration": 1.0, "pattern": "-"},
            {"type": "spinner", "measure": 1.0, "position": 0}
        ]
    }"#;

    let chart: ChartJson = serde_json::from_str(text).unwrap();
    let simai = chart.into_chart().unwrap();
    let ma2 = convert(&simai);

    // The unknown entry is dropped, the rest convert
    assert_eq!(ma2.notes.len(), 3);
    match &ma2.notes[1] {
        // Crosses the 240 change at measure 2: 120*2/120 + 240*2/120
        Ma2Note::Hold(hold) => assert!((hold.duration - 6.0).abs() < 1e-9),
        other => panic!("expected hold, got {:?}", other),
    }

    let exported = ma2.export(DEFAULT_RESOLUTION).unwrap();
    assert!(exported.contains("BRTAP\t1\t0\t0"));
    assert!(exported.contains("BPM\t0\t0\t120.000"));
    assert!(exported.contains("MET\t0\t0\t4\t4"));
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_round_trips_through_a_file() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai.add_tap(1.0, 0, false, false, false).unwrap();
    simai
        .add_slide(1.0, 0, 4, 1.0, SlidePattern::Fan, 0.25, false, false, false, None)
        .unwrap();

    let ma2 = convert(&simai);
    let text = ma2.export(DEFAULT_RESOLUTION).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.ma2");
    std::fs::write(&path, &text).unwrap();
    let read_back = std::fs::read_to_string(&path).unwrap();

    assert_eq!(read_back, text);
    assert!(read_back.lines().any(|line| line == "NMSF_\t1\t0\t0\t96\t384\t4"));
}

#[test]
fn test_conversion_is_deterministic() {
    let mut simai = SimaiChart::new();
    simai.set_bpm(0.0, 120.0).unwrap();
    simai.set_bpm(2.0, 200.0).unwrap();
    simai.add_hold(0.0, 0, 4.0, false, false).unwrap();
    simai
        .add_slide(10.0, 0, 2, 2.0, SlidePattern::Reflect, 0.25, false, false, false, Some(4))
        .unwrap();

    let first = convert(&simai).export(DEFAULT_RESOLUTION).unwrap();
    let second = convert(&simai).export(DEFAULT_RESOLUTION).unwrap();
    assert_eq!(first, second);
}
