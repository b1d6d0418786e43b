mod common;

use biosonic::features::{FeatureSet, FeatureTracks, SignalTrack};
use biosonic::instruments::InstrumentId;
use biosonic::sequencing::{Mode, BEATS_PER_BAR};
use biosonic::{InputError, SegmentError, Sonifier, SonifyConfig};

use common::{steady_features, synthetic_recording, FEATURE_RATE};

#[test]
fn resting_pulse_stays_in_baseline() {
    let sonifier = Sonifier::new(SonifyConfig::default()).unwrap();
    // every secondary feature at zero; both bar lines (0 ms and ~3429 ms)
    // fall inside the respiration warm-up, where the neutral 15/min applies
    let features = steady_features(8.0, 70.0, 0.0, 0.0, 0.0);
    let segment = sonifier.render_features("baseline", &features).unwrap();
    let schedule = &segment.schedule;

    assert!(schedule.transitions.is_empty());
    assert!(schedule.steps.iter().all(|s| s.mode == Mode::Baseline));

    let residue = |offset: f64| schedule.step_at(offset).unwrap().beat % BEATS_PER_BAR;
    let kicks: Vec<_> = schedule.triggers_of(InstrumentId::Kick).collect();
    let snares: Vec<_> = schedule.triggers_of(InstrumentId::Snare).collect();
    assert!(!kicks.is_empty() && !snares.is_empty());
    assert!(kicks.iter().all(|t| residue(t.offset_ms) == 0));
    assert!(snares.iter().all(|t| residue(t.offset_ms) == 2));
    assert_eq!(schedule.triggers_of(InstrumentId::Piano).count(), 0);

    assert_eq!(segment.sample_rate, 44_100);
    assert_eq!(segment.samples.len(), 352_800);
}

#[test]
fn raised_arousal_switches_to_stress_on_the_bar() {
    let sonifier = Sonifier::new(SonifyConfig::default()).unwrap();
    let features = steady_features(8.0, 95.0, 0.5, 0.5, 10.0);
    let schedule = sonifier.render_features("stress", &features).unwrap().schedule;

    let switch = schedule.transitions.first().unwrap();
    assert_eq!(switch.to, Mode::Stress);
    assert_eq!(switch.beat % BEATS_PER_BAR, 0);

    let chord = schedule
        .triggers_of(InstrumentId::PowerChord)
        .find(|t| t.offset_ms == switch.position_ms)
        .unwrap();
    assert_eq!(chord.params.intensity, 0.5);
    assert_eq!(chord.params.chord.as_deref(), Some("C"));
}

#[test]
fn empty_track_is_rejected_before_scheduling() {
    let len = 800;
    let full = |v: f32| SignalTrack::constant(v, len, FEATURE_RATE);
    let err = FeatureSet::new(FeatureTracks {
        heart_rate: full(70.0),
        eda: SignalTrack::new(Vec::new(), FEATURE_RATE),
        emg: full(0.0),
        resp_swell: full(0.0),
        resp_rate: full(15.0),
        temperature: full(0.0),
        motion: None,
    })
    .unwrap_err();

    assert!(matches!(err, SegmentError::Input(InputError::EmptyTrack(_))));
}

#[test]
fn recording_renders_present_labels_and_skips_the_rest() {
    let mut config = SonifyConfig::default();
    config.timeline.segment_duration_s = 12.0;
    let sonifier = Sonifier::new(config).unwrap();

    let recording = synthetic_recording(72.0, &[(1, 30.0), (2, 30.0), (0, 5.0)]);
    let outcomes = sonifier.render_all(&recording);
    assert_eq!(outcomes.len(), 4);

    for outcome in &outcomes {
        match outcome.segment.label {
            1 | 2 => {
                let segment = outcome.result.as_ref().unwrap();
                assert_eq!(segment.name, outcome.segment.name);
                assert_eq!(segment.samples.len(), 12 * 44_100);
                assert!(segment.samples.iter().any(|s| s.abs() > 0.0));
            }
            _ => assert!(matches!(
                outcome.result,
                Err(SegmentError::Input(InputError::UnknownLabel(_)))
            )),
        }
    }
}

#[test]
fn segment_near_the_end_is_insufficient() {
    let mut config = SonifyConfig::default();
    config.timeline.segment_duration_s = 12.0;
    let sonifier = Sonifier::new(config).unwrap();

    // label 2's midpoint sits 5 s before the end of the recording
    let recording = synthetic_recording(72.0, &[(1, 20.0), (2, 10.0)]);
    let segment = &sonifier.config().segments.segments[1];
    assert_eq!(segment.label, 2);

    let err = sonifier.render_segment(&recording, segment).unwrap_err();
    assert!(matches!(err, SegmentError::Input(InputError::InsufficientSamples { .. })));
}
