use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Where a labelled segment starts inside the label's occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartStrategy {
    /// The first sample carrying the label.
    FirstOccurrence,
    /// The middle of the label's occurrences, away from transition effects.
    #[default]
    Midpoint,
}

impl fmt::Display for StartStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartStrategy::FirstOccurrence => f.write_str("first_occurrence"),
            StartStrategy::Midpoint => f.write_str("midpoint"),
        }
    }
}

impl FromStr for StartStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "first" | "first_occurrence" => Ok(StartStrategy::FirstOccurrence),
            "mid" | "midpoint" => Ok(StartStrategy::Midpoint),
            other => Err(format!("unknown start strategy `{other}`")),
        }
    }
}

/// A named segment to render: all samples carrying `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub name: String,
    pub label: i64,
}

impl SegmentSpec {
    pub fn new(name: impl Into<String>, label: i64) -> Self {
        Self {
            name: name.into(),
            label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentWindow {
    pub start: usize,
    pub len: usize,
}

/// Locate a `len`-sample window for `label`.
///
/// With [`StartStrategy::Midpoint`] the window starts at the median position
/// among the label's occurrences. The window must fit inside the recording;
/// it may run past the end of the label itself.
pub fn select_window(
    labels: &[i64],
    label: i64,
    len: usize,
    strategy: StartStrategy,
) -> Result<SegmentWindow, InputError> {
    let occurrences: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter_map(|(i, &l)| (l == label).then_some(i))
        .collect();

    let start = match strategy {
        StartStrategy::FirstOccurrence => occurrences.first().copied(),
        StartStrategy::Midpoint => occurrences.get(occurrences.len() / 2).copied(),
    }
    .ok_or(InputError::UnknownLabel(label))?;

    let available = labels.len() - start;
    if len > available {
        return Err(InputError::InsufficientSamples { needed: len, available });
    }
    Ok(SegmentWindow { start, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    // label 2 occupies indices 2..=7
    const LABELS: [i64; 12] = [0, 0, 2, 2, 2, 2, 2, 2, 1, 1, 0, 0];

    #[test]
    fn midpoint_starts_at_the_median_occurrence() {
        let window = select_window(&LABELS, 2, 3, StartStrategy::Midpoint).unwrap();
        assert_eq!(window, SegmentWindow { start: 5, len: 3 });
    }

    #[test]
    fn first_occurrence_starts_at_the_first() {
        let window = select_window(&LABELS, 2, 3, StartStrategy::FirstOccurrence).unwrap();
        assert_eq!(window.start, 2);
    }

    #[test]
    fn missing_label_is_reported() {
        assert!(matches!(
            select_window(&LABELS, 4, 3, StartStrategy::Midpoint),
            Err(InputError::UnknownLabel(4))
        ));
    }

    #[test]
    fn window_must_fit_in_the_recording() {
        // label 1 midpoint is index 9, three samples remain
        assert!(select_window(&LABELS, 1, 3, StartStrategy::Midpoint).is_ok());
        assert!(matches!(
            select_window(&LABELS, 1, 4, StartStrategy::Midpoint),
            Err(InputError::InsufficientSamples { needed: 4, available: 3 })
        ));
    }

    #[test]
    fn strategy_parses_from_cli_spelling() {
        assert_eq!("first-occurrence".parse(), Ok(StartStrategy::FirstOccurrence));
        assert_eq!("midpoint".parse(), Ok(StartStrategy::Midpoint));
        assert!("last".parse::<StartStrategy>().is_err());
    }
}
