use serde::{Deserialize, Serialize};

use crate::instruments::{InstrumentId, InstrumentParams};

/// One sound placed on the segment timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub instrument: InstrumentId,
    pub params: InstrumentParams,
    pub offset_ms: f64,
    pub duration_ms: f64,
}

impl Trigger {
    pub fn end_ms(&self) -> f64 {
        self.offset_ms + self.duration_ms
    }
}
