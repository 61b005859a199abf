//! Instrument definitions.

use arrayvec::ArrayString;

use crate::sample::SampleBuffer;

/// Identifier of an instrument within a project.
pub type InstrumentId = u16;

/// Binds a sample buffer to an id and a loop flag.
#[derive(Clone, Debug)]
pub struct Instrument {
    /// Unique id within the project
    pub id: InstrumentId,
    /// Display name
    pub name: ArrayString<32>,
    /// Decoded sample data (None plays silence)
    pub sample: Option<SampleBuffer>,
    /// Restart from the beginning when the sample ends
    pub looped: bool,
}

impl Instrument {
    /// Create a one-shot instrument playing `sample`.
    pub fn new(id: InstrumentId, sample: SampleBuffer) -> Self {
        Self {
            id,
            name: ArrayString::new(),
            sample: Some(sample),
            looped: false,
        }
    }

    /// Create an instrument with no sample attached yet.
    pub fn empty(id: InstrumentId) -> Self {
        Self {
            id,
            name: ArrayString::new(),
            sample: None,
            looped: false,
        }
    }

    /// Builder: set the loop flag.
    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// Builder: set the display name (truncated to 32 bytes).
    pub fn named(mut self, name: &str) -> Self {
        self.name.clear();
        for ch in name.chars() {
            if self.name.try_push(ch).is_err() {
                break;
            }
        }
        self
    }
}

/// Two-digit lowercase hex id, as shown in pattern cells.
impl core::fmt::Display for Instrument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02x}", self.id)
    }
}
