use std::collections::BTreeMap;
use std::fmt;

/// Monotonic id handed out per stream; `0` is never issued.
pub type Generation = u64;

/// Logical operation streams that are tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StreamKey {
    Upload,
    Query,
    FactCheck,
    Search,
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKey::Upload => write!(f, "upload"),
            StreamKey::Query => write!(f, "question"),
            StreamKey::FactCheck => write!(f, "fact-check"),
            StreamKey::Search => write!(f, "news search"),
        }
    }
}

/// Tracks the latest generation minted for each stream.
///
/// A response is applied to visible state only while its generation is still
/// the latest one for its stream; anything older is a race-discarded result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationGuard {
    latest: BTreeMap<StreamKey, Generation>,
}

impl GenerationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints the next generation for `stream`, superseding every earlier one.
    pub fn next_generation(&mut self, stream: StreamKey) -> Generation {
        let slot = self.latest.entry(stream).or_insert(0);
        *slot += 1;
        *slot
    }

    pub fn is_current(&self, stream: StreamKey, generation: Generation) -> bool {
        generation != 0 && self.latest.get(&stream).copied() == Some(generation)
    }

    /// Supersedes whatever is outstanding on `stream` without starting anything new.
    pub fn invalidate(&mut self, stream: StreamKey) {
        self.next_generation(stream);
    }

    pub fn latest(&self, stream: StreamKey) -> Option<Generation> {
        self.latest.get(&stream).copied()
    }
}

/// State that records in-flight operations and must release them once the
/// owning request settles, whichever way it settles.
pub trait FlightLedger {
    fn end_flight(&mut self, stream: StreamKey, generation: Generation);
}
