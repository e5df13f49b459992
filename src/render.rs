//! Per-sample memoization and refresh timing for stateful generators.

use crate::signal::{Frame, Real, SampleIndex};

/// The last computed output and the sample index it belongs to. A shared
/// child asked again for the same instant answers from here instead of
/// recomputing.
#[derive(Clone, Debug, Default)]
pub struct Memo {
    index: Option<SampleIndex>,
    frame: Frame,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: SampleIndex) -> Option<&Frame> {
        match self.index {
            Some(i) if i == index => Some(&self.frame),
            _ => None,
        }
    }

    pub fn store(&mut self, index: SampleIndex, frame: &Frame) {
        self.index = Some(index);
        self.frame.clone_from(frame);
    }

    pub fn clear(&mut self) {
        self.index = None;
        self.frame.clear();
    }
}

/// Decides when a generator with a refresh input should draw a new state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshClock {
    last: Option<SampleIndex>,
}

impl RefreshClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `period` samples have passed since the last refresh. The
    /// first call always refreshes. A jump back in time refreshes unless the
    /// period is infinite, which is how an idle trigger holds its state. If
    /// due, the refresh is recorded at `index`.
    pub fn tick(&mut self, index: SampleIndex, period: Real) -> bool {
        let due = match self.last {
            None => true,
            Some(last) if index < last => period.is_finite(),
            Some(last) => (index - last) as Real >= period,
        };
        if due {
            tracing::trace!(index, period, "refresh");
            self.last = Some(index);
        }
        due
    }

    pub fn last(&self) -> Option<SampleIndex> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
