use crate::message::{Polarity, TouchEvent};

/// Remembers the polarity of the last event that was acted on.
///
/// There is one polarity for all channels: a second touch on any channel is dropped
/// until something is released, and the other way around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Debounce {
    last: Option<Polarity>,
}

impl Debounce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Polarity> {
        self.last
    }

    /// Returns the next state and the event if it should be acted on.
    pub fn filter(self, event: TouchEvent) -> (Self, Option<TouchEvent>) {
        match event.polarity() {
            Some(polarity) if Some(polarity) != self.last => {
                (Self { last: Some(polarity) }, Some(event))
            }
            _ => (self, None),
        }
    }
}
