use crate::debounce::Debounce;
use crate::device::link::LineSource;
use crate::message::TouchEvent;
use crate::player::controller::PlaybackController;
use crate::player::supervisor::PlayerBackend;
use std::io;

/// The running installation: one line in, at most one video switch out.
pub struct Installation<S, B> {
    source: S,
    debounce: Debounce,
    playback: PlaybackController<B>,
}

impl<S: LineSource, B: PlayerBackend> Installation<S, B> {
    pub fn new(source: S, playback: PlaybackController<B>) -> Self {
        Self {
            source,
            debounce: Debounce::new(),
            playback,
        }
    }

    #[cfg(test)]
    pub fn playback(&self) -> &PlaybackController<B> {
        &self.playback
    }

    /// Reads one event and acts on it if the debounce lets it through. Returns the event
    /// that was acted on.
    pub fn step(&mut self) -> io::Result<Option<TouchEvent>> {
        let event = self.source.next_event()?;
        let (debounce, actionable) = self.debounce.filter(event);
        if event != TouchEvent::NoEvent {
            tracing::debug!(
                polarity = ?event.polarity(),
                channel = ?event.channel(),
                last = ?self.debounce.last(),
                acted = actionable.is_some(),
                "touch message"
            );
        }
        self.debounce = debounce;

        if let Some(event) = actionable {
            self.playback.handle(event)?;
        }
        Ok(actionable)
    }

    /// Starts the idle clip and then follows the controller forever. Only returns when
    /// the link dies or a player can't be started.
    #[tracing::instrument(skip(self))]
    pub fn run(mut self) -> io::Result<()> {
        self.playback.play_idle()?;
        loop {
            self.step()?;
        }
    }
}
