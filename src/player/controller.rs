use crate::catalog::{ClipIndex, VideoCatalog};
use crate::message::TouchEvent;
use crate::player::supervisor::{PlayerBackend, ProcessSupervisor};
use std::io;
use std::path::PathBuf;

pub struct PlaybackController<B> {
    catalog: VideoCatalog,
    supervisor: ProcessSupervisor<B>,
}

impl<B: PlayerBackend> PlaybackController<B> {
    pub fn new(catalog: VideoCatalog, supervisor: ProcessSupervisor<B>) -> Self {
        Self {
            catalog,
            supervisor,
        }
    }

    #[cfg(test)]
    pub fn supervisor(&self) -> &ProcessSupervisor<B> {
        &self.supervisor
    }

    /// Plays the clip for an event that made it through the debounce. A touch plays its
    /// channel, a release goes back to idle. Returns the clip that was started.
    pub fn handle(&mut self, event: TouchEvent) -> io::Result<Option<PathBuf>> {
        let index = match event {
            TouchEvent::Engage(channel) => ClipIndex::Channel(channel as usize),
            TouchEvent::Release(_) => ClipIndex::Idle,
            TouchEvent::NoEvent => return Ok(None),
        };
        self.play(index)
    }

    pub fn play_idle(&mut self) -> io::Result<Option<PathBuf>> {
        self.play(ClipIndex::Idle)
    }

    fn play(&mut self, index: ClipIndex) -> io::Result<Option<PathBuf>> {
        let clip = match self.catalog.resolve(index) {
            Ok(clip) => clip.to_path_buf(),
            Err(e) => {
                tracing::warn!(%index, "{}", e);
                return Ok(None);
            }
        };
        tracing::info!(%index, clip = %clip.display(), "switching video");
        self.supervisor.switch_to(&clip)?;
        Ok(Some(clip))
    }
}
