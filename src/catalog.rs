use regex::Regex;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static CLIP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9].*\.mp4$").expect("clip name pattern"));

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read video directory {dir}: {source}")]
    Read {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no videos matching {}/[0-9]*.mp4", .0.display())]
    Empty(PathBuf),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no video {index} in 0..={last}")]
    OutOfRange { index: i64, last: usize },
}

/// Which clip to play. `Idle` is always the last clip of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipIndex {
    Idle,
    Channel(usize),
}

impl fmt::Display for ClipIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipIndex::Idle => write!(f, "idle"),
            ClipIndex::Channel(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VideoCatalog {
    clips: Vec<PathBuf>,
}

impl VideoCatalog {
    /// Collects `<digit>*.mp4` files from `dir`, sorted by name.
    pub fn scan(dir: &Path) -> Result<Self, CatalogError> {
        let read_err = |source| CatalogError::Read {
            dir: dir.to_path_buf(),
            source,
        };

        let mut clips = vec![];
        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if CLIP_NAME.is_match(name) && entry.path().is_file() {
                clips.push(entry.path());
            }
        }

        Self::from_paths(clips).ok_or_else(|| CatalogError::Empty(dir.to_path_buf()))
    }

    /// Builds a catalog from already known paths; `None` when there are none.
    pub fn from_paths(mut clips: Vec<PathBuf>) -> Option<Self> {
        if clips.is_empty() {
            return None;
        }
        clips.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Some(Self { clips })
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn clips(&self) -> &[PathBuf] {
        &self.clips
    }

    pub fn idle(&self) -> &Path {
        // never empty, see `from_paths`
        &self.clips[self.clips.len() - 1]
    }

    pub fn resolve(&self, index: ClipIndex) -> Result<&Path, ResolveError> {
        match index {
            ClipIndex::Idle => Ok(self.idle()),
            ClipIndex::Channel(n) => {
                self.clips
                    .get(n)
                    .map(PathBuf::as_path)
                    .ok_or(ResolveError::OutOfRange {
                        index: n as i64,
                        last: self.clips.len() - 1,
                    })
            }
        }
    }
}
