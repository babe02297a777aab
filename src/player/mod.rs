pub mod controller;
pub mod supervisor;

/// Player executable and the name its rendering process shows up as.
pub const PLAYER_PROGRAM: &str = "omxplayer";
pub const PLAYER_PROCESS: &str = "omxplayer.bin";
/// Display layer for new players, above the one being replaced.
pub const PLAYER_LAYER: u32 = 1;
