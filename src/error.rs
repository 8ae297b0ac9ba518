use std::io;

use linemaze::MazeError;
use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("Maze error: {0}")]
    Maze(#[from] MazeError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Quit")]
    Quit,
    /// Current maze is thrown away, e.g. after a resize.
    #[error("Restart")]
    Restart,
}
