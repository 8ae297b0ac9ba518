use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use linemaze::Color;
use ron::{self, extensions::Extensions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SETTINGS: &str = include_str!("./default_settings.ron");

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot access settings file; {0}")]
    Io(#[from] io::Error),
    #[error("Invalid settings file ({path:?}); {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Color,
    pub wall: Color,
    pub frame: Color,
    /// Forward moves of the solve trace, red when missing.
    #[serde(default)]
    pub trace: Option<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Color::WHITE,
            wall: Color::BLACK,
            frame: Color::BLACK,
            trace: None,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub cell_width: Option<u16>,
    #[serde(default)]
    pub cell_height: Option<u16>,
    #[serde(default)]
    pub margin_x: Option<u16>,
    #[serde(default)]
    pub margin_y: Option<u16>,
    #[serde(default)]
    pub rows: Option<i32>,
    #[serde(default)]
    pub cols: Option<i32>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub depth_limit: Option<usize>,
    #[serde(default)]
    pub animate: Option<bool>,
    #[serde(default)]
    pub carve_delay_ms: Option<u64>,
    #[serde(default)]
    pub solve_delay_ms: Option<u64>,
    #[serde(default)]
    pub hold_ms: Option<u64>,
    #[serde(default)]
    pub random_line_color: Option<bool>,
    #[serde(default)]
    pub palette: Option<Palette>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_cell_width(&self) -> u16 {
        self.cell_width.unwrap_or(6).max(1)
    }

    pub fn get_cell_height(&self) -> u16 {
        self.cell_height.unwrap_or(6).max(1)
    }

    pub fn get_margin_x(&self) -> u16 {
        self.margin_x.unwrap_or(2)
    }

    pub fn get_margin_y(&self) -> u16 {
        self.margin_y.unwrap_or(2)
    }

    pub fn set_rows(mut self, value: i32) -> Self {
        self.rows = Some(value);
        self
    }

    pub fn get_rows(&self) -> Option<i32> {
        self.rows
    }

    pub fn set_cols(mut self, value: i32) -> Self {
        self.cols = Some(value);
        self
    }

    pub fn get_cols(&self) -> Option<i32> {
        self.cols
    }

    pub fn set_seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn get_depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }

    pub fn set_animate(mut self, value: bool) -> Self {
        self.animate = Some(value);
        self
    }

    pub fn get_animate(&self) -> bool {
        self.animate.unwrap_or(true)
    }

    pub fn get_carve_delay(&self) -> Duration {
        Duration::from_millis(self.carve_delay_ms.unwrap_or(2))
    }

    pub fn get_solve_delay(&self) -> Duration {
        Duration::from_millis(self.solve_delay_ms.unwrap_or(40))
    }

    pub fn get_hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms.unwrap_or(2000))
    }

    pub fn set_random_line_color(mut self, value: bool) -> Self {
        self.random_line_color = Some(value);
        self
    }

    pub fn get_random_line_color(&self) -> bool {
        self.random_line_color.unwrap_or_default()
    }

    pub fn get_palette(&self) -> Palette {
        self.palette.unwrap_or_default()
    }

    pub fn default_path() -> PathBuf {
        dirs::preference_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mazesaver")
            .join("settings.ron")
    }

    fn options() -> ron::Options {
        ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, SettingsError> {
        Self::options()
            .from_str(text)
            .map_err(|source| SettingsError::Parse {
                path: path.to_owned(),
                source,
            })
    }

    /// Reads the settings, the default file is written first if there's none.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("Creating default settings at {:?}", path);
                Self::reset_config(path)?;
                Self::parse(DEFAULT_SETTINGS, path)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn reset_config(path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, DEFAULT_SETTINGS)?;
        Ok(())
    }
}
