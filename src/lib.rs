pub mod error;
pub mod helpers;
pub mod logging;
pub mod renderer;
pub mod saver;
pub mod settings;
