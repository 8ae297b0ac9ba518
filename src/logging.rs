use std::{
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock},
    time::{Duration, Instant},
};

use linemaze::Color;
use log::{Log, Metadata, Record};
use unicode_width::UnicodeWidthStr;

use crate::{helpers::Dims, renderer::canvas::Frame};

static LOGGER: OnceLock<AppLogger> = OnceLock::new();

const INDICATOR_CHAR: char = '|';

pub fn get_logger() -> &'static AppLogger {
    // default configuration
    const DEFAULT_DECAY: Duration = Duration::from_secs(5);
    const DEFAULT_MAX_VISIBLE: usize = 5;

    let level = log::Level::Warn;

    LOGGER.get_or_init(|| AppLogger::new(level, DEFAULT_DECAY, DEFAULT_MAX_VISIBLE))
}

pub fn init() {
    if log::set_logger(get_logger()).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
}

#[derive(Clone, Debug)]
pub struct Message {
    pub level: log::Level,
    pub pushed: Instant,
    pub message: String,
    pub source: String,
}

struct Logs {
    logs: [Vec<Message>; 5], // there are 5 levels
}

impl Logs {
    fn push(&mut self, message: Message) {
        self.logs[message.level as usize - 1].insert(0, message);
    }

    fn clear_old(&mut self, decay: Duration) {
        let now = Instant::now();
        for level in self.logs.iter_mut() {
            level.retain(|msg| now.duration_since(msg.pushed) < decay);
        }
    }
}

pub struct AppLogger {
    pub min_level: Arc<RwLock<log::Level>>,
    pub decay: Duration,
    pub max_visible: usize,
    logs: Arc<Mutex<Logs>>,
}

impl AppLogger {
    fn new(min_level: log::Level, decay: Duration, max_visible: usize) -> Self {
        Self {
            min_level: Arc::new(RwLock::new(min_level)),
            decay,
            max_visible,
            logs: Arc::new(Mutex::new(Logs {
                logs: Default::default(),
            })),
        }
    }

    pub fn min_level(&self) -> log::Level {
        *self.min_level.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_min_level(&self, level: log::Level) {
        *self.min_level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    fn borrow_mut_logs(&self) -> MutexGuard<Logs> {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live messages, most severe level first and newest first within a level.
    pub fn get_logs(&self) -> Vec<Message> {
        let mut logs = self.borrow_mut_logs();
        logs.clear_old(self.decay);
        logs.logs.iter().flatten().cloned().collect()
    }

    pub fn switch_debug(&self) {
        if self.min_level() == log::Level::Debug {
            self.set_min_level(log::Level::Warn);
        } else {
            self.set_min_level(log::Level::Debug);
        }
    }

    /// Draws live messages into the bottom right corner, one per line.
    pub fn draw(&self, frame: &mut Frame, background: Color) {
        let text = if background == Color::BLACK {
            Color::WHITE
        } else {
            Color::BLACK
        };

        for (i, log) in self.get_logs().iter().take(self.max_visible).enumerate() {
            let color = match log.level {
                log::Level::Error => Color(205, 0, 0),
                log::Level::Warn => Color(205, 205, 0),
                log::Level::Info => text,
                log::Level::Debug => Color(0, 0, 238),
                log::Level::Trace => Color::GRAY,
            };

            let y = frame.size.1 - 1 - i as i32;
            let line = format!("{} -> {}", log.source, log.message);
            let x = frame.size.0 - line.width() as i32 - 2;

            frame.put_str(Dims(x, y), &line, text, background);
            frame.put_str(
                Dims(frame.size.0 - 1, y),
                &INDICATOR_CHAR.to_string(),
                color,
                background,
            );
        }
    }
}

impl Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.min_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.borrow_mut_logs().push(Message {
                level: record.level(),
                pushed: Instant::now(),
                message: record.args().to_string(),
                source: record.module_path().unwrap_or("unknown").to_string(),
            });
        }
    }

    // nothing is buffered outside of the list
    fn flush(&self) {}
}
