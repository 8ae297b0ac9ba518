pub mod canvas;

use std::{
    io::{self, stdout, Write},
    panic, thread,
};

use crossterm::{event::Event, execute, style, QueueableCommand, SynchronizedUpdate};
use linemaze::{Color, Point, Surface};

use crate::{helpers::Dims, logging};

use self::canvas::{Canvas, Frame, Glyph, HALF_BLOCK};

fn term_color(color: Color) -> style::Color {
    let Color(r, g, b) = color;
    style::Color::Rgb { r, g, b }
}

pub struct Renderer {
    size: Dims,
    canvas: Canvas,
    shown: Option<Frame>,
    full_redraw: bool,
}

impl Renderer {
    pub fn new(background: Color) -> io::Result<Self> {
        let size = crate::helpers::term_size();

        let mut ren = Renderer {
            size,
            canvas: Canvas::for_terminal(size, background),
            shown: None,
            full_redraw: true,
        };

        ren.turn_on()?;

        Ok(ren)
    }

    fn turn_on(&mut self) -> io::Result<()> {
        self.register_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(
            stdout(),
            crossterm::cursor::Hide,
            crossterm::terminal::EnterAlternateScreen,
        )?;

        self.on_resize(None);

        Ok(())
    }

    fn turn_off(&mut self) -> io::Result<()> {
        self.unregister_panic_hook();

        crossterm::execute!(
            stdout(),
            style::ResetColor,
            crossterm::cursor::Show,
            crossterm::terminal::LeaveAlternateScreen,
        )?;
        crossterm::terminal::disable_raw_mode()?;
        Ok(())
    }

    fn register_panic_hook(&self) {
        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let mut stdout = stdout();

            let _ = execute!(
                stdout,
                crossterm::terminal::LeaveAlternateScreen,
                crossterm::cursor::Show,
            );
            let _ = crossterm::terminal::disable_raw_mode();

            prev(info)
        }));
    }

    fn unregister_panic_hook(&self) {
        if !thread::panicking() {
            let _ = panic::take_hook();
        }
    }

    fn on_resize(&mut self, size: Option<Dims>) {
        self.size = size.unwrap_or_else(crate::helpers::term_size);
        self.canvas.resize(Dims(self.size.0, self.size.1 * 2));
        self.shown = None;
        self.full_redraw = true;
    }

    /// Returns whether the event changed the size of the picture.
    pub fn on_event(&mut self, event: &Event) -> bool {
        if let Event::Resize(x, y) = event {
            self.on_resize(Some((*x, *y).into()));
            return true;
        }
        false
    }

    /// Size of the drawable area in pixels.
    pub fn canvas_size(&self) -> Dims {
        self.canvas.size()
    }

    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    pub fn show(&mut self) -> io::Result<()> {
        let mut frame = Frame::compose(&self.canvas);
        logging::get_logger().draw(&mut frame, self.canvas.background());

        let mut tty = stdout();
        let shown = self.shown.as_ref().filter(|f| f.size == frame.size && !self.full_redraw);

        tty.sync_update(|tty| {
            tty.queue(style::ResetColor)?;
            let mut colors: Option<(Color, Color)> = None;

            for y in 0..frame.size.1 {
                if shown.is_some_and(|s| s.row(y) == frame.row(y)) {
                    continue;
                }

                tty.queue(crossterm::cursor::MoveTo(0, y as u16))?;

                for glyph in frame.row(y) {
                    let (ch, fg, bg) = match *glyph {
                        Glyph::Pixels { top, bottom } => (HALF_BLOCK, top, bottom),
                        Glyph::Text { ch, fg, bg } => (ch, fg, bg),
                        Glyph::Placeholder => continue,
                    };

                    if colors.map_or(true, |(f, _)| f != fg) {
                        tty.queue(style::SetForegroundColor(term_color(fg)))?;
                    }
                    if colors.map_or(true, |(_, b)| b != bg) {
                        tty.queue(style::SetBackgroundColor(term_color(bg)))?;
                    }
                    colors = Some((fg, bg));

                    tty.queue(style::Print(ch))?;
                }
            }

            tty.flush()
        })??;

        self.shown = Some(frame);
        self.full_redraw = false;

        Ok(())
    }
}

impl Surface for Renderer {
    type Error = io::Error;

    /// Strokes are always one pixel wide.
    fn segment(&mut self, from: Point, to: Point, color: Color, _width: f64) -> io::Result<()> {
        self.canvas.line(Dims::round(from), Dims::round(to), color);
        Ok(())
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.show()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.turn_off();
    }
}
