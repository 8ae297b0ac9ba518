use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use linemaze::{Color, Inset, Maze, MazeBuilder, Stage, Stroke, Surface};
use rand::rngs::ThreadRng;

use crate::{error::Error, helpers::Dims, logging, renderer::Renderer, settings::Settings};

/// Wall width the passages are erased with, so the posts between cells stay.
const WALL_WIDTH: f64 = 2.0;

/// Builder for a maze that fills a canvas of `canvas` pixels.
///
/// Fixed rows or columns split the free space evenly, otherwise as many cells
/// of the configured size as fit are used and the grid is centered.
pub fn layout(canvas: Dims, settings: &Settings) -> MazeBuilder {
    // rightmost and bottom walls have to land on a pixel too
    let free = Dims(
        canvas.0 - 1 - 2 * settings.get_margin_x() as i32,
        canvas.1 - 1 - 2 * settings.get_margin_y() as i32,
    );

    let (cols, cell_w) = fit(free.0, settings.get_cols(), settings.get_cell_width());
    let (rows, cell_h) = fit(free.1, settings.get_rows(), settings.get_cell_height());

    let used = (cols as f64 * cell_w, rows as f64 * cell_h);
    let x = ((canvas.0 - 1) as f64 - used.0).div_euclid(2.0);
    let y = ((canvas.1 - 1) as f64 - used.1).div_euclid(2.0);

    let mut builder = MazeBuilder::new(used.0 + 2.0 * x, used.1 + 2.0 * y)
        .origin(x, y)
        .rows(rows)
        .cols(cols);
    if let Some(seed) = settings.get_seed() {
        builder = builder.seed(seed);
    }
    if let Some(limit) = settings.get_depth_limit() {
        builder = builder.depth_limit(limit);
    }
    builder
}

/// Number of cells along one axis and their size.
fn fit(free: i32, fixed: Option<i32>, cell: u16) -> (i32, f64) {
    match fixed {
        Some(count) if count > 0 => (count, (free.max(count) as f64 / count as f64).floor()),
        Some(count) => (count, cell as f64),
        None => ((free / cell as i32).max(1), cell as f64),
    }
}

pub struct Saver {
    renderer: Renderer,
    settings: Settings,
    once: bool,
    rng: ThreadRng,
}

impl Saver {
    pub fn new(settings: Settings, once: bool) -> Result<Self, Error> {
        let renderer = Renderer::new(settings.get_palette().background)?;

        Ok(Saver {
            renderer,
            settings,
            once,
            rng: rand::thread_rng(),
        })
    }

    /// Shows mazes until the user quits.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            match self.show_one() {
                Ok(()) if self.once => return self.wait_for_key(),
                Ok(()) | Err(Error::Restart) => {}
                Err(Error::Quit) => return Ok(()),
                Err(err) => return Err(err),
            }
            self.renderer.clear();
        }
    }

    fn show_one(&mut self) -> Result<(), Error> {
        let mut maze = match layout(self.renderer.canvas_size(), &self.settings).build() {
            Ok(maze) => maze,
            Err(err) => {
                log::warn!("Terminal too small for a maze: {}", err);
                return self.wait_for_resize();
            }
        };
        log::info!(
            "New {}x{} maze, seed {}",
            maze.rows(),
            maze.cols(),
            maze.seed()
        );

        self.draw_maze(&mut maze)?;
        if maze.stage() == Stage::Generated {
            self.trace_solution(&mut maze)?;
        }
        self.pause(self.settings.get_hold())
    }

    fn draw_maze(&mut self, maze: &mut Maze) -> Result<(), Error> {
        let palette = self.settings.get_palette();
        let animate = self.settings.get_animate();
        let delay = self.settings.get_carve_delay();

        let frame = Stroke::new().color(palette.frame).inset(Inset::By(-1.0));
        for line in maze.overlay() {
            line.draw(&mut self.renderer, &frame)?;
        }

        let wall = Stroke::new().color(palette.wall).width(WALL_WIDTH);
        for cell in maze.cells() {
            cell.draw(&mut self.renderer, &wall)?;
            if animate {
                self.pause(delay)?;
            }
        }

        if let Err(err) = maze.generate() {
            if !err.is_resource() {
                return Err(err.into());
            }
            log::error!("Generation stopped: {}", err);
            return self.pause(Duration::ZERO);
        }

        let passage = Stroke::new()
            .color(palette.background)
            .width(WALL_WIDTH)
            .inset(Inset::HalfWidth);
        for cell in maze.path_way_cells() {
            cell.draw(&mut self.renderer, &passage)?;
            if animate {
                self.pause(delay)?;
            }
        }

        self.pause(Duration::ZERO)
    }

    fn trace_solution(&mut self, maze: &mut Maze) -> Result<(), Error> {
        let color = if self.settings.get_random_line_color() {
            Some(Color::random(&mut self.rng))
        } else {
            self.settings.get_palette().trace
        };

        match maze.solve() {
            Ok(true) => {}
            Ok(false) => log::warn!("Exit of maze {} wasn't reached", maze.seed()),
            Err(err) if err.is_resource() => {
                log::error!("Solving stopped: {}", err);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        let animate = self.settings.get_animate();
        let delay = self.settings.get_solve_delay();
        for line in maze.solve_trace(color) {
            line.draw(&mut self.renderer, &Stroke::new())?;
            if animate {
                self.pause(delay)?;
            }
        }

        self.pause(Duration::ZERO)
    }

    /// Shows the picture, then waits for `duration` while handling input.
    fn pause(&mut self, duration: Duration) -> Result<(), Error> {
        self.renderer.refresh()?;

        let until = Instant::now() + duration;
        loop {
            let left = until.saturating_duration_since(Instant::now());
            if !event::poll(left)? {
                return Ok(());
            }
            self.handle(event::read()?)?;
        }
    }

    fn wait_for_key(&mut self) -> Result<(), Error> {
        self.renderer.refresh()?;
        loop {
            match event::read()? {
                Event::Key(KeyEvent {
                    kind: KeyEventKind::Press,
                    ..
                }) => return Ok(()),
                event => match self.handle(event) {
                    Ok(()) | Err(Error::Restart) => self.renderer.refresh()?,
                    Err(Error::Quit) => return Ok(()),
                    Err(err) => return Err(err),
                },
            }
        }
    }

    fn wait_for_resize(&mut self) -> Result<(), Error> {
        self.renderer.refresh()?;
        loop {
            self.handle(event::read()?)?;
        }
    }

    fn handle(&mut self, event: Event) -> Result<(), Error> {
        if self.renderer.on_event(&event) {
            log::debug!("Resized to {:?} pixels", self.renderer.canvas_size());
            return Err(Error::Restart);
        }

        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                kind: KeyEventKind::Press,
                ..
            })
            | Event::Key(KeyEvent {
                code: KeyCode::Esc | KeyCode::Char('q'),
                kind: KeyEventKind::Press,
                ..
            }) => Err(Error::Quit),
            Event::Key(KeyEvent {
                code: KeyCode::Char('d'),
                kind: KeyEventKind::Press,
                ..
            }) => {
                logging::get_logger().switch_debug();
                self.renderer.refresh()?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
