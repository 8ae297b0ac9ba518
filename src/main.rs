use clap::Parser;
use mazesaver::{error::Error, logging, saver::Saver, settings::Settings};

#[derive(Parser, Debug)]
#[clap(version, about, name = "mazesaver")]
struct Args {
    #[clap(short, long, action, help = "Reset config to default and quit")]
    reset_config: bool,
    #[clap(long, action, help = "Show config path and quit")]
    show_config_path: bool,
    #[clap(long, help = "Show config in debug format and quit")]
    debug_config: bool,
    #[clap(short, long, help = "Seed of every maze, random when missing")]
    seed: Option<u64>,
    #[clap(long, help = "Number of rows, computed from the cell size when missing")]
    rows: Option<i32>,
    #[clap(long, help = "Number of columns, computed from the cell size when missing")]
    cols: Option<i32>,
    #[clap(short, long, action, help = "Show a single maze and wait for a key")]
    once: bool,
    #[clap(long, action, help = "Draw everything at once")]
    no_animation: bool,
    #[clap(long, action, help = "Pick a random color for every solution")]
    random_color: bool,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    let path = Settings::default_path();

    if args.reset_config {
        Settings::reset_config(&path)?;
        return Ok(());
    }

    if args.show_config_path {
        if let Some(s) = path.to_str() {
            println!("{}", s);
        } else {
            println!("{:?}", path);
        }
        return Ok(());
    }

    if args.debug_config {
        println!("{:#?}", Settings::load(&path));
        return Ok(());
    }

    better_panic::install();
    logging::init();

    let mut settings = Settings::load(&path)?;
    if let Some(seed) = args.seed {
        settings = settings.set_seed(seed);
    }
    if let Some(rows) = args.rows {
        settings = settings.set_rows(rows);
    }
    if let Some(cols) = args.cols {
        settings = settings.set_cols(cols);
    }
    if args.no_animation {
        settings = settings.set_animate(false);
    }
    if args.random_color {
        settings = settings.set_random_line_color(true);
    }

    Saver::new(settings, args.once)?.run()
}
