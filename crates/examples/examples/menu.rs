use std::path::PathBuf;

use anyhow::{Context, Result};
use arbor::{config::Config, dump::dump};
use arbor_examples::menu::{DEFAULT_SCRIPT, Demo, Step};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// CLI flags for the menu demo.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Configuration file.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Log level or filter directive, overriding the config.
    #[clap(short, long)]
    log: Option<String>,

    /// Input script, e.g. "tick click:30,230 tick key:q".
    #[clap(short, long)]
    script: Option<String>,

    /// Print the scene tree when the script ends.
    #[clap(short, long)]
    dump: bool,

    /// Print the key bindings and exit.
    #[clap(short, long)]
    keys: bool,
}

pub fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    let level = args.log.as_deref().unwrap_or(&config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(level).context("invalid log filter")?)
        .with_target(false)
        .compact()
        .init();

    if args.keys {
        for (key, message) in config.keymap()?.describe() {
            println!("{key:>12}  {message}");
        }
        return Ok(());
    }

    let steps = Step::parse_script(args.script.as_deref().unwrap_or(DEFAULT_SCRIPT))?;
    let mut demo = Demo::new(&config)?;
    let summary = demo.run(&steps)?;

    if args.dump {
        print!("{}", dump(demo.scene(), demo.scene().root())?);
    }
    println!(
        "{} frames, {} presented, {} rounds, ended at {}{}",
        summary.frames,
        summary.presents,
        summary.rounds,
        summary.location,
        if summary.quit { " (quit)" } else { "" }
    );
    Ok(())
}
