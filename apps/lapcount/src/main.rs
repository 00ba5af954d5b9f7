mod config;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    Intent, LayoutDirection, LocalFileStore, Persistence, RemoteApi, SwimmerStore, SwipeGesture,
};
use config::{Backend, FlagOverrides, Settings};
use shared::domain::{Swimmer, SwimmerId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lapcount", about = "Count laps for a group of swimmers")]
struct Cli {
    /// JSON file holding the swimmers (local backend).
    #[arg(long, conflicts_with = "server_url")]
    data_file: Option<PathBuf>,
    /// Base URL of a lap counter server (remote backend).
    #[arg(long)]
    server_url: Option<String>,
    /// Layout direction for this run only.
    #[arg(long)]
    direction: Option<LayoutDirection>,
    #[arg(long, default_value = config::SETTINGS_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Add {
        name: String,
    },
    Remove {
        id: i64,
    },
    Inc {
        id: i64,
    },
    Dec {
        id: i64,
    },
    Reset {
        id: i64,
    },
    /// Drags a swimmer card from one pointer position to another and releases it.
    Swipe {
        id: i64,
        #[arg(allow_negative_numbers = true)]
        from: f64,
        #[arg(allow_negative_numbers = true)]
        to: f64,
        #[arg(long, default_value_t = 5)]
        steps: u32,
    },
    /// Saves the preferred layout direction.
    Direction {
        direction: LayoutDirection,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lapcount: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::Direction { direction } = cli.command {
        config::save_layout_direction(&cli.config, direction)?;
        println!("layout direction set to {direction}");
        return Ok(());
    }

    let settings = config::load_settings(
        &cli.config,
        FlagOverrides {
            data_file: cli.data_file,
            server_url: cli.server_url,
            layout_direction: cli.direction,
        },
    );

    match settings.backend() {
        Backend::Local(path) => {
            let store = SwimmerStore::new(LocalFileStore::new(path));
            execute(store, &settings, cli.command).await
        }
        Backend::Remote(url) => {
            let store = SwimmerStore::new(RemoteApi::new(url)?);
            execute(store, &settings, cli.command).await
        }
    }
}

async fn execute<P: Persistence>(
    mut store: SwimmerStore<P>,
    settings: &Settings,
    command: Command,
) -> Result<()> {
    let report = store.load().await?;
    if report.dropped > 0 {
        eprintln!("skipped {} malformed swimmer record(s)", report.dropped);
    }

    let intent = match command {
        Command::List => {
            print_list(store.list());
            return Ok(());
        }
        Command::Direction { .. } => return Ok(()),
        Command::Swipe {
            id,
            from,
            to,
            steps,
        } => {
            let id = SwimmerId(id);
            store.get(id)?;
            match swipe(settings.layout_direction, id, from, to, steps) {
                Some(intent) => intent,
                None => {
                    println!("swipe reverted");
                    return Ok(());
                }
            }
        }
        Command::Add { name } => Intent::Add(name),
        Command::Remove { id } => Intent::Remove(SwimmerId(id)),
        Command::Inc { id } => Intent::Increment(SwimmerId(id)),
        Command::Dec { id } => Intent::Decrement(SwimmerId(id)),
        Command::Reset { id } => Intent::Reset(SwimmerId(id)),
    };

    let verb = intent.name();
    let target = intent.swimmer_id();
    match (store.apply(intent).await?, target) {
        (Some(swimmer), _) => println!("{verb}: {}", describe(&swimmer)),
        (None, Some(id)) => bail!("no swimmer with id {id}"),
        (None, None) => bail!("{verb} had no effect"),
    }
    Ok(())
}

/// Runs a simulated drag through the gesture controller and returns the
/// intent a committed release stands for.
fn swipe(
    direction: LayoutDirection,
    id: SwimmerId,
    from: f64,
    to: f64,
    steps: u32,
) -> Option<Intent> {
    let mut gesture = SwipeGesture::new(direction);
    gesture.begin(from);

    let steps = steps.max(1);
    for step in 1..=steps {
        let x = from + (to - from) * f64::from(step) / f64::from(steps);
        if let Some(frame) = gesture.drag(x) {
            println!(
                "x={x:>8.1}  translate={:>7.1}  delete={:.2}  reset={:.2}",
                frame.translate_x(direction),
                frame.delete_reveal,
                frame.reset_reveal
            );
        }
    }

    let intent = gesture.end().and_then(|outcome| outcome.intent(id));
    gesture.settle();
    intent
}

fn print_list(swimmers: &[Swimmer]) {
    if swimmers.is_empty() {
        println!("no swimmers yet");
        return;
    }
    for swimmer in swimmers {
        println!("{}", describe(swimmer));
    }
}

fn describe(swimmer: &Swimmer) -> String {
    format!(
        "#{:<4} {:<24} {} lap(s)",
        swimmer.id, swimmer.name, swimmer.lap_count
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
