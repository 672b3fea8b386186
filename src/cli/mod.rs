pub mod setup;
pub mod view;

use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
};

use anyhow::Result;
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use setup::{parse_birthday, validate_setup, DateStyle, DEFAULT_LIFESPAN_YEARS};
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter};
use view::{CountdownView, ViewStyle};

use crate::{
    storage::{FileKeyValueStore, KeyValueStore, TimerStore},
    tick::{shutdown::detect_shutdown, Surface, Ticker, DEFAULT_TICK_INTERVAL},
    utils::{
        clock::{Clock, DefaultClock},
        dir::resolve_application_path,
        logging::{enable_logging, CLI_PREFIX},
        runtime::single_thread_runtime,
    },
};

const NO_TIMER_HINT: &str = "No timer set. Run `dimer setup --birthday <DATE>` to start one.";

#[derive(Parser, Debug)]
#[command(name = "Dimer", version, long_about = None)]
#[command(about = "Counts down the time you expect to have left", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default uses $XDG_STATE_HOME/dimer or $HOME/.local/state/dimer"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Mirror logs to stderr")]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Start a new timer, replacing the current one")]
    Setup {
        #[arg(
            long,
            short,
            help = "Your birthday. Examples are \"1990-03-15\", \"15/03/1990\", \"March 15 1990\""
        )]
        birthday: String,
        #[arg(
            long,
            short,
            default_value_t = DEFAULT_LIFESPAN_YEARS,
            help = "Expected lifespan in years, from 30 to 120"
        )]
        years: u32,
        #[arg(
            long,
            default_value_t = DateStyle::Uk,
            help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year"
        )]
        date_style: DateStyle,
    },
    #[command(about = "Print the countdown once")]
    Show {},
    #[command(about = "Keep the countdown on screen, refreshing every second")]
    Watch {},
    #[command(about = "Forget the current timer")]
    Reset {},
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = resolve_application_path(args.dir)?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let store = TimerStore::new(FileKeyValueStore::shared(&app_dir)?);
    let stdout = io::stdout();
    let style = if stdout.is_terminal() {
        ViewStyle::Terminal
    } else {
        ViewStyle::Plain
    };

    run_command(args.commands, &store, DefaultClock, stdout.lock(), style)
}

fn run_command<S: KeyValueStore>(
    command: Commands,
    store: &TimerStore<S>,
    clock: impl Clock,
    mut out: impl Write,
    style: ViewStyle,
) -> Result<()> {
    match command {
        Commands::Setup {
            birthday,
            years,
            date_style,
        } => {
            let now = clock.time();
            let record = parse_birthday(&birthday, date_style, now.with_timezone(&Local))
                .and_then(|birthday| validate_setup(birthday, years, now))
                .map_err(|e| {
                    Args::command().error(clap::error::ErrorKind::ValueValidation, format!("{e}"))
                })?;

            // The session keeps using `record` even if it didn't reach the disk.
            let _ = store.save(&record);
            info!("Started timer ending at {}", record.expected_end_date());

            CountdownView::new(record, out, ViewStyle::Plain).render(clock.time())
        }
        Commands::Show {} => match store.load() {
            Some(record) => CountdownView::new(record, out, ViewStyle::Plain).render(clock.time()),
            None => {
                writeln!(out, "{NO_TIMER_HINT}")?;
                Ok(())
            }
        },
        Commands::Watch {} => {
            let Some(record) = store.load() else {
                writeln!(out, "{NO_TIMER_HINT}")?;
                return Ok(());
            };
            let shutdown = CancellationToken::new();
            let ticker = Ticker::new(
                CountdownView::new(record, out, style),
                Box::new(clock),
                DEFAULT_TICK_INTERVAL,
                shutdown.clone(),
            );
            single_thread_runtime()?.block_on(async move {
                let (_, result) = tokio::join!(detect_shutdown(shutdown.clone()), async {
                    let result = ticker.run().await;
                    shutdown.cancel();
                    result
                });
                result.map(|_| ())
            })
        }
        Commands::Reset {} => {
            store.clear();
            writeln!(out, "Timer cleared.")?;
            Ok(())
        }
    }
}
