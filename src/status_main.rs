use std::env::args;

use anyhow::Result;
use clap::Parser;
use dimer::{
    status::{args::StatusArgs, start_status},
    utils::{
        clock::DefaultClock,
        dir::resolve_application_path,
        logging::{enable_logging, STATUS_PREFIX},
        runtime::single_thread_runtime,
    },
};
use tracing::error;

fn main() -> Result<()> {
    run(StatusArgs::parse_from(args())).inspect_err(|e| {
        error!("Error running status indicator {e:?}");
    })
}

fn run(args: StatusArgs) -> Result<()> {
    let app_dir = resolve_application_path(args.dir)?;
    enable_logging(STATUS_PREFIX, &app_dir, args.log, args.log_console)?;
    single_thread_runtime()?.block_on(async move {
        start_status(
            app_dir,
            std::io::stdout(),
            args.placeholder,
            args.once,
            DefaultClock,
        )
        .await
    })
}
