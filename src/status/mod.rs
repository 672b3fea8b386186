//! The status-bar surface. It prints a fresh countdown label every second until stopped, so
//! tools like waybar, polybar or i3blocks can show it next to the clock.

pub mod args;
pub mod indicator;

use std::{io::Write, path::PathBuf};

use anyhow::Result;
use indicator::StatusIndicator;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    storage::{FileKeyValueStore, TimerStore},
    tick::{shutdown, Surface, Ticker, DEFAULT_TICK_INTERVAL},
    utils::clock::Clock,
};

/// Builds the indicator on top of the shared namespace in `app_dir` and runs it until Ctrl-C.
pub async fn start_status(
    app_dir: PathBuf,
    out: impl Write,
    placeholder: String,
    once: bool,
    clock: impl Clock,
) -> Result<()> {
    let store = TimerStore::new(FileKeyValueStore::shared(&app_dir)?);
    let mut indicator = StatusIndicator::new(store, out, placeholder);

    if once {
        return indicator.render(clock.time());
    }

    info!("Starting status indicator over {app_dir:?}");
    let shutdown_token = CancellationToken::new();
    let ticker = Ticker::new(
        indicator,
        Box::new(clock),
        DEFAULT_TICK_INTERVAL,
        shutdown_token.clone(),
    );

    // Returns once stdout is closed as well, see [Ticker::run].
    let (_, result) = tokio::join!(shutdown::detect_shutdown(shutdown_token.clone()), async {
        let result = ticker.run().await;
        shutdown_token.cancel();
        result
    });

    if let Err(e) = &result {
        error!("Status indicator stopped with an error {e:?}");
    }
    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Write},
        time::Duration,
    };

    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        status::{indicator::DEFAULT_PLACEHOLDER, start_status},
        storage::{FileKeyValueStore, TimerStore},
        timer::TimerRecord,
        utils::clock::OffsetClock,
    };

    #[tokio::test(start_paused = true)]
    async fn test_once_prints_single_label() -> Result<()> {
        let dir = tempdir()?;
        let record = TimerRecord::new(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(), 80);
        TimerStore::new(FileKeyValueStore::shared(dir.path())?).save(&record);

        let mut out = Vec::new();
        start_status(
            dir.path().to_owned(),
            &mut out,
            DEFAULT_PLACEHOLDER.to_string(),
            true,
            OffsetClock::new(record.expected_end_date() - chrono::Duration::hours(1)),
        )
        .await?;

        assert_eq!(String::from_utf8(out)?, "0:01:00:00\n");
        Ok(())
    }

    /// Stdout of a status bar that has already exited.
    struct ClosedPipe {
        writes: usize,
    }

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_exits_when_reader_goes_away() -> Result<()> {
        let dir = tempdir()?;
        let mut pipe = ClosedPipe { writes: 0 };

        let status = start_status(
            dir.path().to_owned(),
            &mut pipe,
            DEFAULT_PLACEHOLDER.to_string(),
            false,
            OffsetClock::new(Utc::now()),
        );
        tokio::time::timeout(Duration::from_secs(60), status).await??;

        assert_eq!(pipe.writes, 1);
        Ok(())
    }
}
