//! Drives the once-per-second refresh of a [Surface]. The timer model holds no state between
//! ticks; every tick simply hands a fresh "now" to [Surface::render].

pub mod shutdown;

use std::{io, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::utils::clock::Clock;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Something that can redraw itself for a given moment.
pub trait Surface {
    fn render(&mut self, now: DateTime<Utc>) -> Result<()>;
}

impl<F> Surface for F
where
    F: FnMut(DateTime<Utc>) -> Result<()>,
{
    fn render(&mut self, now: DateTime<Utc>) -> Result<()> {
        self(now)
    }
}

pub struct Ticker<S> {
    surface: S,
    time_provider: Box<dyn Clock>,
    frequency: Duration,
    shutdown: CancellationToken,
}

impl<S: Surface> Ticker<S> {
    pub fn new(
        surface: S,
        time_provider: Box<dyn Clock>,
        frequency: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            surface,
            time_provider,
            frequency,
            shutdown,
        }
    }

    /// Renders right away and then on every `frequency` boundary until cancelled. Tick points are
    /// accumulated from the first one, so slow renders don't make the display drift.
    ///
    /// Render errors are logged and skipped, except a broken pipe: nobody reads the output any
    /// more, so the loop stops as if cancelled.
    pub async fn run(mut self) -> Result<S> {
        let mut tick_point = self.time_provider.instant();
        loop {
            tick_point += self.frequency;

            let now = self.time_provider.time();
            debug!("Rendering tick at {now}");
            if let Err(e) = self.surface.render(now) {
                if is_broken_pipe(&e) {
                    info!("Output closed at {now}, stopping");
                    break;
                }
                error!("Failed to render tick at {now}: {e:?}");
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = self.time_provider.sleep_until(tick_point) => ()
            }
        }
        Ok(self.surface)
    }
}

fn is_broken_pipe(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}
