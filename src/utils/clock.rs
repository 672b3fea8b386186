use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Source of "now" for every surface. Swapping it out lets tests pin the wall clock while
/// tokio's paused time drives the ticks.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;

    fn instant(&self) -> Instant;

    async fn sleep_until(&self, instant: Instant);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}

/// Wall clock that starts at a fixed moment and advances with tokio's clock, so it follows
/// `tokio::time::pause`/`advance` in tests.
#[derive(Clone)]
pub struct OffsetClock {
    start_time: DateTime<Utc>,
    reference: Instant,
}

impl OffsetClock {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            reference: Instant::now(),
        }
    }
}

#[async_trait]
impl Clock for OffsetClock {
    fn time(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.reference.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.start_time + elapsed
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}
