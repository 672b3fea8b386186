use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::{
    storage::{KeyValueStore, TimerStore},
    tick::Surface,
};

pub const DEFAULT_PLACEHOLDER: &str = "No timer set";

/// One-line countdown for status bars. The store is read again on every tick so that a setup or
/// reset done from the main view shows up without restarting the indicator.
pub struct StatusIndicator<S: KeyValueStore, W> {
    store: TimerStore<S>,
    out: W,
    placeholder: String,
}

impl<S: KeyValueStore, W: Write> StatusIndicator<S, W> {
    pub fn new(store: TimerStore<S>, out: W, placeholder: String) -> Self {
        Self {
            store,
            out,
            placeholder,
        }
    }

    pub fn label(&self, now: DateTime<Utc>) -> String {
        match self.store.load() {
            Some(record) => record.breakdown_at(now).to_string(),
            None => self.placeholder.clone(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<S: KeyValueStore, W: Write> Surface for StatusIndicator<S, W> {
    fn render(&mut self, now: DateTime<Utc>) -> Result<()> {
        let label = self.label(now);
        writeln!(self.out, "{label}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        status::indicator::{StatusIndicator, DEFAULT_PLACEHOLDER},
        storage::{FileKeyValueStore, TimerStore},
        tick::Surface,
        timer::TimerRecord,
    };

    #[test]
    fn test_indicator_follows_other_process_writes() -> Result<()> {
        let dir = tempdir()?;
        let main_view = TimerStore::new(FileKeyValueStore::shared(dir.path())?);
        let mut indicator = StatusIndicator::new(
            TimerStore::new(Arc::new(FileKeyValueStore::shared(dir.path())?)),
            Vec::new(),
            DEFAULT_PLACEHOLDER.to_string(),
        );
        let record = TimerRecord::new(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(), 80);
        let now = record.expected_end_date() - chrono::Duration::seconds(10);

        indicator.render(now)?;

        main_view.save(&record);
        indicator.render(now)?;
        indicator.render(now + chrono::Duration::seconds(10))?;

        main_view.clear();
        indicator.render(now)?;

        let text = String::from_utf8(indicator.into_inner())?;
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![DEFAULT_PLACEHOLDER, "0:00:00:10", "0:00:00:00", DEFAULT_PLACEHOLDER]
        );
        Ok(())
    }

    #[test]
    fn test_custom_placeholder() -> Result<()> {
        let dir = tempdir()?;
        let indicator = StatusIndicator::new(
            TimerStore::new(FileKeyValueStore::shared(dir.path())?),
            Vec::new(),
            "--".to_string(),
        );
        assert_eq!(indicator.label(Utc::now()), "--");
        Ok(())
    }
}
