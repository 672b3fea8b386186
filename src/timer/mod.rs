//! The countdown model. A [record::TimerRecord] only stores a birthday and a lifespan; the end
//! date and the [breakdown::Breakdown] shown on every tick are derived from it on demand.

pub mod breakdown;
pub mod record;

pub use breakdown::Breakdown;
pub use record::TimerRecord;
