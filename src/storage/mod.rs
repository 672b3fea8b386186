//! Persistence is split in two layers:
//!  - [key_value::KeyValueStore] is the raw medium. [key_value::FileKeyValueStore] keeps one file
//!    per key in a namespace directory that both the main view and the status indicator open.
//!  - [timer_store::TimerStore] encodes the single [crate::timer::TimerRecord] under a fixed key
//!    and turns every storage problem into "no timer configured".

pub mod key_value;
pub mod timer_store;

pub use key_value::{FileKeyValueStore, KeyValueStore};
pub use timer_store::{LoadError, SaveOutcome, TimerStore};
