//! Dimer counts down the time left until an expected end of life, computed from a birthday and
//! an expected lifespan. The countdown is persisted in a namespace shared by the interactive
//! `dimer` command and the `dimer-status` indicator, so both always show the same timer.
//!

pub mod cli;
pub mod fs;
pub mod status;
pub mod storage;
pub mod tick;
pub mod timer;
pub mod utils;
