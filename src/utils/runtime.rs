use anyhow::Result;

/// Both surfaces only ever drive a single tick loop, so one thread is enough.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
