use anyhow::Result;
use dimer::cli::run_cli;
use tracing::error;

fn main() -> Result<()> {
    if let Err(e) = run_cli() {
        if let Some(e) = e.downcast_ref::<clap::Error>() {
            e.exit();
        }
        error!("Error running cli {e:?}");
        return Err(e);
    }
    Ok(())
}
