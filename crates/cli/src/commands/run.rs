//! `roundtable run`: dispatch a single task and exit.

use crate::roster::{self, Mode};
use tracing::info;

pub async fn run(mode: Mode, task: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_validated_config(mode)?;
    let factory = roster::team_factory(&config, mode)?;
    let session = super::build_session(&config, factory);

    session.on_session_start();
    info!(mode = ?mode, "Dispatching task");
    session.on_user_message(task).await?;

    Ok(())
}
