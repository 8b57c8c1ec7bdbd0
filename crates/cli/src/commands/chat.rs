//! `roundtable chat`: interactive chat with a team.

use crate::roster::{self, Mode};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

pub async fn run(mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_validated_config(mode)?;
    let factory = roster::team_factory(&config, mode)?;
    let session = super::build_session(&config, factory);
    session.on_session_start();
    info!(mode = ?mode, "Interactive session started");

    println!();
    println!("  Roundtable {mode:?} mode");
    println!("  Type your query and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    use std::io::Write;

    loop {
        print!("You > ");
        std::io::stdout().flush()?;

        match lines.next_line().await? {
            Some(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "exit" | "quit" | "/exit" | "/quit") {
                    break;
                }

                session.on_user_message(line).await?;
                println!();
            }
            None => break, // EOF (Ctrl+D)
        }
    }

    println!("Goodbye!");
    Ok(())
}
