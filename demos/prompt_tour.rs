//! Prompt Tour
//!
//! Asks for a password, then shows a spinner while input is blocked.
//! Pressing escape or Ctrl+C during the spinner aborts it.
//!
//! Run with `cargo run --example prompt_tour`.

use std::io::Write;
use std::time::Duration;

use crossterm::{cursor, queue, style::Print, terminal};

use keyprompt::prompts::PasswordPrompt;
use keyprompt::terminal::{open_keys, CrosstermControl};
use keyprompt::{ask_with, block, BlockOutcome, EngineConfig, Outcome};

const FRAMES: [&str; 4] = ["◒", "◐", "◓", "◑"];

#[tokio::main]
async fn main() -> keyprompt::Result<()> {
    let config = EngineConfig::from_env()?;

    let prompt = PasswordPrompt::new("Choose a passphrase").validate(|value| {
        (value.chars().count() < 8).then(|| "Use at least 8 characters".to_string())
    });
    let secret = match ask_with(prompt, &config).await? {
        Outcome::Submitted(secret) => secret,
        Outcome::Cancelled => {
            println!("Cancelled.");
            return Ok(());
        }
    };

    let control = CrosstermControl;
    let keys = open_keys(&control);
    let handle = block(
        config.capture,
        config.interpreter(),
        config.abort_policy,
        keys,
        control,
        std::io::stdout(),
    )?;

    for tick in 0..20 {
        if handle.is_aborted() {
            break;
        }
        handle.with_output(|out| {
            let _ = queue!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(terminal::ClearType::CurrentLine),
                Print(format!("{}  Hashing passphrase", FRAMES[tick % FRAMES.len()]))
            );
            let _ = out.flush();
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let outcome = handle.release().await?;
    println!();
    match outcome {
        BlockOutcome::Released => println!("Stored a {}-character passphrase.", secret.chars().count()),
        BlockOutcome::Aborted => println!("Aborted."),
    }
    Ok(())
}
