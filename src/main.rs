//! keyprompt - Main Entry Point
//!
//! Runs a short questionnaire that exercises each prompt type. Set
//! `RUST_LOG=keyprompt=debug` to trace state transitions on stderr and
//! `KEYPROMPT_CONFIG` to point at a JSON configuration file.

use std::process;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use keyprompt::prompts::{ConfirmPrompt, MultiSelectPrompt, PathPrompt, SelectOption, SelectPrompt, TextPrompt};
use keyprompt::{ask_with, EngineConfig, Outcome};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    match run_questionnaire(&config).await {
        Ok(Some(summary)) => {
            println!();
            for line in summary {
                println!("{}", line);
            }
        }
        Ok(None) => {
            println!("Operation cancelled.");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("\nERROR: {}", e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr, and only when `RUST_LOG` asks for them
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}

/// Unwrap a submitted answer or bail out of the questionnaire on cancel
macro_rules! answer {
    ($outcome:expr) => {
        match $outcome {
            Outcome::Submitted(value) => value,
            Outcome::Cancelled => return Ok(None),
        }
    };
}

async fn run_questionnaire(config: &EngineConfig) -> keyprompt::Result<Option<Vec<String>>> {
    let name = answer!(
        ask_with(
            TextPrompt::new("What is your project called?")
                .placeholder("my-app")
                .default_value("my-app")
                .validate(|value| {
                    if value.contains(char::is_whitespace) {
                        Some("Project names cannot contain spaces".to_string())
                    } else {
                        None
                    }
                }),
            config,
        )
        .await?
    );

    let location = answer!(ask_with(PathPrompt::from_cwd("Where should it live?")?, config).await?);

    let kind = answer!(
        ask_with(
            SelectPrompt::new(
                "Pick a project type",
                vec![
                    SelectOption::new("bin", "Binary"),
                    SelectOption::new("lib", "Library").with_hint("no main.rs"),
                    SelectOption::new("workspace", "Workspace"),
                ],
            )?,
            config,
        )
        .await?
    );

    let tools = answer!(
        ask_with(
            MultiSelectPrompt::new(
                "Select additional tools",
                vec![
                    SelectOption::new("fmt", "rustfmt").with_hint("recommended"),
                    SelectOption::new("clippy", "clippy"),
                    SelectOption::new("ci", "CI workflow"),
                ],
            )?
            .required(false),
            config,
        )
        .await?
    );

    let proceed = answer!(ask_with(ConfirmPrompt::new("Create the project?"), config).await?);

    let mut summary = vec![
        format!("Name: {}", name),
        format!("Location: {}", location.display()),
        format!("Type: {}", kind),
        format!("Tools: {}", if tools.is_empty() { "none".to_string() } else { tools.join(", ") }),
    ];
    summary.push(if proceed {
        "Ready to create.".to_string()
    } else {
        "Nothing created.".to_string()
    });
    Ok(Some(summary))
}
