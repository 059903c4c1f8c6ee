//! Downloads every image from the configured user's Pinterest boards.
//!
//! Requires geckodriver to be running (default `http://127.0.0.1:4444`)
//! and credentials in the environment or a `.env` file.
//!
//! # Usage
//!
//! ```bash
//! geckodriver &
//! PINTEREST_USERNAME=me@example.com PINTEREST_PASSWORD=... cargo run --bin harvest
//! ```

use std::io;

use anyhow::Context;
use board_harvest::{Config, Runner, WebDriverSession, prompt::prompt_base_name};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("board_harvest=info".parse()?),
        )
        .init();

    println!("--- Pinterest Image Downloader ---");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\nERROR: {e}");
            eprintln!("Please create a '.env' file in the working directory with:");
            eprintln!("PINTEREST_USERNAME=your_email@example.com");
            eprintln!("PINTEREST_PASSWORD=your_password");
            std::process::exit(1);
        }
    };
    config.log_summary();

    let base_name = prompt_base_name(&mut io::stdin().lock(), &mut io::stdout(), &config.output_root)
        .context("reading folder name")?;

    let runner = Runner::new(&config)?;
    let session = WebDriverSession::connect(&config)
        .await
        .context("starting browser session")?;
    let summary = runner.run(session, &base_name).await?;

    println!();
    for board in &summary.boards {
        match &board.error {
            Some(error) => println!("{}: failed ({error})", board.name),
            None => println!(
                "{}: {} found, {} downloaded, {} failed -> {}",
                board.name,
                board.found,
                board.succeeded,
                board.failed,
                board.folder.display()
            ),
        }
    }
    println!(
        "\nComplete! {} images downloaded, {} failed.",
        summary.total_succeeded(),
        summary.total_failed()
    );
    println!("\n--- Process Finished ---");

    Ok(())
}
