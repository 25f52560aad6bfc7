//! Minimal terminal prompt - the interactive surface.
//!
//! Mirrors the flow of the desktop form: authorize once, then fetch, inspect
//! and save in any order until the user quits. Action errors are printed and
//! the prompt continues.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use innerscan_core::default_filename;
use innerscan_provider::DateRange;

use crate::cli::Cli;
use crate::error::{ClientError, ClientResult};
use crate::session::{ExportOptions, FetchOutcome, Session};

/// Runs the interactive session until the user quits.
pub async fn run(cli: &Cli, session: &mut Session) -> ClientResult<()> {
    println!("Health Planet body-composition export");

    authorize(session).await?;

    // A range given on the command line seeds the first fetch only.
    let mut preset = cli.date_range();

    loop {
        println!();
        println!(
            "[1] fetch  [2] summary  [3] save  [4] save with profile  [q] quit  ({}, {} day(s) loaded)",
            session.auth_state().describe(),
            session.dataset().map_or(0, |d| d.len())
        );
        let choice = read_line("> ")?;

        let result = match choice.trim() {
            "1" => fetch_action(session, &mut preset).await,
            "2" => summary_action(session),
            "3" => save_action(cli, session, false),
            "4" => save_action(cli, session, true),
            "q" | "quit" | "exit" => break,
            "" => continue,
            other => {
                println!("unknown choice: {}", other);
                continue;
            }
        };

        if let Err(e) = result {
            // Stdin closing is the only error that ends the session.
            if matches!(e, ClientError::Io(_)) {
                return Err(e);
            }
            eprintln!("error: {}", e);
        }
    }

    Ok(())
}

/// Walks the user through the authorization handshake.
async fn authorize(session: &mut Session) -> ClientResult<()> {
    let url = session.begin_authorization();
    println!();
    println!("Open this URL in your browser and authorize access:");
    println!();
    println!("  {}", url);
    println!();
    println!("The success page displays an authorization code.");

    loop {
        let code = read_line("Paste the authorization code: ")?;
        if code.trim().is_empty() {
            println!("No code entered.");
            continue;
        }
        match session.submit_code(&code).await {
            Ok(()) => {
                println!("Authenticated.");
                return Ok(());
            }
            Err(e @ ClientError::Io(_)) => return Err(e),
            Err(e) => eprintln!("error: {} (paste the code again)", e),
        }
    }
}

async fn fetch_action(
    session: &mut Session,
    preset: &mut Option<DateRange>,
) -> ClientResult<()> {
    let range = match preset.take() {
        Some(range) => range,
        None => prompt_range()?,
    };

    match session.fetch(range).await? {
        FetchOutcome::NoData => println!("No data in the requested range."),
        FetchOutcome::Fetched { days } => {
            println!("Fetched {} day(s) of measurements.", days);
            if let Some(summary) = session.summary() {
                println!();
                print!("{}", summary);
            }
        }
    }
    Ok(())
}

fn summary_action(session: &Session) -> ClientResult<()> {
    match session.summary() {
        Some(summary) => {
            println!();
            print!("{}", summary);
        }
        None => println!("No dataset yet - fetch first."),
    }
    Ok(())
}

fn save_action(cli: &Cli, session: &Session, with_profile: bool) -> ClientResult<()> {
    let default_name = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_filename(Local::now().naive_local())));
    let input = read_line(&format!("Output file [{}]: ", default_name.display()))?;

    let output = match input.trim() {
        "" => Some(default_name),
        name => Some(PathBuf::from(name)),
    };

    let options = ExportOptions {
        data_dir: cli.data_dir.clone(),
        output,
        with_profile: with_profile || cli.with_profile,
    };
    let written = session.export(&options)?;
    println!("Saved to {}", written.display());
    Ok(())
}

/// Asks for a fetch period, defaulting to the trailing 30 days.
fn prompt_range() -> ClientResult<DateRange> {
    println!("[1] trailing days  [2] explicit range");
    let mode = read_line("> ")?;

    match mode.trim() {
        "1" | "" => {
            let input = read_line("How many days back? [30]: ")?;
            Ok(DateRange::TrailingDays(parse_trailing_days(&input)?))
        }
        "2" => {
            let from = read_date("Start date (YYYY-MM-DD): ")?;
            let to = read_date("End date (YYYY-MM-DD): ")?;
            if from > to {
                return Err(ClientError::Input(
                    "start date is after end date".to_string(),
                ));
            }
            Ok(DateRange::Explicit { from, to })
        }
        other => Err(ClientError::Input(format!("unknown choice: {}", other))),
    }
}

fn parse_trailing_days(input: &str) -> ClientResult<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(30);
    }
    trimmed
        .parse()
        .map_err(|_| ClientError::Input(format!("not a number of days: {}", trimmed)))
}

fn read_date(prompt: &str) -> ClientResult<NaiveDate> {
    let input = read_line(prompt)?;
    input
        .trim()
        .parse()
        .map_err(|_| ClientError::Input(format!("not a date (YYYY-MM-DD): {}", input.trim())))
}

fn read_line(prompt: &str) -> ClientResult<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().read_line(&mut line)?;
    if bytes == 0 {
        return Err(ClientError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        )));
    }
    Ok(line)
}
