use std::env;
use std::fmt;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use honors_client::{ClientConfig, ConsoleClient};
use honors_core::{
    next_saturday, parse_iso_date, EditorController, HonorsEditor, HonorsError, HonorsSource,
};

const DEFAULT_CONSOLE_URL: &str = "http://127.0.0.1:8788";
const DEFAULT_CALENDAR_URL: &str = "https://www.hebcal.com";

#[derive(Debug, Parser)]
#[command(name = "honors")]
#[command(about = "Show and assign Torah honors through the honors console")]
struct Args {
    /// Honors console base URL. Falls back to HONORS_CONSOLE_URL env.
    #[arg(long)]
    console_url: Option<String>,

    /// Calendar base URL. Falls back to CALENDAR_URL env.
    #[arg(long)]
    calendar_url: Option<String>,

    /// Use the Israel reading schedule
    #[arg(long)]
    israel: bool,

    /// Members to fetch for name lookups
    #[arg(long, default_value_t = 500)]
    member_limit: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the reading and honors for a date
    Show {
        /// Date (YYYY-MM-DD); defaults to the upcoming Saturday
        #[arg(long, value_parser = parse_iso_date)]
        date: Option<NaiveDate>,
    },
    /// Give an honor to a member
    Assign {
        #[arg(long, value_parser = parse_iso_date)]
        date: NaiveDate,
        /// Honor key ("1".."7" or "M")
        #[arg(long)]
        honor: String,
        /// Member ID
        #[arg(long)]
        member: i64,
    },
    /// Leave an honor open
    Clear {
        #[arg(long, value_parser = parse_iso_date)]
        date: NaiveDate,
        #[arg(long)]
        honor: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let args = Args::parse();

    let console_url = args
        .console_url
        .or_else(|| env::var("HONORS_CONSOLE_URL").ok())
        .unwrap_or_else(|| DEFAULT_CONSOLE_URL.to_string());
    let calendar_url = args
        .calendar_url
        .or_else(|| env::var("CALENDAR_URL").ok())
        .unwrap_or_else(|| DEFAULT_CALENDAR_URL.to_string());
    let client = ConsoleClient::new(ClientConfig::new(calendar_url, console_url).with_israel(args.israel))?;

    match args.command {
        Command::Show { date } => {
            let date = date.unwrap_or_else(|| next_saturday(Local::now().date_naive()));
            let mut controller = EditorController::new(client, date, args.member_limit);
            controller.mount().await;
            let mut out = String::new();
            render(&mut out, controller.editor())?;
            print!("{}", out);
        }
        Command::Assign {
            date,
            honor,
            member,
        } => {
            let editor = set_honor(client, date, &honor, Some(member), args.member_limit).await?;
            println!("{} on {}: {}", honor_name(&editor, &honor), date, member_name(&editor, member));
        }
        Command::Clear { date, honor } => {
            let editor = set_honor(client, date, &honor, None, args.member_limit).await?;
            println!("{} on {}: open", honor_name(&editor, &honor), date);
        }
    }

    Ok(())
}

/// Load `date`, change one honor, and save the full set.
async fn set_honor<S: HonorsSource>(
    source: S,
    date: NaiveDate,
    honor: &str,
    member_id: Option<i64>,
    member_limit: usize,
) -> Result<HonorsEditor, HonorsError> {
    let mut controller = EditorController::new(source, date, member_limit);
    controller.mount().await;

    if let Some(err) = &controller.editor().readings().error {
        return Err(HonorsError::unavailable("calendar", err.clone()));
    }
    let roster = controller.editor().roster();
    if !roster.iter().any(|slot| slot.key == honor) {
        let keys: Vec<&str> = roster.iter().map(|slot| slot.key.as_str()).collect();
        return Err(HonorsError::Rejected(format!(
            "Honor '{}' is not read on {} (honors: {})",
            honor,
            date,
            if keys.is_empty() { "none".to_string() } else { keys.join(", ") }
        )));
    }

    controller.select_member(honor, member_id);
    controller.save().await?;
    info!(date = %date, honor = %honor, "Honor updated");
    Ok(controller.into_editor())
}

fn honor_name(editor: &HonorsEditor, honor: &str) -> String {
    editor
        .roster()
        .into_iter()
        .find(|slot| slot.key == honor)
        .map(|slot| slot.label)
        .unwrap_or_else(|| honor.to_string())
}

fn member_name(editor: &HonorsEditor, id: i64) -> String {
    editor
        .members()
        .iter()
        .find(|member| member.id == id)
        .map(|member| format!("{} (#{})", member.display_name(), id))
        .unwrap_or_else(|| format!("member #{}", id))
}

/// Plain-text view of the editor for `show`.
fn render(out: &mut impl fmt::Write, editor: &HonorsEditor) -> fmt::Result {
    writeln!(out, "Honors for {}", editor.date())?;

    if let Some(err) = &editor.readings().error {
        writeln!(out, "Could not load readings: {}", err)?;
    }
    if let Some(item) = editor.reading_item() {
        write!(out, "{}", item.name.en)?;
        if let Some(hdate) = &item.hdate {
            write!(out, " ({})", hdate)?;
        }
        writeln!(out, " [{}]", editor.cycle().as_str())?;
    }
    if let Some(err) = editor.members_error() {
        writeln!(out, "Member list unavailable: {}", err)?;
    }

    let roster = editor.roster();
    if roster.is_empty() {
        return writeln!(out, "No honors found for this date");
    }
    for slot in roster {
        let assigned = editor
            .assignment(&slot.key)
            .map(|id| member_name(editor, id))
            .unwrap_or_else(|| "open".to_string());
        writeln!(out, "  {:<9} {:<24} {}", slot.label, slot.meta.range(), assigned)?;
    }
    Ok(())
}
