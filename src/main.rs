mod asf;
mod display;
mod gallery;
mod pages;
mod web;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use asf::alert::{Silent, TerminalBell};
use asf::{compute_status, default_schedule, load_schedule, BoardScheduler, BoardSnapshot, Schedule, SystemClock};
use display::{print_weekly_overview, render_board};
use gallery::{load_catalog, load_content_dir};

#[derive(Parser)]
#[command(name = "visual-history", about = "Image analysis gallery and tutoring-session board")]
pub struct Args {
    #[arg(long, global = true, help = "Session schedule (.csv or .json)")]
    pub schedule: Option<PathBuf>,

    #[arg(long, global = true, help = "Gallery configuration (pages.json)")]
    pub pages: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory of <page-id>.json analysis files")]
    pub content: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the gallery and the board over HTTP
    Web {
        #[arg(long, env = "VISUAL_HISTORY_PORT", default_value_t = 8080)]
        port: u16,

        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
    /// Print the current session status once
    Status,
    /// Run the live board in the terminal until Ctrl-C
    Board,
}

fn schedule_from(args: &Args) -> Result<Schedule> {
    match &args.schedule {
        Some(path) => load_schedule(path).with_context(|| format!("loading schedule {}", path.display())),
        None => Ok(default_schedule()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Reads RUST_LOG, defaults to info
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let schedule = schedule_from(&args)?;

    match args.command.unwrap_or(Command::Status) {
        Command::Web { port, bind } => {
            let board = BoardScheduler::new(schedule, Arc::new(SystemClock), Box::new(Silent));
            board.start().await;

            let state = web::AppState {
                catalog: load_catalog(args.pages.as_deref()),
                registry: load_content_dir(args.content.as_deref()),
                board: board.clone(),
            };
            println!("Access the site at http://localhost:{}", port);
            web::start_server(&bind, port, state).await?;
            board.stop().await;
        }
        Command::Status => {
            let now = chrono::Local::now().naive_local();
            let snapshot = BoardSnapshot {
                now,
                status: compute_status(now, &schedule),
                completed_today: asf::status::completed_today(now, &schedule),
                alerts_fired: 0,
                last_alerted: None,
            };
            print!("{}", render_board(&snapshot));
            print_weekly_overview(&schedule);
        }
        Command::Board => {
            let board = BoardScheduler::new(schedule, Arc::new(SystemClock), Box::new(TerminalBell))
                .with_display(|snapshot| {
                    // clear screen, cursor home
                    print!("\x1b[2J\x1b[H{}", render_board(snapshot));
                    let _ = std::io::stdout().flush();
                });
            board.start().await;
            tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
            board.stop().await;
            info!("Board stopped");
        }
    }

    Ok(())
}
