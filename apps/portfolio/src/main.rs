mod config;
mod shell;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use page_core::{FormSubmissionController, HttpMessageRelay, RevealStarted};
use shared::domain::FormField;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{load_content, load_settings},
    shell::PageShell,
};

#[derive(Parser, Debug)]
#[command(about = "Headless driver for the portfolio page")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replays a list of scroll offsets and prints what each one reveals.
    Simulate {
        #[arg(long, value_delimiter = ',', default_value = "0,400,1200,2400,4000")]
        scroll: Vec<f64>,
        #[arg(long, default_value_t = 250)]
        step_ms: u64,
        /// Section to jump to after the offsets, e.g. `contact` or `#skills`.
        #[arg(long)]
        anchor: Option<String>,
    },
    /// Submits the contact form through the configured relay.
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        message: String,
    },
    /// Runs the hero animation in real time and prints the final frame.
    Hero {
        #[arg(long, default_value_t = 1000)]
        duration_ms: u64,
    },
    /// Copies the résumé into a local directory.
    Download {
        #[arg(long, default_value = "downloads")]
        dest: PathBuf,
    },
}

fn print_step(shell: &PageShell, now: Duration, started: &[RevealStarted]) {
    let labels: Vec<&str> = started
        .iter()
        .filter_map(|reveal| shell.label(reveal.element))
        .collect();
    println!(
        "t={}ms offset={} scrolled={} nav={:?} revealed=[{}]",
        now.as_millis(),
        shell.scroll_signal().offset(),
        shell.scrolled(),
        shell.nav_style(),
        labels.join(", ")
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings();
    let content = load_content(&settings)?;

    match cli.command {
        Command::Simulate {
            scroll,
            step_ms,
            anchor,
        } => {
            let mut shell = PageShell::mount(&content, &settings)?;
            info!(
                elements = shell.elements().len(),
                page_height = shell.page_height(),
                "simulating scroll session"
            );
            let step = Duration::from_millis(step_ms);
            let mut now = Duration::ZERO;
            for offset in scroll {
                now += step;
                shell.advance(now);
                let started = shell.scroll_to(offset, now);
                print_step(&shell, now, &started);
            }
            if let Some(anchor) = anchor {
                now += step;
                shell.advance(now);
                let started = shell
                    .scroll_to_anchor(&anchor, now)
                    .with_context(|| format!("unknown section anchor '{anchor}'"))?;
                print_step(&shell, now, &started);
            }
            println!(
                "pending={} hero={}",
                shell.reveal().pending(),
                serde_json::to_string(&shell.hero_frame())?
            );
            shell.teardown();
        }
        Command::Send {
            name,
            email,
            subject,
            message,
        } => {
            let endpoint = settings.relay_endpoint()?;
            info!(%endpoint, "submitting contact form");
            let form = FormSubmissionController::new(HttpMessageRelay::new(endpoint));
            let mut notifications = form.subscribe_notifications();

            form.set_field(FormField::Name, name).await;
            form.set_field(FormField::Email, email).await;
            if let Some(subject) = subject {
                form.set_field(FormField::Subject, subject).await;
            }
            form.set_field(FormField::Message, message).await;

            let outcome = form.submit().await;
            if let Ok(notification) = notifications.try_recv() {
                println!("{}: {}", notification.title, notification.description);
            }
            outcome.context("contact form was not delivered")?;
        }
        Command::Hero { duration_ms } => {
            let mut shell = PageShell::mount(&content, &settings)?;
            let driver = shell.start_frame_driver(settings.frame_interval());
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
            driver.stop();
            println!(
                "t={}ms frame={}",
                shell.clock().now().as_millis(),
                serde_json::to_string_pretty(&shell.hero_frame())?
            );
            shell.teardown();
        }
        Command::Download { dest } => {
            let shell = PageShell::mount(&content, &settings)?;
            shell
                .download_resume(dest.clone())
                .await
                .context("download task panicked")?;
            println!("download attempted into {}", dest.display());
        }
    }

    Ok(())
}
