use anyhow::Context;
use clap::Parser;
use meeting_client::{ClientConfig, MeetingHost, SocketBackend};
use meeting_core::types::{StepState, StepStatus};
use meeting_core::{MeetingEvent, SessionStore};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Follow a meeting-room discussion from the terminal
#[derive(Debug, Parser)]
#[command(name = "meeting-watch", version)]
struct Args {
    /// Symbol to discuss, e.g. US:AAPL
    #[arg(short, long)]
    symbol: String,

    /// Question for the panel
    #[arg(short, long)]
    query: String,

    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Clear the server-side transcript before asking
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::load(args.config.as_deref()).context("loading configuration")?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let backend = SocketBackend::new(&config, tx).context("building meeting backend")?;
    let mut host = MeetingHost::new(backend, config.user_name.clone());

    host.switch_symbol(&args.symbol);
    if args.clear {
        host.clear_history().await.context("clearing history")?;
    }
    host.submit(&args.query).await.context("starting meeting")?;

    let mut printed = 0;
    host.pump(&mut rx, |event, store| {
        printed = print_new_messages(store, printed);
        print_event(event, store);
    })
    .await;

    let dropped = host.store().dropped();
    if dropped.total() > 0 {
        tracing::warn!(
            unknown = dropped.unknown_events,
            orphaned = dropped.orphaned_steps,
            "some events could not be applied"
        );
    }

    Ok(())
}

fn print_new_messages(store: &SessionStore, printed: usize) -> usize {
    let messages = &store.state().messages;
    for message in messages.iter().skip(printed) {
        println!("\n[{}] {}", message.agent_name, message.content);
    }
    messages.len()
}

fn print_event(event: &MeetingEvent, store: &SessionStore) {
    let state = store.state();
    match event {
        MeetingEvent::Status(_) | MeetingEvent::Error(_) | MeetingEvent::Finished(_) => {
            println!("-- {}", state.current_status);
        }
        MeetingEvent::PlanGenerated(plan) => {
            println!("\n== Plan #{}: {}", plan.plan_id, plan.objective);
            if let Some(requester) = &plan.requester {
                println!("   requested by {}", requester);
            }
            for step in state.steps_for_plan(plan.plan_id) {
                println!("   {}", describe_step(step));
            }
        }
        MeetingEvent::ToolStart(_) | MeetingEvent::ToolComplete(_) | MeetingEvent::ToolError(_) => {
            if let Some(step) = event.step_id().and_then(|id| state.step(id)) {
                println!("   {}", describe_step(step));
            }
        }
        MeetingEvent::Report(report) => {
            println!("\n== {}\n{}\n\n{}", report.title, report.thesis, report.conclusion);
        }
        _ => {}
    }
}

fn describe_step(step: &StepState) -> String {
    let marker = match step.status {
        StepStatus::Pending => "[ ]",
        StepStatus::Running => "[~]",
        StepStatus::Completed => "[x]",
        StepStatus::Error => "[!]",
    };
    let mut line = format!("{} {} ({})", marker, step.spec.step_id, step.spec.tool_name);
    if let Some(quality) = &step.quality {
        line.push_str(&format!(" quality={}", quality.as_str()));
    }
    if let Some(error) = &step.error {
        line.push_str(&format!(" error={}", error));
    }
    line
}
