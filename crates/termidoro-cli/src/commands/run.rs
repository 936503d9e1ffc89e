use std::io::Write;
use std::time::Duration;

use clap::Args;
use crossterm::cursor::Show;
use crossterm::execute;
use termidoro_core::render::LayoutMode;
use termidoro_core::templates::{self, Template};
use termidoro_core::timer::{parse_duration, DEFAULT_BREAK, DEFAULT_WORK};
use termidoro_core::{
    notifier_for, Config, CycleOrchestrator, IntervalClock, Ledger, OsInterrupts, Recap, Renderer,
    SessionSettings, TemplateError, TerminalSize, TerminalSurface,
};
use tracing::{debug, info};

const VALID_FORMATS: &str = "Valid formats:
  • 25m      (minutes)
  • 1h30m    (hours and minutes)
  • 30s      (seconds only)
  • 1h       (hours only)
  • 45       (bare number, minutes)";

/// Options for a timer run. Flags take precedence over positionals.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Work duration, e.g. 25m, 1h30m, 45
    #[arg(value_name = "WORK")]
    pub work_arg: Option<String>,
    /// Break duration, e.g. 5m, 30s
    #[arg(value_name = "BREAK")]
    pub break_arg: Option<String>,
    /// Name shown instead of WORK
    #[arg(value_name = "NAME")]
    pub name_arg: Option<String>,

    /// Work duration (e.g. 5m, 30m, 1h30m)
    #[arg(short = 'w', long = "work", value_name = "DURATION")]
    pub work: Option<String>,
    /// Break duration (e.g. 1m, 10m, 30s)
    #[arg(short = 'b', long = "break", value_name = "DURATION")]
    pub rest: Option<String>,
    /// Custom name for work intervals
    #[arg(short = 'n', long)]
    pub name: Option<String>,
    /// Use a preset template (deep-work, sprint, focus, study)
    #[arg(short = 't', long)]
    pub template: Option<String>,
    /// List available templates
    #[arg(short = 'T', long)]
    pub templates: bool,
    /// Auto-confirm prompts (for scripting)
    #[arg(short = 'y', long)]
    pub yes: bool,
    /// Disable desktop notifications
    #[arg(long)]
    pub no_sound: bool,
    /// Center the timer in the terminal
    #[arg(long)]
    pub centered: bool,
    /// Print the session recap as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything a run needs once arguments and config are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub settings: SessionSettings,
    pub layout: LayoutMode,
}

/// An explicit zero or empty value selects `default`.
fn explicit_duration(
    input: &str,
    flag: &str,
    default: Duration,
) -> Result<Duration, Box<dyn std::error::Error>> {
    match parse_duration(input) {
        Ok(parsed) => Ok(parsed.unwrap_or(default)),
        Err(e) => Err(format!("{e}\n\n{VALID_FORMATS}\n\nExample: --{flag} 25m").into()),
    }
}

fn template_error(e: &TemplateError) -> Box<dyn std::error::Error> {
    let TemplateError::Unknown { suggestion, .. } = e;
    let mut message = format!("{e}\n\n");
    if let Some(s) = suggestion {
        message.push_str(&format!("Did you mean '{s}'?\n\n"));
    }
    message.push_str(&templates::table());
    message.push_str("\nUse -T to list all templates.\nExample: termidoro -t focus");
    message.into()
}

/// Merge flags, positionals, template and config into a plan.
///
/// Precedence per value: flag, positional, template, config file.
pub fn resolve(args: &RunArgs, config: &Config) -> Result<RunPlan, Box<dyn std::error::Error>> {
    let template: Option<&Template> = match args.template.as_deref() {
        None => None,
        Some(name) => {
            if args.work_arg.is_some() || args.break_arg.is_some() || args.name_arg.is_some() {
                return Err("Cannot use positional arguments with --template\n\
                            Use -T to list available templates."
                    .into());
            }
            Some(templates::find(name).map_err(|e| template_error(&e))?)
        }
    };

    let work = match args.work.as_deref().or(args.work_arg.as_deref()) {
        Some(s) => Some(explicit_duration(s, "work", DEFAULT_WORK)?),
        None => template.map(|t| t.work).or(config.timer.work()),
    };
    let rest = match args.rest.as_deref().or(args.break_arg.as_deref()) {
        Some(s) => Some(explicit_duration(s, "break", DEFAULT_BREAK)?),
        None => template.map(|t| t.rest).or(config.timer.rest()),
    };

    let label = args
        .name
        .clone()
        .or_else(|| args.name_arg.clone())
        .or_else(|| template.map(|t| t.name.to_string()))
        .unwrap_or_else(|| config.ui.label.clone());

    let layout = if args.centered {
        LayoutMode::Centered
    } else {
        config.ui.layout
    };

    Ok(RunPlan {
        settings: SessionSettings {
            work,
            rest,
            label,
            auto_confirm: args.yes || config.timer.auto_confirm,
            sound_enabled: !args.no_sound && config.notifications.enabled,
        },
        layout,
    })
}

/// Shows the cursor when dropped, whatever happened to the session.
struct CursorGuard;

impl Drop for CursorGuard {
    fn drop(&mut self) {
        let mut out = std::io::stdout();
        let _ = execute!(out, Show);
        let _ = out.flush();
    }
}

async fn session(plan: RunPlan) -> Ledger {
    let notifier = notifier_for(plan.settings.sound_enabled);
    let clock = IntervalClock::new(Renderer::new(plan.layout.into()), TerminalSize, notifier);
    let input = tokio::io::BufReader::new(tokio::io::stdin());

    let mut orchestrator = CycleOrchestrator::new(
        TerminalSurface::stdout(),
        clock,
        input,
        OsInterrupts,
        plan.settings,
    );
    orchestrator.run().await;
    orchestrator.into_ledger()
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.templates {
        println!("{}", templates::table());
        println!("Usage: termidoro -t <template>");
        println!("Example: termidoro -t deep-work");
        return Ok(());
    }

    let config = Config::load_or_default();
    let plan = resolve(&args, &config)?;
    debug!(?plan, "run plan resolved");

    let ledger = {
        let _cursor = CursorGuard;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let ledger = runtime.block_on(session(plan));
        // A prompt may still be blocked on stdin; do not wait for it.
        runtime.shutdown_background();
        ledger
    };

    let recap = Recap::from_ledger(&ledger);
    if args.json {
        println!("{}", recap.to_json()?);
    } else {
        print!("{recap}");
    }
    info!(intervals = ledger.len(), "recap printed");
    Ok(())
}
