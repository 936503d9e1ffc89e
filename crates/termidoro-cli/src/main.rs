use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "termidoro",
    version,
    about = "Terminal pomodoro timer",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: commands::run::RunArgs,

    /// Log level for the log file (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.log_level.as_deref()) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let result = match cli.command {
        Some(Commands::Config { action }) => commands::config::run(action),
        None => commands::run::run(cli.run),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
