use colored::Colorize;
use guideaudit::command_argument_builder;
use guideaudit::handlers::{handle_audit, handle_export, handle_guide_url, handle_scan};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    init_tracing(verbose, quiet);

    let result = match chosen_command.subcommand() {
        Some(("audit", primary_command)) => handle_audit(primary_command, quiet).await,
        Some(("scan", primary_command)) => handle_scan(primary_command, quiet),
        Some(("export", primary_command)) => handle_export(primary_command, quiet),
        Some(("guide-url", primary_command)) => handle_guide_url(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
