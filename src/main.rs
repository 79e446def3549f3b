mod cli;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let filter_level = if verbose { Level::DEBUG } else { Level::INFO };

    // stderr keeps stdout free for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(filter_level.into()))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::time())
        .init();
}

fn main() {
    match cli::Cli::try_parse() {
        Ok(cli) => {
            init_logging(cli.verbose);

            tracing::debug!("Verbose mode enabled");
            tracing::debug!("Starting minimem v{}", env!("CARGO_PKG_VERSION"));

            if let Err(e) = cli::run(cli) {
                eprintln!("error: {:#}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            use clap::error::ErrorKind;

            match e.kind() {
                ErrorKind::DisplayVersion | ErrorKind::DisplayHelp => {
                    e.print().ok();
                    std::process::exit(0);
                }
                ErrorKind::InvalidSubcommand => {
                    let error_message = e.to_string();
                    let cmd = extract_command_from_error(&error_message);
                    eprintln!("error: unknown command: {}", cmd);
                    eprintln!("\nValid commands are: version, config, simulate, help");
                    std::process::exit(1);
                }
                _ => {
                    e.print().ok();
                    std::process::exit(2);
                }
            }
        }
    }
}

/// Pulls the quoted command name out of clap's "unrecognized subcommand 'x'" message
fn extract_command_from_error(error_msg: &str) -> String {
    if let Some(start) = error_msg.find('\'') {
        if let Some(end) = error_msg[start + 1..].find('\'') {
            return error_msg[start + 1..start + 1 + end].to_string();
        }
    }
    "unknown".to_string()
}
