use commands::command_argument_builder;
use tracing_subscriber::EnvFilter;
use vizceral::handlers::{handle_fetch, handle_serve, handle_translate};

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(quiet);

    let result = match chosen_command.subcommand() {
        Some(("serve", primary_command)) => handle_serve(primary_command).await,
        Some(("fetch", primary_command)) => handle_fetch(primary_command, quiet).await,
        Some(("translate", primary_command)) => handle_translate(primary_command, quiet),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

// Logs go to stderr so graph JSON on stdout stays pipeable.
fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
