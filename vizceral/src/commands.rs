use crate::CLAP_STYLING;
use clap::{arg, command};
use std::net::SocketAddr;
use std::path::PathBuf;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("vizceral")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("vizceral")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Only log warnings and suppress the summary").required(false))
        .subcommand_required(true)
        .subcommand(
            command!("serve")
                .about("Serve Zipkin dependencies as Vizceral graphs over HTTP (GET /data, /graph)")
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Address to listen on")
                        .value_parser(clap::value_parser!(SocketAddr))
                        .default_value("0.0.0.0:8080"),
                )
                .arg(timeout_arg())
                .arg(sum_duplicates_arg()),
        )
        .subcommand(
            command!("fetch")
                .about("Fetch dependencies from a Zipkin server once and print the Vizceral graph")
                .arg(
                    arg!(-s --"server" <SERVER>)
                        .required(true)
                        .help("Zipkin server as host:port or a base URL"),
                )
                .arg(
                    arg!(-m --"minutes" <MINUTES>)
                        .required(false)
                        .help("Lookback window in minutes")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("60"),
                )
                .arg(
                    arg!(-u --"until" <EPOCH_MS>)
                        .required(false)
                        .help("End of the window in epoch milliseconds (default: now)")
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(timeout_arg())
                .args(output_args()),
        )
        .subcommand(
            command!("translate")
                .about("Translate a saved Zipkin dependencies JSON file")
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(true)
                        .help("Path to a JSON array of Zipkin dependency links")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .args(output_args()),
        )
}

fn timeout_arg() -> clap::Arg {
    arg!(-t --"timeout" <SECONDS>)
        .required(false)
        .help("Zipkin request timeout in seconds")
        .value_parser(clap::value_parser!(u64))
        .default_value("10")
}

fn sum_duplicates_arg() -> clap::Arg {
    arg!(--"sum-duplicates")
        .required(false)
        .help("Add the counts of repeated parent/child links instead of keeping the last one")
        .action(clap::ArgAction::SetTrue)
}

fn output_args() -> Vec<clap::Arg> {
    vec![
        arg!(--"global")
            .required(false)
            .help("Emit the whole global node instead of only the api region")
            .action(clap::ArgAction::SetTrue),
        arg!(--"pretty")
            .required(false)
            .help("Pretty-print the JSON output")
            .action(clap::ArgAction::SetTrue),
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("Write the graph to a file (default: stdout)")
            .value_parser(clap::value_parser!(PathBuf)),
        sum_duplicates_arg(),
    ]
}
