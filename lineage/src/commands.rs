use crate::CLAP_STYLING;
use clap::{arg, command};
use lineage_scanner::fetcher::DEFAULT_BASE_URL;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("lineage")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("lineage")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log progress of the trace to stderr").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("trace")
                .about(
                    "Trace the ancestors of a memorial record and write the family graph \
                as JSON.",
                )
                .arg(
                    arg!(-i --"id" <ID>)
                        .required(false)
                        .help("Memorial id or URL to start from (prompted for if omitted)"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("File to write the JSON document to (prompted for if omitted)"),
                )
                .arg(
                    arg!(--"base-url" <URL>)
                        .required(false)
                        .help("Base URL that record ids are appended to")
                        .default_value(DEFAULT_BASE_URL),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("60"),
                )
                .arg(
                    arg!(--"max-depth" <GENERATIONS>)
                        .required(false)
                        .help("Stop after this many generations above the starting record")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"max-records" <COUNT>)
                        .required(false)
                        .help("Stop after this many records have been found")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: json (summary only) or text (summary and pedigree)")
                        .value_parser(["json", "text"])
                        .default_value("json"),
                )
                .arg(
                    arg!(--"compact")
                        .required(false)
                        .help("Write single-line JSON instead of pretty-printed")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"no-progress")
                        .required(false)
                        .help("Disable the progress spinner")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
