use crate::CLAP_STYLING;
use clap::{arg, command};
use linkmine::handlers::{DEFAULT_DATA_DIR, DEFAULT_PAGE_URL, DEFAULT_RECORD_FILE, DEFAULT_SELECTOR};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkmine")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkmine")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("extract")
                .about(
                    "Fetch a page, group its links by anchor text and append the derived \
                keywords to the record store.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The page to analyse")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_PAGE_URL)
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of page URLs to analyse")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-s --"selector" <CSS>)
                        .required(false)
                        .help("CSS selector for the links to harvest")
                        .default_value(DEFAULT_SELECTOR),
                )
                .arg(
                    arg!(-d --"data-dir" <PATH>)
                        .required(false)
                        .help("Directory holding the record store")
                        .default_value(DEFAULT_DATA_DIR),
                )
                .arg(
                    arg!(-o --"output" <FILE>)
                        .required(false)
                        .help("Record store file name inside the data directory")
                        .default_value(DEFAULT_RECORD_FILE),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"user-agent" <AGENT>)
                        .required(false)
                        .help("User agent sent with page requests"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Summary format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"dry-run")
                        .required(false)
                        .help("Extract and display keywords without writing the record store")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("show")
                .about("Print the records held in a record store")
                .arg(
                    arg!([FILE])
                        .required(false)
                        .help("Record store to read (default: data/keywords.csv)"),
                ),
        )
}
