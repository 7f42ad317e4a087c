use clap::{Arg, ArgAction, Command};
use std::io::Read;
use std::process;
use textpress_api::dispatch::{
    self, DEFAULT_SIZE_THRESHOLD_BYTES, DispatchOptions, ExecutionContext, Operation, TextKind,
    TransformRequest,
};
use textpress_api::stats::{StatsReport, format_bytes};

fn main() {
    let matches = Command::new("textpress-cli")
        .version("0.1.0")
        .about("Compressor, formatter and validator for JSON and JavaScript text")
        .arg(
            Arg::new("operation")
                .help("Operation to run: compress, format, minify or validate")
                .required(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("file")
                .help("Input file; reads stdin when omitted")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("kind")
                .long("kind")
                .default_value("json")
                .help("Input kind: json or js"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Print before/after statistics as JSON on stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .value_parser(clap::value_parser!(usize))
                .help("Offload threshold in bytes"),
        )
        .get_matches();

    let operation = parse_or_exit::<Operation>(
        matches
            .get_one::<String>("operation")
            .map(String::as_str)
            .unwrap_or_default(),
    );
    let kind = parse_or_exit::<TextKind>(
        matches
            .get_one::<String>("kind")
            .map(String::as_str)
            .unwrap_or("json"),
    );

    let text = read_input(matches.get_one::<String>("file"));

    let options = DispatchOptions {
        size_threshold_bytes: matches
            .get_one::<usize>("threshold")
            .copied()
            .unwrap_or(DEFAULT_SIZE_THRESHOLD_BYTES),
    };

    let context = match ExecutionContext::with_options(options) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("{}", textpress_api::format_error_as_json(&e, false));
            process::exit(1);
        }
    };

    let request = TransformRequest {
        text,
        kind,
        operation,
    };
    let result = dispatch::run(&context, &request);

    if matches.get_flag("stats") {
        if let Some(output) = &result.output {
            let report = match kind {
                TextKind::JavaScript => {
                    StatsReport::compute_with_lines(&request.text, output, result.elapsed_ms)
                }
                TextKind::Json => StatsReport::compute(&request.text, output, result.elapsed_ms),
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => eprintln!("{}", json),
                Err(e) => eprintln!("Error serializing statistics: {}", e),
            }
            eprintln!(
                "{} -> {}",
                format_bytes(report.original_bytes),
                format_bytes(report.processed_bytes)
            );
        }
    }

    let success = result.success;
    match (result.output, result.error) {
        (Some(output), _) => println!("{}", output),
        (None, Some(error)) => eprintln!("{}", error),
        (None, None) => {}
    }

    context.release();

    if !success {
        process::exit(1);
    }
}

fn parse_or_exit<T>(value: &str) -> T
where
    T: std::str::FromStr<Err = textpress_api::TransformError>,
{
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", textpress_api::format_error_as_json(&e, false));
            process::exit(1);
        }
    }
}

fn read_input(path: Option<&String>) -> String {
    match path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    }
}
