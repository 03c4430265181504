use std::process::ExitCode;

use sift_tui::headless::{filter_report, report_json};
use sift_tui::runtime;
use sift_tui::FsLineSource;

const USAGE: &str = "usage: sift-tui [--filter <query>] <path>";

enum Invocation {
    Interactive { path: String },
    Headless { query: String, path: String },
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    match args {
        [path] => Ok(Invocation::Interactive { path: path.clone() }),
        [flag, query, path] if flag == "--filter" => Ok(Invocation::Headless {
            query: query.clone(),
            path: path.clone(),
        }),
        _ => Err(USAGE.to_owned()),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(usage) => {
            eprintln!("{usage}");
            return ExitCode::from(2);
        }
    };

    let outcome = match invocation {
        Invocation::Interactive { path } => runtime::run(&path),
        Invocation::Headless { query, path } => filter_report(&FsLineSource, &path, &query)
            .and_then(|report| report_json(&report))
            .map(|json| println!("{json}")),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sift-tui: {err}");
            ExitCode::FAILURE
        }
    }
}
