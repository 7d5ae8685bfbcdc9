//! Jar updater CLI entrypoint.
//!
//! Parses arguments, initialises logging, and dispatches to the update
//! flows. Each failure class maps to its own exit code.

use clap::Parser;
use jar_updater::build::JavaBuildTools;
use jar_updater::cli::{Cli, Command};
use jar_updater::commands::{UpdateContext, report_status};
use jar_updater::download::UreqClient;
use jar_updater::error::Result;
use jar_updater::output::write_stderr_line;
use log::LevelFilter;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.quiet, cli.global.verbosity);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = cli.updater_config();
    let client = UreqClient::new(config.http_timeout);
    let context = UpdateContext {
        layout: &config.layout,
        client: &client,
        quiet: cli.global.quiet,
        dry_run: cli.global.dry_run,
    };

    match &cli.command {
        Command::Vanilla(args) => context.vanilla(&args.endpoints(), &config.selector, stderr),
        Command::Spigot(args) => {
            let runner = JavaBuildTools::new(args.java.clone(), args.build_timeout());
            context.spigot(&args.endpoints(), &runner, config.selector, stderr)
        }
        Command::Status => report_status(&config.layout, stderr),
    }
}

/// `RUST_LOG` overrides the level chosen from the flags.
fn init_logging(quiet: bool, verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(level_for(quiet, verbosity))
        .parse_default_env()
        .init();
}

const fn level_for(quiet: bool, verbosity: u8) -> LevelFilter {
    match (quiet, verbosity) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, _) => LevelFilter::Debug,
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            err.kind().exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jar_updater::checksum::ChecksumAlgorithm;
    use jar_updater::error::UpdaterError;
    use rstest::rstest;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error() {
        let err = UpdaterError::ChecksumMismatch {
            url: "https://example.test/server.jar".to_owned(),
            algorithm: ChecksumAlgorithm::Sha1,
            expected: "aa".to_owned(),
            actual: "bb".to_owned(),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 4);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.starts_with("error: downloaded file"));
    }

    #[rstest]
    #[case::quiet(true, 0, LevelFilter::Error)]
    #[case::default(false, 0, LevelFilter::Warn)]
    #[case::verbose(false, 1, LevelFilter::Info)]
    #[case::very_verbose(false, 3, LevelFilter::Debug)]
    fn log_level_follows_flags(
        #[case] quiet: bool,
        #[case] verbosity: u8,
        #[case] expected: LevelFilter,
    ) {
        assert_eq!(level_for(quiet, verbosity), expected);
    }
}
