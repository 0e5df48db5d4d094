use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use gem_version_check::cli::Cli;
use gem_version_check::logging;
use gem_version_check::report::Formatter;
use gem_version_check::runner;
use gem_version_check::source::LockfileFetcher;
use gem_version_check::version::registries::RubyGemsRegistry;

/// Exit status when a dependency is invalid or not found
const EXIT_CHECK_FAILED: u8 = 1;
/// Exit status when the check could not run
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose, cli.log_file.as_deref());

    match execute(&cli) {
        Ok(true) => ExitCode::from(EXIT_CHECK_FAILED),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Returns whether any project failed its check
fn execute(cli: &Cli) -> anyhow::Result<bool> {
    let config = cli.apply(cli.load_config()?);
    let registry = Arc::new(RubyGemsRegistry::new(&config.registry_url));
    let fetcher = LockfileFetcher::new(&config.github_raw_url);

    let projects = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(runner::run(&config, registry, &fetcher))?;

    let output = config.output_format.formatter().format(&projects);
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }

    Ok(projects.iter().any(|project| project.check_failed()))
}
