//! CLI entrypoint: resolve the pull request, trigger the audit, report.
//!
//! Exit codes: 1 for usage errors and for a failed remote invocation; 0 on
//! success and when no pull request context can be resolved, since non-PR
//! builds are an expected state that must not fail the CI job.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use lighthouse_gate::{
    CliArgs, Environment, GateConfig, OctocrabLookup, RunInvoker, RunOutcome,
    resolve_pull_request,
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(error) => {
            // Covers --help as well: usage output always exits non-zero.
            let _ignored = write!(io::stderr().lock(), "{error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = args.validate() {
        let mut stderr = io::stderr().lock();
        let _ignored = writeln!(stderr, "{error}");
        let _usage = writeln!(stderr, "{}", CliArgs::command().render_usage());
        return ExitCode::FAILURE;
    }

    let env = Environment::capture();
    run(&args, &env).await
}

async fn run(args: &CliArgs, env: &Environment) -> ExitCode {
    let lookup = match OctocrabLookup::public() {
        Ok(lookup) => lookup,
        Err(error) => return skip_run(&error.to_string()),
    };

    let resolved = match resolve_pull_request(env, &lookup, Path::new(".")).await {
        Ok(resolved) => resolved,
        Err(error) => return skip_run(&error.to_string()),
    };

    let config = GateConfig::new(args, resolved.pr, resolved.repo);
    let invoker = RunInvoker::new(env.ci_host.clone(), env.api_key.clone());

    match invoker.trigger(&config).await {
        Ok(outcome) => report_outcome(&outcome),
        Err(error) => {
            let _ignored = writeln!(io::stderr().lock(), "{error}");
            ExitCode::FAILURE
        }
    }
}

/// Missing PR context is expected for non-PR builds: log and exit cleanly
/// so the CI job itself does not fail.
fn skip_run(message: &str) -> ExitCode {
    let _ignored = writeln!(
        io::stderr().lock(),
        "could not resolve a pull request context ({message}); nothing to do"
    );
    ExitCode::SUCCESS
}

fn report_outcome(outcome: &RunOutcome) -> ExitCode {
    let _ignored = writeln!(io::stdout().lock(), "{outcome}");
    ExitCode::SUCCESS
}
