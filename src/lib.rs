//! Task alignment reconciliation.
//!
//! Checks a free-text task description against four sources of truth
//! (architecture blueprint, codebase, roadmap, requirements) and against the
//! agreement of those sources with each other. Every check yields typed
//! [`model::Finding`]s; the worst check decides the overall [`model::Status`].
//!
//! ```no_run
//! use taskalign::alias::AliasResolver;
//! use taskalign::bundle::ContextBundles;
//! use taskalign::engine::Engine;
//! use taskalign::matcher::ExactMatcher;
//!
//! let aliases = AliasResolver::default();
//! let engine = Engine::new(&aliases, &ExactMatcher);
//! let report = engine.check("Add Flashpoint Detector", &ContextBundles::default())?;
//! println!("{}", report.overall_status());
//! # Ok::<(), taskalign::error::AlignError>(())
//! ```

pub mod adapters;
pub mod alias;
pub mod bundle;
pub mod cli;
pub mod coherence;
pub mod commands;
pub mod compare;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod model;
pub mod ports;
pub mod render;
pub mod telemetry;

#[cfg(test)]
mod testing;

use clap::error::ErrorKind;
use clap::Parser;

/// Exit status for failures that prevent a verdict.
pub const EXIT_ERROR: u8 = 3;

/// Run the CLI with the provided arguments.
///
/// Returns the exit status chosen by the command.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<u8, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(0);
        }
        Err(err) => return Err(err.to_string()),
    };
    telemetry::init_tracing(cli.log_json, telemetry::default_level(cli.verbose));
    commands::dispatch(&cli.command)
}
