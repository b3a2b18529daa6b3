//! Command dispatch and handlers.

pub mod check;
pub mod resolve;

use crate::cli::Command;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler with live adapters.
///
/// Returns the process exit status the command chose.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<u8, String> {
    let ctx = ServiceContext::live();
    dispatch_with_context(command, &ctx)
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<u8, String> {
    match command {
        Command::Check(args) => check::run(ctx, args),
        Command::Resolve { names, aliases, config } => {
            resolve::run(ctx, names, aliases.as_deref(), config.as_deref())
        }
    }
}
