//! Command dispatch: bridges CLI args -> `Locator` calls -> output formatting.

pub mod config_cmd;
pub mod locate;
pub mod login;
pub mod onboard;
pub mod receivers;
pub mod register;
pub mod tags;
pub mod track;
pub mod util;

use skywalk_core::Locator;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// A locator plus the configuration it was built from.
pub struct Context {
    pub locator: Locator,
    pub resolved: Resolved,
}

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login => login::handle(ctx, global).await,
        Command::Receivers => receivers::handle(ctx, global).await,
        Command::Tags(args) => tags::handle(ctx, args, global).await,
        Command::Register(args) => register::handle(ctx, args, global).await,
        Command::Locate(args) => locate::handle(ctx, args, global).await,
        Command::Track(args) => track::handle(ctx, args, global).await,
        // Config, Completions, and Onboard are handled before dispatch
        Command::Config(_) | Command::Completions(_) | Command::Onboard(_) => {
            Err(CliError::Validation {
                field: "command".into(),
                reason: "not a server command".into(),
            })
        }
    }
}
