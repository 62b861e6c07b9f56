//! Login command handler.

use crate::cli::GlobalOpts;
use crate::commands::{Context, util};
use crate::error::CliError;
use crate::output;

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    util::login(ctx).await?;

    let config = ctx.locator.config();
    let username = config
        .credentials
        .as_ref()
        .map_or("?", |c| c.username.as_str());
    output::status(
        &format!("✓ Authenticated as {username} at {}", config.server),
        global.quiet,
    );
    Ok(())
}
