//! Receiver (rdhub) command handler.

use tabled::Tabled;

use skywalk_core::Receiver;

use crate::cli::GlobalOpts;
use crate::commands::{Context, util};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReceiverRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "X")]
    x: f64,
    #[tabled(rename = "Y")]
    y: f64,
    #[tabled(rename = "Level")]
    level: i64,
}

impl From<&Receiver> for ReceiverRow {
    fn from(r: &Receiver) -> Self {
        Self {
            id: r.id,
            x: r.x,
            y: r.y,
            level: r.level,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_site(ctx)?;
    util::login(ctx).await?;

    let receivers = ctx.locator.refresh_receivers().await?;
    let out = output::render_list(
        &global.output,
        receivers.as_slice(),
        |r| ReceiverRow::from(r),
        |r| r.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
