//! Tag command handler.

use tabled::Tabled;

use skywalk_core::Tag;

use crate::cli::{GlobalOpts, TagsArgs};
use crate::commands::{Context, util};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Tag> for TagRow {
    fn from(t: &Tag) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: TagsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let site = util::require_site(ctx)?;
    util::login(ctx).await?;

    let available = ctx.locator.refresh_tags().await?;
    let tags = if args.all {
        site.all_tags().unwrap_or_default()
    } else {
        available
    };

    let out = output::render_list(
        &global.output,
        &tags,
        |t| TagRow::from(t),
        |t| t.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
