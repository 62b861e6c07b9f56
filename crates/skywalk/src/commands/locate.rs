//! Locate command handler.

use serde::Serialize;

use skywalk_core::{Fix, NotFound, TagId};

use crate::cli::{GlobalOpts, LocateArgs};
use crate::commands::{Context, util};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Located {
    tag: TagId,
    #[serde(flatten)]
    fix: Fix,
}

/// One-line human description of a fix.
pub fn describe(fix: &Fix) -> String {
    match fix {
        Fix::Located(p) => format!(
            "near receiver {} at ({}, {}), level {}",
            p.receiver_id, p.x, p.y, p.level
        ),
        Fix::Pending => "no position reported yet".into(),
        Fix::Unresolved(NotFound::UnknownReceiver { receiver_id }) => {
            format!("near receiver {receiver_id}, which is not in the site topology")
        }
        Fix::Unresolved(NotFound::TopologyNotLoaded) => "receiver topology not loaded".into(),
    }
}

fn detail(located: &Located) -> String {
    match located.fix {
        Fix::Located(p) => format!(
            "Tag:      {}\nReceiver: {}\nPosition: ({}, {})\nLevel:    {}",
            located.tag, p.receiver_id, p.x, p.y, p.level
        ),
        ref other => format!("Tag {}: {}", located.tag, describe(other)),
    }
}

fn plain(located: &Located) -> String {
    match located.fix {
        Fix::Located(p) => format!("{} {} {}", p.x, p.y, p.level),
        _ => "pending".into(),
    }
}

pub async fn handle(ctx: &Context, args: LocateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_site(ctx)?;
    util::login(ctx).await?;
    ctx.locator.refresh_receivers().await?;

    let fix = ctx.locator.locate_or_reload(args.tag).await?;
    if let Fix::Unresolved(reason) = fix {
        return Err(util::unresolved(reason));
    }

    let located = Located { tag: args.tag, fix };
    let out = output::render_single(&global.output, &located, detail, plain);
    output::print_output(&out, global.quiet);
    Ok(())
}
