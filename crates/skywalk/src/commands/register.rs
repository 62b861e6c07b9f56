//! Beacon registration command handler.

use skywalk_core::BeaconIdentity;

use crate::cli::{GlobalOpts, RegisterArgs};
use crate::commands::{Context, util};
use crate::error::CliError;
use crate::output;

fn detail(beacon: &BeaconIdentity) -> String {
    format!(
        "UUID:  {}\nMajor: {}\nMinor: {}",
        beacon.namespace.hyphenated().to_string().to_uppercase(),
        beacon.major,
        beacon.minor
    )
}

pub async fn handle(
    ctx: &Context,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // --name > profile beacon_name > username
    let name = args
        .name
        .or_else(|| ctx.resolved.beacon_name.clone())
        .or_else(|| {
            ctx.locator
                .config()
                .credentials
                .as_ref()
                .map(|c| c.username.clone())
        })
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| CliError::Validation {
            field: "name".into(),
            reason: "pass --name or set beacon_name in the profile".into(),
        })?;

    util::require_site(ctx)?;
    util::login(ctx).await?;

    let beacon = ctx.locator.register_beacon(&name).await?;
    let out = output::render_single(&global.output, &beacon, detail, |b| {
        format!("{} {} {}", b.namespace, b.major, b.minor)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
