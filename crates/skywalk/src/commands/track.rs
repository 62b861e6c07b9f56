//! Track command handler: poll tag positions until interrupted.

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use skywalk_core::{CoreError, ErrorKind, Fix, TagId};

use crate::cli::{GlobalOpts, TrackArgs};
use crate::commands::{Context, locate, util};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Sample<'a> {
    time: DateTime<Local>,
    tag: TagId,
    name: &'a str,
    #[serde(flatten)]
    fix: Fix,
}

fn line(sample: &Sample<'_>) -> String {
    format!(
        "{}  {} ({})  {}",
        sample.time.format("%H:%M:%S"),
        sample.name,
        sample.tag,
        locate::describe(&sample.fix)
    )
}

fn plain(sample: &Sample<'_>) -> String {
    let receiver = match sample.fix {
        Fix::Located(p) => p.receiver_id.to_string(),
        _ => "-".into(),
    };
    format!("{}\t{}\t{receiver}", sample.time.to_rfc3339(), sample.tag)
}

/// Errors that end tracking; everything else is logged and retried next round.
fn is_fatal(err: &CoreError) -> bool {
    matches!(
        err.kind(),
        Some(ErrorKind::InvalidCredentials | ErrorKind::NoTokenSet) | None
    )
}

/// Count a finished round; `true` once `limit` rounds have run.
fn advance(rounds: u32, limit: Option<u32>) -> (u32, bool) {
    let rounds = rounds.saturating_add(1);
    (rounds, limit.is_some_and(|limit| rounds >= limit))
}

pub async fn handle(ctx: &Context, args: TrackArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let site = util::require_site(ctx)?;
    util::login(ctx).await?;
    ctx.locator.refresh_receivers().await?;
    ctx.locator.refresh_tags().await?;

    let tags = site.tags_matching(&args.tags);
    for id in &args.tags {
        if !tags.iter().any(|t| t.id == *id) {
            warn!(tag = id, "tag not in the site catalog, skipping");
        }
    }
    if tags.is_empty() {
        return Err(CliError::NotFound {
            resource_type: "tag".into(),
            identifier: args
                .tags
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            list_command: "tags".into(),
        });
    }

    let interval = args.interval.unwrap_or(ctx.resolved.poll_interval);
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    output::status(
        &format!(
            "Tracking {} tag(s) every {}; Ctrl-C to stop",
            tags.len(),
            humantime::format_duration(interval)
        ),
        global.quiet,
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rounds: u32 = 0;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        for tag in &tags {
            match ctx.locator.locate_or_reload(tag.id).await {
                Ok(fix) => {
                    let sample = Sample {
                        time: Local::now(),
                        tag: tag.id,
                        name: &tag.name,
                        fix,
                    };
                    let out = output::render_single(&global.output, &sample, line, plain);
                    output::print_output(&out, global.quiet);
                }
                Err(e) if is_fatal(&e) => return Err(e.into()),
                Err(e) => warn!(tag = tag.id, error = %e, "position poll failed"),
            }
        }

        let (next, done) = advance(rounds, args.count);
        rounds = next;
        if done {
            break;
        }
    }

    debug!(rounds, "tracking stopped");
    Ok(())
}
