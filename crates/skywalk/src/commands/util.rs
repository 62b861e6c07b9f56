//! Shared helpers for command handlers.

use std::sync::Arc;

use skywalk_core::{CoreError, NotFound, Site};

use crate::commands::Context;
use crate::error::CliError;

/// The selected site, or a usage error before anything touches the network.
pub fn require_site(ctx: &Context) -> Result<Arc<Site>, CliError> {
    ctx.locator.site().ok_or(CliError::NoSite)
}

/// Authenticate with the resolved credentials.
pub async fn login(ctx: &Context) -> Result<(), CliError> {
    let profile = &ctx.resolved.profile_name;
    let credentials = ctx
        .locator
        .config()
        .credentials
        .as_ref()
        .ok_or_else(|| CliError::NoCredentials {
            target: format!("profile '{profile}'"),
        })?;

    ctx.locator
        .login(credentials)
        .await
        .map_err(|e| match e {
            CoreError::InvalidCredentials => CliError::AuthFailed {
                profile: profile.clone(),
            },
            other => other.into(),
        })
}

/// A position that could not be placed on the loaded topology.
pub fn unresolved(reason: NotFound) -> CliError {
    let identifier = match reason {
        NotFound::UnknownReceiver { receiver_id } => receiver_id.to_string(),
        NotFound::TopologyNotLoaded => "(topology not loaded)".into(),
    };
    CliError::NotFound {
        resource_type: "receiver".into(),
        identifier,
        list_command: "receivers".into(),
    }
}
