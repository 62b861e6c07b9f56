//! Onboard command handler: connect from an out-of-band payload.

use std::io::Read;

use skywalk_core::{Locator, OnboardingEnvelope};

use crate::cli::{GlobalOpts, OnboardArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

fn read_payload(arg: String) -> Result<String, CliError> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut payload = String::new();
    std::io::stdin().read_to_string(&mut payload)?;
    Ok(payload)
}

pub async fn handle(args: OnboardArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let payload = read_payload(args.payload)?;
    let envelope = OnboardingEnvelope::parse(&payload)?;

    let fallback = config::Fallback {
        server: Some(envelope.url.as_str()),
        username: envelope.username.as_deref(),
    };
    let resolved = config::resolve_with(global, fallback, envelope.password.is_none())?;
    let locator = Locator::new(resolved.locator.clone())?;
    locator.onboard(&envelope).await?;

    output::status(&format!("✓ Connected to {}", envelope.url), global.quiet);

    if let Some(site) = locator.site() {
        let receivers = locator.refresh_receivers().await?;
        let tags = locator.refresh_tags().await?;
        output::status(
            &format!(
                "  Site {}: {} receivers, {} tags",
                site.id(),
                receivers.len(),
                tags.len()
            ),
            global.quiet,
        );
    }

    if args.save {
        let mut cfg = config::load_config_or_default();
        let name = config::active_profile_name(global, &cfg);
        let profile = cfg.profiles.entry(name.clone()).or_default();

        profile.server = envelope.url.to_string();
        if let Some(username) = envelope.username.clone().or_else(|| global.username.clone()) {
            profile.username = Some(username);
        }
        if global.site.is_some() {
            profile.site = global.site;
        }
        if cfg.default_profile.is_none() {
            cfg.default_profile = Some(name.clone());
        }

        let path = config::save_config(&cfg)?;
        output::status(
            &format!("✓ Saved profile '{name}' to {}", path.display()),
            global.quiet,
        );
    }

    Ok(())
}
