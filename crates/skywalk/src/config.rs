//! CLI configuration: thin wrapper around `skywalk_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--server,
//! --site, --username, ...) and obtains the password from the flag, the
//! environment, or an interactive prompt.

use std::io::IsTerminal;
use std::time::Duration;

use secrecy::SecretString;

use skywalk_core::LocatorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use skywalk_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

/// Values to use when neither the flags nor the profile supply them.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fallback<'a> {
    pub server: Option<&'a str>,
    pub username: Option<&'a str>,
}

/// Everything a server-bound command needs from configuration.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub locator: LocatorConfig,
    pub beacon_name: Option<String>,
    pub poll_interval: Duration,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build the effective configuration from the config file, the active
/// profile, and CLI overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    resolve_with(global, Fallback::default(), true)
}

/// As [`resolve`], with a server and username to fall back on when
/// neither the flags nor the profile name one, and control over the
/// password prompt.
pub fn resolve_with(
    global: &GlobalOpts,
    fallback: Fallback<'_>,
    prompt: bool,
) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() && fallback.server.is_none() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    // 1. Server (flag > env > profile > fallback)
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if profile.server.is_empty() {
        match fallback.server {
            Some(server) => server.clone_into(&mut profile.server),
            None => {
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            }
        }
    }

    // 2. Site, user, TLS, timeout
    if global.site.is_some() {
        profile.site = global.site;
    }
    if global.username.is_some() {
        profile.username.clone_from(&global.username);
    }
    if profile.username.is_none() {
        profile.username = fallback.username.map(str::to_owned);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }

    // 3. Password (flag / env > prompt)
    let password = resolve_password(global, profile.username.as_deref(), prompt)?;

    let locator = skywalk_config::profile_to_locator_config(&profile, &cfg.defaults, password)?;

    Ok(Resolved {
        poll_interval: skywalk_config::poll_interval(&profile, &cfg.defaults),
        beacon_name: profile.beacon_name.clone(),
        profile_name,
        locator,
    })
}

/// Password from `--password` / `SKYWALK_PASSWORD`, else an interactive
/// prompt when a username is known and stdin is a terminal.
fn resolve_password(
    global: &GlobalOpts,
    username: Option<&str>,
    prompt: bool,
) -> Result<Option<SecretString>, CliError> {
    if let Some(ref password) = global.password {
        return Ok(Some(SecretString::from(password.clone())));
    }

    let Some(username) = username else {
        return Ok(None);
    };
    if !prompt || !std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let password = rpassword::prompt_password(format!("Password for {username}: "))?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(Some(SecretString::from(password)))
}
