//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use skywalk_config::ConfigError;
use skywalk_core::{CoreError, OnboardingError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const SERVER: i32 = 9;
    pub const FORMAT: i32 = 10;
    pub const CONFIG: i32 = 11;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to server at {url}")]
    #[diagnostic(
        code(skywalk::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try: skywalk login --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(skywalk::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(skywalk::auth_failed),
        help(
            "The server rejected the username or password for profile '{profile}'.\n\
             Pass --password or set SKYWALK_PASSWORD to retry."
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials available for {target}")]
    #[diagnostic(
        code(skywalk::no_credentials),
        help(
            "Give a username with --username (or `username` in the profile) and\n\
             a password with --password or SKYWALK_PASSWORD."
        )
    )]
    NoCredentials { target: String },

    #[error("Not logged in")]
    #[diagnostic(code(skywalk::not_authenticated))]
    NotAuthenticated,

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(skywalk::not_found),
        help("Run: skywalk {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("No site selected")]
    #[diagnostic(
        code(skywalk::no_site),
        help("Pass --site <ID> or set `site` in your profile.")
    )]
    NoSite,

    // ── Server ───────────────────────────────────────────────────────

    #[error("Server error: {message}")]
    #[diagnostic(code(skywalk::server_error))]
    ServerError { message: String },

    #[error("Unexpected server response: {message}")]
    #[diagnostic(code(skywalk::unexpected_response))]
    UnexpectedResponse { message: String },

    #[error("Malformed server response: {message}")]
    #[diagnostic(
        code(skywalk::invalid_response),
        help("The server answered, but not in the expected format. Is --server pointing at a location server?")
    )]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(skywalk::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(skywalk::onboarding),
        help(
            "Expected a JSON object such as\n\
             {{\"scheme\": \"xtremeloc\", \"url\": \"https://rtls.example.com\", \"username\": \"...\"}}"
        )
    )]
    Onboarding(#[from] OnboardingError),

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(skywalk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: skywalk config init --server <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(skywalk::no_config),
        help(
            "Pass --server <URL>, or create a profile with: skywalk config init --server <URL>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(skywalk::config))]
    Config(#[from] ConfigError),

    #[error("Cannot set up the HTTP client: {message}")]
    #[diagnostic(
        code(skywalk::client_setup),
        help("Check the profile's ca_cert path and TLS settings")
    )]
    ClientSetup { message: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::NotAuthenticated => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ServerError { .. } => exit_code::SERVER,
            Self::InvalidResponse { .. } => exit_code::FORMAT,
            Self::Validation { .. } | Self::Onboarding(_) | Self::NoSite => exit_code::USAGE,
            Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Config(_)
            | Self::ClientSetup { .. } => exit_code::CONFIG,
            Self::UnexpectedResponse { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Connectivity {
                url,
                timed_out: true,
                ..
            } => CliError::Timeout { url },

            CoreError::Connectivity { url, reason, .. } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::InvalidCredentials => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::MissingCredentials { server } => CliError::NoCredentials { target: server },

            CoreError::NoTokenSet => CliError::NotAuthenticated,

            CoreError::Server { message } => CliError::ServerError { message },

            CoreError::Unknown { message, .. } => CliError::UnexpectedResponse { message },

            CoreError::InvalidResponseFormat { message } => CliError::InvalidResponse { message },

            CoreError::NoSiteSelected => CliError::NoSite,

            CoreError::Onboarding(e) => CliError::Onboarding(e),

            CoreError::Config { message } => CliError::ClientSetup { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::Connectivity {
                    url: "http://x".into(),
                    reason: "refused".into(),
                    timed_out: false,
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::Connectivity {
                    url: "http://x".into(),
                    reason: "slow".into(),
                    timed_out: true,
                },
                exit_code::TIMEOUT,
            ),
            (CoreError::InvalidCredentials, exit_code::AUTH),
            (CoreError::NoTokenSet, exit_code::AUTH),
            (
                CoreError::Server {
                    message: "boom".into(),
                },
                exit_code::SERVER,
            ),
            (
                CoreError::Unknown {
                    message: "teapot".into(),
                    status: Some(418),
                },
                exit_code::GENERAL,
            ),
            (
                CoreError::InvalidResponseFormat {
                    message: "not json".into(),
                },
                exit_code::FORMAT,
            ),
            (CoreError::NoSiteSelected, exit_code::USAGE),
            (
                CoreError::Config {
                    message: "unreadable CA file".into(),
                },
                exit_code::CONFIG,
            ),
        ];

        for (core, code) in cases {
            let label = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), code, "{label}");
        }
    }
}
