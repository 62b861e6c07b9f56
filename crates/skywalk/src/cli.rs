//! Clap derive structures for the `skywalk` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use skywalk_core::{SiteId, TagId};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// skywalk -- locate people and assets on an indoor-positioning server
#[derive(Debug, Parser)]
#[command(
    name = "skywalk",
    version,
    about = "Locate tags on an indoor-positioning server",
    long_about = "Talks to a beacon-based indoor-positioning server: authenticates, loads a\n\
        site's receiver topology and tag catalog, registers this device as a\n\
        beacon, and resolves where tags were last seen.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "SKYWALK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, env = "SKYWALK_SERVER", global = true)]
    pub server: Option<String>,

    /// Site (center) id
    #[arg(long, short = 's', env = "SKYWALK_SITE", global = true)]
    pub site: Option<SiteId>,

    /// Login name
    #[arg(long, short = 'u', env = "SKYWALK_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password (prompted for when omitted on a terminal)
    #[arg(
        long,
        env = "SKYWALK_PASSWORD",
        global = true,
        hide = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SKYWALK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SKYWALK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SKYWALK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the configured credentials are accepted
    Login,

    /// List the site's receivers (rdhubs)
    #[command(alias = "rx")]
    Receivers,

    /// List the site's locatable tags
    Tags(TagsArgs),

    /// Register this device as a beacon and print its identity
    Register(RegisterArgs),

    /// Show where a tag was last seen
    #[command(alias = "loc")]
    Locate(LocateArgs),

    /// Poll tag positions until interrupted
    Track(TrackArgs),

    /// Connect using an onboarding payload (e.g., a scanned QR code)
    Onboard(OnboardArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Tags ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TagsArgs {
    /// Include this device's own tag
    #[arg(long, short = 'a')]
    pub all: bool,
}

// ── Register ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name for the beacon (defaults to the profile's beacon_name, then the username)
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

// ── Locate / Track ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LocateArgs {
    /// Tag id
    pub tag: TagId,
}

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Tag ids to follow
    #[arg(required = true, num_args = 1..)]
    pub tags: Vec<TagId>,

    /// Time between polls (e.g., "5s", "1m"; defaults to the profile's poll_interval)
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Stop after this many polling rounds
    #[arg(long, short = 'c')]
    pub count: Option<u32>,
}

// ── Onboard ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OnboardArgs {
    /// Onboarding JSON payload, or "-" to read it from stdin
    pub payload: String,

    /// Save the server (and username) to the active profile
    #[arg(long)]
    pub save: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display current resolved configuration
    Show,

    /// Create or update a profile from --server, --site, and --username
    Init {
        /// Overwrite an existing profile of the same name
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
