//! Clap derive structures for the `househunt` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// househunt -- keep track of houses you are considering
#[derive(Debug, Parser)]
#[command(
    name = "househunt",
    version,
    about = "Track house listings from the command line",
    long_about = "Scripting front end for a house-listings backend.\n\n\
        Lists, inserts, votes on and removes listings, runs metadata\n\
        discovery for a listing link, and prints the map model.",
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile from the config file
    #[arg(long, short = 'p', env = "HOUSEHUNT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'u', env = "HOUSEHUNT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HOUSEHUNT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Colorize tables and messages
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Log more; repeat for debug and trace
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Answer yes to the delete prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HOUSEHUNT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for people
    Table,
    /// Indented JSON
    Json,
    /// One JSON document per line
    JsonCompact,
    /// YAML
    Yaml,
    /// Bare ids, one per line
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    Auto,
    /// Color even when piped
    Always,
    /// No escape codes
    Never,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all listings, in server order
    #[command(alias = "ls")]
    List,

    /// Show one listing
    #[command(alias = "get")]
    Show {
        /// Listing id
        id: String,
    },

    /// Insert a new listing
    Add(AddArgs),

    /// Change the vote or comment of a listing
    Update(UpdateArgs),

    /// Delete a listing
    #[command(alias = "rm")]
    Remove {
        /// Listing id
        id: String,
    },

    /// Look up metadata for a listing link
    Discover {
        /// Listing page URL
        url: String,
    },

    /// Print the map center and markers
    Map {
        /// Center on this listing and open its popup
        #[arg(long)]
        house_id: Option<String>,
    },

    /// Resolve a navigation path to its route and active mode
    Route {
        /// Path such as `/map?houseId=2` or `#/houses/7`
        path: String,
    },

    /// Inspect and edit the config file
    Config(ConfigArgs),

    /// Print a shell completion script
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Listing page URL
    pub link: String,

    /// Vote, 0 to 10
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub vote: u8,

    /// Free-text comment
    #[arg(long, default_value = "")]
    pub comment: String,

    /// Run discovery first and merge its fields
    #[arg(long)]
    pub discover: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Listing id
    pub id: String,

    /// New vote, 0 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub vote: Option<u8>,

    /// New comment
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
