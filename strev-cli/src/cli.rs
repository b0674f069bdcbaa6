use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "anistrev",
    version,
    about = "Map anime across catalogs and extract playable streams",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "ANISTREV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Request timeout in seconds, overrides the configuration file
    #[arg(long, global = true, env = "ANISTREV_TIMEOUT")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the metadata provider
    Search {
        query: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        per_page: u32,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        output: OutputFormat,
    },

    /// Show a series and its subbed/dubbed catalog counterparts
    Info {
        /// Metadata provider id
        id: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        output: OutputFormat,
    },

    /// List the merged episodes of a series
    Episodes {
        id: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        output: OutputFormat,
    },

    /// Extract the stream of one episode
    Watch {
        id: String,

        /// Episode number
        episode: i64,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        output: OutputFormat,
    },

    /// Encrypt text with AES-CBC, printing base64
    Encrypt {
        plaintext: String,

        /// Key, 16, 24 or 32 bytes
        #[arg(long)]
        key: String,

        /// Initialization vector, 16 bytes
        #[arg(long)]
        iv: String,
    },

    /// Decrypt base64 AES-CBC ciphertext
    Decrypt {
        ciphertext: String,

        #[arg(long)]
        key: String,

        #[arg(long)]
        iv: String,
    },

    /// Parse a master or media playlist from a file or URL
    Manifest {
        /// Local path or http(s) URL
        source: String,

        /// Base URL for relative entries of a local file
        #[arg(long)]
        base: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        output: OutputFormat,
    },

    /// Show or reset the configuration
    Config {
        #[arg(long, conflicts_with = "reset")]
        show: bool,

        #[arg(long)]
        reset: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    pub fn output_format(&self) -> Option<OutputFormat> {
        match self {
            Commands::Search { output, .. }
            | Commands::Info { output, .. }
            | Commands::Episodes { output, .. }
            | Commands::Watch { output, .. }
            | Commands::Manifest { output, .. } => Some(*output),
            _ => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable text
    Pretty,
    /// Indented JSON
    Json,
    /// Single line JSON
    JsonCompact,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonCompact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_watch() {
        let args = Args::parse_from(["anistrev", "watch", "20", "3", "-o", "json-compact"]);
        match args.command {
            Commands::Watch { id, episode, output } => {
                assert_eq!(id, "20");
                assert_eq!(episode, 3);
                assert_eq!(output, OutputFormat::JsonCompact);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_output_format_of_utility_commands() {
        let args = Args::parse_from(["anistrev", "decrypt", "abc", "--key", "k", "--iv", "i"]);
        assert_eq!(args.command.output_format(), None);
    }
}
