use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quickstack::config::TlsClient;
use quickstack::domain::value_objects::Profile;

/// quickstack - web stack provisioning for fresh Linux hosts
#[derive(Parser, Debug)]
#[command(name = "quickstack")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'quickstack' without arguments to provision interactively.")]
pub struct Cli {
    /// Emit NDJSON events on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// App directory (default: ~/app)
    #[arg(long, global = true, env = "QUICKSTACK_DIR")]
    pub dir: Option<PathBuf>,

    /// Config file (default: <app>/quickstack.toml, then ~/.config/quickstack/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Never prompt
    #[arg(short = 'y', long = "yes", visible_alias = "non-interactive", global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the runtime, write the stack and start it
    Provision {
        /// Stack profile
        #[arg(short, long, value_enum)]
        profile: Option<Profile>,

        /// Account to add to the docker group
        #[arg(long)]
        account: Option<String>,
    },

    /// Obtain a certificate and switch the proxy to HTTPS
    EnableHttps {
        /// Domain; www.<domain> is included
        #[arg(short, long)]
        domain: Option<String>,

        /// Contact email for the certificate authority
        #[arg(short, long)]
        email: Option<String>,

        /// Where the certificate client runs
        #[arg(long, value_parser = parse_client)]
        client: Option<TlsClient>,

        /// Use the CA staging endpoint
        #[arg(long)]
        staging: bool,
    },

    /// Print the detected environment and install branch
    Detect,
}

fn parse_client(value: &str) -> Result<TlsClient, String> {
    TlsClient::parse(value).ok_or_else(|| format!("'{}' is not one of: container, host", value))
}
