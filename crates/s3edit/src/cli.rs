//! CLI argument parsing with clap

use clap::Parser;

/// Fetch an S3 object, open it in your editor, and write it back
#[derive(Parser, Debug)]
#[command(name = "s3edit")]
#[command(author, about, long_about = None)]
#[command(version = crate::version::long_version())]
pub struct Cli {
    /// The containing S3 bucket
    pub bucket: String,

    /// The object path to open
    pub file: String,

    /// S3 access key (defaults to ~/.aws/credentials)
    #[arg(long)]
    pub key: Option<String>,

    /// S3 secret key (defaults to ~/.aws/credentials)
    #[arg(long)]
    pub secret: Option<String>,

    /// S3 region (defaults to us-east-1)
    #[arg(long)]
    pub region: Option<String>,

    /// Load a named profile from ~/.aws/credentials
    #[arg(long)]
    pub profile: Option<String>,

    /// Do not write the file back to the server
    #[arg(long)]
    pub readonly: bool,

    /// Custom S3-compatible endpoint (MinIO, LocalStack); uses path-style
    /// addressing
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
