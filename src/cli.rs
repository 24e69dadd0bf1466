//! Command-line surface of `web3datacli`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use web3data::transfer::{
    ArweaveConfig, IpfsConfig, DEFAULT_ARWEAVE_API, DEFAULT_ARWEAVE_GATEWAY, DEFAULT_IPFS_NODE,
};

/// A CLI tool to manage web3data
#[derive(Debug, Parser)]
#[command(name = "web3datacli", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn", env = "WEB3DATA_LOG_LEVEL")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value_t = 60, env = "WEB3DATA_HTTP_TIMEOUT_SECS")]
    pub timeout_secs: u64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 🔐 Manage data encryption and decryption
    #[command(subcommand)]
    Encryption(EncryptionCommand),

    /// 📤 Interact with IPFS
    Ipfs(IpfsArgs),

    /// 🕸️ Interact with Arweave
    #[command(subcommand)]
    Arweave(ArweaveCommand),

    /// Print the version of this application
    Version,
}

#[derive(Debug, Subcommand)]
pub enum EncryptionCommand {
    /// 🔒 Encrypt a file using AES (key is base64-encoded in a file)
    Encrypt(CryptArgs),

    /// 🔓 Decrypt a file using AES (key is base64-encoded in a file)
    Decrypt(CryptArgs),

    /// 🔑 Generate a random AES key and store it in base64 in .secrets/
    Genkey {
        /// Output file path (default: .secrets/aes-key-256.b64)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct CryptArgs {
    /// Input file path
    #[arg(short = 'i', long = "in")]
    pub input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    pub out: PathBuf,

    /// Base64-encoded AES key file
    #[arg(short, long)]
    pub key: PathBuf,
}

#[derive(Debug, Args)]
pub struct IpfsArgs {
    /// IPFS node API URL
    #[arg(short, long, default_value = DEFAULT_IPFS_NODE, env = "WEB3DATA_IPFS_NODE")]
    pub node: String,

    #[command(subcommand)]
    pub command: IpfsCommand,
}

#[derive(Debug, Subcommand)]
pub enum IpfsCommand {
    /// Upload a local file to IPFS
    Upload {
        /// Path to the local file to upload
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Download a file from IPFS using its CID
    Download {
        /// CID of the file to download
        #[arg(short, long)]
        cid: String,

        /// Output file path (default: the CID)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ArweaveCommand {
    /// Upload a file to Arweave through a relay API
    Upload {
        /// Path to the local file to upload
        #[arg(short, long)]
        file: PathBuf,

        /// Base URL of the Arweave relay API (without /upload)
        #[arg(short, long, default_value = DEFAULT_ARWEAVE_API, env = "WEB3DATA_ARWEAVE_API")]
        api: String,
    },

    /// Download a file from Arweave using its transaction ID
    Download {
        /// Arweave transaction ID to download
        #[arg(short, long)]
        id: String,

        /// Output file path (default: the transaction ID)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Arweave gateway to read from
        #[arg(long, default_value = DEFAULT_ARWEAVE_GATEWAY, env = "WEB3DATA_ARWEAVE_GATEWAY")]
        gateway: String,
    },
}

impl Cli {
    /// Per-request HTTP timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// IPFS settings from the node flag and global timeout.
    pub fn ipfs_config(&self, args: &IpfsArgs) -> IpfsConfig {
        IpfsConfig {
            node_url: args.node.clone(),
            timeout: self.timeout(),
        }
    }

    /// Arweave settings; `None` falls back to the default endpoint.
    pub fn arweave_config(&self, api_url: Option<&str>, gateway_url: Option<&str>) -> ArweaveConfig {
        let defaults = ArweaveConfig::default();
        ArweaveConfig {
            api_url: api_url.map_or(defaults.api_url, str::to_string),
            gateway_url: gateway_url.map_or(defaults.gateway_url, str::to_string),
            timeout: self.timeout(),
        }
    }
}
