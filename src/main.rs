//! `web3datacli` — binary entry point.
//!
//! 1. Parse arguments (usage errors exit with status 2).
//! 2. Initialise logging on stderr.
//! 3. Run the requested command; library failures map to
//!    `Web3DataError::exit_code`, anything else exits with 1.

mod cli;
mod telemetry;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use web3data::transfer::{ArweaveStore, BlobStore, IpfsStore};
use web3data::{fsio, Web3DataError};

use crate::cli::{ArweaveCommand, Cli, Command, EncryptionCommand, IpfsCommand};

/// Permission bits for downloaded blobs.
const DOWNLOAD_MODE: u32 = 0o644;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level, cli.log_json) {
        eprintln!("❌ {e:#}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e:#}");
            let code = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<Web3DataError>())
                .map_or(1, Web3DataError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Encryption(cmd) => run_encryption(cmd),
        Command::Ipfs(args) => {
            let store = IpfsStore::new(cli.ipfs_config(args))?;
            match &args.command {
                IpfsCommand::Upload { file } => {
                    println!("📁 File: {}\n🔗 Node: {}", file.display(), args.node);
                    upload(&store, file)?;
                }
                IpfsCommand::Download { cid, out } => {
                    let output = out.clone().unwrap_or_else(|| PathBuf::from(cid));
                    println!(
                        "🔗 Downloading from: {}\n📁 Saving to: {}",
                        store.content_url(cid),
                        output.display()
                    );
                    download(&store, cid, &output)?;
                }
            }
            Ok(())
        }
        Command::Arweave(cmd) => run_arweave(cli, cmd),
        Command::Version => {
            println!("web3datacli Version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_encryption(cmd: &EncryptionCommand) -> Result<()> {
    match cmd {
        EncryptionCommand::Encrypt(args) => {
            println!("🔐 Starting AES encryption...");
            web3data::encrypt_file(&args.input, &args.out, &args.key).context("encryption failed")?;
            println!("✅ File encrypted! 📁 Saved to: {}", args.out.display());
        }
        EncryptionCommand::Decrypt(args) => {
            println!("🔓 Starting AES decryption...");
            web3data::decrypt_file(&args.input, &args.out, &args.key).context("decryption failed")?;
            println!("✅ File decrypted! 📁 Saved to: {}", args.out.display());
        }
        EncryptionCommand::Genkey { out } => {
            let path = web3data::generate_key_file(out.as_deref()).context("key generation failed")?;
            println!(
                "✅ AES-{} key generated and saved to {}",
                web3data::crypto::KEY_BITS,
                path.display()
            );
        }
    }
    Ok(())
}

fn run_arweave(cli: &Cli, cmd: &ArweaveCommand) -> Result<()> {
    match cmd {
        ArweaveCommand::Upload { file, api } => {
            let store = ArweaveStore::new(cli.arweave_config(Some(api.as_str()), None))?;
            upload(&store, file)?;
        }
        ArweaveCommand::Download { id, out, gateway } => {
            let store = ArweaveStore::new(cli.arweave_config(None, Some(gateway.as_str())))?;
            let output = out.clone().unwrap_or_else(|| PathBuf::from(id));
            println!(
                "🔗 Downloading from: {}\n📁 Saving to: {}",
                store.content_url(id),
                output.display()
            );
            download(&store, id, &output)?;
        }
    }
    Ok(())
}

fn upload(store: &dyn BlobStore, file: &Path) -> Result<()> {
    let bytes = fsio::read(file, "cannot open file")?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    let handle = store.put(&bytes, &name).context("upload failed")?;
    println!("✅ Upload successful");
    println!("🆔 ID: {}\n🔗 URL: {}", handle.id, handle.locator);
    Ok(())
}

fn download(store: &dyn BlobStore, id: &str, output: &Path) -> Result<()> {
    let bytes = store.get(id).context("download failed")?;
    fsio::write_atomic(output, &bytes, DOWNLOAD_MODE).context("error saving file")?;
    println!("✅ Download complete");
    Ok(())
}
