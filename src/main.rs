use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
mod auth;
use npf::{NpfError, Storage};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "npf")]
#[command(
    version,
    about = "Encrypts images into password-protected NPF containers and back."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts an image into an .npf container
    #[command(arg_required_else_help = true)]
    Encrypt {
        /// Source image
        input: PathBuf,

        /// Output path (default: <INPUT>.npf)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Decrypts an .npf container back to the original image
    #[command(arg_required_else_help = true)]
    Decrypt {
        /// NPF container
        input: PathBuf,

        /// Output path (default: original filename from the metadata)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Prints a container's metadata without decrypting it
    #[command(arg_required_else_help = true)]
    Info { input: PathBuf },

    /// Tells whether a file is an NPF container
    #[command(arg_required_else_help = true)]
    Check { input: PathBuf },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    match args.command {
        Commands::Encrypt { input, output } => {
            let password = auth::read_new_password_with_confirmation()?;
            let written = npf::encrypt_file(&input, output.as_deref(), &password)?;
            println!("encrypted to '{}'", written.display());
        }
        Commands::Decrypt { input, output } => {
            let password = auth::read_password()?;
            let (written, _) = npf::decrypt_file(&input, output.as_deref(), &password)?;
            println!("decrypted to '{}'", written.display());
        }
        Commands::Info { input } => {
            let data = load(&input)?;
            let metadata = npf::get_metadata(&data)?;
            for (key, value) in metadata.iter() {
                println!("{key}: {value}");
            }
        }
        Commands::Check { input } => {
            let data = load(&input)?;
            if npf::is_npf_file(&data) {
                println!("'{}' is an NPF container", input.display());
            } else {
                println!("{}", NpfError::NotAnNpfFile);
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn load(path: &PathBuf) -> Result<Vec<u8>> {
    Storage::new(path.clone())
        .load()
        .with_context(|| format!("failed to read '{}'", path.display()))
}
