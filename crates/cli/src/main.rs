mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use color_eyre::eyre::{Result, WrapErr};
use mdfront_core::config::loader::ConfigLoader;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mdfront", version, about = "Load, inspect and insert markdown frontmatter")]
pub struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load a file and print it serialized back
    Show(FileArgs),

    /// Insert a frontmatter block built from the configured template
    Insert(InsertArgs),

    /// Print a file with its frontmatter block turned into editor markup
    Decode(FileArgs),

    /// Print a serialized document with its sentinels turned into `---` delimiters
    Encode(FileArgs),

    /// Report frontmatter presence and the top-level document structure
    Status(StatusArgs),

    /// Find markdown files that are not stable under load and save
    Check(CheckArgs),

    /// Validate configuration and print resolved settings
    Doctor,

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct FileArgs {
    /// Markdown file to read
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Markdown file to read
    pub file: PathBuf,

    /// Write the result back to the file instead of printing it
    #[arg(long)]
    pub write: bool,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Markdown file to read
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory to scan for `.md` files
    pub dir: PathBuf,

    /// List stable files too
    #[arg(long)]
    pub all: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Doctor => {
            cmd::doctor::run(cli.config.as_deref());
            Ok(())
        }
        Commands::Completions { shell } => {
            cmd::completions::run(shell);
            Ok(())
        }
        command => {
            let cfg =
                ConfigLoader::load(cli.config.as_deref()).wrap_err("failed to load configuration")?;
            logging::init(&cfg)?;

            match command {
                Commands::Show(args) => cmd::show::run(&cfg, &args.file),
                Commands::Insert(args) => cmd::insert::run(&cfg, &args.file, args.write),
                Commands::Decode(args) => cmd::codec::decode(&args.file),
                Commands::Encode(args) => cmd::codec::encode(&args.file),
                Commands::Status(args) => cmd::status::run(&cfg, &args.file, args.json),
                Commands::Check(args) => cmd::check::run(&cfg, &args.dir, args.all),
                Commands::Doctor | Commands::Completions { .. } => Ok(()),
            }
        }
    }
}
