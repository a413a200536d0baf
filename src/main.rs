use blockpress::{AlgorithmId, Block, Config, Envelope, Error};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "blockpress", about = "Wrap and unwrap self-describing compressed blocks")]
struct Cli {
    /// JSON config file (default algorithm, codec levels)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a single block
    Wrap {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Algorithm: none, snappy, lz4, zstd, brotli, lzma (default from config)
        #[arg(short, long)]
        algorithm: Option<String>,
    },
    /// Decode a block back into the original bytes
    Unwrap {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show a block's algorithm tag without decoding it
    Inspect {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List the algorithms this build can read and write
    Algorithms,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(cli.config.as_deref())?;
    let registry = config.registry();
    let env = Envelope::new(&registry);

    match cli.command {

        // ── Wrap ─────────────────────────────────────────────────────────────
        Commands::Wrap { input, output, algorithm } => {
            let id = match algorithm {
                Some(name) => AlgorithmId::from_name(&name).ok_or(Error::UnknownAlgorithmName(name))?,
                None       => config.default_algorithm()?,
            };
            let raw = std::fs::read(&input)?;
            let block = env.wrap(id, &raw)?;
            std::fs::write(&output, &block)?;
            info!("wrapped {} ({} B) -> {} ({} B) with {}",
                  input.display(), raw.len(), output.display(), block.len(), id);
        }

        // ── Unwrap ───────────────────────────────────────────────────────────
        Commands::Unwrap { input, output } => {
            let block = std::fs::read(&input)?;
            let raw = env.unwrap(&block)?;
            std::fs::write(&output, &raw)?;
            info!("unwrapped {} ({} B) -> {} ({} B)",
                  input.display(), block.len(), output.display(), raw.len());
        }

        // ── Inspect ──────────────────────────────────────────────────────────
        Commands::Inspect { input, json } => {
            let bytes = std::fs::read(&input)?;
            let block = Block::parse(&bytes)?;
            let id = block.algorithm();
            let readable = registry.contains(id);
            if json {
                let report = serde_json::json!({
                    "path":          input.display().to_string(),
                    "algorithm_id":  id.as_u8(),
                    "algorithm":     id.name(),
                    "payload_bytes": block.payload().len(),
                    "block_bytes":   block.len(),
                    "readable":      readable,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("── Block ────────────────────────────────────────────────");
                println!("  Path          {}", input.display());
                println!("  Algorithm     {}", id);
                println!("  Payload       {} B", block.payload().len());
                println!("  Block         {} B", block.len());
                println!("  Readable      {}", readable);
            }
        }

        // ── Algorithms ───────────────────────────────────────────────────────
        Commands::Algorithms => {
            let default = config.default_algorithm().ok();
            println!("{:>4}  {:<8} {}", "Id", "Name", "Default");
            for id in registry.ids() {
                let codec = registry.resolve(id)?;
                let mark = if Some(id) == default { "*" } else { "" };
                println!("{:>4}  {:<8} {}", id.as_u8(), codec.name(), mark);
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    match path {
        Some(p) => Config::load(p),
        None    => Ok(Config::default()),
    }
}
