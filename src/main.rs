use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slip::{CellId, Reader, Slip, SlipConfig, Traversal};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slip", about = "Read, re-emit and walk SLIP list files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log structural edits and cursor frames (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Refuse to descend deeper than this many levels while walking.
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Ceiling on live cells.
    #[arg(long, global = true)]
    max_cells: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a list file and write it back out.
    Format {
        /// List file.
        file: PathBuf,
        /// Write on a single line instead of indenting nested lists.
        #[arg(long)]
        quick: bool,
    },
    /// Print every cell a traversal visits until it returns to the top list.
    Walk {
        /// List file.
        file: PathBuf,
        /// Traversal code: [l|s][e|n|w][l|r], e.g. `ser` or `lwl`.
        #[arg(long, default_value = "ser")]
        mode: Traversal,
    },
    /// Print the cell table and arena counters.
    Dump {
        /// List file.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = SlipConfig::default();
    if let Some(max) = cli.max_cells {
        config = SlipConfig::with_capacity(config.initial_capacity.min(max))
            .with_max_cells(max)
            .context("invalid --max-cells")?;
    }
    if let Some(depth) = cli.max_depth {
        config = config.with_max_depth(depth);
    }
    let mut slip = Slip::with_config(config).context("invalid configuration")?;

    match cli.command {
        Commands::Format { file, quick } => run_format(&mut slip, &file, quick)?,
        Commands::Walk { file, mode } => run_walk(&mut slip, &file, mode)?,
        Commands::Dump { file } => run_dump(&mut slip, &file)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "slip=debug" } else { "slip=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load(slip: &mut Slip, path: &Path) -> Result<CellId> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    slip.parse(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn run_format(slip: &mut Slip, path: &Path, quick: bool) -> Result<()> {
    let list = load(slip, path)?;
    let mut stdout = io::stdout().lock();
    if quick {
        slip.write_quick(list, &mut stdout)?;
    } else {
        slip.write(list, &mut stdout)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn run_walk(slip: &mut Slip, path: &Path, mode: Traversal) -> Result<()> {
    let list = load(slip, path)?;
    let mut reader = Reader::new(slip, list)?;
    let mut stdout = io::stdout().lock();

    loop {
        reader
            .advance(slip, mode)
            .with_context(|| format!("{} step failed", mode))?;
        if reader.list_depth() == 0 && reader.current_cell() == reader.top_list() {
            break;
        }
        let text = if reader.is_sublist(slip) {
            let inner = slip.header_of(reader.current_cell())?;
            format!("<list {} with {} cells>", inner, slip.size(inner)?)
        } else {
            reader.to_text(slip)?
        };
        writeln!(
            stdout,
            "{}\t{}{}",
            reader.list_depth(),
            "  ".repeat(reader.list_depth()),
            text
        )?;
    }
    Ok(())
}

fn run_dump(slip: &mut Slip, path: &Path) -> Result<()> {
    let list = load(slip, path)?;
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", slip.dump(list)?)?;
    writeln!(stdout, "\n{}", slip.stats().report())?;
    Ok(())
}
