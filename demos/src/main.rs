// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build text index structures over a file or a generated text and report
//! the schedule and memory usage.
//!
//! Run:
//! - `cargo run -p understory_demos --bin ds_build -- --generate fibonacci:20 --ds lcp,bwt`
//! - `RUST_LOG=understory_ds_graph=debug cargo run -p understory_demos --bin ds_build -- --input README.md`

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_ds_graph::{CompressMode, RecordingManager, construct_all};
use understory_text_ds::{DEFAULT_FULL_WIDTH, DsKind, TextDs, TextDsConfig, generate, registry};

/// Builds suffix-based index structures with bounded peak memory.
#[derive(Parser, Debug)]
#[command(name = "ds_build", version, about)]
struct Cli {
    /// Text file to index.
    #[arg(long, short, conflicts_with = "generate")]
    input: Option<PathBuf>,

    /// Generated text: `fibonacci:N`, `thue-morse:LEN`, `runs:ALPHABET:RUN:LEN`
    /// or `random:LEN:SIGMA:SEED`.
    #[arg(long, short, default_value = "fibonacci:20")]
    generate: Source,

    /// Structures to build, comma separated.
    #[arg(long = "ds", env = "DS_BUILD_KINDS", value_delimiter = ',', default_value = "lcp")]
    kinds: Vec<DsKind>,

    /// When to shrink structures to their minimal width.
    #[arg(long, env = "DS_BUILD_COMPRESS", default_value_t = CompressMode::Delayed)]
    compress: CompressMode,

    /// Element width of uncompressed arrays.
    #[arg(long, env = "DS_BUILD_WIDTH", default_value_t = DEFAULT_FULL_WIDTH)]
    width: u8,

    /// Only print the schedule; build nothing.
    #[arg(long)]
    plan: bool,

    /// Print the first N entries of every built structure.
    #[arg(long, default_value_t = 0)]
    show: usize,
}

/// A generated input text.
#[derive(Clone, Debug)]
enum Source {
    Fibonacci(usize),
    ThueMorse(usize),
    Runs {
        alphabet: Vec<u8>,
        run: usize,
        len: usize,
    },
    Random {
        len: usize,
        sigma: u8,
        seed: u64,
    },
}

impl Source {
    fn text(&self) -> Vec<u8> {
        match self {
            Self::Fibonacci(n) => generate::fibonacci(*n),
            Self::ThueMorse(len) => generate::thue_morse(*len),
            Self::Runs { alphabet, run, len } => generate::runs(alphabet, *run, *len),
            Self::Random { len, sigma, seed } => generate::random(*len, *sigma, *seed),
        }
    }
}

impl FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let num = |i: usize| -> anyhow::Result<u64> {
            let part = parts.get(i).context("missing generator argument")?;
            part.parse()
                .with_context(|| format!("invalid generator argument {part:?}"))
        };
        let size = |i: usize| num(i).and_then(|v| Ok(usize::try_from(v)?));

        Ok(match (parts[0], parts.len()) {
            ("fibonacci", 2) => Self::Fibonacci(size(1)?),
            ("thue-morse", 2) => Self::ThueMorse(size(1)?),
            ("runs", 4) => Self::Runs {
                alphabet: parts[1].as_bytes().to_vec(),
                run: size(2)?,
                len: size(3)?,
            },
            ("random", 4) => Self::Random {
                len: size(1)?,
                sigma: u8::try_from(num(2)?)?,
                seed: num(3)?,
            },
            _ => bail!("unknown generator {s:?}"),
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.plan {
        let registry = registry();
        let mut manager = RecordingManager::new();
        let schedule = construct_all(&registry, &mut manager, &cli.kinds, cli.compress)?;
        for event in manager.events() {
            println!("{event:?}");
        }
        println!("peak live structures: {}", schedule.peak_live());
        return Ok(());
    }

    let text = match &cli.input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => cli.generate.text(),
    };
    info!(len = text.len(), "loaded text");

    let config = TextDsConfig::new()
        .full_width(cli.width)
        .compress_mode(cli.compress);
    let mut t = TextDs::with_config(text, config)?;
    let schedule = t.construct(&cli.kinds)?;

    println!("constructed: {:?}", schedule.constructed());
    println!("discarded:   {:?}", schedule.discarded());
    println!("compressed:  {:?}", schedule.compressed());
    for kind in &cli.kinds {
        let Some(v) = t.get(*kind) else {
            bail!("{kind} was requested but is not live");
        };
        println!(
            "{kind:>4}: {} entries, {} bits each, {} bytes",
            v.len(),
            v.width(),
            v.heap_bytes()
        );
        if cli.show > 0 {
            let head: Vec<u64> = v.iter().take(cli.show).collect();
            println!("      {head:?}");
        }
    }
    let stats = t.stats();
    println!(
        "memory: {} bytes held, {} bytes peak",
        stats.current_bytes, stats.peak_bytes
    );
    Ok(())
}
