use std::hash::{BuildHasher, RandomState};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use foldhash::fast::FixedState as FoldFixedState;
use murmur64::dedup::{self, DedupStrategy};
use murmur64::hash64;

#[derive(Parser)]
#[command(about = "MurmurHash64A fingerprints and hashing benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fingerprint of each input.
    Hash {
        #[arg(long, env = "MURMUR64_SEED", default_value_t = 0)]
        seed: u64,

        /// Treat inputs as paths and hash the file contents.
        #[arg(long, conflicts_with = "hex_input")]
        file: bool,

        /// Treat inputs as hex-encoded bytes.
        #[arg(long)]
        hex_input: bool,

        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Time fingerprinting and deduplication over random records.
    Bench {
        #[arg(long, env = "MURMUR64_SEED", default_value_t = 0)]
        seed: u64,

        /// Seed of the record generator.
        #[arg(long, default_value_t = 0)]
        rng_seed: u64,

        #[arg(long, default_value_t = 0)]
        min_len: usize,

        #[arg(long, default_value_t = 64)]
        max_len: usize,

        /// log2 of the record counts to benchmark.
        #[arg(long, value_delimiter = ',', default_values_t = [10, 15, 20])]
        lg_sizes: Vec<u32>,
    },
}

fn benchmark(name: &str, repeats: usize, mut f: impl FnMut()) {
    // Warmup.
    for _ in 0..repeats {
        f();
    }
    let start = Instant::now();
    for _ in 0..repeats {
        f();
    }
    let duration = start.elapsed();
    println!("  {}: {}", name, human_time(repeats, duration));
}

fn human_time(repeats: usize, duration: Duration) -> String {
    let mut duration = duration.as_nanos() as f64 / repeats as f64;
    if duration < 1000.0 {
        return format!("{:.1}ns", duration);
    }
    duration /= 1000.0;
    if duration < 1000.0 {
        return format!("{:.1}us", duration);
    }
    duration /= 1000.0;
    if duration < 1000.0 {
        return format!("{:.1}ms", duration);
    }
    duration /= 1000.0;
    format!("{:.1}s", duration)
}

fn human_size(size: usize) -> String {
    if size < 1024 {
        return format!("{}B", size);
    }
    let mut size = size as f64;
    size /= 1024.0;
    if size < 1024.0 {
        return format!("{:.1}KiB", size);
    }
    size /= 1024.0;
    if size < 1024.0 {
        return format!("{:.1}MiB", size);
    }
    size /= 1024.0;
    format!("{:.1}GiB", size)
}

fn parse_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(digits).with_context(|| format!("invalid hex input {input:?}"))
}

fn hash(seed: u64, file: bool, hex_input: bool, inputs: Vec<String>) -> anyhow::Result<()> {
    for input in inputs {
        let bytes = if file {
            let path = PathBuf::from(&input);
            std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?
        } else if hex_input {
            parse_hex(&input)?
        } else {
            input.clone().into_bytes()
        };
        log::debug!("hashing {} bytes with seed {seed:#x}", bytes.len());
        println!("{:#018x}  {}", hash64(&bytes, seed), input);
    }
    Ok(())
}

fn random_records(rng: &mut fastrand::Rng, count: usize, min_len: usize, max_len: usize) -> Vec<Vec<u8>> {
    // Draw bodies from a small alphabet so that some records repeat.
    (0..count)
        .map(|_| {
            let len = rng.usize(min_len..=max_len);
            std::iter::repeat_with(|| rng.u8(b'a'..=b'd')).take(len).collect()
        })
        .collect()
}

fn bench(
    seed: u64,
    rng_seed: u64,
    min_len: usize,
    max_len: usize,
    lg_sizes: Vec<u32>,
) -> anyhow::Result<()> {
    if min_len > max_len {
        bail!("--min-len ({min_len}) must not exceed --max-len ({max_len})");
    }
    if let Some(lg_size) = lg_sizes.iter().find(|&&lg_size| lg_size > 28) {
        bail!("record count 2^{lg_size} is too large");
    }
    let mut rng = fastrand::Rng::with_seed(rng_seed);
    for lg_size in lg_sizes {
        let gen_start = Instant::now();
        let records = random_records(&mut rng, 1 << lg_size, min_len, max_len);
        let total_bytes: usize = records.iter().map(Vec::len).sum();
        log::debug!("generated records in {:?}", gen_start.elapsed());
        let repeats = 1usize << 22u32.saturating_sub(lg_size);
        println!(
            "records: {}, size: {}",
            records.len(),
            human_size(total_bytes)
        );

        benchmark("hash64 (Murmur)", repeats, || {
            for record in &records {
                std::hint::black_box(hash64(record, seed));
            }
        });

        let fold_hasher = FoldFixedState::with_seed(seed);
        benchmark("FoldHash", repeats, || {
            for record in &records {
                std::hint::black_box(fold_hasher.hash_one(record.as_slice()));
            }
        });

        let sip_hasher = RandomState::new(); // Unfortunately not seedable :(
        benchmark("SipHash", repeats, || {
            for record in &records {
                std::hint::black_box(sip_hasher.hash_one(record.as_slice()));
            }
        });

        benchmark("hash64 (Murmur, rayon)", repeats, || {
            std::hint::black_box(dedup::fingerprints(&records, seed));
        });

        let mut counts = Vec::with_capacity(DedupStrategy::ALL.len());
        for strategy in DedupStrategy::ALL {
            benchmark(strategy.name(), repeats, || {
                std::hint::black_box(dedup::count_unique(&records, seed, strategy));
            });
            let unique = dedup::count_unique(&records, seed, strategy);
            log::debug!(
                "{}: {} unique of {} records",
                strategy.name(),
                unique,
                records.len()
            );
            counts.push((strategy, unique));
        }
        let (_, expected) = counts[0];
        if let Some((strategy, count)) = counts.iter().find(|(_, count)| *count != expected) {
            bail!(
                "{} counted {} unique records, {} counted {}",
                strategy.name(),
                count,
                counts[0].0.name(),
                expected
            );
        }
        println!("  unique: {}", expected);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            seed,
            file,
            hex_input,
            inputs,
        } => hash(seed, file, hex_input, inputs),
        Commands::Bench {
            seed,
            rng_seed,
            min_len,
            max_len,
            lg_sizes,
        } => bench(seed, rng_seed, min_len, max_len, lg_sizes),
    }
}
