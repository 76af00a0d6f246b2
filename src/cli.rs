//! Command-line argument parsing and the logical operation grammar
//! (`rN` / `wN:c` / `tN`) that the simulator's CLI accepts, either as an
//! explicit list or synthesized by the workload generator.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use ssdsim::SsdType;

/// Instructional SSD flash translation layer simulator.
#[derive(Parser, Debug)]
#[command(name = "ssdsim", version, about)]
pub struct Args {
    /// FTL write policy: direct, log, or ideal
    #[arg(short = 'T', long = "ssd-type", default_value = "direct")]
    pub ssd_type: String,

    /// Number of logical pages
    #[arg(short = 'l', long, default_value_t = 50)]
    pub num_logical_pages: usize,

    /// Number of blocks
    #[arg(short = 'B', long, default_value_t = 7)]
    pub num_blocks: usize,

    /// Pages per block
    #[arg(short = 'p', long, default_value_t = 10)]
    pub pages_per_block: usize,

    /// GC high water mark (blocks in use)
    #[arg(short = 'G', long, default_value_t = 10)]
    pub high_water_mark: usize,

    /// GC low water mark (blocks in use)
    #[arg(short = 'g', long, default_value_t = 8)]
    pub low_water_mark: usize,

    /// Per-block erase time unit, used only to scale the reported totals
    #[arg(short = 'E', long, default_value_t = 1000.0)]
    pub erase_time: f64,

    /// Per-page program time unit, used only to scale the reported totals
    #[arg(short = 'W', long, default_value_t = 40.0)]
    pub program_time: f64,

    /// Per-page read time unit, used only to scale the reported totals
    #[arg(short = 'R', long, default_value_t = 10.0)]
    pub read_time: f64,

    /// RNG seed for the synthesized workload
    #[arg(short = 's', long, default_value_t = 0)]
    pub seed: u64,

    /// Number of commands to synthesize (ignored if --cmd-list is given)
    #[arg(short = 'n', long, default_value_t = 10)]
    pub num_cmds: usize,

    /// read/write/trim percentages, e.g. "40/50/10"
    #[arg(short = 'P', long, default_value = "40/50/10")]
    pub op_percentages: String,

    /// Skew spec "chance/window", e.g. "30/20" biases writes toward the
    /// low 20% of the address space 30% of the time
    #[arg(short = 'K', long)]
    pub skew: Option<String>,

    /// Number of initial writes the skew applies to
    #[arg(short = 'k', long, default_value_t = 0)]
    pub skew_start: usize,

    /// Percent chance a generated read targets an address expected to fail
    #[arg(short = 'r', long, default_value_t = 0)]
    pub read_fail_percent: u32,

    /// Explicit comma-separated command list, e.g. "w0:a,r0,t0"
    #[arg(short = 'L', long)]
    pub cmd_list: Option<String>,

    /// Emit GC trace lines (via the log facade, at debug level)
    #[arg(short = 'J', long)]
    pub trace_gc: bool,

    /// Dump device state after every command
    #[arg(short = 'F', long)]
    pub show_state: bool,

    /// Print each command and its result as it executes
    #[arg(short = 'C', long)]
    pub show_cmds: bool,

    /// Print per-block counters and timing totals at the end of the run
    #[arg(short = 'S', long)]
    pub show_stats: bool,

    /// Quiz mode: print each command with its result masked as `??`,
    /// letting a student predict the outcome before checking with --solve
    #[arg(short = 'q', long)]
    pub quiz_cmds: bool,

    /// Reveal quiz-mode outcomes instead of masking them
    #[arg(short = 'c', long)]
    pub solve: bool,
}

impl Args {
    pub fn ssd_type(&self) -> Result<SsdType> {
        self.ssd_type
            .parse()
            .map_err(|e: String| anyhow!(e))
            .context("invalid --ssd-type")
    }
}

/// One parsed logical operation from the `rN` / `wN:c` / `tN` grammar.
#[derive(Debug, Clone, Copy)]
pub enum Command {
    Read(usize),
    Write(usize, u8),
    Trim(usize),
}

/// Parses a comma-separated command list such as `"w0:a,r0,t0"`.
pub fn parse_cmd_list(list: &str) -> Result<Vec<Command>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_command)
        .collect()
}

fn parse_command(text: &str) -> Result<Command> {
    let mut chars = text.chars();
    let tag = chars.next().ok_or_else(|| anyhow!("empty command"))?;
    let rest = chars.as_str();

    match tag {
        'r' => {
            let addr = rest
                .parse()
                .with_context(|| format!("bad read address in {text:?}"))?;
            Ok(Command::Read(addr))
        }
        't' => {
            let addr = rest
                .parse()
                .with_context(|| format!("bad trim address in {text:?}"))?;
            Ok(Command::Trim(addr))
        }
        'w' => {
            let (addr_str, data_str) = rest
                .split_once(':')
                .ok_or_else(|| anyhow!("write command {text:?} is missing ':'"))?;
            let addr = addr_str
                .parse()
                .with_context(|| format!("bad write address in {text:?}"))?;
            let byte = data_str
                .bytes()
                .next()
                .ok_or_else(|| anyhow!("write command {text:?} is missing data byte"))?;
            Ok(Command::Write(addr, byte))
        }
        _ => bail!("unrecognized command {text:?}"),
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Read(addr) => write!(f, "read({addr})"),
            Command::Write(addr, byte) => write!(f, "write({addr}, {})", *byte as char),
            Command::Trim(addr) => write!(f, "trim({addr})"),
        }
    }
}
