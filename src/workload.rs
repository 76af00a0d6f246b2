//! Reproducible seeded random workload generation: reads, writes, and
//! trims in the percentages requested, tracking which logical addresses
//! currently hold data so generated reads and trims target ones that will
//! actually succeed.

use anyhow::{bail, Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::cli::Command;

const PRINTABLE: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A read/write/trim percentage split, e.g. `"40/50/10"`.
struct OpMix {
    reads: u32,
    writes: u32,
    trims: u32,
}

impl OpMix {
    fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split('/').collect();
        let [reads, writes, trims] = parts[..] else {
            bail!("op-percentages {spec:?} must have the form R/W/T");
        };
        let mix = OpMix {
            reads: reads.parse().context("bad read percentage")?,
            writes: writes.parse().context("bad write percentage")?,
            trims: trims.parse().context("bad trim percentage")?,
        };
        if mix.writes == 0 {
            bail!("must have some writes, otherwise nothing in the SSD!");
        }
        Ok(mix)
    }

    fn total(&self) -> u32 {
        self.reads + self.writes + self.trims
    }
}

/// An optional address skew: with `chance` percent probability, a
/// generated write address is drawn from the bottom `window` percent of
/// the logical address space instead of uniformly.
struct Skew {
    chance_percent: u32,
    window_percent: u32,
}

impl Skew {
    fn parse(spec: &str) -> Result<Self> {
        let (chance, window) = spec
            .split_once('/')
            .context("skew must have the form CHANCE/WINDOW")?;
        Ok(Skew {
            chance_percent: chance.parse().context("bad skew chance")?,
            window_percent: window.parse().context("bad skew window")?,
        })
    }
}

pub struct WorkloadGenerator {
    rng: SmallRng,
    mix: OpMix,
    skew: Option<Skew>,
    skew_remaining: usize,
    read_fail_percent: u32,
    max_logical_page: usize,
    live_addresses: Vec<usize>,
}

impl WorkloadGenerator {
    pub fn new(
        seed: u64,
        num_logical_pages: usize,
        op_percentages: &str,
        skew: Option<&str>,
        skew_start: usize,
        read_fail_percent: u32,
    ) -> Result<Self> {
        Ok(WorkloadGenerator {
            rng: SmallRng::seed_from_u64(seed),
            mix: OpMix::parse(op_percentages)?,
            skew: skew.map(Skew::parse).transpose()?,
            skew_remaining: skew_start,
            read_fail_percent,
            max_logical_page: num_logical_pages,
            live_addresses: Vec::new(),
        })
    }

    fn write_address(&mut self) -> usize {
        if self.skew_remaining > 0 {
            if let Some(skew) = &self.skew {
                self.skew_remaining -= 1;
                if self.rng.random_ratio(skew.chance_percent.min(100), 100) {
                    let window =
                        ((skew.window_percent as u64 * self.max_logical_page as u64) / 100).max(1);
                    return self.rng.random_range(0..window as usize);
                }
            }
        }
        self.rng.random_range(0..self.max_logical_page)
    }

    fn remember_address(&mut self, addr: usize) {
        if !self.live_addresses.contains(&addr) {
            self.live_addresses.push(addr);
        }
    }

    fn forget_address(&mut self, addr: usize) {
        self.live_addresses.retain(|&a| a != addr);
    }

    /// Generates `num_cmds` commands. Reads and trims are retried against a
    /// different random draw (not emitted) until there is a live address to
    /// target, mirroring the original tool's behavior of skipping a slot
    /// rather than emitting a command guaranteed to fail.
    pub fn generate(&mut self, num_cmds: usize) -> Vec<Command> {
        let mut cmds = Vec::with_capacity(num_cmds);
        while cmds.len() < num_cmds {
            let roll = self.rng.random_range(0..self.mix.total());
            if roll < self.mix.reads {
                if let Some(cmd) = self.generate_read() {
                    cmds.push(cmd);
                }
            } else if roll < self.mix.reads + self.mix.writes {
                cmds.push(self.generate_write());
            } else if let Some(cmd) = self.generate_trim() {
                cmds.push(cmd);
            }
        }
        cmds
    }

    fn generate_read(&mut self) -> Option<Command> {
        if self.rng.random_range(0..100) < self.read_fail_percent {
            return Some(Command::Read(self.rng.random_range(0..self.max_logical_page)));
        }
        if self.live_addresses.len() < 2 {
            return None;
        }
        let idx = self.rng.random_range(0..self.live_addresses.len());
        Some(Command::Read(self.live_addresses[idx]))
    }

    fn generate_write(&mut self) -> Command {
        let addr = self.write_address();
        self.remember_address(addr);
        let byte = PRINTABLE[self.rng.random_range(0..PRINTABLE.len())];
        Command::Write(addr, byte)
    }

    fn generate_trim(&mut self) -> Option<Command> {
        if self.live_addresses.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..self.live_addresses.len());
        let addr = self.live_addresses[idx];
        self.forget_address(addr);
        Some(Command::Trim(addr))
    }
}
