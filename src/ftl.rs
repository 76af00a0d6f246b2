//! The FTL facade: validates logical addresses, dispatches to the
//! configured write policy, tracks logical success/failure counters, and
//! exposes `upkeep` as the host's only hook into garbage collection.

use thiserror::Error;

use crate::config::{ConfigError, SsdConfig};
use crate::cursor::Cursor;
use crate::flash::{FlashArray, PageState};
use crate::gc;
use crate::mapping::MappingTables;
use crate::policy::{self, SsdType};

/// Closed set of per-operation failures, small and exhaustively matchable.
/// See [`crate::config::ConfigError`] for the separate, construction-time
/// error set.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FtlError {
    #[error("illegal read address")]
    IllegalReadAddress,
    #[error("uninitialized read")]
    UninitializedRead,
    #[error("illegal write address")]
    IllegalWriteAddress,
    #[error("illegal trim address")]
    IllegalTrimAddress,
    #[error("uninitialized trim")]
    UninitializedTrim,
    #[error("device full")]
    DeviceFull,
}

/// Per-block physical operation counts, for the dump/stats collaborator.
#[derive(Debug, Clone, Copy)]
pub struct BlockCounters {
    pub erases: u64,
    pub writes: u64,
    pub reads: u64,
}

/// Aggregate logical operation counts, for the dump/stats collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalCounters {
    pub reads: u64,
    pub read_failures: u64,
    pub writes: u64,
    pub write_failures: u64,
    pub trims: u64,
    pub trim_failures: u64,
}

pub struct Ftl {
    pub(crate) ssd_type: SsdType,
    pub(crate) flash: FlashArray,
    pub(crate) mapping: MappingTables,
    pub(crate) cursor: Cursor,

    pub(crate) num_logical_pages: usize,
    pub(crate) num_blocks: usize,
    pub(crate) pages_per_block: usize,

    pub(crate) gc_high_water_mark: usize,
    pub(crate) gc_low_water_mark: usize,
    pub(crate) trace_gc: bool,
    pub(crate) gc_current_block: usize,
    pub(crate) gc_count: u64,

    block_erase_time: f64,
    page_program_time: f64,
    page_read_time: f64,

    logical: LogicalCounters,
}

impl Ftl {
    /// Builds a new simulator. Validates `config` before constructing
    /// anything; see [`ConfigError`] for the closed set of rejections.
    pub fn new(config: SsdConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let flash = FlashArray::new(config.num_blocks, config.pages_per_block);
        let num_pages = flash.num_pages();

        Ok(Ftl {
            ssd_type: config.ssd_type,
            mapping: MappingTables::new(config.num_logical_pages, num_pages),
            cursor: Cursor::new(),
            flash,
            num_logical_pages: config.num_logical_pages,
            num_blocks: config.num_blocks,
            pages_per_block: config.pages_per_block,
            gc_high_water_mark: config.gc_high_water_mark,
            gc_low_water_mark: config.gc_low_water_mark,
            trace_gc: config.trace_gc,
            gc_current_block: 0,
            gc_count: 0,
            block_erase_time: config.block_erase_time,
            page_program_time: config.page_program_time,
            page_read_time: config.page_read_time,
            logical: LogicalCounters::default(),
        })
    }

    pub fn ssd_type(&self) -> SsdType {
        self.ssd_type
    }

    pub fn num_logical_pages(&self) -> usize {
        self.num_logical_pages
    }

    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn pages_per_block(&self) -> usize {
        self.pages_per_block
    }

    pub fn num_pages(&self) -> usize {
        self.flash.num_pages()
    }

    pub fn blocks_in_use(&self) -> usize {
        self.flash.blocks_in_use()
    }

    /// Reads the logical page `lpa`. See [`FtlError`] for failure modes.
    pub fn read(&mut self, lpa: usize) -> Result<u8, FtlError> {
        self.logical.reads += 1;
        if lpa >= self.num_logical_pages {
            self.logical.read_failures += 1;
            return Err(FtlError::IllegalReadAddress);
        }
        match self.mapping.forward(lpa) {
            None => {
                self.logical.read_failures += 1;
                Err(FtlError::UninitializedRead)
            }
            Some(page) => Ok(self.flash.physical_read(page)),
        }
    }

    /// Writes `byte` to logical page `lpa`, dispatching to the configured
    /// write policy. See [`FtlError`] for failure modes.
    pub fn write(&mut self, lpa: usize, byte: u8) -> Result<(), FtlError> {
        self.logical.writes += 1;
        if lpa >= self.num_logical_pages {
            self.logical.write_failures += 1;
            return Err(FtlError::IllegalWriteAddress);
        }

        let result = match self.ssd_type {
            SsdType::Direct => {
                policy::write_direct(&mut self.flash, &mut self.mapping, self.pages_per_block, lpa, byte)
            }
            SsdType::Ideal => policy::write_ideal(&mut self.flash, &mut self.mapping, lpa, byte),
            SsdType::Logging => policy::write_logging(
                &mut self.flash,
                &mut self.mapping,
                &mut self.cursor,
                self.num_blocks,
                self.pages_per_block,
                lpa,
                byte,
            ),
        };

        if result.is_err() {
            self.logical.write_failures += 1;
        }
        result
    }

    /// Trims logical page `lpa`: the physical page it was bound to becomes
    /// dead, reclaimable only once its block is erased.
    pub fn trim(&mut self, lpa: usize) -> Result<(), FtlError> {
        self.logical.trims += 1;
        if lpa >= self.num_logical_pages {
            self.logical.trim_failures += 1;
            return Err(FtlError::IllegalTrimAddress);
        }
        if self.mapping.forward(lpa).is_none() {
            self.logical.trim_failures += 1;
            return Err(FtlError::UninitializedTrim);
        }
        self.mapping.trim(lpa);
        Ok(())
    }

    /// The host's only hook into garbage collection. A no-op unless
    /// `blocks_in_use >= gc_high_water_mark`, which in DIRECT and IDEAL
    /// modes never happens, since neither policy ever marks a block
    /// in-use. Must not be called from within `write` or GC itself.
    pub fn upkeep(&mut self) {
        if self.flash.blocks_in_use() >= self.gc_high_water_mark {
            gc::collect(self);
        }
    }

    pub fn gc_count(&self) -> u64 {
        self.gc_count
    }

    pub fn logical_counters(&self) -> LogicalCounters {
        self.logical
    }

    // --- accessors for the dump/stats collaborator ---

    pub fn forward_map(&self, lpa: usize) -> Option<usize> {
        self.mapping.forward(lpa)
    }

    pub fn page_state(&self, page: usize) -> PageState {
        self.flash.state(page)
    }

    /// The byte at `page`, or `None` if the page isn't `Valid`. The dump
    /// view only prints data for valid pages.
    pub fn page_data(&mut self, page: usize) -> Option<u8> {
        if self.flash.state(page) == PageState::Valid {
            Some(self.flash.physical_read(page))
        } else {
            None
        }
    }

    pub fn is_live(&self, page: usize) -> bool {
        self.mapping.is_live(&self.flash, page)
    }

    pub fn block_counters(&self, block: usize) -> BlockCounters {
        BlockCounters {
            erases: self.flash.erase_count(block),
            writes: self.flash.write_count(block),
            reads: self.flash.read_count(block),
        }
    }

    pub fn erase_sum(&self) -> u64 {
        self.flash.erase_sum()
    }

    pub fn write_sum(&self) -> u64 {
        self.flash.write_sum()
    }

    pub fn read_sum(&self) -> u64 {
        self.flash.read_sum()
    }

    /// Erase/program/read sums multiplied by their per-operation time
    /// constants. No real timing is simulated; these are accumulators.
    pub fn times(&self) -> (f64, f64, f64, f64) {
        let erase = self.flash.erase_sum() as f64 * self.block_erase_time;
        let write = self.flash.write_sum() as f64 * self.page_program_time;
        let read = self.flash.read_sum() as f64 * self.page_read_time;
        (erase, write, read, erase + write + read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ssd_type: SsdType) -> SsdConfig {
        SsdConfig {
            ssd_type,
            num_logical_pages: 50,
            num_blocks: 7,
            pages_per_block: 10,
            gc_high_water_mark: 10,
            gc_low_water_mark: 8,
            ..SsdConfig::default()
        }
    }

    #[test]
    fn s1_ideal_basic() {
        let mut ftl = Ftl::new(config(SsdType::Ideal)).unwrap();
        ftl.write(3, b'A').unwrap();
        assert_eq!(ftl.read(3).unwrap(), b'A');
        ftl.trim(3).unwrap();
        assert_eq!(ftl.read(3), Err(FtlError::UninitializedRead));
        assert_eq!(ftl.erase_sum(), 0);
    }

    #[test]
    fn s2_direct_write_amplification() {
        let mut ftl = Ftl::new(SsdConfig {
            ssd_type: SsdType::Direct,
            num_logical_pages: 4,
            num_blocks: 1,
            pages_per_block: 4,
            ..SsdConfig::default()
        })
        .unwrap();

        ftl.write(0, b'a').unwrap();
        ftl.write(1, b'b').unwrap();
        ftl.write(2, b'c').unwrap();
        ftl.write(3, b'd').unwrap();
        ftl.write(1, b'z').unwrap();

        assert_eq!(ftl.read(0).unwrap(), b'a');
        assert_eq!(ftl.read(1).unwrap(), b'z');
        assert_eq!(ftl.read(2).unwrap(), b'c');
        assert_eq!(ftl.read(3).unwrap(), b'd');
        assert_eq!(ftl.block_counters(0).erases, 5);
    }

    #[test]
    fn s3_logging_append() {
        let mut ftl = Ftl::new(SsdConfig {
            ssd_type: SsdType::Logging,
            num_logical_pages: 50,
            num_blocks: 2,
            pages_per_block: 4,
            ..SsdConfig::default()
        })
        .unwrap();

        ftl.write(5, b'a').unwrap();
        ftl.write(5, b'b').unwrap();
        assert_eq!(ftl.read(5).unwrap(), b'b');

        let valid_count = (0..ftl.num_pages())
            .filter(|&p| ftl.page_state(p) == PageState::Valid)
            .count();
        assert_eq!(valid_count, 2);
        let live_count = (0..ftl.num_pages()).filter(|&p| ftl.is_live(p)).count();
        assert_eq!(live_count, 1);
    }

    #[test]
    fn s4_gc_reclaims_dead_pages() {
        let mut ftl = Ftl::new(SsdConfig {
            ssd_type: SsdType::Logging,
            num_logical_pages: 50,
            num_blocks: 3,
            pages_per_block: 4,
            gc_high_water_mark: 2,
            gc_low_water_mark: 1,
            ..SsdConfig::default()
        })
        .unwrap();

        for byte in [b'a', b'b', b'c', b'd', b'e'] {
            ftl.write(0, byte).unwrap();
            ftl.upkeep();
            assert!(ftl.blocks_in_use() <= ftl.gc_high_water_mark);
        }

        assert_eq!(ftl.read(0).unwrap(), b'e');
        assert!(ftl.erase_sum() >= 1);
    }

    #[test]
    fn s5_device_full() {
        let mut ftl = Ftl::new(SsdConfig {
            ssd_type: SsdType::Logging,
            num_logical_pages: 50,
            num_blocks: 2,
            pages_per_block: 2,
            gc_high_water_mark: 99,
            gc_low_water_mark: 0,
            ..SsdConfig::default()
        })
        .unwrap();

        ftl.write(0, b'a').unwrap();
        ftl.write(1, b'b').unwrap();
        ftl.write(2, b'c').unwrap();
        ftl.write(3, b'd').unwrap();
        let result = ftl.write(4, b'e');

        assert_eq!(result, Err(FtlError::DeviceFull));
        assert_eq!(ftl.logical_counters().write_failures, 1);
    }

    #[test]
    fn s6_trim_frees_for_gc() {
        let mut ftl = Ftl::new(SsdConfig {
            ssd_type: SsdType::Logging,
            num_logical_pages: 50,
            num_blocks: 3,
            pages_per_block: 2,
            gc_high_water_mark: 2,
            gc_low_water_mark: 1,
            ..SsdConfig::default()
        })
        .unwrap();

        ftl.write(0, b'a').unwrap();
        ftl.write(1, b'b').unwrap();
        ftl.trim(0).unwrap();
        ftl.trim(1).unwrap();
        ftl.upkeep();

        assert!(ftl.blocks_in_use() <= 1);
        assert_eq!(ftl.read(0), Err(FtlError::UninitializedRead));
    }

    #[test]
    fn illegal_addresses_fail_closed() {
        let mut ftl = Ftl::new(config(SsdType::Logging)).unwrap();
        assert_eq!(ftl.read(50), Err(FtlError::IllegalReadAddress));
        assert_eq!(ftl.write(50, b'x'), Err(FtlError::IllegalWriteAddress));
        assert_eq!(ftl.trim(50), Err(FtlError::IllegalTrimAddress));
        assert_eq!(ftl.logical_counters().read_failures, 1);
        assert_eq!(ftl.logical_counters().write_failures, 1);
        assert_eq!(ftl.logical_counters().trim_failures, 1);
    }

    #[test]
    fn trim_of_never_written_page_fails() {
        let mut ftl = Ftl::new(config(SsdType::Logging)).unwrap();
        assert_eq!(ftl.trim(7), Err(FtlError::UninitializedTrim));
    }
}
