//! The three interchangeable FTL write policies. The facade selects one at
//! construction and dispatches to it from `write`; there is no dynamic
//! dispatch because the set of policies is closed.

use crate::cursor::Cursor;
use crate::flash::{FlashArray, PageState};
use crate::ftl::FtlError;
use crate::mapping::MappingTables;

/// Which write policy an `Ftl` was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsdType {
    Direct,
    Logging,
    Ideal,
}

impl std::str::FromStr for SsdType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(SsdType::Direct),
            "log" => Ok(SsdType::Logging),
            "ideal" => Ok(SsdType::Ideal),
            other => Err(format!("bad SSD type ({other})")),
        }
    }
}

/// DIRECT: read-modify-erase-rewrite the whole block, using the logical
/// address as the physical address. No relocation is possible.
pub(crate) fn write_direct(
    flash: &mut FlashArray,
    mapping: &mut MappingTables,
    pages_per_block: usize,
    lpa: usize,
    byte: u8,
) -> Result<(), FtlError> {
    let block = lpa / pages_per_block;
    let page_begin = block * pages_per_block;
    let page_end = page_begin + pages_per_block;

    let mut survivors = Vec::new();
    for page in page_begin..page_end {
        if flash.state(page) == PageState::Valid {
            survivors.push((page, flash.physical_read(page)));
        }
    }

    flash.physical_erase(block);
    for (page, data) in survivors {
        if page == lpa {
            continue;
        }
        flash.physical_program(page, data);
    }

    flash.physical_program(lpa, byte);
    mapping.bind(lpa, lpa);
    Ok(())
}

/// IDEAL: program in place, no erase, no constraints. Physically
/// unrealizable; exists as a write-amplification lower bound. Like DIRECT,
/// it uses the logical address as the physical address, so `SsdConfig`
/// rejects `num_logical_pages > num_blocks * pages_per_block` for this
/// policy too.
pub(crate) fn write_ideal(
    flash: &mut FlashArray,
    mapping: &mut MappingTables,
    lpa: usize,
    byte: u8,
) -> Result<(), FtlError> {
    flash.physical_program(lpa, byte);
    mapping.bind(lpa, lpa);
    Ok(())
}

/// LOGGING: append at the cursor, overwriting any earlier binding for
/// `lpa`. The page the old binding pointed at becomes dead but stays
/// `Valid` until its block is erased by the GC.
pub(crate) fn write_logging(
    flash: &mut FlashArray,
    mapping: &mut MappingTables,
    cursor: &mut Cursor,
    num_blocks: usize,
    pages_per_block: usize,
    lpa: usize,
    byte: u8,
) -> Result<(), FtlError> {
    let page = cursor.acquire(flash, num_blocks)?;
    flash.physical_program(page, byte);
    mapping.bind(lpa, page);
    cursor.advance(pages_per_block);
    Ok(())
}
