//! Log cursor for LOGGING mode: tracks the next free physical page and
//! advances monotonically within a block, re-acquiring a new block when the
//! current one fills.

use crate::flash::{FlashArray, PageState};
use crate::ftl::FtlError;

#[derive(Debug)]
pub struct Cursor {
    current_block: usize,
    current_page: Option<usize>,
}

impl Cursor {
    pub fn new() -> Self {
        Cursor {
            current_block: 0,
            current_page: None,
        }
    }

    /// The block the cursor is pinned to, whether or not a page within it
    /// is currently active. The GC never reclaims this block.
    pub fn block(&self) -> usize {
        self.current_block
    }

    /// Returns the physical page to program next, acquiring a fresh block
    /// if none is currently active. Scans circularly starting at
    /// `current_block` over all `num_blocks`; a block is free only if its
    /// first page is non-`Valid`.
    pub fn acquire(&mut self, flash: &mut FlashArray, num_blocks: usize) -> Result<usize, FtlError> {
        if let Some(page) = self.current_page {
            return Ok(page);
        }

        for i in 0..num_blocks {
            let block = (self.current_block + i) % num_blocks;
            let first_page = block * flash.pages_per_block();
            match flash.state(first_page) {
                PageState::Invalid | PageState::Erased => {
                    if flash.state(first_page) == PageState::Invalid {
                        flash.physical_erase(block);
                    }
                    self.current_block = block;
                    self.current_page = Some(first_page);
                    flash.mark_in_use(block);
                    return Ok(first_page);
                }
                PageState::Valid => continue,
            }
        }

        Err(FtlError::DeviceFull)
    }

    /// Advances one page past the page just programmed. If that lands on
    /// the first page of the next block, the cursor goes inactive so the
    /// next `acquire` re-searches, meaning a freshly acquired block runs
    /// exactly `pages_per_block` programs before re-acquisition.
    pub fn advance(&mut self, pages_per_block: usize) {
        let page = self
            .current_page
            .expect("cursor advance with no active page");
        let next = page + 1;
        self.current_page = if next % pages_per_block == 0 {
            None
        } else {
            Some(next)
        };
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_erases_first_use_of_invalid_block() {
        let mut flash = FlashArray::new(2, 4);
        let mut cursor = Cursor::new();
        let page = cursor.acquire(&mut flash, 2).unwrap();
        assert_eq!(page, 0);
        assert_eq!(flash.erase_sum(), 1);
        assert!(flash.is_in_use(0));
    }

    #[test]
    fn advance_reacquires_after_pages_per_block_programs() {
        let mut flash = FlashArray::new(2, 2);
        let mut cursor = Cursor::new();

        let p0 = cursor.acquire(&mut flash, 2).unwrap();
        flash.physical_program(p0, b'a');
        cursor.advance(2);

        let p1 = cursor.acquire(&mut flash, 2).unwrap();
        assert_eq!(p1, p0 + 1);
        flash.physical_program(p1, b'b');
        cursor.advance(2);

        // Block 0 is full; the cursor must re-search and land in block 1.
        let p2 = cursor.acquire(&mut flash, 2).unwrap();
        assert_eq!(p2, 2);
    }

    #[test]
    fn device_full_when_no_block_is_free() {
        let mut flash = FlashArray::new(1, 2);
        let mut cursor = Cursor::new();
        let p0 = cursor.acquire(&mut flash, 1).unwrap();
        flash.physical_program(p0, b'a');
        cursor.advance(2);
        let p1 = cursor.acquire(&mut flash, 1).unwrap();
        flash.physical_program(p1, b'b');
        cursor.advance(2);

        assert!(matches!(
            cursor.acquire(&mut flash, 1),
            Err(FtlError::DeviceFull)
        ));
    }

    #[test]
    fn block_with_valid_first_page_is_skipped_even_if_later_pages_are_erased() {
        let mut flash = FlashArray::new(2, 2);
        flash.physical_erase(0);
        flash.physical_program(0, b'a'); // block 0's first page is Valid
        flash.physical_erase(1); // block 1 is free

        let mut cursor = Cursor::new();
        let page = cursor.acquire(&mut flash, 2).unwrap();
        assert_eq!(page, 2, "block 0 must be skipped: only its first page is checked");
    }
}
