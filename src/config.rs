//! Construction-time configuration and validation.

use thiserror::Error;

use crate::policy::SsdType;

/// Construction parameters for an [`crate::Ftl`]. Validated once, up front,
/// by [`crate::Ftl::new`]; never re-checked on the hot path.
#[derive(Debug, Clone)]
pub struct SsdConfig {
    pub ssd_type: SsdType,
    pub num_logical_pages: usize,
    pub num_blocks: usize,
    pub pages_per_block: usize,
    pub block_erase_time: f64,
    pub page_program_time: f64,
    pub page_read_time: f64,
    pub gc_high_water_mark: usize,
    pub gc_low_water_mark: usize,
    pub trace_gc: bool,
    pub show_state: bool,
}

impl Default for SsdConfig {
    fn default() -> Self {
        SsdConfig {
            ssd_type: SsdType::Direct,
            num_logical_pages: 50,
            num_blocks: 7,
            pages_per_block: 10,
            block_erase_time: 1000.0,
            page_program_time: 40.0,
            page_read_time: 10.0,
            gc_high_water_mark: 10,
            gc_low_water_mark: 8,
            trace_gc: false,
            show_state: false,
        }
    }
}

/// Closed set of construction-time misconfigurations. Distinct from
/// [`crate::FtlError`]: these can only happen once, before any operation
/// runs, so mixing them into the per-operation error set would make that
/// set no longer small.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("num_blocks must be greater than zero")]
    ZeroBlocks,
    #[error("pages_per_block must be greater than zero")]
    ZeroPagesPerBlock,
    #[error("num_logical_pages must be greater than zero")]
    ZeroLogicalPages,
    #[error("{ssd_type:?} requires num_logical_pages ({logical}) <= num_blocks * pages_per_block ({physical}): it writes the logical address as the physical address and cannot relocate")]
    InPlaceAddressSpaceTooSmall {
        ssd_type: SsdType,
        logical: usize,
        physical: usize,
    },
    #[error("gc_low_water_mark ({low}) must not exceed gc_high_water_mark ({high})")]
    InvertedWaterMarks { low: usize, high: usize },
}

impl SsdConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.num_blocks == 0 {
            return Err(ConfigError::ZeroBlocks);
        }
        if self.pages_per_block == 0 {
            return Err(ConfigError::ZeroPagesPerBlock);
        }
        if self.num_logical_pages == 0 {
            return Err(ConfigError::ZeroLogicalPages);
        }
        let num_pages = self.num_blocks * self.pages_per_block;
        let writes_in_place = matches!(self.ssd_type, SsdType::Direct | SsdType::Ideal);
        if writes_in_place && self.num_logical_pages > num_pages {
            return Err(ConfigError::InPlaceAddressSpaceTooSmall {
                ssd_type: self.ssd_type,
                logical: self.num_logical_pages,
                physical: num_pages,
            });
        }
        if self.gc_low_water_mark > self.gc_high_water_mark {
            return Err(ConfigError::InvertedWaterMarks {
                low: self.gc_low_water_mark,
                high: self.gc_high_water_mark,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SsdConfig::default().validate().is_ok());
    }

    #[test]
    fn direct_oversize_rejected() {
        let config = SsdConfig {
            ssd_type: SsdType::Direct,
            num_logical_pages: 100,
            num_blocks: 7,
            pages_per_block: 10,
            ..SsdConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InPlaceAddressSpaceTooSmall {
                ssd_type: SsdType::Direct,
                logical: 100,
                physical: 70
            })
        );
    }

    #[test]
    fn ideal_oversize_rejected() {
        // IDEAL also writes the logical address as the physical address
        // (see `policy::write_ideal`), so it is bound by the same rule.
        let config = SsdConfig {
            ssd_type: SsdType::Ideal,
            num_logical_pages: 100,
            num_blocks: 7,
            pages_per_block: 10,
            ..SsdConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InPlaceAddressSpaceTooSmall {
                ssd_type: SsdType::Ideal,
                logical: 100,
                physical: 70
            })
        );
    }

    #[test]
    fn logging_is_not_bound_by_the_in_place_address_space_rule() {
        let config = SsdConfig {
            ssd_type: SsdType::Logging,
            num_logical_pages: 100,
            num_blocks: 7,
            pages_per_block: 10,
            ..SsdConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_water_marks_rejected() {
        let config = SsdConfig {
            gc_high_water_mark: 2,
            gc_low_water_mark: 5,
            ..SsdConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedWaterMarks { low: 5, high: 2 })
        );
    }
}
