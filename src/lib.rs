//! An instructional SSD flash translation layer (FTL) simulator.
//!
//! Models the physical constraints of NAND flash (pages are programmed
//! once, blocks must be erased before reprogramming, and erases are orders
//! of magnitude slower than reads) behind a logical page-addressed
//! read/write/trim interface backed by three interchangeable FTL
//! strategies: DIRECT, LOGGING, and IDEAL. Used to study write
//! amplification, garbage collection behavior, and timing across designs.
//!
//! This crate is the core: the flash state machine, the write policies,
//! and the garbage collector. Argument parsing, workload generation, and
//! dump/stats rendering are peripheral collaborators that live in the
//! `ssdsim` binary and talk to this crate only through [`Ftl`]'s public
//! methods.

pub mod config;
pub mod flash;
mod cursor;
mod gc;
mod mapping;
mod policy;
pub mod ftl;

pub use config::{ConfigError, SsdConfig};
pub use flash::PageState;
pub use ftl::{BlockCounters, Ftl, FtlError, LogicalCounters};
pub use policy::SsdType;
