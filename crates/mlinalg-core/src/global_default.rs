//! Process-wide blocking parameters with atomic access.
//!
//! GEMM and the blocked LU drivers read these once at the start of a call and
//! never write them. Changing a value affects only calls that start afterwards,
//! and only their cost: blocked and naive paths compute the same product.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{KernelError, Result};

/// Default `m * k * n` volume at or below which GEMM uses the naive triple loop.
pub const DEFAULT_BLOCK_THRESHOLD: usize = 100_000;

/// Default edge length of a GEMM / LU block.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// A global default `usize` value with atomic access.
///
/// # Example
///
/// ```
/// use mlinalg_core::GlobalDefault;
///
/// static MY_DEFAULT: GlobalDefault = GlobalDefault::new(32);
///
/// assert_eq!(MY_DEFAULT.get(), 32);
/// MY_DEFAULT.set(48).unwrap();
/// assert_eq!(MY_DEFAULT.get(), 48);
/// ```
pub struct GlobalDefault {
    value: AtomicUsize,
    min: usize,
}

impl GlobalDefault {
    /// Create a new global default accepting any value.
    #[must_use]
    pub const fn new(initial: usize) -> Self {
        Self {
            value: AtomicUsize::new(initial),
            min: 0,
        }
    }

    /// Create a new global default that rejects values below `min`.
    #[must_use]
    pub const fn with_min(initial: usize, min: usize) -> Self {
        Self {
            value: AtomicUsize::new(initial),
            min,
        }
    }

    /// Get the current default value.
    #[must_use]
    pub fn get(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }

    /// Set a new default value.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidBlockSize`] if the value is below the minimum.
    pub fn set(&self, value: usize) -> Result<()> {
        if value < self.min {
            return Err(KernelError::InvalidBlockSize(value));
        }
        self.value.store(value, Ordering::Relaxed);
        Ok(())
    }
}

static BLOCK_SIZE: GlobalDefault = GlobalDefault::with_min(DEFAULT_BLOCK_SIZE, 1);
static BLOCK_THRESHOLD: GlobalDefault = GlobalDefault::new(DEFAULT_BLOCK_THRESHOLD);

/// Get the global default block size.
pub fn default_block_size() -> usize {
    BLOCK_SIZE.get()
}

/// Set the global default block size.
///
/// # Errors
/// Returns `KernelError::InvalidBlockSize` if `block_size` is zero.
pub fn set_default_block_size(block_size: usize) -> Result<()> {
    BLOCK_SIZE.set(block_size)
}

/// Get the global GEMM naive/blocked cutoff.
pub fn default_block_threshold() -> usize {
    BLOCK_THRESHOLD.get()
}

/// Set the global GEMM naive/blocked cutoff. Zero forces the blocked path.
pub fn set_default_block_threshold(threshold: usize) -> Result<()> {
    BLOCK_THRESHOLD.set(threshold)
}

/// Snapshot of the blocking parameters used by one kernel call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockConfig {
    pub block_size: usize,
    pub block_threshold: usize,
}

impl BlockConfig {
    /// Read the current global defaults.
    pub fn current() -> Self {
        Self {
            block_size: default_block_size(),
            block_threshold: default_block_threshold(),
        }
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            block_threshold: DEFAULT_BLOCK_THRESHOLD,
        }
    }
}

/// Per-call blocking overrides.
///
/// `None` fields fall back to the global defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct GemmOptions {
    pub block_size: Option<usize>,
    pub block_threshold: Option<usize>,
}

impl GemmOptions {
    /// Options that force the blocked path with the given block size.
    pub fn blocked(block_size: usize) -> Self {
        Self {
            block_size: Some(block_size),
            block_threshold: Some(0),
        }
    }

    /// Options that always take the naive path.
    pub fn naive() -> Self {
        Self {
            block_size: None,
            block_threshold: Some(usize::MAX),
        }
    }

    /// Resolve against the global defaults.
    ///
    /// # Errors
    /// Returns `KernelError::InvalidBlockSize` if the override block size is zero.
    pub fn resolve(&self) -> Result<BlockConfig> {
        let block_size = self.block_size.unwrap_or_else(default_block_size);
        if block_size == 0 {
            return Err(KernelError::InvalidBlockSize(block_size));
        }
        Ok(BlockConfig {
            block_size,
            block_threshold: self.block_threshold.unwrap_or_else(default_block_threshold),
        })
    }
}
