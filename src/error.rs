//! Typed errors for the region table's public surface.
//!
//! `allocate`/`deallocate` never return an `Error`: out-of-memory collapses
//! to `None` so the hot path stays a single sentinel.

use core::fmt;

/// Failure modes for [`crate::Allocator::register_region`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Error {
  /// `size` was zero, not a multiple of the page size, or `addr` was null.
  InvalidArgument,
  /// The region is too small to hold its own descriptor metadata.
  OutOfRange,
  /// The region table already holds `MAX_NUM_REGIONS` entries.
  NoSpace,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let msg = match self {
      Error::InvalidArgument => "invalid argument",
      Error::OutOfRange => "region too small for its own metadata",
      Error::NoSpace => "region table is full",
    };
    f.write_str(msg)
  }
}

#[cfg(test)]
impl std::error::Error for Error {}
