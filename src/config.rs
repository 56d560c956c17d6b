//! Compile-time allocator parameters.
//!
//! Kernel-level tunables are fixed `const`s rather than a runtime
//! configuration struct: a physical page allocator runs before a heap, an
//! environment, or a filesystem exists.

/// Log2 of the page size. `PAGE_SIZE = 1 << PAGE_SHIFT`.
pub const PAGE_SHIFT: usize = 12;

/// The page size in bytes.
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;

/// Mask for the offset within a page.
pub const PAGE_MASK: usize = PAGE_SIZE - 1;

#[cfg(not(feature = "test_only_small_constants"))]
mod sizes {
  /// Maximum number of regions that may be registered.
  pub const MAX_NUM_REGIONS: usize = 4;

  /// Maximum buddy order. A block may span up to `2^MAX_BLOCK_ORDER` pages.
  pub const MAX_BLOCK_ORDER: usize = 16;
}

#[cfg(feature = "test_only_small_constants")]
mod sizes {
  /// Maximum number of regions that may be registered (shrunk for tests).
  pub const MAX_NUM_REGIONS: usize = 4;

  /// Maximum buddy order (shrunk for tests so proptest can explore
  /// exhaustively without multi-gigabyte simulated regions).
  pub const MAX_BLOCK_ORDER: usize = 6;
}

pub use sizes::{MAX_BLOCK_ORDER, MAX_NUM_REGIONS};

/// Storage capacity of a slab block's allocation bitmap, in bits.
pub const MAX_ALLOC_COUNT: usize = 128;

/// Smallest slab size class order. Requests below `1 << MIN_ALLOC_ORDER`
/// bytes are rounded up to this class.
pub const MIN_ALLOC_ORDER: usize = 5;

/// Largest slab size class order. Requests above `1 << MAX_SMALL_ORDER`
/// bytes are served directly by the page allocator.
pub const MAX_SMALL_ORDER: usize = PAGE_SHIFT - 1;

/// Number of valid slab size classes, `MIN_ALLOC_ORDER..=MAX_SMALL_ORDER`.
pub const VALID_ORDER_COUNT: usize = MAX_SMALL_ORDER - MIN_ALLOC_ORDER + 1;

/// Per-class slab block order `B(o)`, indexed by `o - MIN_ALLOC_ORDER`.
///
/// The profile is data, not code: any non-decreasing mapping satisfying
/// `2^(PAGE_SHIFT + B(o)) / 2^o <= MAX_ALLOC_COUNT` for every class is a
/// valid substitute. This default keeps 32/64/128-byte chunks to a single
/// page, doubles up for 256 and 512, and gives the two largest classes a
/// full 8-page block.
pub const ALLOC_BLOCK_ORDER: [usize; VALID_ORDER_COUNT] = [0, 0, 0, 1, 2, 3, 3];

/// Number of bitmap words backing a slab header's `alloc_map`, sized to
/// comfortably hold `MAX_ALLOC_COUNT` bits on a 64-bit target.
pub const ALLOC_MAP_WORDS: usize = MAX_ALLOC_COUNT / (usize::BITS as usize);

static_assertions::const_assert!(MAX_SMALL_ORDER < PAGE_SHIFT);
static_assertions::const_assert!(MIN_ALLOC_ORDER < MAX_SMALL_ORDER);
static_assertions::const_assert!(VALID_ORDER_COUNT == ALLOC_BLOCK_ORDER.len());
