//! Per-page descriptors.
//!
//! A descriptor is the single metadata record backing both tiers of the
//! allocator: the page allocator uses it to record a buddy block's leader
//! address/size and free-list links, the slab allocator overwrites the same
//! `addr`/`size` pair on every page of a block so any page's descriptor can
//! route a chunk pointer back to its owning block in O(1).
//!
//! Address `0` is never a legitimate block or chunk address (page zero is
//! reserved, matching kernel convention), so it doubles as the "empty" /
//! "unlinked" sentinel for both `addr` and the free-list `prev`/`next`
//! fields.

/// A single page's metadata record.
///
/// The first page of a free or allocated block is its **leader** and
/// carries the block's real `addr`/`size`; the remaining pages of the block
/// are **followers** with `addr == 0, size == 0`, except inside a slab
/// block, where every page (leader and followers alike) carries the block
/// base address and the chunk size of its size class.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct PageDescriptor {
  /// The address this descriptor represents, or 0 if unused/follower.
  pub addr: usize,
  /// The size in bytes this descriptor represents (buddy block size or,
  /// inside a slab block, the chunk size of the owning class), or 0.
  pub size: usize,
  /// Address of the previous leader on this descriptor's free list, 0 if
  /// this is the list head.
  pub prev: usize,
  /// Address of the next leader on this descriptor's free list, 0 if this
  /// is the list tail.
  pub next: usize,
  /// Whether this descriptor is currently linked into a free list. Needed
  /// because a singleton list has `prev == next == 0`, indistinguishable
  /// from "not linked" without an explicit flag.
  pub linked: bool,
}

impl PageDescriptor {
  /// A cleared (follower / unused) descriptor.
  pub const EMPTY: PageDescriptor = PageDescriptor {
    addr: 0,
    size: 0,
    prev: 0,
    next: 0,
    linked: false,
  };

  /// True if this descriptor currently carries no addr/size (a follower, or
  /// an unused metadata-page slot).
  pub fn is_empty(&self) -> bool {
    self.addr == 0 && self.size == 0
  }
}
