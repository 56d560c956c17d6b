//! The allocator facade: the only public surface over the region table,
//! buddy page allocator, and slab object allocator.

use crate::bits;
use crate::buddy::BuddyAllocator;
use crate::config::{MAX_SMALL_ORDER, PAGE_SIZE};
use crate::error::Error;
use crate::region::RegionTable;
use crate::slab::{self, SlabAllocator};
use log::debug;
use spin::Mutex;

/// The combined two-tier physical memory allocator.
///
/// Single-threaded and non-reentrant by contract (see the crate's
/// concurrency notes): the [`Mutex`] wrapping the global instance exists so
/// a caller on one thread cannot observe another in-progress call's
/// half-updated state, not to claim SMP safety.
pub struct Allocator {
  regions: RegionTable,
  buddy: BuddyAllocator,
  slab: SlabAllocator,
}

impl Allocator {
  pub const fn new() -> Self {
    Allocator {
      regions: RegionTable::new(),
      buddy: BuddyAllocator::new(),
      slab: SlabAllocator::new(),
    }
  }

  /// Register a page-aligned physical extent and donate its allocatable
  /// prefix to the page allocator.
  pub fn register_region(&mut self, addr: usize, size: usize) -> Result<(), Error> {
    let idx = self.regions.register(addr, size)?;
    let region = self.regions.region(idx);
    let (base, alloc_size) = (region.base(), region.alloc_size());
    debug!("registered region {addr:#x}+{size:#x}, {alloc_size:#x} allocatable");
    self.buddy.donate(&self.regions, base, alloc_size);
    Ok(())
  }

  /// Allocate `size` bytes. Returns `None` for a zero-size request or when
  /// no region can satisfy it.
  pub fn allocate(&mut self, size: usize) -> Option<usize> {
    if size == 0 {
      return None;
    }

    if slab::is_small(size) {
      let order = slab::class_for_size(size);
      self.slab.allocate(&self.regions, &mut self.buddy, order)
    } else {
      let aligned = bits::align_up(size, PAGE_SIZE);
      self.buddy.allocate(&self.regions, aligned)
    }
  }

  /// Release a pointer previously returned by [`Allocator::allocate`]. A
  /// null pointer is a no-op; freeing an unknown pointer is a programmer
  /// error (sanitised builds assert).
  pub fn deallocate(&mut self, addr: usize) {
    if addr == 0 {
      return;
    }

    let page_addr = bits::align_down(addr, PAGE_SIZE);
    let desc = self.regions.descriptor(page_addr);
    debug_assert!(desc.is_some(), "deallocate of an address outside any region");
    let Some(desc) = desc else { return };

    if desc.size > (1 << MAX_SMALL_ORDER) {
      self.buddy.free(&self.regions, desc.addr, desc.size);
    } else {
      self.slab.deallocate(&self.regions, &mut self.buddy, desc.addr, desc.size, addr);
    }
  }

  #[cfg(test)]
  pub(crate) fn regions(&self) -> &RegionTable {
    &self.regions
  }

  #[cfg(test)]
  pub(crate) fn buddy(&self) -> &BuddyAllocator {
    &self.buddy
  }
}

impl Default for Allocator {
  fn default() -> Self {
    Self::new()
  }
}

lazy_static::lazy_static! {
  /// The process-wide allocator instance. Callers register one or more
  /// regions before the first allocation.
  pub static ref ALLOCATOR: Mutex<Allocator> = Mutex::new(Allocator::new());
}

/// Register a region with the global allocator.
pub fn register_region(addr: usize, size: usize) -> Result<(), Error> {
  ALLOCATOR.lock().register_region(addr, size)
}

/// Allocate from the global allocator.
pub fn allocate(size: usize) -> Option<usize> {
  ALLOCATOR.lock().allocate(size)
}

/// Deallocate through the global allocator.
pub fn deallocate(addr: usize) {
  ALLOCATOR.lock().deallocate(addr)
}
