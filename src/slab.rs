//! The slab object allocator: sub-page allocation layered on the buddy page
//! allocator.
//!
//! A slab block is a buddy allocation whose first bytes hold a header
//! (an allocation bitmap); every page descriptor belonging to the block is
//! stamped with the block's base address and its class's chunk size, so a
//! chunk pointer routes back to its block from any of its pages in O(1).
//! The header's bit 0 is permanently reserved, and the leader descriptor's
//! free-list link fields are repurposed to track partial-list membership
//! while the block serves as a slab (it left the buddy free list the
//! moment it was carved out, so there is no conflict of use).

use crate::bits::{self, Bitmap};
use crate::buddy::BuddyAllocator;
use crate::config::{
  ALLOC_BLOCK_ORDER, ALLOC_MAP_WORDS, MAX_SMALL_ORDER, MIN_ALLOC_ORDER, PAGE_SHIFT, PAGE_SIZE,
  VALID_ORDER_COUNT,
};
use crate::descriptor::PageDescriptor;
use crate::list;
use crate::region::RegionTable;
use core::ptr;
use log::debug;

#[derive(Copy, Clone)]
struct SlabHeader {
  alloc_map: Bitmap<ALLOC_MAP_WORDS>,
}

fn class_index(order: usize) -> usize {
  order - MIN_ALLOC_ORDER
}

fn block_order(order: usize) -> usize {
  ALLOC_BLOCK_ORDER[class_index(order)]
}

fn block_size(order: usize) -> usize {
  PAGE_SIZE << block_order(order)
}

/// Total bitmap slots for a class, reserved bit 0 included.
fn total_slots(order: usize) -> usize {
  1 << (PAGE_SHIFT + block_order(order) - order)
}

/// Smallest class able to satisfy `size` bytes, at least `MIN_ALLOC_ORDER`.
pub fn class_for_size(size: usize) -> usize {
  core::cmp::max(MIN_ALLOC_ORDER, bits::ceil_log2(size))
}

/// True if `size` belongs to the slab range rather than the page allocator.
pub fn is_small(size: usize) -> bool {
  size <= (1 << MAX_SMALL_ORDER)
}

pub struct SlabAllocator {
  partial_heads: [usize; VALID_ORDER_COUNT],
}

impl SlabAllocator {
  pub const fn new() -> Self {
    SlabAllocator {
      partial_heads: [0; VALID_ORDER_COUNT],
    }
  }

  /// Allocate one chunk of the size class for `order`.
  pub fn allocate(
    &mut self,
    table: &RegionTable,
    buddy: &mut BuddyAllocator,
    order: usize,
  ) -> Option<usize> {
    let idx = class_index(order);
    let chunk = 1usize << order;
    let capacity = total_slots(order);

    let block_base = if self.partial_heads[idx] != 0 {
      self.partial_heads[idx]
    } else {
      let size = block_size(order);
      let base = buddy.allocate(table, size)?;
      debug!("slab: new order-{order} block at {base:#x} ({size} bytes)");

      let mut header = SlabHeader {
        alloc_map: Bitmap::new(capacity),
      };
      header.alloc_map.set_bit(0);
      write_header(base, header);

      let pages = size >> PAGE_SHIFT;
      for i in 0..pages {
        table.set_descriptor(base + (i << PAGE_SHIFT), PageDescriptor {
          addr: base,
          size: chunk,
          prev: 0,
          next: 0,
          linked: false,
        });
      }

      list::push_front(table, &mut self.partial_heads[idx], base);
      base
    };

    let mut header = read_header(block_base);
    let slot = header.alloc_map.lowest_free_index()?;
    header.alloc_map.set_bit(slot);
    write_header(block_base, header);

    if header.alloc_map.popcount() == capacity {
      list::remove(table, &mut self.partial_heads[idx], block_base);
    }

    Some(block_base + (slot << order))
  }

  /// Release a chunk previously returned by [`SlabAllocator::allocate`].
  /// `chunk_size` is the class's chunk size, as recorded on the pointer's
  /// page descriptor.
  pub fn deallocate(
    &mut self,
    table: &RegionTable,
    buddy: &mut BuddyAllocator,
    block_base: usize,
    chunk_size: usize,
    addr: usize,
  ) {
    let order = bits::floor_log2(chunk_size);
    let idx = class_index(order);
    let capacity = total_slots(order);
    let slot = (addr - block_base) >> order;
    debug_assert!(slot > 0 && slot < capacity, "chunk index out of range");

    let leader = table.descriptor(block_base).expect("block leader is registered");
    if !leader.linked {
      list::push_front(table, &mut self.partial_heads[idx], block_base);
    }

    let mut header = read_header(block_base);
    header.alloc_map.clear_bit(slot);
    write_header(block_base, header);

    if header.alloc_map.popcount() == 1 {
      list::remove(table, &mut self.partial_heads[idx], block_base);
      buddy.free(table, block_base, block_size(order));
    }
  }
}

impl Default for SlabAllocator {
  fn default() -> Self {
    Self::new()
  }
}

fn read_header(block_base: usize) -> SlabHeader {
  unsafe { ptr::read(block_base as *const SlabHeader) }
}

fn write_header(block_base: usize, header: SlabHeader) {
  unsafe { ptr::write(block_base as *mut SlabHeader, header) };
}
