//! Address-keyed intrusive free lists.
//!
//! Links live on the page descriptor itself rather than being written into
//! freed memory and recovered through a container-of cast, so a descriptor
//! is always addressed the same way whether its block is linked or not.
//! A list is just a head address (0 = empty); traversal goes through
//! [`RegionTable::descriptor`] rather than raw pointer arithmetic.

use crate::descriptor::PageDescriptor;
use crate::region::RegionTable;

/// Push `addr` onto the front of the list rooted at `*head` (LIFO).
/// `addr`'s descriptor must already carry the correct `size`.
pub fn push_front(table: &RegionTable, head: &mut usize, addr: usize) {
  let mut desc = table.descriptor(addr).expect("address in a registered region");
  debug_assert!(!desc.linked, "descriptor already linked into a free list");

  desc.prev = 0;
  desc.next = *head;
  desc.linked = true;
  table.set_descriptor(addr, desc);

  if *head != 0 {
    let mut old_head = table.descriptor(*head).expect("linked address is registered");
    old_head.prev = addr;
    table.set_descriptor(*head, old_head);
  }

  *head = addr;
}

/// Detach `addr` from the list rooted at `*head`. `addr` must currently be
/// linked into this list.
pub fn remove(table: &RegionTable, head: &mut usize, addr: usize) {
  let desc = table.descriptor(addr).expect("address in a registered region");
  debug_assert!(desc.linked, "removing a descriptor that is not linked");

  if desc.prev != 0 {
    let mut prev = table.descriptor(desc.prev).unwrap();
    prev.next = desc.next;
    table.set_descriptor(desc.prev, prev);
  } else {
    *head = desc.next;
  }

  if desc.next != 0 {
    let mut next = table.descriptor(desc.next).unwrap();
    next.prev = desc.prev;
    table.set_descriptor(desc.next, next);
  }

  let mut cleared = desc;
  cleared.prev = 0;
  cleared.next = 0;
  cleared.linked = false;
  table.set_descriptor(addr, cleared);
}

/// Detach and return the head of the list rooted at `*head`, or `None` if
/// empty.
pub fn pop_front(table: &RegionTable, head: &mut usize) -> Option<(usize, PageDescriptor)> {
  if *head == 0 {
    return None;
  }

  let addr = *head;
  let desc = table.descriptor(addr).expect("linked address is registered");
  remove(table, head, addr);
  Some((addr, desc))
}
