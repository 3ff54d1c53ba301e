//! Fixed-size pages over an ordered sequence.
//!
//! All functions are pure; the caller owns the revealed page count.

use std::num::NonZeroUsize;

/// Number of pages needed to cover `len` items.
pub fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
  len.div_ceil(page_size.get())
}

/// Everything revealed so far: the first `revealed` pages.
pub fn page_slice<T>(sequence: &[T], page_size: NonZeroUsize, revealed: usize) -> &[T] {
  let end = revealed.saturating_mul(page_size.get()).min(sequence.len());
  &sequence[..end]
}

/// The single page after the first `current` pages, and the new revealed
/// count. The count never exceeds [`page_count`]; once everything is
/// revealed the slice is empty.
pub fn next_slice<T>(sequence: &[T], page_size: NonZeroUsize, current: usize) -> (&[T], usize) {
  let pages = page_count(sequence.len(), page_size);
  if current >= pages {
    return (&[], pages);
  }
  let start = current * page_size.get();
  let end = (start + page_size.get()).min(sequence.len());
  (&sequence[start..end], current + 1)
}

pub fn has_more<T>(sequence: &[T], page_size: NonZeroUsize, revealed: usize) -> bool {
  revealed.saturating_mul(page_size.get()) < sequence.len()
}

/// Items not yet revealed.
pub fn remaining<T>(sequence: &[T], page_size: NonZeroUsize, revealed: usize) -> usize {
  sequence.len() - page_slice(sequence, page_size, revealed).len()
}
