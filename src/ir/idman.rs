use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifier of a [`Context`](crate::ir::Context).
///
/// Every handle produced by a context carries the context's ID, so that
/// handles from different contexts can never be mixed silently.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct ContextId(NonZeroU32);

/// Type of `Value` identifier.
///
/// The IDs of `Value`s are unique in one context.
pub(crate) type ValueId = NonZeroU32;

/// The value of `ContextId` should start from 1,
/// because we want to use `NonZeroU32` to enable some
/// memory layout optimization.
const CONTEXT_ID_STARTS_FROM: u32 = 1;

/// Same as `CONTEXT_ID_STARTS_FROM`.
const VALUE_ID_STARTS_FROM: u32 = 1;

/// The next context ID.
///
/// Contexts may be created on different threads, so this one is global.
static NEXT_CONTEXT_ID: AtomicU32 = AtomicU32::new(CONTEXT_ID_STARTS_FROM);

/// Gets the next context ID.
pub(crate) fn next_context_id() -> ContextId {
  let id = NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed);
  ContextId(NonZeroU32::new(id).expect("context ID overflowed"))
}

/// Value ID allocator of one context.
pub(crate) struct ValueIdAllocator {
  next: u32,
}

impl ValueIdAllocator {
  pub(crate) fn new() -> Self {
    Self {
      next: VALUE_ID_STARTS_FROM,
    }
  }

  /// Gets the next value ID.
  pub(crate) fn next_id(&mut self) -> ValueId {
    let id = NonZeroU32::new(self.next).expect("value ID overflowed");
    self.next += 1;
    id
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn unique_ids() {
    assert_ne!(next_context_id(), next_context_id());
    let mut alloc = ValueIdAllocator::new();
    let first = alloc.next_id();
    assert_eq!(first.get(), VALUE_ID_STARTS_FROM);
    assert_ne!(first, alloc.next_id());
  }
}
