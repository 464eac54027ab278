//! Sequential hook slots.
//!
//! A component instance owns an ordered list of slots, one per hook call-site.
//! On every render pass the invocation walks the list from index zero, so the
//! n-th hook call always lands on the n-th slot. Values written into a slot
//! persist across passes for as long as the instance lives.
//!
//! Slots are type-erased (`Box<dyn Any + Send + Sync>`) and downcast on read,
//! so different hooks can store different value types side by side.

use core::any::{Any, type_name};

use crate::element::HostElement;

/// Errors raised by the sequential slot primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// The slot holds a value of another type, meaning the hook sequence of
    /// the component changed between passes.
    #[error("hook slot {index} does not hold a value of type {expected}")]
    SlotTypeMismatch {
        /// Slot index within the component's hook sequence.
        index: usize,
        /// Type the caller attempted to read.
        expected: &'static str,
    },
}

/// Read view of one sequential slot, returned by
/// [`InvocationContext::use_sequential_scope`](crate::context::InvocationContext::use_sequential_scope).
#[derive(Debug, Clone)]
pub struct SlotHandle<T> {
    index: usize,
    previous: Option<T>,
}

impl<T> SlotHandle<T> {
    /// Returns the call-site index of this slot.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the value committed by an earlier pass, if any.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.previous.as_ref()
    }
}

/// Persistent state of one component instance.
///
/// Created once when the component is first instantiated and passed to every
/// render pass that re-runs it.
pub struct ComponentInstance {
    host: HostElement,
    slots: Vec<Option<Box<dyn Any + Send + Sync>>>,
    renders: usize,
}

impl core::fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("host", &self.host)
            .field("slots", &self.slots.len())
            .field("renders", &self.renders)
            .finish()
    }
}

impl ComponentInstance {
    /// Creates an instance rendering into `host`.
    #[must_use]
    pub fn new(host: HostElement) -> Self {
        Self {
            host,
            slots: Vec::new(),
            renders: 0,
        }
    }

    /// Returns the host element.
    #[must_use]
    pub fn host(&self) -> &HostElement {
        &self.host
    }

    /// Returns the number of slots allocated so far.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns how many times the instance has been invoked.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub(crate) fn begin_render(&mut self) {
        self.renders += 1;
    }

    /// Reads slot `index`, allocating it empty on first visit.
    pub(crate) fn read_slot<T>(&mut self, index: usize) -> Result<SlotHandle<T>, ScopeError>
    where
        T: Clone + Send + Sync + 'static,
    {
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }

        let previous = match &self.slots[index] {
            None => None,
            Some(value) => Some(
                value
                    .downcast_ref::<T>()
                    .cloned()
                    .ok_or(ScopeError::SlotTypeMismatch {
                        index,
                        expected: type_name::<T>(),
                    })?,
            ),
        };

        Ok(SlotHandle { index, previous })
    }

    pub(crate) fn write_slot<T>(&mut self, index: usize, value: T)
    where
        T: Send + Sync + 'static,
    {
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(Box::new(value));
    }
}
