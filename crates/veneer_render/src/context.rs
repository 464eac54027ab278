//! Render pass and component invocation contexts.
//!
//! ```text
//! ContainerState (style registry, element contexts, extensions)
//!    │  &mut, for the duration of one pass
//!    └── RenderContext (completion barrier)
//!           │  one per component invocation
//!           └── InvocationContext (component instance, hook cursor)
//! ```
//!
//! A [`RenderContext`] is created per render pass and finished with
//! [`RenderContext::finish`], which waits on every background task the pass
//! registered. Each component run inside the pass gets an
//! [`InvocationContext`] that binds the component's persistent
//! [`ComponentInstance`] and walks its hook slots in call order.
//!
//! # Example
//!
//! ```
//! use veneer_render::container::ContainerState;
//! use veneer_render::context::RenderContext;
//! use veneer_render::scope::ComponentInstance;
//!
//! # tokio_test::block_on(async {
//! let mut container = ContainerState::default();
//! let host = container.create_host("div");
//! let mut instance = ComponentInstance::new(host);
//!
//! let mut pass = RenderContext::new(&mut container);
//! pass.render(&mut instance, |cx| {
//!     let slot = cx.use_sequential_scope::<bool>()?;
//!     if slot.get() != Some(&true) {
//!         cx.commit(&slot, true);
//!     }
//!     Ok::<_, veneer_render::scope::ScopeError>(())
//! })?;
//! let summary = pass.finish().await?;
//! assert_eq!(summary.invocations, 1);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```

use core::future::Future;

use tracing::span::EnteredSpan;

use crate::barrier::{BarrierError, CompletionBarrier, TaskError};
use crate::container::ContainerState;
use crate::element::{ElementContext, HostElement};
use crate::scope::{ComponentInstance, ScopeError, SlotHandle};

/// Outcome of a settled render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Number of component invocations in the pass.
    pub invocations: usize,
    /// Number of background tasks awaited by the completion barrier.
    pub tasks: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// RenderContext
// ─────────────────────────────────────────────────────────────────────────────

/// State of one render pass.
pub struct RenderContext<'c> {
    container: &'c mut ContainerState,
    barrier: CompletionBarrier,
    invocations: usize,
}

impl core::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderContext")
            .field("container", &self.container.config().name())
            .field("barrier", &self.barrier)
            .field("invocations", &self.invocations)
            .finish()
    }
}

impl<'c> RenderContext<'c> {
    /// Starts a render pass over `container`.
    #[must_use]
    pub fn new(container: &'c mut ContainerState) -> Self {
        Self {
            container,
            barrier: CompletionBarrier::new(),
            invocations: 0,
        }
    }

    /// Returns the container state.
    #[must_use]
    pub fn container(&self) -> &ContainerState {
        self.container
    }

    /// Returns the container state mutably.
    pub fn container_mut(&mut self) -> &mut ContainerState {
        self.container
    }

    /// Registers a background task the pass must wait on.
    pub fn wait_on<F>(&mut self, label: impl Into<String>, task: F)
    where
        F: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.barrier.push(label, task);
    }

    /// Returns the number of registered background tasks.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.barrier.len()
    }

    /// Begins an invocation of `instance` within this pass.
    ///
    /// The returned context starts at hook slot zero.
    pub fn invoke<'r>(
        &'r mut self,
        instance: &'r mut ComponentInstance,
    ) -> InvocationContext<'r, 'c> {
        self.invocations += 1;
        instance.begin_render();
        let span = tracing::debug_span!(
            "invoke",
            container = %self.container.config().name(),
            host = %instance.host(),
            render = instance.render_count(),
        )
        .entered();

        InvocationContext {
            render: self,
            instance,
            cursor: 0,
            _span: span,
        }
    }

    /// Invokes `instance` and runs `component` against its context.
    pub fn render<R>(
        &mut self,
        instance: &mut ComponentInstance,
        component: impl FnOnce(&mut InvocationContext<'_, 'c>) -> R,
    ) -> R {
        let mut cx = self.invoke(instance);
        component(&mut cx)
    }

    /// Finishes the pass, waiting until every background task settles.
    ///
    /// # Errors
    ///
    /// Returns [`BarrierError`] if any task failed. Every task still runs to
    /// completion before the error is returned.
    pub async fn finish(self) -> Result<RenderSummary, BarrierError> {
        let invocations = self.invocations;
        let tasks = self.barrier.settle().await?;
        tracing::debug!(invocations, tasks, "render pass settled");
        Ok(RenderSummary { invocations, tasks })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InvocationContext
// ─────────────────────────────────────────────────────────────────────────────

/// Context of a single component invocation.
///
/// Hooks are called through this context. Each call to
/// [`use_sequential_scope`](Self::use_sequential_scope) consumes the next slot
/// of the component instance, so hook order must be the same on every pass.
pub struct InvocationContext<'r, 'c> {
    render: &'r mut RenderContext<'c>,
    instance: &'r mut ComponentInstance,
    cursor: usize,
    _span: EnteredSpan,
}

impl InvocationContext<'_, '_> {
    /// Returns the host element of the invoked component.
    #[must_use]
    pub fn host(&self) -> &HostElement {
        self.instance.host()
    }

    /// Returns the index the next sequential slot will use.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reads the next sequential slot and advances the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::SlotTypeMismatch`] if the slot was written with a
    /// different value type on an earlier pass.
    pub fn use_sequential_scope<T>(&mut self) -> Result<SlotHandle<T>, ScopeError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let index = self.cursor;
        self.cursor += 1;
        self.instance.read_slot(index)
    }

    /// Stores `value` into the slot behind `slot`.
    pub fn commit<T>(&mut self, slot: &SlotHandle<T>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.instance.write_slot(slot.index(), value);
    }

    /// Returns the container state.
    #[must_use]
    pub fn container(&self) -> &ContainerState {
        self.render.container()
    }

    /// Returns the container state mutably.
    pub fn container_mut(&mut self) -> &mut ContainerState {
        self.render.container_mut()
    }

    /// Returns the element context of the host element.
    pub fn element_context(&mut self) -> ElementContext {
        let host = self.instance.host().clone();
        self.render.container_mut().element_context(&host)
    }

    /// Registers a background task on the enclosing render pass.
    pub fn wait_on<F>(&mut self, label: impl Into<String>, task: F)
    where
        F: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.render.wait_on(label, task);
    }
}
