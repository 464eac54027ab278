//! Idempotent style registration.
//!
//! [`use_styles`] and [`use_styles_scoped`] attach a stylesheet to the
//! invoking component. A registration goes through four stages:
//!
//! 1. **Guard**: the call-site's sequential slot is read. If an earlier pass
//!    already ran this call-site, nothing else happens.
//! 2. **Identity**: the [`StyleId`] is derived from the style's symbol and the
//!    call-site's slot index.
//! 3. **Element**: the host element's style state is initialized and, for
//!    scoped styles, the scope token is recorded. This happens even when the
//!    style is a duplicate, because every scoped component needs the class.
//! 4. **Dedup**: if the container has not seen the ID, it is registered, a
//!    position is reserved on the element, and a resolve-and-transform task
//!    is handed to the render pass's completion barrier.
//!
//! Registration never awaits. The resolved content only shows up in
//! [`ElementContext::append_styles`](veneer_render::element::ElementContext::append_styles)
//! once [`RenderContext::finish`](veneer_render::context::RenderContext::finish)
//! has returned.
//!
//! # Example
//!
//! ```
//! use veneer_render::container::ContainerState;
//! use veneer_render::context::RenderContext;
//! use veneer_render::scope::ComponentInstance;
//! use veneer_styles::{StyleRef, use_styles_scoped};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut container = ContainerState::default();
//! let host = container.create_host("button");
//! let mut button = ComponentInstance::new(host.clone());
//! let styles = StyleRef::inline("button.css", "button { color: red }");
//!
//! let mut pass = RenderContext::new(&mut container);
//! pass.render(&mut button, |cx| use_styles_scoped(cx, &styles))?;
//! pass.finish().await?;
//!
//! let element = container.find_element_context(host.id()).unwrap();
//! assert_eq!(element.scope_ids().len(), 1);
//! assert!(element.append_styles()[0].content.starts_with("button."));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use veneer_render::barrier::TaskError;
use veneer_render::container::{ContainerConfig, ContainerState};
use veneer_render::context::InvocationContext;
use veneer_render::element::HostElement;
use veneer_render::style::StyleId;

use crate::error::StyleError;
use crate::hooks::{StyleEvent, StyleHooks};
use crate::reference::{StyleRef, derive_style_id};
use crate::scoped::ScopedStylesheet;
use crate::transform::{Identity, StyleTransform};

/// Value stored in a registration call-site's sequential slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StyleSlot {
    /// The call-site has not registered its style yet.
    #[default]
    NotRun,
    /// The call-site registered its style on an earlier pass.
    Ran,
}

/// What a registration call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The call-site already registered on an earlier pass; no effects.
    Skipped,
    /// Another call-site already registered this style in the container.
    /// Only the scope token (if scoped) was recorded.
    Deduplicated {
        /// Identity of the style.
        style_id: StyleId,
    },
    /// The style was registered and its resolution scheduled on the
    /// completion barrier.
    Scheduled {
        /// Identity of the style.
        style_id: StyleId,
    },
}

impl Registration {
    /// Returns the style identity, unless the call was skipped.
    #[must_use]
    pub fn style_id(&self) -> Option<&StyleId> {
        match self {
            Self::Skipped => None,
            Self::Deduplicated { style_id } | Self::Scheduled { style_id } => Some(style_id),
        }
    }

    /// Returns `true` if a resolution task was scheduled.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled { .. })
    }
}

/// Registers `styles` for the invoking component, unscoped.
///
/// # Errors
///
/// Returns [`StyleError::Scope`] if the call-site's slot holds a value of
/// another type, meaning the component's hook order changed.
pub fn use_styles(
    cx: &mut InvocationContext<'_, '_>,
    styles: &StyleRef,
) -> Result<Registration, StyleError> {
    register(cx, styles, false, |_| Identity)
}

/// Registers `styles` for the invoking component, scoped to it.
///
/// The host element receives the scope token and the stylesheet is rewritten
/// with [`ScopedStylesheet`] using the container's scope prefix.
///
/// # Errors
///
/// Returns [`StyleError::Scope`] if the call-site's slot holds a value of
/// another type.
pub fn use_styles_scoped(
    cx: &mut InvocationContext<'_, '_>,
    styles: &StyleRef,
) -> Result<Registration, StyleError> {
    register(cx, styles, true, |config| {
        ScopedStylesheet::new(config.scope_prefix())
    })
}

/// Registers `styles` with a caller-supplied transform.
///
/// `scoped` only controls whether the scope token is recorded on the host
/// element; the transform is used as given.
///
/// # Errors
///
/// Returns [`StyleError::Scope`] if the call-site's slot holds a value of
/// another type.
pub fn use_styles_with<T: StyleTransform>(
    cx: &mut InvocationContext<'_, '_>,
    styles: &StyleRef,
    transform: T,
    scoped: bool,
) -> Result<Registration, StyleError> {
    register(cx, styles, scoped, |_| transform)
}

fn register<T, F>(
    cx: &mut InvocationContext<'_, '_>,
    styles: &StyleRef,
    scoped: bool,
    make_transform: F,
) -> Result<Registration, StyleError>
where
    T: StyleTransform,
    F: FnOnce(&ContainerConfig) -> T,
{
    let slot = cx.use_sequential_scope::<StyleSlot>()?;
    if slot.get() == Some(&StyleSlot::Ran) {
        tracing::trace!(host = %cx.host(), slot = slot.index(), "style call-site already ran");
        return Ok(Registration::Skipped);
    }
    cx.commit(&slot, StyleSlot::Ran);

    let style_id = derive_style_id(styles, slot.index());
    let host = cx.host().clone();
    let element = cx.element_context();
    element.ensure();
    if scoped {
        element.add_scope(cx.container().config().scope_token(&style_id));
    }

    let hooks = cx.container().extension::<StyleHooks>();

    if cx.container().has_style(&style_id) {
        tracing::debug!(style_id = %style_id, host = %host, scoped, "style already registered");
        notify(
            hooks.as_deref(),
            StyleEvent::Deduplicated {
                style_id: style_id.clone(),
                host,
                scoped,
            },
        );
        return Ok(Registration::Deduplicated { style_id });
    }

    cx.container_mut().add_style(style_id.clone());
    let ticket = element.reserve_append(style_id.clone());
    let transform = make_transform(cx.container().config());

    tracing::debug!(style_id = %style_id, host = %host, scoped, "style registered");
    notify(
        hooks.as_deref(),
        StyleEvent::Registered {
            style_id: style_id.clone(),
            host: host.clone(),
            scoped,
        },
    );

    let label = format!("style {style_id} for {host}");
    let styles = styles.clone();
    let task_id = style_id.clone();
    cx.wait_on(label, async move {
        let outcome = resolve_styles(&styles, &host, &task_id, &transform).await;
        match outcome {
            Ok(content) => {
                let bytes = content.len();
                element.fill_append(ticket, content);
                tracing::debug!(style_id = %task_id, host = %host, bytes, "style resolved");
                notify(
                    hooks.as_deref(),
                    StyleEvent::Resolved {
                        style_id: task_id,
                        host,
                        bytes,
                    },
                );
                Ok(())
            }
            Err(error) => {
                notify(
                    hooks.as_deref(),
                    StyleEvent::Failed {
                        style_id: task_id,
                        host,
                        error: error.to_string(),
                    },
                );
                Err(TaskError::from(error))
            }
        }
    });

    Ok(Registration::Scheduled { style_id })
}

async fn resolve_styles<T: StyleTransform>(
    styles: &StyleRef,
    host: &HostElement,
    style_id: &StyleId,
    transform: &T,
) -> Result<String, StyleError> {
    let text = styles
        .resolve(host)
        .await
        .map_err(|source| StyleError::Resolution {
            style_id: style_id.clone(),
            source,
        })?;

    transform
        .apply(&text, style_id)
        .map_err(|source| StyleError::Transform {
            style_id: style_id.clone(),
            source,
        })
}

fn notify(hooks: Option<&StyleHooks>, event: StyleEvent) {
    if let Some(hooks) = hooks {
        hooks.invoke(&event);
    }
}

/// Installs `hooks` on a container, replacing any previous registry.
///
/// Registrations in later passes notify the installed observers.
pub fn install_hooks(
    container: &mut ContainerState,
    hooks: StyleHooks,
) -> Option<Arc<StyleHooks>> {
    container.insert_extension(hooks)
}
