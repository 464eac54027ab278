//! Example page for the `render-demo` binary.
//!
//! The page is a tiny component tree:
//!
//! ```text
//! app            use_styles(global)
//! ├── header     use_styles_scoped(header)
//! ├── card × N   use_styles_scoped(card), use_styles(global)
//! └── footer     use_styles(global)
//! ```
//!
//! Every card shares one stylesheet, so only the first card's element
//! receives the content while all of them carry the scope class.

use std::path::Path;

use veneer_render::barrier::BarrierError;
use veneer_render::container::{ContainerConfig, ContainerState};
use veneer_render::context::{InvocationContext, RenderContext, RenderSummary};
use veneer_render::element::{ElementContext, HostElement};
use veneer_render::scope::ComponentInstance;
use veneer_styles::{StyleError, StyleRef, use_styles, use_styles_scoped};

/// Errors raised while rendering the page.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// A component's registration call failed.
    #[error(transparent)]
    Style(#[from] StyleError),

    /// Background style resolution failed.
    #[error(transparent)]
    Barrier(#[from] BarrierError),
}

/// Stylesheets used by the page.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Shared, unscoped styles.
    pub global: StyleRef,
    /// Header styles, scoped.
    pub header: StyleRef,
    /// Card styles, scoped and shared by every card.
    pub card: StyleRef,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            global: StyleRef::inline("theme/global.css", "body { margin: 0 }"),
            header: StyleRef::inline(
                "theme/header.css",
                "h1 { font-size: 2rem } nav a:hover { color: teal }",
            ),
            card: StyleRef::inline(
                "theme/card.css",
                ".card, .card::before { padding: 8px } @media print { .card { border: 0 } }",
            ),
        }
    }
}

impl Theme {
    /// Loads the card stylesheet from `dir/card.css` instead of the built-in
    /// text.
    #[must_use]
    pub fn with_card_dir(mut self, dir: &Path) -> Self {
        self.card = StyleRef::file(dir.join("card.css"));
        self
    }
}

fn app(cx: &mut InvocationContext<'_, '_>, theme: &Theme) -> Result<(), StyleError> {
    use_styles(cx, &theme.global)?;
    Ok(())
}

fn header(cx: &mut InvocationContext<'_, '_>, theme: &Theme) -> Result<(), StyleError> {
    use_styles_scoped(cx, &theme.header)?;
    Ok(())
}

fn card(cx: &mut InvocationContext<'_, '_>, theme: &Theme) -> Result<(), StyleError> {
    use_styles_scoped(cx, &theme.card)?;
    use_styles(cx, &theme.global)?;
    Ok(())
}

/// A rendered page: its container and component instances.
#[derive(Debug)]
pub struct Page {
    container: ContainerState,
    app: ComponentInstance,
    header: ComponentInstance,
    cards: Vec<ComponentInstance>,
    footer: ComponentInstance,
}

impl Page {
    /// Creates a page with `cards` card components.
    #[must_use]
    pub fn new(config: ContainerConfig, cards: usize) -> Self {
        let mut container = ContainerState::new(config);
        let app = ComponentInstance::new(container.create_host("app"));
        let header = ComponentInstance::new(container.create_host("header"));
        let cards = (0..cards)
            .map(|_| ComponentInstance::new(container.create_host("article")))
            .collect();
        let footer = ComponentInstance::new(container.create_host("footer"));
        Self {
            container,
            app,
            header,
            cards,
            footer,
        }
    }

    /// Runs one render pass over the whole tree and waits for it to settle.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError`] if registration or resolution fails.
    pub async fn render(&mut self, theme: &Theme) -> Result<RenderSummary, DemoError> {
        let mut pass = RenderContext::new(&mut self.container);
        pass.render(&mut self.app, |cx| app(cx, theme))?;
        pass.render(&mut self.header, |cx| header(cx, theme))?;
        for instance in &mut self.cards {
            pass.render(instance, |cx| card(cx, theme))?;
        }
        pass.render(&mut self.footer, |cx| app(cx, theme))?;
        Ok(pass.finish().await?)
    }

    /// Returns the container state.
    #[must_use]
    pub fn container(&self) -> &ContainerState {
        &self.container
    }

    /// Returns every host element with its style state, in tree order.
    #[must_use]
    pub fn elements(&self) -> Vec<(HostElement, ElementContext)> {
        core::iter::once(&self.app)
            .chain(core::iter::once(&self.header))
            .chain(&self.cards)
            .chain(core::iter::once(&self.footer))
            .filter_map(|instance| {
                let host = instance.host().clone();
                self.container
                    .find_element_context(host.id())
                    .map(|context| (host, context))
            })
            .collect()
    }
}
