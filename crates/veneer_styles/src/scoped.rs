//! Selector scoping for component styles.
//!
//! [`ScopedStylesheet`] rewrites a stylesheet so every selector also requires
//! the scope class of the owning style. The renderer puts that class on every
//! element of the component, so the rules stop matching outside of it.
//!
//! Stylesheets are parsed and printed with `lightningcss`. Selectors are
//! rewritten by a [`Visitor`] over the parsed sheet.
//!
//! # Rewrite rules
//!
//! - The class is appended to every compound selector: `a > b` becomes
//!   `a.S>b.S`.
//! - Pseudo-elements stay last: `a:hover::selection` becomes
//!   `a:hover.S::selection`. The legacy single-colon forms (`:before`,
//!   `:after`, `:first-line`, `:first-letter`) are pseudo-elements too.
//! - `:global(sel)` is replaced by `sel`, and its compound is left unscoped.
//! - Style rules nested in `@media`, `@supports`, `@container`, `@layer` and
//!   other grouping rules are scoped as well.
//! - `@keyframes`, `@font-face`, `@page` and statement at-rules have no
//!   selectors and come out unchanged.
//! - Output is re-serialized: comments are dropped and, by default, the
//!   sheet is minified.
//!
//! # Example
//!
//! ```
//! use veneer_render::style::StyleId;
//! use veneer_styles::scoped::ScopedStylesheet;
//!
//! let scoped = ScopedStylesheet::new("s");
//! let css = scoped.rewrite("a, p > b { color: red }", &StyleId::from("2p-0"))?;
//! assert_eq!(css, "a.s2p-0,p.s2p-0>b.s2p-0{color:red}");
//! # Ok::<_, veneer_styles::transform::TransformError>(())
//! ```

use std::convert::Infallible;

use lightningcss::css_modules;
use lightningcss::printer::PrinterOptions;
use lightningcss::selector::{Component, PseudoClass, Selector};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;
use lightningcss::values::ident::Ident;
use lightningcss::visit_types;
use lightningcss::visitor::{Visit, VisitTypes, Visitor};
use veneer_render::container::DEFAULT_SCOPE_PREFIX;
use veneer_render::style::StyleId;

use crate::transform::{StyleTransform, TransformError};

/// Rewrites selectors so they only match inside the owning component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedStylesheet {
    prefix: String,
    minify: bool,
}

impl Default for ScopedStylesheet {
    fn default() -> Self {
        Self::new(DEFAULT_SCOPE_PREFIX)
    }
}

impl ScopedStylesheet {
    /// Creates a rewriter whose scope class is `prefix` followed by the style
    /// ID. Output is minified.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            minify: true,
        }
    }

    /// Sets whether the rewritten sheet is minified.
    #[must_use]
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Returns the scope class prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the unescaped scope class name for a style.
    #[must_use]
    pub fn class_name(&self, style_id: &StyleId) -> String {
        format!("{}{}", self.prefix, style_id)
    }

    /// Returns the class selector (including the leading `.`) for a style,
    /// escaped the way it appears in rewritten output.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Print`] if the class cannot be serialized.
    pub fn class_selector(&self, style_id: &StyleId) -> Result<String, TransformError> {
        let class = Ident::from(self.class_name(style_id));
        let escaped = class
            .to_css_string(PrinterOptions::default())
            .map_err(|err| TransformError::Print(err.to_string()))?;
        Ok(format!(".{escaped}"))
    }

    /// Rewrites `css` for the style `style_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Parse`] if `css` is not a valid stylesheet,
    /// or [`TransformError::Print`] if the result cannot be serialized.
    pub fn rewrite(&self, css: &str, style_id: &StyleId) -> Result<String, TransformError> {
        // Modules mode parses `:global(..)`; printing runs without it so no
        // class is renamed.
        let options = ParserOptions {
            css_modules: Some(css_modules::Config::default()),
            ..ParserOptions::default()
        };
        let mut parsed = StyleSheet::parse(css, options).map_err(|err| {
            let (line, column) = err
                .loc
                .as_ref()
                .map_or((0, 0), |loc| (loc.line + 1, loc.column));
            TransformError::Parse {
                message: err.kind.to_string(),
                line,
                column,
            }
        })?;

        let mut visitor = ScopeClass {
            class: self.class_name(style_id),
        };
        let Ok(()) = parsed.visit(&mut visitor);

        let sheet = StyleSheet::new(parsed.sources, parsed.rules, ParserOptions::default());
        let printed = sheet
            .to_css(PrinterOptions {
                minify: self.minify,
                ..PrinterOptions::default()
            })
            .map_err(|err| TransformError::Print(err.to_string()))?;
        Ok(printed.code)
    }
}

impl StyleTransform for ScopedStylesheet {
    fn apply(&self, css: &str, style_id: &StyleId) -> Result<String, TransformError> {
        self.rewrite(css, style_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selector visitor
// ─────────────────────────────────────────────────────────────────────────────

/// Appends the scope class to every compound selector it visits.
struct ScopeClass {
    class: String,
}

impl ScopeClass {
    fn component<'i>(&self) -> Component<'i> {
        Component::Class(self.class.clone().into())
    }
}

impl<'i> Visitor<'i> for ScopeClass {
    type Error = Infallible;

    fn visit_types(&self) -> VisitTypes {
        visit_types!(SELECTORS)
    }

    fn visit_selector(&mut self, selector: &mut Selector<'i>) -> Result<(), Self::Error> {
        let mut scoped = Vec::new();
        // Set once the current compound has its class, or must not get one.
        let mut done = false;

        for component in selector.iter_raw_parse_order_from(0) {
            match component {
                // Pseudo-elements hang off their compound behind an implied
                // combinator; the class goes in front of it.
                Component::Combinator(combinator) if combinator.is_pseudo_element() => {
                    if !done {
                        scoped.push(self.component());
                        done = true;
                    }
                }
                Component::Combinator(_) => {
                    if !done {
                        scoped.push(self.component());
                    }
                    done = false;
                }
                Component::NonTSPseudoClass(PseudoClass::Global { .. }) => done = true,
                _ => {}
            }
            scoped.push(component.clone());
        }
        if !done {
            scoped.push(self.component());
        }

        *selector = Selector::from(scoped);
        Ok(())
    }
}
