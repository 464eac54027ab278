//! Renders an example page twice and prints the collected styles.
//!
//! # Usage
//!
//! ```bash
//! render-demo [styles_dir]
//! ```
//!
//! With `styles_dir`, the card stylesheet is read from `styles_dir/card.css`.
//! Set `VENEER_LOG` (for example `VENEER_LOG=veneer_styles=debug`) to see
//! registration decisions.

use std::path::PathBuf;

use example::{Page, Theme};
use veneer_diagnostics::{TracingConfig, TracingFormat};
use veneer_render::container::ContainerConfig;

#[tokio::main]
async fn main() {
    TracingConfig::from_env("VENEER_LOG")
        .with_format(TracingFormat::Compact)
        .init();

    let mut theme = Theme::default();
    if let Some(dir) = std::env::args().nth(1).map(PathBuf::from) {
        if !dir.is_dir() {
            eprintln!("Error: {} is not a directory", dir.display());
            std::process::exit(1);
        }
        theme = theme.with_card_dir(&dir);
    }

    let mut page = Page::new(ContainerConfig::new().with_name("demo"), 3);

    // Server pass, then a re-render of the same tree.
    for pass in ["initial", "re-render"] {
        match page.render(&theme).await {
            Ok(summary) => tracing::info!(
                pass,
                invocations = summary.invocations,
                tasks = summary.tasks,
                "render pass settled"
            ),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    for (host, element) in page.elements() {
        let scopes = element.scope_ids();
        if !scopes.is_empty() {
            println!("{host} class=\"{}\"", scopes.join(" "));
        }
        for style in element.append_styles() {
            println!("{host} <style data-style=\"{}\">{}</style>", style.style_id, style.content);
        }
    }

    match serde_json::to_string(&page.container().snapshot()) {
        Ok(json) => println!("snapshot: {json}"),
        Err(e) => eprintln!("Error: cannot serialize snapshot: {e}"),
    }
}
