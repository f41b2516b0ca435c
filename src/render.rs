//! Markdown conversion and page templates.
//!
//! Two pure collaborators of the emitter:
//!
//! - [`markdown_to_html`] converts a Markdown body to an HTML fragment with
//!   pulldown-cmark. Deterministic for identical input, no I/O.
//! - Named page templates, written as compile-time [maud](https://maud.lambda.xyz/)
//!   functions behind a by-name lookup. The emitter resolves the configured
//!   template name per page; an unknown name is a page-scoped error, not a
//!   run-fatal one.
//!
//! The template receives exactly the context the core pipeline produces —
//! title, converted content, the navigation view, and the current page path —
//! plus the cosmetic config fields (lang, theme, footer, nav title). The
//! stylesheet is embedded at compile time; there is no template directory to
//! ship or get out of sync.

use crate::nav::NavPage;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

const CSS: &str = include_str!("../static/style.css");

/// Convert a Markdown body to an HTML fragment.
pub fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new(text);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// Everything a template needs to render one page.
pub struct PageContext<'a> {
    pub title: &'a str,
    /// Converted page body (already HTML).
    pub content: Markup,
    /// Navigation view resolved against this page.
    pub pages: &'a [NavPage],
    /// Canonical path of this page.
    pub current_page: &'a str,
    pub lang: &'a str,
    pub theme_mode: &'a str,
    pub footer: &'a str,
    pub nav_title: &'a str,
}

/// A page template: pure function from context to a full HTML document.
pub type TemplateFn = fn(&PageContext) -> Markup;

/// Resolve a template by its configured name.
///
/// `None` means the page cannot be rendered; the emitter skips it and
/// reports the failure without aborting the run.
pub fn lookup_template(name: &str) -> Option<TemplateFn> {
    match name {
        "default" => Some(default_template),
        "plain" => Some(plain_template),
        _ => None,
    }
}

/// Base document shared by all templates.
fn base_document(ctx: &PageContext, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(ctx.lang) data-theme=(ctx.theme_mode) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (ctx.title) " - docmd" }
                style { (PreEscaped(CSS)) }
            }
            body data-page=(ctx.current_page) {
                (body)
                @if !ctx.footer.is_empty() {
                    footer { small { (ctx.footer) } }
                }
            }
        }
    }
}

/// Default template: navigation sidebar plus content column.
fn default_template(ctx: &PageContext) -> Markup {
    let body = html! {
        main {
            nav.sidebar {
                h4 { (ctx.nav_title) }
                ul { @for page in ctx.pages { (nav_item(page)) } }
            }
            div.content {
                h1 { (ctx.title) }
                (ctx.content)
            }
        }
    };
    base_document(ctx, body)
}

/// Plain template: content only, no sidebar. Useful for embedding.
fn plain_template(ctx: &PageContext) -> Markup {
    let body = html! {
        main {
            div.content {
                h1 { (ctx.title) }
                (ctx.content)
            }
        }
    };
    base_document(ctx, body)
}

/// One navigation entry, recursing into children. Folder titles render bold;
/// the active chain and the current page get CSS classes.
fn nav_item(page: &NavPage) -> Markup {
    html! {
        li.nav-item.active[page.is_active] {
            a.nav-link.current[page.is_current] href=(page.href) {
                @if page.is_folder { strong { (page.title) } } @else { (page.title) }
            }
            @if !page.children.is_empty() {
                ul { @for child in &page.children { (nav_item(child)) } }
            }
        }
    }
}
