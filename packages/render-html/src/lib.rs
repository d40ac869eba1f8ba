//! # Pagecraft HTML Renderer
//!
//! Static HTML for a page. Sections sit on a 12-column CSS grid and wrap
//! the way the editor lays them out; row blocks become flex containers
//! whose columns take `flex: <width>`.
//!
//! With `editor_marks` on, every section, block and column carries a
//! `data-*-id` attribute and the selected node gets the `is-selected`
//! class, so an editor canvas can map clicks back to ids.

mod renderer;

pub use renderer::{render_to_html, HtmlRenderer, RenderError, RenderOptions, Renderer};
