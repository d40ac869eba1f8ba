use pagecraft_editor::layout::{column_spans, section_rows};
use pagecraft_editor::Selection;
use pagecraft_model::page::GRID_UNITS;
use pagecraft_model::{
    Alignment, Block, BlockData, CardData, Column, GalleryData, LinkStyle, MediaItem, Page,
    RowData, Section, TableData,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while rendering a page
#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("Row block {0} has no columns")]
    EmptyRow(String),
}

/// Options for HTML rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Document title
    pub title: String,
    /// Emit `data-*-id` attributes and the `is-selected` class
    pub editor_marks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            title: "Untitled page".to_string(),
            editor_marks: true,
        }
    }
}

/// Turns a page into some output format
pub trait Renderer {
    fn render(&self, page: &Page, selection: &Selection) -> Result<String, RenderError>;
}

/// Static HTML output: sections on a 12-column CSS grid, rows as flex
/// containers
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    pub options: RenderOptions,
}

impl HtmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, page: &Page, selection: &Selection) -> Result<String, RenderError> {
        let mut ctx = Context::new(self.options.clone(), selection);

        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line("<html>");
        ctx.indent();

        render_head(&mut ctx);

        ctx.add_line("<body>");
        ctx.indent();
        ctx.add_line("<main class=\"pc-page\">");
        ctx.indent();

        for row in section_rows(&page.sections) {
            ctx.add_line("<div class=\"pc-grid\">");
            ctx.indent();
            for section in row {
                render_section(section, &mut ctx)?;
            }
            ctx.dedent();
            ctx.add_line("</div>");
        }

        ctx.dedent();
        ctx.add_line("</main>");
        ctx.dedent();
        ctx.add_line("</body>");

        ctx.dedent();
        ctx.add_line("</html>");

        debug!(
            sections = page.sections.len(),
            blocks = page.block_count(),
            "rendered page"
        );
        Ok(ctx.get_output())
    }
}

/// Render a page without any selection
pub fn render_to_html(page: &Page, options: RenderOptions) -> Result<String, RenderError> {
    HtmlRenderer::new(options).render(page, &Selection::None)
}

struct Context<'a> {
    options: RenderOptions,
    selection: &'a Selection,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: RenderOptions, selection: &'a Selection) -> Self {
        Self {
            options,
            selection,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    /// ` data-<kind>-id="…"` plus the selection class, or nothing when
    /// editor marks are off
    fn marks(&self, kind: &str, id: &str, classes: &str) -> String {
        if !self.options.editor_marks {
            return format!(" class=\"{}\"", classes);
        }

        let selected = if self.selection.is_selected(id) {
            " is-selected"
        } else {
            ""
        };
        format!(
            " class=\"{}{}\" data-{}-id=\"{}\"",
            classes,
            selected,
            kind,
            escape_html(id)
        )
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

fn render_head(ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = escape_html(&ctx.options.title);
    ctx.add_line(&format!("<title>{}</title>", title));

    ctx.add_line("<style>");
    ctx.indent();
    ctx.add_line(&format!(
        ".pc-grid {{ display: grid; grid-template-columns: repeat({}, 1fr); gap: 16px; }}",
        GRID_UNITS
    ));
    ctx.add_line(".pc-row { display: flex; gap: 16px; }");
    ctx.add_line(".pc-column { min-width: 0; }");
    if ctx.options.editor_marks {
        ctx.add_line(".is-selected { outline: 2px solid #3366ff; }");
    }
    ctx.dedent();
    ctx.add_line("</style>");

    ctx.dedent();
    ctx.add_line("</head>");
}

fn render_section(section: &Section, ctx: &mut Context) -> Result<(), RenderError> {
    let marks = ctx.marks("section", section.id.as_str(), "pc-section");
    ctx.add_line(&format!(
        "<section{} style=\"grid-column: span {};\">",
        marks,
        section.width.get()
    ));
    ctx.indent();

    render_blocks(&section.blocks, ctx)?;

    ctx.dedent();
    ctx.add_line("</section>");
    Ok(())
}

fn render_blocks(blocks: &[Block], ctx: &mut Context) -> Result<(), RenderError> {
    for block in blocks {
        render_block(block, ctx)?;
    }
    Ok(())
}

fn render_block(block: &Block, ctx: &mut Context) -> Result<(), RenderError> {
    let classes = format!("pc-block pc-{}", block.kind());
    let marks = ctx.marks("block", block.id.as_str(), &classes);
    ctx.add_line(&format!("<div{}>", marks));
    ctx.indent();

    match &block.data {
        BlockData::Heading(heading) => {
            let level = heading.level.clamp(1, 6);
            let style = text_style(heading.alignment, heading.color.as_deref(), None);
            ctx.add_line(&format!(
                "<h{level}{style}>{}</h{level}>",
                escape_html(&heading.text)
            ));
        }

        BlockData::Text(text) => {
            let style = text_style(text.alignment, text.color.as_deref(), text.font_size);
            ctx.add_line(&format!("<p{}>{}</p>", style, escape_html(&text.content)));
        }

        BlockData::List(list) => {
            let tag = if list.ordered { "ol" } else { "ul" };
            ctx.add_line(&format!("<{}>", tag));
            ctx.indent();
            for item in &list.items {
                ctx.add_line(&format!("<li>{}</li>", escape_html(item)));
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }

        BlockData::Image(image) => {
            if image.src.is_empty() {
                ctx.add_line("<div class=\"pc-placeholder\">No image</div>");
            } else {
                let item = MediaItem {
                    src: image.src.clone(),
                    alt: image.alt.clone(),
                    caption: image.caption.clone(),
                };
                match &image.href {
                    Some(href) => {
                        ctx.add_line(&format!("<a href=\"{}\">", safe_url(href)));
                        ctx.indent();
                        render_figure(&item, ctx);
                        ctx.dedent();
                        ctx.add_line("</a>");
                    }
                    None => render_figure(&item, ctx),
                }
            }
        }

        BlockData::Gallery(gallery) => render_gallery(gallery, ctx),

        BlockData::Carousel(carousel) => {
            ctx.add_line(&format!(
                "<div class=\"pc-carousel\" data-autoplay=\"{}\" data-interval=\"{}\">",
                carousel.autoplay, carousel.interval_ms
            ));
            ctx.indent();
            for (index, item) in carousel.images.iter().enumerate() {
                let hidden = if index == 0 { "" } else { " hidden" };
                ctx.add_line(&format!("<div class=\"pc-slide\"{}>", hidden));
                ctx.indent();
                render_figure(item, ctx);
                ctx.dedent();
                ctx.add_line("</div>");
            }
            ctx.dedent();
            ctx.add_line("</div>");
        }

        BlockData::Tabs(tabs) => {
            ctx.add_line("<div role=\"tablist\">");
            ctx.indent();
            for (index, tab) in tabs.tabs.iter().enumerate() {
                ctx.add_line(&format!(
                    "<button role=\"tab\" aria-selected=\"{}\">{}</button>",
                    index == 0,
                    escape_html(&tab.title)
                ));
            }
            ctx.dedent();
            ctx.add_line("</div>");
            for (index, tab) in tabs.tabs.iter().enumerate() {
                let hidden = if index == 0 { "" } else { " hidden" };
                ctx.add_line(&format!(
                    "<div role=\"tabpanel\"{}>{}</div>",
                    hidden,
                    escape_html(&tab.content)
                ));
            }
        }

        BlockData::Accordion(accordion) => {
            for item in &accordion.items {
                ctx.add_line("<details>");
                ctx.indent();
                ctx.add_line(&format!("<summary>{}</summary>", escape_html(&item.title)));
                ctx.add_line(&format!("<div>{}</div>", escape_html(&item.content)));
                ctx.dedent();
                ctx.add_line("</details>");
            }
        }

        BlockData::Link(link) => {
            let class = match link.style {
                LinkStyle::Button => "pc-button",
                LinkStyle::Text => "pc-text-link",
            };
            let target = if link.new_tab {
                " target=\"_blank\" rel=\"noopener noreferrer\""
            } else {
                ""
            };
            ctx.add_line(&format!(
                "<a class=\"{}\" href=\"{}\"{}>{}</a>",
                class,
                safe_url(&link.href),
                target,
                escape_html(&link.text)
            ));
        }

        BlockData::Spacer(spacer) => {
            ctx.add_line(&format!(
                "<div class=\"pc-spacer\" style=\"height: {}px;\"></div>",
                spacer.height
            ));
        }

        BlockData::Video(video) => {
            if video.url.is_empty() {
                ctx.add_line("<div class=\"pc-placeholder\">No video</div>");
            } else {
                let mut flags = String::new();
                if video.controls {
                    flags.push_str(" controls");
                }
                if video.autoplay {
                    flags.push_str(" autoplay muted");
                }
                ctx.add_line(&format!(
                    "<video src=\"{}\"{}></video>",
                    safe_url(&video.url),
                    flags
                ));
            }
        }

        BlockData::Card(card) => render_card(card, ctx)?,

        BlockData::Table(table) => render_table(table, ctx),

        BlockData::Row(row) => render_row(block.id.as_str(), row, ctx)?,
    }

    ctx.dedent();
    ctx.add_line("</div>");
    Ok(())
}

fn render_figure(item: &MediaItem, ctx: &mut Context) {
    ctx.add_line("<figure>");
    ctx.indent();
    ctx.add_line(&format!(
        "<img src=\"{}\" alt=\"{}\" />",
        safe_url(&item.src),
        escape_html(&item.alt)
    ));
    if let Some(caption) = &item.caption {
        ctx.add_line(&format!("<figcaption>{}</figcaption>", escape_html(caption)));
    }
    ctx.dedent();
    ctx.add_line("</figure>");
}

fn render_gallery(gallery: &GalleryData, ctx: &mut Context) {
    ctx.add_line(&format!(
        "<div class=\"pc-gallery\" style=\"display: grid; grid-template-columns: repeat({}, 1fr);\">",
        gallery.columns.max(1)
    ));
    ctx.indent();
    for item in &gallery.images {
        render_figure(item, ctx);
    }
    ctx.dedent();
    ctx.add_line("</div>");
}

fn render_card(card: &CardData, ctx: &mut Context) -> Result<(), RenderError> {
    match card.background.as_deref().and_then(css_value) {
        Some(background) => ctx.add_line(&format!(
            "<div class=\"pc-card\" style=\"background: {};\">",
            background
        )),
        None => ctx.add_line("<div class=\"pc-card\">"),
    }
    ctx.indent();

    if let Some(title) = &card.title {
        ctx.add_line(&format!("<h3>{}</h3>", escape_html(title)));
    }
    render_blocks(&card.blocks, ctx)?;

    ctx.dedent();
    ctx.add_line("</div>");
    Ok(())
}

fn render_table(table: &TableData, ctx: &mut Context) {
    ctx.add_line("<table>");
    ctx.indent();

    if !table.headers.is_empty() {
        ctx.add_line("<thead>");
        ctx.indent();
        let cells: String = table
            .headers
            .iter()
            .map(|h| format!("<th>{}</th>", escape_html(h)))
            .collect();
        ctx.add_line(&format!("<tr>{}</tr>", cells));
        ctx.dedent();
        ctx.add_line("</thead>");
    }

    ctx.add_line("<tbody>");
    ctx.indent();
    for row in &table.rows {
        let cells: String = row
            .iter()
            .map(|cell| match &cell.href {
                Some(href) => format!(
                    "<td><a href=\"{}\">{}</a></td>",
                    safe_url(href),
                    escape_html(&cell.text)
                ),
                None => format!("<td>{}</td>", escape_html(&cell.text)),
            })
            .collect();
        ctx.add_line(&format!("<tr>{}</tr>", cells));
    }
    ctx.dedent();
    ctx.add_line("</tbody>");

    ctx.dedent();
    ctx.add_line("</table>");
}

fn render_row(block_id: &str, row: &RowData, ctx: &mut Context) -> Result<(), RenderError> {
    if row.columns.is_empty() {
        return Err(RenderError::EmptyRow(block_id.to_string()));
    }

    match row.gap {
        Some(gap) => ctx.add_line(&format!("<div class=\"pc-row\" style=\"gap: {}px;\">", gap)),
        None => ctx.add_line("<div class=\"pc-row\">"),
    }
    ctx.indent();

    let spans = column_spans(&row.columns);
    for (column, span) in row.columns.iter().zip(spans) {
        render_column(column, span, ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</div>");
    Ok(())
}

fn render_column(column: &Column, span: u8, ctx: &mut Context) -> Result<(), RenderError> {
    let classes = format!("pc-column pc-span-{}", span);
    let marks = ctx.marks("column", column.id.as_str(), &classes);
    ctx.add_line(&format!(
        "<div{} style=\"flex: {};\">",
        marks,
        column.width.get()
    ));
    ctx.indent();

    render_blocks(&column.blocks, ctx)?;

    ctx.dedent();
    ctx.add_line("</div>");
    Ok(())
}

fn text_style(alignment: Option<Alignment>, color: Option<&str>, font_size: Option<u32>) -> String {
    let mut rules = Vec::new();
    if let Some(alignment) = alignment {
        let value = match alignment {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        };
        rules.push(format!("text-align: {};", value));
    }
    if let Some(color) = color.and_then(css_value) {
        rules.push(format!("color: {};", color));
    }
    if let Some(size) = font_size {
        rules.push(format!("font-size: {}px;", size));
    }

    if rules.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", rules.join(" "))
    }
}

/// Escaped URL; script URLs become `#`
fn safe_url(url: &str) -> String {
    // Browsers drop whitespace and control characters inside a scheme
    let scheme: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    if scheme.starts_with("javascript:") || scheme.starts_with("vbscript:") {
        return "#".to_string();
    }
    escape_html(url)
}

/// Escaped single CSS value, or `None` if it could break out of its declaration
fn css_value(value: &str) -> Option<String> {
    let lowered = value.to_ascii_lowercase();
    let breaks_out = value
        .chars()
        .any(|c| matches!(c, ';' | '{' | '}' | '\\') || c.is_control())
        || lowered.contains("url(")
        || lowered.contains("expression(");
    if breaks_out || value.trim().is_empty() {
        return None;
    }
    Some(escape_html(value.trim()))
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
