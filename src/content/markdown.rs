//! Markdown body scanning using pulldown-cmark.
//!
//! Walks the event stream once and collects what the index needs:
//! heading and paragraph text (in document order) and image references.
//! No HTML is rendered.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Options for markdown parsing
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

/// Kind of a text-bearing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    /// Explicit paragraphs and the loose text of tight list items.
    Paragraph,
}

/// One heading or paragraph, whitespace-normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub text: String,
}

/// Everything the extractor needs from a markdown body.
#[derive(Debug, Clone, Default)]
pub struct BodyScan {
    pub blocks: Vec<TextBlock>,
    /// Image destinations in document order, as written.
    pub images: Vec<String>,
}

impl BodyScan {
    /// Text of the first heading, or `""`.
    pub fn title(&self) -> &str {
        self.first(BlockKind::Heading)
    }

    /// Text of the first paragraph, or `""`.
    pub fn description(&self) -> &str {
        self.first(BlockKind::Paragraph)
    }

    /// All heading and paragraph text joined by single spaces.
    pub fn content(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn first(&self, kind: BlockKind) -> &str {
        self.blocks
            .iter()
            .find(|b| b.kind == kind)
            .map_or("", |b| b.text.as_str())
    }
}

/// Open block on the scanner stack.
struct StackFrame {
    kind: BlockKind,
    buffer: String,
}

/// Single-pass markdown scanner
struct BodyScanner {
    /// Open text blocks; text goes to the innermost one
    stack: Vec<StackFrame>,
    /// Nesting depth of regions whose text is not indexed (code, tables)
    skip_depth: usize,
    out: BodyScan,
}

impl BodyScanner {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            skip_depth: 0,
            out: BodyScan::default(),
        }
    }

    fn scan(mut self, markdown: &str, options: &MarkdownOptions) -> BodyScan {
        let parser = Parser::new_ext(markdown, options.to_pulldown_options());

        for event in parser {
            self.handle_event(event);
        }

        // Unbalanced input cannot happen with pulldown-cmark, but flush anyway
        while !self.stack.is_empty() {
            self.close_block();
        }
        self.out
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) | Event::Code(text) => self.add_text(text.as_ref()),
            Event::SoftBreak | Event::HardBreak => self.add_text(" "),
            Event::Html(_)
            | Event::InlineHtml(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_)
            | Event::FootnoteReference(_)
            | Event::TaskListMarker(_)
            | Event::Rule => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { .. } => self.open_block(BlockKind::Heading),
            Tag::Paragraph | Tag::Item => self.open_block(BlockKind::Paragraph),
            Tag::CodeBlock(_) | Tag::Table(_) | Tag::MetadataBlock(_) | Tag::HtmlBlock => {
                self.skip_depth += 1;
            }
            Tag::Image { dest_url, .. } => self.out.images.push(dest_url.into_string()),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) | TagEnd::Paragraph | TagEnd::Item => self.close_block(),
            TagEnd::CodeBlock | TagEnd::Table | TagEnd::MetadataBlock(_) | TagEnd::HtmlBlock => {
                self.skip_depth = self.skip_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Open a block, first flushing text already collected by the parent
    /// so blocks come out in document order.
    fn open_block(&mut self, kind: BlockKind) {
        if let Some(parent) = self.stack.last_mut() {
            let text = std::mem::take(&mut parent.buffer);
            let parent_kind = parent.kind;
            self.emit(parent_kind, &text);
        }
        self.stack.push(StackFrame {
            kind,
            buffer: String::new(),
        });
    }

    fn close_block(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.emit(frame.kind, &frame.buffer);
        }
    }

    fn emit(&mut self, kind: BlockKind, raw: &str) {
        let text = collapse_whitespace(raw);
        if !text.is_empty() {
            self.out.blocks.push(TextBlock { kind, text });
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.skip_depth > 0 {
            return;
        }
        if let Some(frame) = self.stack.last_mut() {
            frame.buffer.push_str(text);
        }
    }
}

/// Collapse newlines and runs of whitespace into single spaces.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Scan a markdown body (frontmatter already removed).
pub fn scan_body(markdown: &str, options: &MarkdownOptions) -> BodyScan {
    BodyScanner::new().scan(markdown, options)
}

/// Drop top-level MDX `import` / `export` statements.
///
/// Lines inside fenced code blocks are kept. A multi-line statement is
/// skipped until its brackets balance. A trailing `;` or a blank line also
/// ends it, since MDX separates ESM blocks from markdown with a blank line.
pub fn strip_mdx_esm(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut fence: Option<&str> = None;
    // Open bracket count of the statement being skipped, if any
    let mut statement: Option<i64> = None;

    for line in source.lines() {
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            out.push_str(line);
            out.push('\n');
            continue;
        }

        if let Some(depth) = statement {
            let depth = depth + bracket_balance(line);
            statement = (depth > 0 && !line.trim().is_empty() && !line.trim_end().ends_with(';'))
                .then_some(depth);
            continue;
        }

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            fence = Some(&trimmed[..3]);
        } else if line.starts_with("import ") || line.starts_with("export ") {
            let depth = bracket_balance(line);
            statement = (depth > 0 && !line.trim_end().ends_with(';')).then_some(depth);
            continue;
        }

        out.push_str(line);
        out.push('\n');
    }

    out
}

/// Opening minus closing brackets on one line.
fn bracket_balance(line: &str) -> i64 {
    line.chars().fold(0, |depth, c| match c {
        '{' | '(' | '[' => depth + 1,
        '}' | ')' | ']' => depth - 1,
        _ => depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(md: &str) -> BodyScan {
        scan_body(md, &MarkdownOptions::all())
    }

    #[test]
    fn test_title_description_content() {
        let body = scan("# Hello *World*\n\nFirst para\nwraps here.\n\n## Next\n\nSecond `code` para.");
        assert_eq!(body.title(), "Hello World");
        assert_eq!(body.description(), "First para wraps here.");
        assert_eq!(
            body.content(),
            "Hello World First para wraps here. Next Second code para."
        );
    }

    #[test]
    fn test_empty_body() {
        let body = scan("");
        assert_eq!(body.title(), "");
        assert_eq!(body.description(), "");
        assert_eq!(body.content(), "");
        assert!(body.images.is_empty());
    }

    #[test]
    fn test_paragraph_before_heading() {
        let body = scan("Intro text.\n\n# Title");
        assert_eq!(body.title(), "Title");
        assert_eq!(body.description(), "Intro text.");
        assert_eq!(body.content(), "Intro text. Title");
    }

    #[test]
    fn test_code_blocks_and_tables_not_indexed() {
        let body = scan("# T\n\n```rust\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| c | d |\n\nAfter.");
        assert_eq!(body.content(), "T After.");
    }

    #[test]
    fn test_list_items_in_document_order() {
        let body = scan("# L\n\n- one\n- two\n  - nested\n- three\n");
        assert_eq!(body.content(), "L one two nested three");
        assert_eq!(body.description(), "one");
    }

    #[test]
    fn test_images_collected_in_order() {
        let body = scan("![a](./a.png)\n\n# H ![b](https://x.test/b.jpg)\n\n![c](c.gif)");
        assert_eq!(body.images, vec!["./a.png", "https://x.test/b.jpg", "c.gif"]);
        // Alt text is part of the surrounding block text
        assert_eq!(body.description(), "a");
    }

    #[test]
    fn test_strip_mdx_esm() {
        let src = "import Chart from './chart'\nexport const meta = {\n  a: 1,\n}\n\n# Title\n\n```js\nimport x from 'y'\n```\n";
        let stripped = strip_mdx_esm(src);
        assert!(!stripped.contains("Chart"));
        assert!(!stripped.contains("meta"));
        assert!(stripped.contains("# Title"));
        assert!(stripped.contains("import x from 'y'"));
    }

    #[test]
    fn test_strip_mdx_multiline_import_without_semicolon() {
        let stripped = strip_mdx_esm("import {\n  Chart,\n  Legend,\n} from './chart'\n\n# Title\n\nBody text.\n");
        assert!(!stripped.contains("Chart"));
        assert!(stripped.contains("# Title"));
        assert!(stripped.contains("Body text."));

        // An unbalanced statement still stops at the blank line before markdown
        let stripped = strip_mdx_esm("export const f = (\n  a,\n\n# Heading\n");
        assert!(stripped.contains("# Heading"));
    }
}
