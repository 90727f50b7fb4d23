//! Per-document metadata extraction.
//!
//! Combines frontmatter, the markdown body scan and image resolution into
//! one [`DocumentMeta`]. Extraction never fails: every problem is logged
//! and degrades the affected field to its default.

use std::fs;
use std::path::Path;

use super::frontmatter::{self, FrontMatter};
use super::image::AssetResolver;
use super::markdown::{self, MarkdownOptions};
use crate::log;
use crate::utils::date::DateTimeUtc;

/// Metadata of one index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: String,
    pub description: String,
    pub content: String,
    pub image: String,
    pub tags: Vec<String>,
    pub date: DateTimeUtc,
}

impl DocumentMeta {
    /// Empty metadata dated `now`.
    pub fn empty(now: DateTimeUtc) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            content: String::new(),
            image: String::new(),
            tags: Vec::new(),
            date: now,
        }
    }
}

pub struct Extractor {
    resolver: AssetResolver,
    options: MarkdownOptions,
    /// Fallback for absent or unparseable dates.
    now: DateTimeUtc,
}

impl Extractor {
    pub fn new(resolver: AssetResolver, now: DateTimeUtc) -> Self {
        Self {
            resolver,
            options: MarkdownOptions::all(),
            now,
        }
    }

    pub fn now(&self) -> DateTimeUtc {
        self.now
    }

    /// Read and extract one document.
    pub fn extract(&self, path: &Path) -> DocumentMeta {
        match fs::read_to_string(path) {
            Ok(source) => self.extract_source(path, &source),
            Err(err) => {
                log!("warning"; "failed to read {}: {}", path.display(), err);
                DocumentMeta::empty(self.now)
            }
        }
    }

    /// Extract from already-loaded source. `path` locates relative images
    /// and labels log messages.
    pub fn extract_source(&self, path: &Path, source: &str) -> DocumentMeta {
        let (block, body) = frontmatter::split(source);

        let front = block.and_then(|block| match FrontMatter::parse(block) {
            Ok(fm) => Some(fm),
            Err(err) => {
                log!("warning"; "{}: {}", path.display(), err);
                None
            }
        });

        let is_mdx = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mdx"));
        let body = if is_mdx {
            markdown::scan_body(&markdown::strip_mdx_esm(body), &self.options)
        } else {
            markdown::scan_body(body, &self.options)
        };

        DocumentMeta {
            title: body.title().to_owned(),
            description: body.description().to_owned(),
            content: body.content(),
            image: self.resolver.resolve_first(path, &body.images),
            tags: front.as_ref().map(FrontMatter::tags).unwrap_or_default(),
            date: self.date(path, front.as_ref()),
        }
    }

    fn date(&self, path: &Path, front: Option<&FrontMatter>) -> DateTimeUtc {
        match front.and_then(FrontMatter::date) {
            Some(Ok(date)) => date,
            Some(Err(text)) => {
                log!("warning"; "{}: unparseable date `{}`, using build time", path.display(), text);
                self.now
            }
            None => self.now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetsConfig;
    use tempfile::TempDir;

    const NOW: DateTimeUtc = DateTimeUtc::new(2025, 1, 2, 3, 4, 5);

    fn extractor() -> Extractor {
        Extractor::new(AssetResolver::new(AssetsConfig::default()), NOW)
    }

    #[test]
    fn test_full_document() {
        let source = "---\ntags: [ai, rag]\ndate: 2024-05-06\n---\n# Retrieval\n\nAugmented generation\nexplained.\n\n## Details\n\nMore text.\n";
        let meta = extractor().extract_source(Path::new("/x/page.md"), source);

        assert_eq!(meta.title, "Retrieval");
        assert_eq!(meta.description, "Augmented generation explained.");
        assert_eq!(
            meta.content,
            "Retrieval Augmented generation explained. Details More text."
        );
        assert_eq!(meta.tags, vec!["ai", "rag"]);
        assert_eq!(meta.date, DateTimeUtc::from_ymd(2024, 5, 6));
        assert_eq!(meta.image, "");
    }

    #[test]
    fn test_no_frontmatter_falls_back() {
        let meta = extractor().extract_source(Path::new("/x/page.md"), "Just a paragraph.");
        assert_eq!(meta.title, "");
        assert_eq!(meta.description, "Just a paragraph.");
        assert!(meta.tags.is_empty());
        assert_eq!(meta.date, NOW);
    }

    #[test]
    fn test_invalid_frontmatter_and_date_degrade() {
        let e = extractor();
        let meta = e.extract_source(Path::new("/x/page.md"), "+++\n= [\n+++\n# T\n");
        assert_eq!(meta.title, "T");
        assert!(meta.tags.is_empty());
        assert_eq!(meta.date, NOW);

        let meta = e.extract_source(Path::new("/x/page.md"), "---\ndate: 2024-13-45\n---\n");
        assert_eq!(meta.date, NOW);
    }

    #[test]
    fn test_title_and_description_come_from_body_only() {
        let source = "---\ntitle: From header\ndescription: Summary text\n---\nJust text.\n";
        let meta = extractor().extract_source(Path::new("/x/page.md"), source);
        // No heading: the frontmatter title is not used
        assert_eq!(meta.title, "");
        assert_eq!(meta.description, "Just text.");
        assert_eq!(meta.content, "Just text.");

        let meta = extractor().extract_source(Path::new("/x/page.md"), "---\ntitle: T\n---\n");
        assert_eq!(meta.title, "");
        assert_eq!(meta.description, "");
    }

    #[test]
    fn test_mdx_imports_ignored() {
        let source = "import Demo from './demo'\n\n# Widget\n\n<Demo />\n\nWorks.\n";
        let meta = extractor().extract_source(Path::new("/x/page.mdx"), source);
        assert_eq!(meta.title, "Widget");
        assert!(!meta.content.contains("import"));
    }

    #[test]
    fn test_first_resolvable_image() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("shot.png"), b"img").unwrap();
        let doc = dir.path().join("page.md");
        fs::write(&doc, "# P\n\n![gone](gone.png)\n\n![shot](./shot.png)\n").unwrap();

        let meta = extractor().extract(&doc);
        assert!(meta.image.starts_with("/assets/shot."));
        assert!(meta.image.ends_with(".png"));
    }

    #[test]
    fn test_unreadable_file() {
        let meta = extractor().extract(Path::new("/definitely/not/here/page.md"));
        assert_eq!(meta, DocumentMeta::empty(NOW));
    }
}
