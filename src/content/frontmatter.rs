//! Frontmatter detection and parsing.
//!
//! A document may open with a YAML (`---`) or TOML (`+++`) block. The
//! delimiter picks which parser runs first; if it rejects the block the
//! other one gets a try, so a mis-fenced block still yields metadata.

use thiserror::Error;

use crate::utils::date::DateTimeUtc;

/// Header block style, as sniffed from the opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
}

/// A raw, unparsed frontmatter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub format: Format,
    pub raw: &'a str,
}

#[derive(Debug, Error)]
#[error("frontmatter is neither valid YAML ({yaml}) nor valid TOML ({toml})")]
pub struct FrontMatterError {
    yaml: serde_yaml::Error,
    toml: toml::de::Error,
}

/// Parsed frontmatter, keeping the native value tree of its format.
#[derive(Debug, Clone, PartialEq)]
pub enum FrontMatter {
    Yaml(serde_yaml::Mapping),
    Toml(toml::Table),
}

/// Split `content` into an optional frontmatter block and the body.
///
/// Without a closing delimiter the whole input is body.
pub fn split(content: &str) -> (Option<Block<'_>>, &str) {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();

    for (delim, format) in [("---", Format::Yaml), ("+++", Format::Toml)] {
        let Some(rest) = trimmed.strip_prefix(delim) else {
            continue;
        };
        // The opening fence must be alone on its line
        if !rest.starts_with(['\n', '\r']) {
            continue;
        }
        let closing = format!("\n{delim}");
        if let Some(end) = rest.find(&closing) {
            let raw = rest[..end].trim();
            let after = &rest[end + closing.len()..];
            // Rest of the closing fence line
            let body = after.split_once('\n').map_or("", |(_, body)| body);
            return (Some(Block { format, raw }), body);
        }
    }

    (None, content)
}

impl FrontMatter {
    /// Parse a block, falling back to the other format on failure.
    pub fn parse(block: Block<'_>) -> Result<Self, FrontMatterError> {
        let raw = block.raw;
        if raw.is_empty() {
            return Ok(match block.format {
                Format::Yaml => Self::Yaml(serde_yaml::Mapping::new()),
                Format::Toml => Self::Toml(toml::Table::new()),
            });
        }

        let yaml = || serde_yaml::from_str(raw).map(Self::Yaml);
        let toml = || raw.parse::<toml::Table>().map(Self::Toml);

        match block.format {
            Format::Yaml => yaml().or_else(|yaml| {
                toml().map_err(|toml| FrontMatterError { yaml, toml })
            }),
            Format::Toml => toml().or_else(|toml| {
                yaml().map_err(|yaml| FrontMatterError { yaml, toml })
            }),
        }
    }

    /// `tags` as a list: either a sequence or a comma-separated string.
    ///
    /// Entries are trimmed; empty ones are dropped. Non-string scalars in a
    /// sequence are kept in their textual form.
    pub fn tags(&self) -> Vec<String> {
        let tags: Vec<String> = match self {
            Self::Yaml(map) => match map.get("tags") {
                Some(serde_yaml::Value::Sequence(items)) => {
                    items.iter().filter_map(yaml_scalar).collect()
                }
                Some(serde_yaml::Value::String(s)) => split_csv(s),
                _ => Vec::new(),
            },
            Self::Toml(table) => match table.get("tags") {
                Some(toml::Value::Array(items)) => items.iter().filter_map(toml_scalar).collect(),
                Some(toml::Value::String(s)) => split_csv(s),
                _ => Vec::new(),
            },
        };

        tags.into_iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// The `date` field in textual form, if present.
    ///
    /// TOML datetimes are rendered back to their RFC 3339 text.
    pub fn date_text(&self) -> Option<String> {
        match self {
            Self::Yaml(map) => map.get("date").and_then(yaml_scalar),
            Self::Toml(table) => match table.get("date")? {
                toml::Value::Datetime(dt) => Some(dt.to_string()),
                other => toml_scalar(other),
            },
        }
    }

    /// The `date` field parsed, or `Err(text)` when present but unparseable.
    pub fn date(&self) -> Option<Result<DateTimeUtc, String>> {
        let text = self.date_text()?;
        Some(DateTimeUtc::parse(&text).ok_or(text))
    }
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',').map(str::to_owned).collect()
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn toml_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(dt) => Some(dt.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (FrontMatter, &str) {
        let (block, body) = split(content);
        (FrontMatter::parse(block.unwrap()).unwrap(), body)
    }

    #[test]
    fn test_yaml_frontmatter() {
        let (fm, body) = parse("---\ntitle: Hello\ntags: [ai, rag]\ndate: 2024-03-01\n---\n\n# Body");
        assert!(matches!(fm, FrontMatter::Yaml(_)));
        assert_eq!(fm.tags(), vec!["ai", "rag"]);
        assert_eq!(fm.date(), Some(Ok(DateTimeUtc::from_ymd(2024, 3, 1))));
        assert_eq!(body.trim(), "# Body");
    }

    #[test]
    fn test_toml_frontmatter() {
        let (fm, body) = parse("+++\ntitle = \"Hello\"\ntags = [\"a\", \"b\"]\ndate = 2024-03-01T10:20:30Z\n+++\n# Body");
        assert!(matches!(fm, FrontMatter::Toml(_)));
        assert_eq!(fm.tags(), vec!["a", "b"]);
        assert_eq!(
            fm.date(),
            Some(Ok(DateTimeUtc::new(2024, 3, 1, 10, 20, 30)))
        );
        assert_eq!(body, "# Body");
    }

    #[test]
    fn test_toml_local_date() {
        let (fm, _) = parse("+++\ndate = 2023-12-31\n+++\n");
        assert_eq!(fm.date(), Some(Ok(DateTimeUtc::from_ymd(2023, 12, 31))));
    }

    #[test]
    fn test_comma_separated_tags() {
        let (fm, _) = parse("---\ntags: \"Rust,  web , ,cli\"\n---\n");
        assert_eq!(fm.tags(), vec!["Rust", "web", "cli"]);
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo header here.";
        let (block, body) = split(content);
        assert!(block.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let content = "---\ntitle: oops\n# Heading";
        let (block, body) = split(content);
        assert!(block.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_thematic_break_is_not_frontmatter() {
        let (block, _) = split("--- not a fence\ntext\n---\n");
        assert!(block.is_none());
    }

    #[test]
    fn test_fallback_to_other_format() {
        // TOML syntax inside YAML fences
        let (fm, _) = parse("---\ntitle = \"Mis-fenced\"\ntags = [\"x\"]\n---\nbody");
        assert!(matches!(fm, FrontMatter::Toml(_)));
        assert_eq!(fm.tags(), vec!["x"]);
    }

    #[test]
    fn test_both_parsers_fail() {
        let (block, _) = split("+++\n: : [\n= =\n+++\n");
        assert!(FrontMatter::parse(block.unwrap()).is_err());
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = parse("---\n---\n# T");
        assert!(fm.tags().is_empty());
        assert_eq!(fm.date(), None);
        assert_eq!(body, "# T");
    }

    #[test]
    fn test_unparseable_date_reported() {
        let (fm, _) = parse("---\ndate: someday\n---\n");
        assert_eq!(fm.date(), Some(Err("someday".to_string())));
    }
}
