//! Image reference resolution with content-hashed asset names.
//!
//! A local image `cover.png` next to a document becomes
//! `/<url_prefix>/cover.<hash8>.png`, where `hash8` is the blake3 fingerprint
//! of the file's bytes. The URL changes exactly when the image does.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::AssetsConfig;
use crate::debug;
use crate::utils::hash::ContentHash;
use crate::utils::path::route::{is_external_link, strip_query_fragment};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("empty image reference")]
    Empty,

    #[error("unsupported image extension in {0}")]
    Unsupported(String),

    #[error("image file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read image {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy image to {}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Turns image references into servable URLs.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    config: AssetsConfig,
}

impl AssetResolver {
    pub fn new(config: AssetsConfig) -> Self {
        Self { config }
    }

    /// Resolve one reference found in a document located in `doc_dir`.
    ///
    /// External URLs and site-absolute paths (`/img/x.png`) are returned
    /// unchanged; everything else must be an existing local image.
    pub fn resolve(&self, doc_dir: &Path, reference: &str) -> Result<String, ImageError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ImageError::Empty);
        }
        if is_external_link(reference) || reference.starts_with('/') {
            return Ok(reference.to_owned());
        }

        let local = strip_query_fragment(reference);
        let decoded = percent_decode_str(local)
            .decode_utf8()
            .unwrap_or(Cow::Borrowed(local));
        let path = doc_dir.join(decoded.as_ref());

        let (Some(stem), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|e| e.to_str()),
        ) else {
            return Err(ImageError::Unsupported(reference.to_owned()));
        };
        if !self.config.is_supported(ext) {
            return Err(ImageError::Unsupported(reference.to_owned()));
        }
        if !path.is_file() {
            return Err(ImageError::NotFound(path));
        }

        let hash = ContentHash::of_file(&path).map_err(|source| ImageError::Read {
            path: path.clone(),
            source,
        })?;
        let file_name = format!("{stem}.{}.{ext}", hash.fingerprint());

        if let Some(output) = &self.config.output {
            copy_asset(&path, &output.join(&file_name))?;
        }

        Ok(match self.config.prefix() {
            "" => format!("/{file_name}"),
            prefix => format!("/{prefix}/{file_name}"),
        })
    }

    /// First reference that resolves, or `""` when none does.
    ///
    /// Failures are reported at debug level and the next candidate is tried.
    pub fn resolve_first<S: AsRef<str>>(&self, doc_path: &Path, references: &[S]) -> String {
        let doc_dir = doc_path.parent().unwrap_or(Path::new(""));

        for reference in references {
            let reference = reference.as_ref();
            match self.resolve(doc_dir, reference) {
                Ok(url) => return url,
                Err(err) => {
                    debug!("image"; "{}: skipping `{}`: {}", doc_path.display(), reference, err);
                }
            }
        }
        String::new()
    }
}

/// Copy `src` to its hashed destination unless it is already there.
///
/// Same name means same content, so an existing file is left alone.
fn copy_asset(src: &Path, dest: &Path) -> Result<(), ImageError> {
    if dest.is_file() {
        return Ok(());
    }
    let copy = || -> io::Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dest)?;
        Ok(())
    };
    copy().map_err(|source| ImageError::Copy {
        path: dest.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver() -> AssetResolver {
        AssetResolver::new(AssetsConfig::default())
    }

    #[test]
    fn test_local_image_gets_hashed_url() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cover.png"), b"png bytes").unwrap();

        let url = resolver().resolve(dir.path(), "./cover.png").unwrap();
        let fingerprint = ContentHash::of(b"png bytes").fingerprint();
        assert_eq!(url, format!("/assets/cover.{fingerprint}.png"));
    }

    #[test]
    fn test_hash_tracks_content() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.jpg");
        fs::write(&file, b"one").unwrap();
        let first = resolver().resolve(dir.path(), "a.jpg").unwrap();
        assert_eq!(first, resolver().resolve(dir.path(), "a.jpg").unwrap());

        fs::write(&file, b"two").unwrap();
        assert_ne!(first, resolver().resolve(dir.path(), "a.jpg").unwrap());
    }

    #[test]
    fn test_external_and_absolute_kept() {
        let dir = TempDir::new().unwrap();
        let r = resolver();
        assert_eq!(
            r.resolve(dir.path(), "https://example.com/x.png").unwrap(),
            "https://example.com/x.png"
        );
        assert_eq!(r.resolve(dir.path(), "/img/x.png").unwrap(), "/img/x.png");
    }

    #[test]
    fn test_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("doc.pdf"), b"%PDF").unwrap();
        let r = resolver();

        assert!(matches!(r.resolve(dir.path(), "  "), Err(ImageError::Empty)));
        assert!(matches!(
            r.resolve(dir.path(), "doc.pdf"),
            Err(ImageError::Unsupported(_))
        ));
        assert!(matches!(
            r.resolve(dir.path(), "missing.png"),
            Err(ImageError::NotFound(_))
        ));
    }

    #[test]
    fn test_percent_encoded_and_query() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("my pic.webp"), b"w").unwrap();
        let url = resolver().resolve(dir.path(), "my%20pic.webp?v=1").unwrap();
        assert!(url.starts_with("/assets/my pic."));
        assert!(url.ends_with(".webp"));
    }

    #[test]
    fn test_resolve_first_skips_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("second.gif"), b"gif").unwrap();
        let doc = dir.path().join("page.md");

        let url = resolver().resolve_first(&doc, &["missing.png", "second.gif"]);
        assert!(url.starts_with("/assets/second."));
        assert!(url.ends_with(".gif"));

        assert_eq!(resolver().resolve_first(&doc, &["missing.png"]), "");
        assert_eq!(resolver().resolve_first::<&str>(&doc, &[]), "");
    }

    #[test]
    fn test_copy_to_output() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("c.svg"), b"<svg/>").unwrap();
        let out = dir.path().join("public/media");
        let config = AssetsConfig {
            url_prefix: "/media/".into(),
            output: Some(out.clone()),
            ..AssetsConfig::default()
        };

        let url = AssetResolver::new(config)
            .resolve(dir.path(), "c.svg")
            .unwrap();
        let name = url.strip_prefix("/media/").unwrap();
        assert_eq!(fs::read(out.join(name)).unwrap(), b"<svg/>");
    }
}
