//! # Document Sources
//!
//! Decoding CZI containers is left to an external reader (Bio-Formats'
//! `ZeissCZIReader` or similar). The extractors only need the OME-XML text it
//! produces, so the boundary is a single trait:
//!
//! - [`OmeXmlSource`] - anything that turns a path into an OME-XML string
//! - [`ExportedXmlSource`] - reads a document already exported to disk,
//!   either the path itself or its `<stem>.ome.xml` sidecar

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::omexml::{OmeXml, OmeXmlError};

/// Extension of the sidecar document next to an image file
pub const SIDECAR_EXTENSION: &str = "ome.xml";

/// Options handed to the reader that produces the document.
///
/// The defaults describe the tiled reading mode: tiles are kept as separate
/// images instead of being stitched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Let the reader stitch tiles into one mosaic image
    pub allow_autostitching: bool,
    /// Expose attachments (label, slide preview) as extra images
    pub include_attachments: bool,
    /// Let the reader group related files in the same directory
    pub group_files: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            allow_autostitching: false,
            include_attachments: false,
            group_files: true,
        }
    }
}

/// Errors that can occur while obtaining a document
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error on the given path
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The document was read but does not parse
    #[error(transparent)]
    Document(#[from] OmeXmlError),
}

/// Something that produces the OME-XML document of an image file
pub trait OmeXmlSource {
    /// Read the OME-XML text for `path`
    fn read_ome_xml(&self, path: &Path, options: &ReaderOptions) -> Result<String, SourceError>;

    /// Read and parse the document for `path`
    fn read_document(&self, path: &Path, options: &ReaderOptions) -> Result<OmeXml, SourceError> {
        let xml = self.read_ome_xml(path, options)?;
        Ok(OmeXml::parse(&xml)?)
    }
}

/// Reads documents that were already exported to disk
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportedXmlSource;

impl ExportedXmlSource {
    /// The file actually read for `path`: the path itself for `.xml` files,
    /// otherwise the `<stem>.ome.xml` sidecar. A trailing `.ome` in the stem
    /// (`scan.ome.tiff`) is not repeated.
    pub fn resolve(path: &Path) -> PathBuf {
        let is_xml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if is_xml {
            return path.to_path_buf();
        }

        match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => {
                let base = strip_suffix_ignore_case(stem, ".ome").unwrap_or(stem);
                path.with_file_name(format!("{}.{}", base, SIDECAR_EXTENSION))
            }
            None => path.with_extension(SIDECAR_EXTENSION),
        }
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    let (head, tail) = (s.get(..split)?, s.get(split..)?);
    (tail.eq_ignore_ascii_case(suffix) && !head.is_empty()).then_some(head)
}

impl OmeXmlSource for ExportedXmlSource {
    fn read_ome_xml(&self, path: &Path, options: &ReaderOptions) -> Result<String, SourceError> {
        if options.allow_autostitching || options.include_attachments {
            log::debug!(
                "Reader options {:?} cannot be applied to an exported document; reading as-is",
                options
            );
        }

        let resolved = Self::resolve(path);
        log::debug!("Reading OME-XML from {}", resolved.display());
        fs::read_to_string(&resolved).map_err(|source| SourceError::Io {
            path: resolved,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ReaderOptions::default();
        assert!(!options.allow_autostitching);
        assert!(!options.include_attachments);
        assert!(options.group_files);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            ExportedXmlSource::resolve(Path::new("/data/tile.ome.xml")),
            PathBuf::from("/data/tile.ome.xml")
        );
        assert_eq!(
            ExportedXmlSource::resolve(Path::new("/data/metadata.XML")),
            PathBuf::from("/data/metadata.XML")
        );
        assert_eq!(
            ExportedXmlSource::resolve(Path::new("/data/tile.czi")),
            PathBuf::from("/data/tile.ome.xml")
        );
    }

    #[test]
    fn test_resolve_ome_stem() {
        assert_eq!(
            ExportedXmlSource::resolve(Path::new("/data/scan.ome.tiff")),
            PathBuf::from("/data/scan.ome.xml")
        );
        assert_eq!(
            ExportedXmlSource::resolve(Path::new("/data/scan.OME.tif")),
            PathBuf::from("/data/scan.ome.xml")
        );
        assert_eq!(
            ExportedXmlSource::resolve(Path::new("/data/.ome.czi")),
            PathBuf::from("/data/.ome.ome.xml")
        );
        assert_eq!(
            ExportedXmlSource::resolve(Path::new("/data/run.2.czi")),
            PathBuf::from("/data/run.2.ome.xml")
        );
    }

    #[test]
    fn test_read_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let sidecar = dir.path().join("scan.ome.xml");
        fs::write(&sidecar, r#"<OME><Image ID="Image:0"/></OME>"#).unwrap();

        let document = ExportedXmlSource
            .read_document(&dir.path().join("scan.czi"), &ReaderOptions::default())
            .unwrap();
        assert_eq!(document.images().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExportedXmlSource
            .read_ome_xml(&dir.path().join("absent.czi"), &ReaderOptions::default())
            .unwrap_err();
        match err {
            SourceError::Io { path, .. } => assert!(path.ends_with("absent.ome.xml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        fs::write(&path, "<OME><Image></OME>").unwrap();

        let err = ExportedXmlSource
            .read_document(&path, &ReaderOptions::default())
            .unwrap_err();
        assert!(matches!(err, SourceError::Document(OmeXmlError::MalformedDocument(_))));
    }
}
