//! # OME-XML Normalizer
//!
//! Converts an OME-XML string into a tree of [`Node`]s and gives typed access
//! to the parts of the OME schema the extractors need.
//!
//! ## Document Structure
//!
//! ```text
//! OME
//! ├── Image* (one per tile/series)
//! │   ├── AcquisitionDate (text)
//! │   └── Pixels (@PhysicalSizeX, @SizeC, ...)
//! │       ├── Channel* (@ID, @Name, ...)
//! │       └── Plane* (@TheC, @TheT, @TheZ, @DeltaT, @PositionX, ...)
//! └── StructuredAnnotations
//!     └── XMLAnnotation*
//!         └── Value
//!             └── OriginalMetadata
//!                 ├── Key (text)
//!                 └── Value (text, JSON-encoded)
//! ```
//!
//! Any element the schema allows to repeat is stored as an [`Element`], which
//! is either a single node or a list of nodes. Callers always go through
//! [`Element::as_slice`] (or [`Value::into_nodes`]) before indexing.

mod error;
mod node;
mod parser;


use std::str::FromStr;

pub use error::OmeXmlError;
pub use node::{Element, Node, Value, ATTRIBUTE_PREFIX, TEXT_KEY};

/// Local name of the OME-XML root element
pub const ROOT_ELEMENT: &str = "OME";

/// A parsed OME-XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmeXml {
    root_name: String,
    root: Node,
}

impl OmeXml {
    /// Parse an OME-XML string.
    ///
    /// Fails with [`OmeXmlError::MalformedDocument`] if the string is not
    /// well-formed XML.
    pub fn parse(xml: &str) -> Result<Self, OmeXmlError> {
        let (root_name, root) = parser::parse_tree(xml)?;
        log::debug!("Parsed OME-XML document with root <{}>", root_name);
        Ok(Self { root_name, root })
    }

    /// Local name of the document element
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// The document element
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The `OME` element, or `MissingField` if the root is something else
    pub fn ome(&self) -> Result<&Node, OmeXmlError> {
        if self.root_name == ROOT_ELEMENT {
            Ok(&self.root)
        } else {
            Err(OmeXmlError::missing(ROOT_ELEMENT))
        }
    }

    /// All `Image` elements in document order; empty if there are none
    pub fn images(&self) -> Result<&[Node], OmeXmlError> {
        Ok(self
            .ome()?
            .child("Image")
            .map(Element::as_slice)
            .unwrap_or(&[]))
    }

    /// The `StructuredAnnotations` section
    pub fn structured_annotations(&self) -> Result<&Node, OmeXmlError> {
        self.ome()?
            .first_child("StructuredAnnotations")
            .ok_or_else(|| OmeXmlError::missing("OME/StructuredAnnotations"))
    }
}

impl FromStr for OmeXml {
    type Err = OmeXmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Borrow the `Pixels` block of an image
pub(crate) fn pixels_of(image: &Node) -> Result<&Node, OmeXmlError> {
    image
        .require_child("Pixels", "Image/Pixels")?
        .first()
        .ok_or_else(|| OmeXmlError::missing("Image/Pixels"))
}

/// Planes of an image, coerced to a sequence; empty if there are none
pub(crate) fn planes_of(image: &Node) -> Result<&[Node], OmeXmlError> {
    Ok(pixels_of(image)?
        .child("Plane")
        .map(Element::as_slice)
        .unwrap_or(&[]))
}
