//! Channel definitions of each image.
//!
//! Channel `ID` attributes are document-local references (`Channel:0:1`) and
//! are dropped, so channel lists from different images compare equal when
//! they describe the same acquisition settings.

use serde::Serialize;

use crate::omexml::{Node, OmeXml, OmeXmlError};
use crate::properties::Domain;

/// Attribute removed from every channel
const CHANNEL_ID_ATTRIBUTE: &str = "ID";

/// One `Channel` element without its `ID`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Channel(Node);

impl Channel {
    fn from_node(mut node: Node) -> Self {
        node.remove_attribute(CHANNEL_ID_ATTRIBUTE);
        Channel(node)
    }

    /// `Name` attribute
    pub fn name(&self) -> Option<&str> {
        self.0.attribute("Name")
    }

    /// `Color` attribute as the signed RGBA integer OME uses
    pub fn color(&self) -> Option<i32> {
        self.0.attribute("Color").and_then(|c| c.trim().parse().ok())
    }

    /// Any attribute by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.0.attribute(name)
    }

    /// The underlying element
    pub fn node(&self) -> &Node {
        &self.0
    }

    /// Consume into the underlying element
    pub fn into_node(self) -> Node {
        self.0
    }
}

/// Result of channel extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChannelList {
    /// The list shared by every image
    Uniform(Vec<Channel>),
    /// One list per image, in image order
    PerImage(Vec<Vec<Channel>>),
}

impl ChannelList {
    /// The shared list, if extraction assumed uniform channels
    pub fn uniform(&self) -> Option<&[Channel]> {
        match self {
            ChannelList::Uniform(channels) => Some(channels.as_slice()),
            ChannelList::PerImage(_) => None,
        }
    }

    /// The per-image lists, if extraction did not assume uniform channels
    pub fn per_image(&self) -> Option<&[Vec<Channel>]> {
        match self {
            ChannelList::PerImage(lists) => Some(lists.as_slice()),
            ChannelList::Uniform(_) => None,
        }
    }
}

impl OmeXml {
    /// Channel definitions.
    ///
    /// With `assume_uniform`, every image must carry the same channel list
    /// (`InconsistentMetadata` otherwise) and that single list is returned.
    pub fn channels(&self, assume_uniform: bool) -> Result<ChannelList, OmeXmlError> {
        let lists: Vec<Vec<Channel>> = self
            .extract_field("Channel", Domain::Pixels)?
            .into_per_image()
            .unwrap_or_default()
            .into_iter()
            .map(|value| value.into_nodes().into_iter().map(Channel::from_node).collect())
            .collect();

        if !assume_uniform {
            return Ok(ChannelList::PerImage(lists));
        }

        let mut lists = lists.into_iter();
        let first = lists
            .next()
            .ok_or_else(|| OmeXmlError::missing("OME/Image"))?;
        for (offset, other) in lists.enumerate() {
            if other != first {
                return Err(OmeXmlError::InconsistentMetadata(format!(
                    "channels of image {} differ from image 0",
                    offset + 1
                )));
            }
        }
        log::debug!("{} channels shared by all images", first.len());
        Ok(ChannelList::Uniform(first))
    }
}

/// Parse `ome_xml` and run [`OmeXml::channels`]
pub fn parse_channels(ome_xml: &str, assume_uniform: bool) -> Result<ChannelList, OmeXmlError> {
    OmeXml::parse(ome_xml)?.channels(assume_uniform)
}
