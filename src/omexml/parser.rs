//! Pull parser that folds quick-xml events into a [`Node`] tree

use quick_xml::events::{BytesStart, Event};
use quick_xml::encoding::Decoder;
use quick_xml::Reader;

use super::{Node, OmeXmlError};

/// Parse a complete XML document into `(root local name, root node)`
pub(crate) fn parse_tree(xml: &str) -> Result<(String, Node), OmeXmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<(String, Node)> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                check_single_root(&stack, &root)?;
                stack.push(open_element(e, reader.decoder())?);
            }
            Event::Empty(ref e) => {
                check_single_root(&stack, &root)?;
                let (name, node) = open_element(e, reader.decoder())?;
                close_element(&mut stack, &mut root, name, node);
            }
            Event::End(_) => {
                let (name, node) = stack.pop().ok_or_else(|| {
                    OmeXmlError::MalformedDocument("closing tag without matching opening tag".to_string())
                })?;
                close_element(&mut stack, &mut root, name, node);
            }
            Event::Text(ref t) => {
                let text = t.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(ref c) => {
                let text = std::str::from_utf8(c)?;
                append_text(&mut stack, text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some((name, _)) = stack.last() {
        return Err(OmeXmlError::MalformedDocument(format!(
            "unclosed element <{}>",
            name
        )));
    }

    root.ok_or_else(|| OmeXmlError::MalformedDocument("document has no root element".to_string()))
}

fn open_element(e: &BytesStart, decoder: Decoder) -> Result<(String, Node), OmeXmlError> {
    let name = std::str::from_utf8(e.local_name().as_ref())?.to_string();
    let mut node = Node::default();

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        node.attributes.insert(key, value);
    }

    Ok((name, node))
}

fn close_element(
    stack: &mut [(String, Node)],
    root: &mut Option<(String, Node)>,
    name: String,
    node: Node,
) {
    match stack.last_mut() {
        Some((_, parent)) => parent.push_child(name, node),
        None => *root = Some((name, node)),
    }
}

fn check_single_root(
    stack: &[(String, Node)],
    root: &Option<(String, Node)>,
) -> Result<(), OmeXmlError> {
    if stack.is_empty() && root.is_some() {
        return Err(OmeXmlError::MalformedDocument(
            "more than one root element".to_string(),
        ));
    }
    Ok(())
}

fn append_text(stack: &mut [(String, Node)], text: &str) -> Result<(), OmeXmlError> {
    match stack.last_mut() {
        Some((_, node)) => {
            node.push_text(text);
            Ok(())
        }
        None => Err(OmeXmlError::MalformedDocument(format!(
            "text outside of the root element: '{}'",
            text
        ))),
    }
}
