use chrono::{DateTime, Utc};
use quick_xml::NsReader;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use tracing::{debug, trace};

use super::NZB_NAMESPACE;
use super::types::{NzbDocument, NzbFile, NzbSegment};
use crate::{CodecError, Result};

/// Namespace an element name resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Nzb,
    Unqualified,
    Foreign,
}

impl Scope {
    fn of(resolved: &ResolveResult<'_>) -> Self {
        match resolved {
            ResolveResult::Bound(Namespace(ns)) if *ns == NZB_NAMESPACE.as_bytes() => Scope::Nzb,
            ResolveResult::Unbound => Scope::Unqualified,
            _ => Scope::Foreign,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Nzb,
    Head,
    Meta,
    File,
    Groups,
    Group,
    Segments,
    Segment,
    Other,
}

impl Element {
    fn child_of(parent: Element, local_name: &[u8]) -> Element {
        match (parent, local_name) {
            (Element::Nzb, b"head") => Element::Head,
            (Element::Head, b"meta") => Element::Meta,
            (Element::Nzb, b"file") => Element::File,
            (Element::File, b"groups") => Element::Groups,
            (Element::Groups, b"group") => Element::Group,
            (Element::File, b"segments") => Element::Segments,
            (Element::Segments, b"segment") => Element::Segment,
            _ => Element::Other,
        }
    }

    fn collects_text(self) -> bool {
        matches!(self, Element::Meta | Element::Group | Element::Segment)
    }
}

struct PendingFile {
    poster: String,
    subject: String,
    date: DateTime<Utc>,
    groups: BTreeSet<String>,
    segments: Vec<NzbSegment>,
}

impl PendingFile {
    fn from_element(e: &BytesStart<'_>) -> Result<Self> {
        let date = match attribute(e, b"date")? {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .unwrap_or_else(|| {
                    debug!("Unparsable NZB file date {:?}, using epoch", value);
                    DateTime::<Utc>::default()
                }),
            None => DateTime::<Utc>::default(),
        };

        Ok(Self {
            poster: attribute(e, b"poster")?.unwrap_or_default(),
            subject: attribute(e, b"subject")?.unwrap_or_default(),
            date,
            groups: BTreeSet::new(),
            segments: Vec::new(),
        })
    }

    fn finish(self) -> NzbFile {
        NzbFile::new(
            self.poster,
            self.subject,
            self.date,
            self.groups,
            self.segments,
        )
    }
}

struct PendingSegment {
    number: u32,
    size: u64,
}

impl PendingSegment {
    fn from_element(e: &BytesStart<'_>) -> Result<Self> {
        Ok(Self {
            number: numeric_attribute(e, b"number")?,
            size: numeric_attribute(e, b"bytes")?,
        })
    }
}

/// Incremental document state fed by reader events
#[derive(Default)]
struct DocumentParser {
    scope: Option<Scope>,
    stack: Vec<(Element, String)>,
    meta: BTreeMap<String, BTreeSet<String>>,
    meta_key: Option<String>,
    file: Option<PendingFile>,
    segment: Option<PendingSegment>,
    text: String,
    files: Vec<NzbFile>,
}

impl DocumentParser {
    fn start(&mut self, scope: Scope, e: &BytesStart<'_>) -> Result<()> {
        let local_name = e.local_name();
        let element = match (self.stack.last(), self.scope) {
            (None, None) => {
                if local_name.as_ref() != b"nzb" || scope == Scope::Foreign {
                    return Err(missing_root());
                }
                trace!("NZB root element found ({:?})", scope);
                self.scope = Some(scope);
                Element::Nzb
            }
            (Some(&(parent, _)), Some(root_scope)) if scope == root_scope => {
                Element::child_of(parent, local_name.as_ref())
            }
            _ => Element::Other,
        };

        match element {
            Element::Meta => self.meta_key = attribute(e, b"type")?,
            Element::File => self.file = Some(PendingFile::from_element(e)?),
            Element::Segment if self.file.is_some() => {
                self.segment = Some(PendingSegment::from_element(e)?)
            }
            _ => {}
        }
        if element.collects_text() {
            self.text.clear();
        }

        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        self.stack.push((element, name));
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.stack.last().is_some_and(|(e, _)| e.collects_text()) {
            self.text.push_str(text);
        }
    }

    fn end(&mut self) -> Result<()> {
        let Some((element, _)) = self.stack.pop() else {
            return Ok(());
        };

        match element {
            Element::Meta => {
                // <meta> without a type carries nothing addressable
                if let Some(key) = self.meta_key.take() {
                    let value = self.text.trim().to_string();
                    self.meta.entry(key).or_default().insert(value);
                }
            }
            Element::Group => {
                let group = self.text.trim();
                if let Some(file) = self.file.as_mut()
                    && !group.is_empty()
                {
                    file.groups.insert(group.to_string());
                }
            }
            Element::Segment => {
                if let Some(segment) = self.segment.take()
                    && let Some(file) = self.file.as_mut()
                {
                    file.segments.push(NzbSegment::new(
                        segment.number,
                        segment.size,
                        self.text.as_str(),
                    )?);
                }
            }
            Element::File => {
                if let Some(file) = self.file.take() {
                    self.files.push(file.finish());
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn finish(self) -> Result<NzbDocument> {
        if self.scope.is_none() {
            return Err(missing_root());
        }
        if let Some((_, name)) = self.stack.last() {
            return Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(name.clone())).into());
        }

        Ok(NzbDocument::new(self.meta, self.files))
    }
}

fn missing_root() -> CodecError {
    CodecError::InvalidNzbData("Missing <nzb> root element".to_string())
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn numeric_attribute<T: FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Result<T> {
    let name = String::from_utf8_lossy(key);
    let value = attribute(e, key)?.ok_or_else(|| {
        CodecError::InvalidNzbData(format!("Segment is missing the {} attribute", name))
    })?;

    value.trim().parse().map_err(|_| {
        CodecError::InvalidNzbData(format!("Segment {} attribute is not a number: {:?}", name, value))
    })
}

/// Parse an NZB document from XML
///
/// Accepts documents with the NZB namespace and without any namespace; the
/// root decides which of the two the child elements must use.
///
/// # Example
/// ```
/// use usenet_codec::nzb::parse_nzb;
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <!DOCTYPE nzb PUBLIC "-//newzBin//DTD NZB 1.1//EN" "http://www.newzbin.com/DTD/nzb/nzb-1.1.dtd">
/// <nzb xmlns="http://www.newzbin.com/DTD/2003/nzb">
///   <head>
///     <meta type="title">Example File</meta>
///   </head>
///   <file poster="user@example.com" date="1234567890" subject="&quot;example.bin&quot; yEnc (1/1)">
///     <groups>
///       <group>alt.binaries.test</group>
///     </groups>
///     <segments>
///       <segment bytes="768000" number="1">part1of1@example.com</segment>
///     </segments>
///   </file>
/// </nzb>"#;
///
/// let nzb = parse_nzb(xml)?;
/// assert_eq!(nzb.meta_value("title"), Some("Example File"));
/// assert_eq!(nzb.files()[0].file_name(), "example.bin");
/// assert_eq!(nzb.files()[0].segments().len(), 1);
/// # Ok::<(), usenet_codec::CodecError>(())
/// ```
///
/// # Errors
///
/// - [`CodecError::Xml`] if the document is not well-formed
/// - [`CodecError::InvalidNzbData`] if the `<nzb>` root is missing or a
///   segment lacks a numeric `number` or `bytes` attribute
pub fn parse_nzb(xml: &str) -> Result<NzbDocument> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut parser = DocumentParser::default();

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let scope = Scope::of(&resolved);

        match event {
            Event::Start(ref e) => parser.start(scope, e)?,
            Event::Empty(ref e) => {
                parser.start(scope, e)?;
                parser.end()?;
            }
            Event::End(_) => parser.end()?,
            Event::Text(ref e) => {
                let text = e.unescape().map_err(quick_xml::Error::from)?;
                parser.text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let document = parser.finish()?;
    debug!(
        "Parsed NZB with {} files ({} bytes)",
        document.files().len(),
        document.size()
    );
    Ok(document)
}

impl FromStr for NzbDocument {
    type Err = CodecError;

    fn from_str(xml: &str) -> Result<Self> {
        parse_nzb(xml)
    }
}
