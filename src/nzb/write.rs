use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

use super::NZB_NAMESPACE;
use super::types::{NzbDocument, NzbFile};
use crate::Result;

const NZB_DOCTYPE: &str =
    r#"nzb PUBLIC "-//newzBin//DTD NZB 1.1//EN" "http://www.newzbin.com/DTD/nzb/nzb-1.1.dtd""#;

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    element: BytesStart<'_>,
    text: &str,
) -> Result<()> {
    let end = element.to_end().into_owned();
    writer.write_event(Event::Start(element))?;
    // BytesText escapes XML entities
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_file<W: Write>(writer: &mut Writer<W>, file: &NzbFile) -> Result<()> {
    let date = file.date().timestamp().to_string();
    let mut file_elem = BytesStart::new("file");
    file_elem.push_attribute(("poster", file.poster()));
    file_elem.push_attribute(("date", date.as_str()));
    file_elem.push_attribute(("subject", file.subject()));
    writer.write_event(Event::Start(file_elem))?;

    writer.write_event(Event::Start(BytesStart::new("groups")))?;
    for group in file.groups() {
        write_text_element(writer, BytesStart::new("group"), group)?;
    }
    writer.write_event(Event::End(BytesEnd::new("groups")))?;

    writer.write_event(Event::Start(BytesStart::new("segments")))?;
    for segment in file.segments() {
        let mut seg_elem = BytesStart::new("segment");
        seg_elem.push_attribute(("bytes", segment.size().to_string().as_str()));
        seg_elem.push_attribute(("number", segment.number().to_string().as_str()));
        write_text_element(writer, seg_elem, segment.message_id().as_str())?;
    }
    writer.write_event(Event::End(BytesEnd::new("segments")))?;

    writer.write_event(Event::End(BytesEnd::new("file")))?;
    Ok(())
}

/// Write an NZB document as indented XML into `sink`
///
/// # Errors
///
/// Returns [`CodecError::Io`](crate::CodecError::Io) if the sink fails.
pub fn write_nzb_to<W: Write>(document: &NzbDocument, sink: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(sink, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped(NZB_DOCTYPE)))?;

    let mut nzb_elem = BytesStart::new("nzb");
    nzb_elem.push_attribute(("xmlns", NZB_NAMESPACE));
    writer.write_event(Event::Start(nzb_elem))?;

    if !document.meta().is_empty() {
        writer.write_event(Event::Start(BytesStart::new("head")))?;
        for (key, values) in document.meta() {
            for value in values {
                let mut meta_elem = BytesStart::new("meta");
                meta_elem.push_attribute(("type", key.as_str()));
                write_text_element(&mut writer, meta_elem, value)?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("head")))?;
    }

    for file in document.files() {
        write_file(&mut writer, file)?;
    }

    writer.write_event(Event::End(BytesEnd::new("nzb")))?;
    writer.into_inner().flush()?;
    Ok(())
}

/// Write an NZB document as an XML string
///
/// The output always carries the XML declaration, the NZB 1.1 DOCTYPE and
/// the NZB namespace. `<head>` is only written when metadata exists.
///
/// # Example
///
/// ```
/// use usenet_codec::nzb::{NzbBuilder, NzbFileBuilder, parse_nzb, write_nzb};
///
/// let file = NzbFileBuilder::new()
///     .poster("user@example.com")
///     .subject("\"data.bin\" yEnc (1/1)")
///     .add_group("alt.binaries.test")
///     .add_segment(1, 1000, "part1of1.abc@example.com")
///     .build()?;
/// let nzb = NzbBuilder::new().add_meta("title", "Data").add_file(file).build()?;
///
/// let xml = write_nzb(&nzb)?;
/// assert!(xml.contains(r#"<segment bytes="1000" number="1">part1of1.abc@example.com</segment>"#));
/// assert_eq!(parse_nzb(&xml)?, nzb);
/// # Ok::<(), usenet_codec::CodecError>(())
/// ```
pub fn write_nzb(document: &NzbDocument) -> Result<String> {
    let mut buf = Vec::new();
    write_nzb_to(document, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

impl NzbDocument {
    /// Serialize this document to XML, see [`write_nzb`]
    pub fn to_xml(&self) -> Result<String> {
        write_nzb(self)
    }
}
