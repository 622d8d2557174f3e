use crate::{CodecError, Result};
use std::collections::HashMap;
use std::str::FromStr;

use super::charset::Charset;
use super::line::strip_line_ending;
use super::types::{YencFooter, YencHeader};

pub(crate) const BEGIN_KEYWORD: &[u8] = b"=ybegin ";
pub(crate) const PART_KEYWORD: &[u8] = b"=ypart ";
pub(crate) const END_KEYWORD: &[u8] = b"=yend";

/// Parse the `key=value` tokens of a yEnc metadata line
///
/// `name=` is always the last token and may contain spaces, so the line is
/// split on the first `name=` before the rest is split on spaces. Tokens
/// without a key (such as the `=ybegin` keyword itself) are ignored.
pub fn parse_tokens(line: &str) -> HashMap<String, String> {
    let mut result = HashMap::new();

    let rest = match line.split_once("name=") {
        Some((rest, name)) => {
            result.insert("name".to_string(), name.trim().to_string());
            rest
        }
        None => line,
    };

    for token in rest.split(' ') {
        if let Some((key, value)) = token.split_once('=')
            && !key.is_empty()
        {
            result.insert(key.to_string(), value.to_string());
        }
    }

    result
}

fn optional_number<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Option<T> {
    params.get(key).and_then(|s| s.trim().parse().ok())
}

fn required_number<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Result<T> {
    optional_number(params, key)
        .ok_or_else(|| CodecError::InvalidYencData(format!("Missing '{}' parameter", key)))
}

fn optional_crc(params: &HashMap<String, String>, key: &str) -> Option<u32> {
    params
        .get(key)
        .and_then(|s| u32::from_str_radix(s.trim(), 16).ok())
}

/// Read the header of a yEnc article from a line sequence
///
/// Lines before `=ybegin` are skipped. When the begin line names a part, the
/// next line must be the `=ypart` line.
///
/// # Errors
///
/// Returns [`CodecError::InvalidYencData`] when the input ends before a
/// `=ybegin` line, when a required `=ypart` line is missing, or when a
/// required token (`line`, `size`, `name`, `begin`, `end`) is missing.
pub fn read_header<I>(lines: &mut I, charset: Charset) -> Result<YencHeader>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    let begin = loop {
        let Some(line) = lines.next() else {
            return Err(CodecError::InvalidYencData(
                "Missing =ybegin line".to_string(),
            ));
        };
        let line = strip_line_ending(line.as_ref());
        if line.starts_with(BEGIN_KEYWORD) {
            break charset.decode(line);
        }
    };

    let params = parse_tokens(&begin);

    let file_name = params
        .get("name")
        .cloned()
        .ok_or_else(|| CodecError::InvalidYencData("Missing 'name' parameter".to_string()))?;
    let file_size: u64 = required_number(&params, "size")?;
    let line_length: usize = required_number(&params, "line")?;
    let part_number: u32 = optional_number(&params, "part").unwrap_or(0);

    if part_number == 0 {
        return Ok(YencHeader::single(file_name, file_size, line_length));
    }

    let part_line = lines
        .next()
        .map(|line| charset.decode(strip_line_ending(line.as_ref())))
        .filter(|line| line.as_bytes().starts_with(PART_KEYWORD))
        .ok_or_else(|| {
            CodecError::InvalidYencData(format!("Missing =ypart line for part {}", part_number))
        })?;

    let part_params = parse_tokens(&part_line);
    let begin: u64 = required_number(&part_params, "begin")?;
    let end: u64 = required_number(&part_params, "end")?;

    if begin == 0 || end < begin {
        return Err(CodecError::InvalidYencData(format!(
            "Invalid part range: begin={} end={}",
            begin, end
        )));
    }

    Ok(YencHeader::part(
        file_name,
        file_size,
        line_length,
        part_number,
        optional_number(&params, "total").unwrap_or(0),
        begin - 1,
        end - begin + 1,
    ))
}

/// Parse a yEnc `=yend` line
///
/// Never fails: missing or unparsable tokens fall back to 0 or `None`.
///
/// Format: =yend size=123456 [part=1 pcrc32=abcd1234] [crc32=12345678]
pub fn parse_footer(line: &str) -> YencFooter {
    let params = parse_tokens(line);

    YencFooter {
        part_size: optional_number(&params, "size").unwrap_or(0),
        part_number: optional_number(&params, "part").unwrap_or(0),
        crc32: optional_crc(&params, "crc32"),
        part_crc32: optional_crc(&params, "pcrc32"),
    }
}

/// Whether a raw line is the `=yend` trailer
pub(crate) fn is_footer(line: &[u8]) -> bool {
    line.starts_with(END_KEYWORD)
}

/// Render the `=ybegin` line
pub fn format_begin(header: &YencHeader) -> String {
    if header.is_file_part() {
        format!(
            "=ybegin part={} total={} line={} size={} name={}",
            header.part_number,
            header.total_parts,
            header.line_length,
            header.file_size,
            header.file_name
        )
    } else {
        format!(
            "=ybegin line={} size={} name={}",
            header.line_length, header.file_size, header.file_name
        )
    }
}

/// Render the `=ypart` line
pub fn format_part(header: &YencHeader) -> String {
    format!(
        "=ypart begin={} end={}",
        header.part_begin(),
        header.part_end()
    )
}

/// Render the `=yend` line for data with checksum `crc32`
///
/// The checksum is lowercase hex without padding.
pub fn format_footer(header: &YencHeader, crc32: u32) -> String {
    if header.is_file_part() {
        format!(
            "=yend size={} part={} pcrc32={:x}",
            header.part_size, header.part_number, crc32
        )
    } else {
        format!("=yend size={} crc32={:x}", header.part_size, crc32)
    }
}
