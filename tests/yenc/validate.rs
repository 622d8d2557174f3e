//! Validation findings for decoded articles

use usenet_codec::crc32::checksum;
use usenet_codec::yenc::{
    ValidationCode, YencHeader, decode_article, encode, line::encode_lines, validate,
};

fn article_lines(begin: &[&str], data: &[u8], footer: &str) -> Vec<Vec<u8>> {
    let mut lines: Vec<Vec<u8>> = begin.iter().map(|l| l.as_bytes().to_vec()).collect();
    lines.extend(encode_lines(data, 128));
    lines.push(footer.as_bytes().to_vec());
    lines
}

#[test]
fn test_valid_single_part() {
    let data = b"payload bytes";
    let lines = encode(YencHeader::single("a", data.len() as u64, 128), data).unwrap();
    let result = validate(&decode_article(&lines).unwrap());
    assert!(result.is_valid());
    assert_eq!(result.to_string(), "valid");
}

#[test]
fn test_missing_footer_is_valid() {
    let lines = article_lines(&["=ybegin line=128 size=99 name=a"], b"abc", "");
    // drop the footer line entirely
    let article = decode_article(&lines[..lines.len() - 1]).unwrap();
    assert!(article.footer().is_none());
    assert!(validate(&article).is_valid());
}

#[test]
fn test_checksum_mismatch() {
    let data = b"abcdef";
    let footer = format!("=yend size=6 crc32={:x}", checksum(b"abcdeg"));
    let lines = article_lines(&["=ybegin line=128 size=6 name=a"], data, &footer);

    let result = validate(&decode_article(&lines).unwrap());
    assert_eq!(result.len(), 1);
    let failure = &result.failures()[0];
    assert_eq!(failure.code, ValidationCode::ChecksumMismatch);
    let detail = failure.detail.unwrap();
    assert_eq!(detail.expected, u64::from(checksum(b"abcdeg")));
    assert_eq!(detail.actual, u64::from(checksum(data)));
}

#[test]
fn test_missing_checksum_stops_validation() {
    let lines = article_lines(&["=ybegin line=128 size=3 name=a"], b"abc", "=yend size=3");
    let result = validate(&decode_article(&lines).unwrap());
    assert_eq!(result.len(), 1);
    assert!(result.contains(ValidationCode::MissingChecksum));
}

#[test]
fn test_truncated_single_part() {
    let data = b"abc";
    let footer = format!("=yend size=5 crc32={:x}", checksum(data));
    let lines = article_lines(&["=ybegin line=128 size=5 name=a"], data, &footer);

    let result = validate(&decode_article(&lines).unwrap());
    assert!(result.contains(ValidationCode::SizeMismatch));
    assert!(!result.contains(ValidationCode::ChecksumMismatch));
}

#[test]
fn test_multipart_part_and_size_mismatch() {
    let data = b"abcd";
    let footer = format!("=yend size=4 part=3 pcrc32={:x}", checksum(data));
    let lines = article_lines(
        &[
            "=ybegin part=2 total=3 line=128 size=12 name=a",
            "=ypart begin=5 end=9",
        ],
        data,
        &footer,
    );

    let result = validate(&decode_article(&lines).unwrap());
    let codes: Vec<ValidationCode> = result.failures().iter().map(|f| f.code).collect();
    assert_eq!(
        codes,
        vec![ValidationCode::PartMismatch, ValidationCode::SizeMismatch]
    );
}

#[test]
fn test_multipart_uses_part_checksum() {
    let data = b"abcd";
    let footer = format!("=yend size=4 part=1 crc32={:x}", checksum(data));
    let lines = article_lines(
        &[
            "=ybegin part=1 total=2 line=128 size=8 name=a",
            "=ypart begin=1 end=4",
        ],
        data,
        &footer,
    );

    // a whole-file crc32 does not stand in for the part checksum
    let result = validate(&decode_article(&lines).unwrap());
    assert!(result.contains(ValidationCode::MissingChecksum));
}

#[test]
fn test_failures_iterate_in_order() {
    let data = b"xyz";
    let lines = article_lines(
        &["=ybegin line=128 size=3 name=a"],
        data,
        "=yend size=7 crc32=deadbeef",
    );
    let result = validate(&decode_article(&lines).unwrap());

    let codes: Vec<ValidationCode> = (&result).into_iter().map(|f| f.code).collect();
    assert_eq!(
        codes,
        vec![ValidationCode::SizeMismatch, ValidationCode::ChecksumMismatch]
    );
    assert!(!result.to_string().is_empty());
}
