//! Encode/decode round trips and the escaping rules of encoded lines

use usenet_codec::CodecError;
use usenet_codec::crc32::checksum;
use usenet_codec::nzb::plan_segments;
use usenet_codec::yenc::{
    MAX_LINE_LENGTH, YencEncoder, YencHeader, decode_article, encode, encode_to_bytes, validate,
};

fn all_bytes(repeat: usize) -> Vec<u8> {
    (0..=255u8).cycle().take(256 * repeat).collect()
}

fn data_lines(lines: &[Vec<u8>]) -> &[Vec<u8>] {
    let start = if lines[1].starts_with(b"=ypart ") { 2 } else { 1 };
    &lines[start..lines.len() - 1]
}

#[test]
fn test_known_vector() {
    let lines = encode(YencHeader::single("test.txt", 4, 128), b"Test").unwrap();
    assert_eq!(
        lines,
        vec![
            b"=ybegin line=128 size=4 name=test.txt".to_vec(),
            vec![126, 143, 157, 158],
            b"=yend size=4 crc32=784dd132".to_vec(),
        ]
    );
}

#[test]
fn test_roundtrip_every_byte_value() {
    let data = all_bytes(4);

    for line_length in [1, 2, 3, 64, 128, 255, MAX_LINE_LENGTH] {
        let header = YencHeader::single("bytes.bin", data.len() as u64, line_length);
        let lines = encode(header, &data).unwrap();
        let article = decode_article(&lines).unwrap();

        assert_eq!(article.data(), data.as_slice(), "line length {}", line_length);
        assert!(validate(&article).is_valid(), "line length {}", line_length);
    }
}

#[test]
fn test_encoded_lines_are_transport_safe() {
    let data = all_bytes(8);

    for line_length in [1, 2, 16, 128] {
        let header = YencHeader::single("bytes.bin", data.len() as u64, line_length);
        let lines = encode(header, &data).unwrap();

        for line in data_lines(&lines) {
            assert!(!line.is_empty());
            assert!(line.len() <= line_length + 1, "line too long: {:?}", line);
            assert!(
                !line.iter().any(|b| matches!(b, 0x00 | b'\r' | b'\n')),
                "raw critical byte in {:?}",
                line
            );
            assert!(!matches!(line[0], b'.' | b' ' | b'\t'), "bad first byte in {:?}", line);
            if line.len() == line_length && line_length > 1 {
                assert!(!matches!(line[line_length - 1], b' ' | b'\t'));
            }
        }
    }
}

#[test]
fn test_positional_escapes_stay_at_line_edges() {
    let data = all_bytes(8);

    for line_length in [4, 16, 128] {
        let header = YencHeader::single("bytes.bin", data.len() as u64, line_length);
        let lines = encode(header, &data).unwrap();
        let mut mid_line_escapes = 0;

        for line in data_lines(&lines) {
            let mut i = 0;
            while i < line.len() {
                if line[i] != b'=' {
                    i += 1;
                    continue;
                }
                let value = line[i + 1].wrapping_sub(64);
                let first = i == 0;
                let last = i + 1 == line_length;
                match value {
                    b'.' if !first => mid_line_escapes += 1,
                    b' ' | b'\t' if !first && !last => mid_line_escapes += 1,
                    _ => {}
                }
                i += 2;
            }
        }

        assert_eq!(mid_line_escapes, 0, "line length {}", line_length);
        // dots, spaces and tabs still appear raw away from the edges
        let raw_inner = data_lines(&lines)
            .iter()
            .filter(|l| l.len() > 2)
            .flat_map(|l| &l[1..l.len() - 1])
            .filter(|&&b| matches!(b, b'.' | b' ' | b'\t'))
            .count();
        assert!(raw_inner > 0, "line length {}", line_length);
    }
}

#[test]
fn test_unescaped_equals_only_as_escape_prefix() {
    let data = all_bytes(2);
    let header = YencHeader::single("eq.bin", data.len() as u64, 128);
    let lines = encode(header, &data).unwrap();

    for line in data_lines(&lines) {
        let mut i = 0;
        while i < line.len() {
            if line[i] == b'=' {
                assert!(i + 1 < line.len(), "dangling escape in {:?}", line);
                i += 2;
            } else {
                i += 1;
            }
        }
    }
}

#[test]
fn test_footer_carries_crc32() {
    let data = b"The quick brown fox jumps over the lazy dog";
    let lines = encode(YencHeader::single("fox.txt", data.len() as u64, 128), data).unwrap();

    let footer = String::from_utf8(lines.last().unwrap().clone()).unwrap();
    assert_eq!(footer, format!("=yend size={} crc32={:x}", data.len(), checksum(data)));
}

#[test]
fn test_multipart_roundtrip() {
    let data = all_bytes(40);
    let plan = plan_segments("big.bin", data.len() as u64, 3000, "example.com").unwrap();
    assert_eq!(plan.parts.len(), 4);

    let mut rebuilt = vec![0u8; data.len()];
    for part in &plan.parts {
        let header = plan.yenc_header(part, 128);
        let range = part.offset as usize..(part.offset + part.size) as usize;
        let lines = encode(header, &data[range]).unwrap();

        assert_eq!(
            lines[1],
            format!("=ypart begin={} end={}", part.offset + 1, part.offset + part.size).into_bytes()
        );

        let article = decode_article(&lines).unwrap();
        assert!(validate(&article).is_valid());

        let header = article.header();
        assert_eq!(header.part_number, part.number);
        assert_eq!(header.total_parts, 4);
        let start = header.part_offset as usize;
        rebuilt[start..start + article.data().len()].copy_from_slice(article.data());
    }

    assert_eq!(rebuilt, data);
}

#[test]
fn test_crlf_terminated_body_decodes() {
    let data = all_bytes(1);
    let body = encode_to_bytes(YencHeader::single("crlf.bin", 256, 32), &data).unwrap();
    assert!(body.ends_with(b"\r\n"));

    // split on LF only, leaving the CR for the decoder to strip
    let lines: Vec<&[u8]> = body.split(|&b| b == b'\n').filter(|l| !l.is_empty()).collect();
    let article = decode_article(lines).unwrap();
    assert_eq!(article.data(), data.as_slice());
    assert!(validate(&article).is_valid());
}

#[test]
fn test_encoder_rejects_bad_line_length() {
    for line_length in [0, MAX_LINE_LENGTH + 1] {
        let header = YencHeader::single("x", 1, line_length);
        assert!(matches!(
            YencEncoder::new(header, &b"x"[..]),
            Err(CodecError::InvalidYencData(_))
        ));
    }
}

#[test]
fn test_encoder_short_source() {
    let header = YencHeader::single("short.bin", 100, 128);
    let err = encode(header, &[1u8; 10]).unwrap_err();
    assert!(matches!(err, CodecError::InvalidYencData(_)));
}

#[test]
fn test_encoder_reads_only_part_size() {
    let data = all_bytes(1);
    let header = YencHeader::single("head.bin", 10, 128);
    let lines = encode(header, &data).unwrap();
    let article = decode_article(&lines).unwrap();
    assert_eq!(article.data(), &data[..10]);
}
