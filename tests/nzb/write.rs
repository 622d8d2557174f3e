//! NZB generation and parse/write round trips

use chrono::DateTime;
use usenet_codec::nzb::{NzbBuilder, NzbFileBuilder, parse_nzb, write_nzb, write_nzb_to};

fn document() -> usenet_codec::NzbDocument {
    let date = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    NzbBuilder::new()
        .add_meta("title", "Holiday & Friends")
        .add_meta("tag", "photos")
        .add_file(
            NzbFileBuilder::new()
                .poster("Uploader <up@example.com>")
                .subject("\"photos.part2.rar\" yEnc (1/1)")
                .date(date)
                .add_group("alt.binaries.pictures")
                .add_segment(1, 120, "p2@example.com")
                .build()
                .unwrap(),
        )
        .add_file(
            NzbFileBuilder::new()
                .poster("Uploader <up@example.com>")
                .subject("\"photos.part1.rar\" yEnc (1/2)")
                .date(date)
                .groups(["alt.binaries.pictures", "alt.binaries.test"])
                .add_segment(2, 50, "<p1b@example.com>")
                .add_segment(1, 100, "<p1a@example.com>")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[test]
fn test_write_then_parse_is_identity() {
    let original = document();
    let xml = write_nzb(&original).unwrap();
    assert_eq!(parse_nzb(&xml).unwrap(), original);
}

#[test]
fn test_written_layout() {
    let xml = document().to_xml().unwrap();

    let part1 = xml.find("photos.part1.rar").unwrap();
    let part2 = xml.find("photos.part2.rar").unwrap();
    assert!(part1 < part2, "files are written in file-name order");

    let seg1 = xml.find("p1a@example.com").unwrap();
    let seg2 = xml.find("p1b@example.com").unwrap();
    assert!(seg1 < seg2, "segments are written in number order");

    assert!(xml.contains("<meta type=\"title\">Holiday &amp; Friends</meta>"));
    assert!(xml.contains("date=\"1700000000\""));
    assert!(xml.contains("<segment bytes=\"50\" number=\"2\">p1b@example.com</segment>"));
}

#[test]
fn test_write_to_sink_matches_string() {
    let doc = document();
    let mut sink = Vec::new();
    write_nzb_to(&doc, &mut sink).unwrap();
    assert_eq!(String::from_utf8(sink).unwrap(), write_nzb(&doc).unwrap());
}
