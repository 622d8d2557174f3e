//! File segmentation and manifest generation

use chrono::DateTime;
use usenet_codec::nzb::{parse_nzb, plan_segments, write_nzb, NzbBuilder};

#[test]
fn test_segment_sizes_cover_file() {
    for (len, part) in [(1u64, 1u64), (1, 10), (10, 1), (999, 100), (1000, 100), (1001, 100)] {
        let plan = plan_segments("f.bin", len, part, "example.com").unwrap();

        assert_eq!(plan.parts.len() as u64, len.div_ceil(part));
        assert_eq!(plan.parts.iter().map(|p| p.size).sum::<u64>(), len);
        assert!(plan.parts.iter().all(|p| p.size > 0 && p.size <= part));

        let mut expected_offset = 0;
        for (i, p) in plan.parts.iter().enumerate() {
            assert_eq!(p.number as usize, i + 1);
            assert_eq!(p.offset, expected_offset);
            expected_offset += p.size;
        }
    }
}

#[test]
fn test_subject_and_message_ids() {
    let plan = plan_segments("movie.mkv", 2_000_000, 768_000, "poster.example").unwrap();

    assert_eq!(plan.subject, "\"movie.mkv\" yEnc (1/3)");
    let ids: Vec<String> = plan.parts.iter().map(|p| p.message_id.to_string()).collect();
    assert_eq!(ids[0], format!("<part1of3.{}@poster.example>", plan.file_id));
    assert_eq!(ids[2], format!("<part3of3.{}@poster.example>", plan.file_id));
}

#[test]
fn test_plan_to_manifest_roundtrip() {
    let plan = plan_segments("movie.mkv", 2_000_000, 768_000, "poster.example").unwrap();
    let date = DateTime::from_timestamp(1_600_000_000, 0).unwrap();
    let file = plan
        .to_nzb_file("me@example.com", date, ["alt.binaries.movies"])
        .unwrap();

    assert_eq!(file.file_name(), "movie.mkv");
    assert_eq!(file.size(), 2_000_000);
    let offsets: Vec<u64> = file.segments().iter().map(|s| s.offset()).collect();
    assert_eq!(offsets, vec![0, 768_000, 1_536_000]);

    let nzb = NzbBuilder::new().add_file(file).build().unwrap();
    let parsed = parse_nzb(&write_nzb(&nzb).unwrap()).unwrap();
    assert_eq!(parsed, nzb);
}
