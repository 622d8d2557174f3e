//! Lazy decoding with YencStream

use std::cell::Cell;
use std::rc::Rc;
use usenet_codec::CodecError;
use usenet_codec::yenc::{YencHeader, YencStream, decode_article, encode};

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 13 % 256) as u8).collect()
}

#[test]
fn test_stream_matches_article_decoder() {
    let data = sample(5000);
    let lines = encode(YencHeader::single("s.bin", 5000, 128), &data).unwrap();

    let stream = YencStream::new(lines.iter()).unwrap();
    let streamed: Vec<u8> = stream.flatten().collect();

    let article = decode_article(&lines).unwrap();
    assert_eq!(streamed, article.data());
    assert_eq!(streamed, data);
}

#[test]
fn test_stream_yields_one_chunk_per_line() {
    let data = sample(1000);
    let lines = encode(YencHeader::single("s.bin", 1000, 100), &data).unwrap();
    let data_lines = lines.len() - 2;

    let stream = YencStream::new(lines).unwrap();
    assert_eq!(stream.count(), data_lines);
}

#[test]
fn test_stream_footer_after_exhaustion() {
    let data = sample(300);
    let header = YencHeader::part("p.bin", 900, 128, 2, 3, 300, 300);
    let lines = encode(header, &data).unwrap();

    let mut stream = YencStream::new(lines).unwrap();
    assert_eq!(stream.header().part_number, 2);
    assert_eq!(stream.header().part_offset, 300);
    assert!(stream.footer().is_none());

    let total: usize = stream.by_ref().map(|chunk| chunk.len()).sum();
    assert_eq!(total, 300);
    assert!(stream.is_finished());

    let footer = stream.footer().unwrap();
    assert_eq!(footer.part_number, 2);
    assert_eq!(footer.part_size, 300);
    assert!(footer.part_crc32.is_some());
    assert!(stream.next().is_none());
}

#[test]
fn test_stream_without_footer() {
    let lines: Vec<&[u8]> = vec![&b"=ybegin line=128 size=2 name=a.bin"[..], &b"kl"[..]];
    let mut stream = YencStream::new(lines).unwrap();
    assert_eq!(stream.next(), Some(b"AB".to_vec()));
    assert_eq!(stream.next(), None);
    assert!(stream.footer().is_none());
    assert!(stream.is_finished());
}

#[test]
fn test_stream_missing_begin() {
    let lines: Vec<&[u8]> = vec![&b"hello"[..], &b"world"[..]];
    assert!(matches!(
        YencStream::new(lines),
        Err(CodecError::InvalidYencData(_))
    ));
}

/// Line source that records whether it has been dropped
struct Tracked<I> {
    inner: I,
    dropped: Rc<Cell<bool>>,
}

impl<I: Iterator> Iterator for Tracked<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.inner.next()
    }
}

impl<I> Drop for Tracked<I> {
    fn drop(&mut self) {
        self.dropped.set(true);
    }
}

#[test]
fn test_stream_releases_source_at_footer() {
    let data = sample(10);
    let mut lines = encode(YencHeader::single("t.bin", 10, 128), &data).unwrap();
    lines.push(b"trailing signature".to_vec());

    let dropped = Rc::new(Cell::new(false));
    let source = Tracked {
        inner: lines.into_iter(),
        dropped: Rc::clone(&dropped),
    };

    let mut stream = YencStream::new(source).unwrap();
    assert!(stream.next().is_some());
    assert!(!dropped.get());

    assert!(stream.next().is_none());
    assert!(dropped.get());
}

#[test]
fn test_dropping_stream_releases_source() {
    let data = sample(1000);
    let lines = encode(YencHeader::single("t.bin", 1000, 64), &data).unwrap();

    let dropped = Rc::new(Cell::new(false));
    let mut stream = YencStream::new(Tracked {
        inner: lines.into_iter(),
        dropped: Rc::clone(&dropped),
    })
    .unwrap();

    stream.next();
    drop(stream);
    assert!(dropped.get());
}
