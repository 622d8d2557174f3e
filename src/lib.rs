#![doc = include_str!("../README.md")]

mod config;
/// CRC32 checksums as used by yEnc trailers
pub mod crc32;
mod error;
mod message_id;
/// NZB file format parser, generator and segmentation
pub mod nzb;
/// Posting and downloading files through article transports
pub mod transfer;
/// yEnc binary encoding/decoding for Usenet
pub mod yenc;

pub use config::PostingConfig;
pub use error::{CodecError, Result};
pub use message_id::MessageId;
pub use nzb::{
    NzbBuilder, NzbDocument, NzbFile, NzbFileBuilder, NzbSegment, parse_nzb, plan_segments,
    write_nzb,
};
pub use transfer::{ArticleFetcher, ArticlePoster, DownloadedFile, download_file, post_file};
pub use yenc::{
    YencArticle, YencEncoder, YencFooter, YencHeader, YencStream, decode_article,
    encode as yenc_encode, validate as yenc_validate,
};
