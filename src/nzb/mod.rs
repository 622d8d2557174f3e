//! NZB file format parser and generator
//!
//! NZB is an XML-based file format used to describe Usenet binary posts.
//! It lists, for each file, the articles (segments) needed to reassemble it.
//!
//! Reference: https://sabnzbd.org/wiki/extra/nzb-spec

mod builder;
mod parse;
mod segmentation;
mod types;
mod write;

pub use builder::{NzbBuilder, NzbFileBuilder};
pub use parse::parse_nzb;
pub use segmentation::{PlannedPart, SegmentPlan, file_name_from_subject, plan_segments};
pub use types::{NzbDocument, NzbFile, NzbSegment};
pub use write::{write_nzb, write_nzb_to};

/// XML namespace of NZB 1.1 documents
pub const NZB_NAMESPACE: &str = "http://www.newzbin.com/DTD/2003/nzb";
