/// Combined yEnc header from the `=ybegin` line and, for parts, the `=ypart` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YencHeader {
    /// Original filename
    pub file_name: String,
    /// Total file size in bytes
    pub file_size: u64,
    /// Line length (typically 128, max 997)
    pub line_length: usize,
    /// Part number, 0 when the article carries the whole file
    pub part_number: u32,
    /// Total number of parts, 1 when the article carries the whole file
    /// (0 when a part header omits `total=`)
    pub total_parts: u32,
    /// Size of the data carried by this article
    pub part_size: u64,
    /// 0-based byte offset of this part within the file
    pub part_offset: u64,
}

impl YencHeader {
    /// Header for an article carrying a whole file
    pub fn single(file_name: impl Into<String>, file_size: u64, line_length: usize) -> Self {
        Self {
            file_name: file_name.into(),
            file_size,
            line_length,
            part_number: 0,
            total_parts: 1,
            part_size: file_size,
            part_offset: 0,
        }
    }

    /// Header for one part of a multi-part file
    pub fn part(
        file_name: impl Into<String>,
        file_size: u64,
        line_length: usize,
        part_number: u32,
        total_parts: u32,
        part_offset: u64,
        part_size: u64,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_size,
            line_length,
            part_number,
            total_parts,
            part_size,
            part_offset,
        }
    }

    /// Whether this article carries one part of a larger file
    pub fn is_file_part(&self) -> bool {
        self.part_number > 0
    }

    /// 1-based inclusive start offset, as written in `=ypart begin=`
    pub fn part_begin(&self) -> u64 {
        self.part_offset + 1
    }

    /// 1-based inclusive end offset, as written in `=ypart end=`
    pub fn part_end(&self) -> u64 {
        self.part_offset + self.part_size
    }
}

/// yEnc trailer from the `=yend` line
///
/// Every field is optional on the wire; numeric fields default to 0 and
/// checksums to `None` when the token is absent or unparsable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YencFooter {
    /// Size of decoded data in bytes (`size=`)
    pub part_size: u64,
    /// Part number (`part=`), 0 if absent
    pub part_number: u32,
    /// CRC32 of the entire file (`crc32=`)
    pub crc32: Option<u32>,
    /// CRC32 of this part only (`pcrc32=`)
    pub part_crc32: Option<u32>,
}
