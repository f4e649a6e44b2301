/// Contains lookup tables and other computation functions that provide reference
/// data needed for encoding a QR code: the capacity and block structure of each
/// supported version at error correction level M, alignment pattern positions and
/// the precomputed format and version information words.

use itertools::iproduct;

/// Mode indicator length for standard symbols.
pub const MODE_INDICATOR_BITS: usize = 4;

/// Length of the terminator, if the capacity allows for all of it.
pub const TERMINATOR_BITS: usize = 4;

/// One group of equally sized Reed-Solomon blocks.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub struct BlockGroup {
    pub count: usize,               // number of blocks in this group
    pub data_codewords: usize,      // data codewords in each block of the group
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub struct VersionInfo {
    pub version: u8,
    pub total_codewords: usize,     // total number of codewords in the symbol
    pub ec_codewords: usize,        // of those, how many are error correction codewords
    pub ec_per_block: usize,        // error correction codewords of every single block
    pub groups: [BlockGroup; 2],    // shorter blocks first; the second group may be empty
}

impl VersionInfo {
    pub fn data_codewords(&self) -> usize {
        self.total_codewords - self.ec_codewords
    }

    pub fn data_bits(&self) -> usize {
        self.data_codewords() * 8
    }

    /// Width & height of the symbol in modules, not counting any quiet region
    pub fn dimension(&self) -> usize {
        17 + 4 * self.version as usize
    }

    /// Bits of the byte mode character count indicator
    pub fn char_count_bits(&self) -> usize {
        if self.version <= 9 { 8 } else { 16 }
    }

    /// Whether a byte payload of length `len` fits, including mode indicator,
    /// character count and a full terminator.
    pub fn fits(&self, len: usize) -> bool {
        MODE_INDICATOR_BITS + self.char_count_bits() + len * 8 + TERMINATOR_BITS <= self.data_bits()
    }

    /// The longest byte payload accepted by `fits`.
    pub fn max_payload_len(&self) -> usize {
        (self.data_bits() - MODE_INDICATOR_BITS - self.char_count_bits() - TERMINATOR_BITS) / 8
    }

    /// Iterate over the data codeword count of each block, in placement order.
    pub fn block_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter()
            .flat_map(|g| std::iter::repeat(g.data_codewords).take(g.count))
    }

    pub fn num_blocks(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}


macro_rules! define_version_table {
    {$(
        $version:expr,
        $total_words:expr,
        $ec_per_block:expr,
        ($count1:expr, $words1:expr),
        ($count2:expr, $words2:expr);
    )*} => {
        /// Byte mode capacities at error correction level M (ISO/IEC 18004, table 9)
        pub static VERSION_TABLE: &[VersionInfo] = &[
            $(
                VersionInfo {
                    version: $version,
                    total_codewords: $total_words,
                    ec_codewords: $ec_per_block * ($count1 + $count2),
                    ec_per_block: $ec_per_block,
                    groups: [
                        BlockGroup { count: $count1, data_codewords: $words1 },
                        BlockGroup { count: $count2, data_codewords: $words2 },
                    ],
                },
            )*
        ];
    }
}


define_version_table!(
     1,  26, 10, (1, 16), (0,  0);
     2,  44, 16, (1, 28), (0,  0);
     3,  70, 26, (1, 44), (0,  0);
     4, 100, 18, (2, 32), (0,  0);
     5, 134, 24, (2, 43), (0,  0);
     6, 172, 16, (4, 27), (0,  0);
     7, 196, 18, (4, 31), (0,  0);
     8, 242, 22, (2, 38), (2, 39);
     9, 292, 22, (3, 36), (2, 37);
    10, 346, 26, (4, 43), (1, 44);
);

/// Convenience function that just indexes into the static table
pub fn lookup_version(version: u8) -> Option<&'static VersionInfo> {
    VERSION_TABLE.iter().find(|info| info.version == version)
}

pub fn largest_version() -> &'static VersionInfo {
    &VERSION_TABLE[VERSION_TABLE.len() - 1]
}

/// Return the smallest version that holds a byte payload of length `len`.
/// Payloads too long for every entry get the largest version; whether that is
/// acceptable is decided by the caller (see `VersionInfo::fits`).
pub fn version_for_length(len: usize) -> &'static VersionInfo {
    VERSION_TABLE.iter()
        .find(|info| info.fits(len))
        .unwrap_or_else(largest_version)
}

/// Number of modules left over after all codewords are placed.
pub fn remainder_bits(version: u8) -> usize {
    match version {
        2..=6 => 7,
        _ => 0
    }
}

//-------------------------------------------------------------------
// ALIGNMENT PATTERNS
//-------------------------------------------------------------------

/// Creates a vector with alignment coordinates, i.e. the
/// numbers from the row of the table E.1 in Annex E
pub fn alignment_pattern_coords(version: u8) -> Vec<usize> {
    let v = version as usize;
    match v {
        0 | 1 => Vec::new(),
        2..=6 => vec![6, (v - 2) * 4 + 18],
        _ => vec![6, (v - 7) * 2 + 22, (v - 7) * 4 + 38],
    }
}

/// Creates a vector with alignment centre points (x,y) from the entries returned by
/// alignment_pattern_coords, leaving out the three that collide with finder patterns.
pub fn alignment_pattern_points(version: u8) -> Vec<(usize, usize)> {
    let coords = alignment_pattern_coords(version);
    let last = coords.len().saturating_sub(1);
    iproduct!(coords.iter().enumerate(), coords.iter().enumerate())
        .filter(|&((i, _), (j, _))| !((i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0)))
        .map(|((_, &x), (_, &y))| (x, y))
        .collect()
}

//-------------------------------------------------------------------
// FORMAT & VERSION INFO BITS
//-------------------------------------------------------------------

/// Format information for error correction level M (indicator 00) with mask pattern 000,
/// BCH(15,5) protected and XORed with 0x5412 (table C.1 in Annex C). Symbols are always
/// produced with this combination.
pub const FORMAT_INFO_M_MASK0: u16 = 0x5412;

// lookup table for version info bits, BCH(18,6) protected, for versions 7 through 10
static VERSION_INFOS: [u32; 4] = [0x07c94, 0x085bc, 0x09a99, 0x0a4d3];

/// Version information word, only present in symbols of version 7 or up.
pub fn version_info_bits(version: u8) -> Option<u32> {
    match version {
        7..=10 => Some(VERSION_INFOS[(version - 7) as usize]),
        _ => None
    }
}
