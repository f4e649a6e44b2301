use bitstream_io::{BigEndian, BitRead, BitReader};
use itertools::iproduct;

use std::cmp;
use std::io::Cursor;

use crate::error::{Error, Result};
use crate::matrix::{Cell, QrMatrix};
use crate::tables::{self, VersionInfo, FORMAT_INFO_M_MASK0};

pub mod masking;

/// Places a finder pattern (concentric squares) with its top left corner at (x, y),
/// including the light separator around it where that falls inside the symbol.
fn place_finder_pattern(m: &mut QrMatrix, x: isize, y: isize) {
    let n = m.size() as isize;
    for (dy, dx) in iproduct!(-1..=7isize, -1..=7isize) {
        let (xx, yy) = (x + dx, y + dy);
        if xx < 0 || yy < 0 || xx >= n || yy >= n {
            continue;
        }
        // Chebyshev distance from the centre: dark at 0, 1 and 3, light at 2 and 4
        let r = cmp::max((dx - 3).abs(), (dy - 3).abs());
        m[(xx as usize, yy as usize)] = Cell::Function(r < 2 || r == 3);
    }
}

/// Places an alignment pattern centred on (x, y)
fn place_alignment_pattern(m: &mut QrMatrix, x: usize, y: usize) {
    for (dy, dx) in iproduct!(-2..=2isize, -2..=2isize) {
        let r = cmp::max(dx.abs(), dy.abs());
        let pos = ((x as isize + dx) as usize, (y as isize + dy) as usize);
        m[pos] = Cell::Function(r % 2 == 0);
    }
}

/// Timing patterns along row 6 and column 6, only where nothing else was placed
fn place_timing_patterns(m: &mut QrMatrix) {
    for i in 0..m.size() {
        let val = Cell::Function(i % 2 == 0);
        if m[(i, 6)] == Cell::Unset {
            m[(i, 6)] = val;
        }
        if m[(6, i)] == Cell::Unset {
            m[(6, i)] = val;
        }
    }
}

/// Return a matrix with all the function patterns of the given version painted in:
/// finder patterns with separators, alignment patterns, timing patterns, format
/// information, version information (version 7 and up) and the dark module.
/// All remaining modules are `Cell::Unset` and form the encoding region.
pub fn create_qr_canvas(info: &VersionInfo) -> QrMatrix {
    let mut m = QrMatrix::new(info.version);
    let n = m.size() as isize;

    // 3 finder patterns in top and left corners
    place_finder_pattern(&mut m, 0, 0);
    place_finder_pattern(&mut m, n - 7, 0);
    place_finder_pattern(&mut m, 0, n - 7);

    // alignment patterns only for version >= 2
    for (x, y) in tables::alignment_pattern_points(info.version) {
        place_alignment_pattern(&mut m, x, y);
    }

    place_timing_patterns(&mut m);

    insert_format_info(&mut m, FORMAT_INFO_M_MASK0);
    if let Some(bits) = tables::version_info_bits(info.version) {
        insert_version_info(&mut m, bits);
    }

    // dark module
    let n = m.size();
    m[(8, n - 8)] = Cell::Function(true);

    m
}

//-------------------------------------------------------------------
// CODEWORD PLACEMENT
//-------------------------------------------------------------------

/// Iterator over all module positions in codeword placement order: two columns
/// at a time from the right edge, upwards in the first column pair and then
/// alternating, with the vertical timing column skipped. Within a pair the right
/// module comes first. Positions of function modules are included; the caller
/// skips them.
pub struct ZigZag {
    size: usize,
    right: usize,       // right column of the current pair
    vert: usize,        // steps taken in the current pair
    left: bool,         // next position is in the left column
    done: bool,
}

impl ZigZag {
    pub fn new(size: usize) -> ZigZag {
        ZigZag { size, right: size - 1, vert: 0, left: false, done: size < 2 }
    }

    fn upward(&self) -> bool {
        (self.right + 1) & 2 == 0
    }
}

impl Iterator for ZigZag {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.done {
            return None;
        }

        let x = if self.left { self.right - 1 } else { self.right };
        let y = if self.upward() { self.size - 1 - self.vert } else { self.vert };

        // advance
        if !self.left {
            self.left = true;
        } else {
            self.left = false;
            self.vert += 1;
            if self.vert == self.size {
                // turn around at the border and move to the next column pair
                self.vert = 0;
                if self.right < 3 {
                    self.done = true;
                } else {
                    self.right -= 2;
                    if self.right == 6 {
                        self.right = 5;
                    }
                }
            }
        }

        Some((x, y))
    }
}

/// Insert the codewords into the encoding region of a matrix created by the
/// create_qr_canvas function. Bits are taken most significant first. Modules of
/// the encoding region that remain once all bits are placed are remainder bits
/// and become light data modules.
pub fn insert_data_payload(m: &mut QrMatrix, codewords: &[u8]) -> Result<()> {
    let total_bits = codewords.len() * 8;
    let mut reader = BitReader::endian(Cursor::new(codewords), BigEndian);
    let mut placed = 0;

    for pos in ZigZag::new(m.size()) {
        if m[pos] != Cell::Unset {
            continue;
        }
        m[pos] = if placed < total_bits {
            placed += 1;
            Cell::Data(reader.read_bit()?)
        } else {
            Cell::Data(false)
        };
    }

    if placed < total_bits {
        return Err(Error::LayoutMismatch { remaining_bits: total_bits - placed });
    }
    Ok(())
}

//-------------------------------------------------------------------
// FORMAT & VERSION INFO BITS
//-------------------------------------------------------------------

// coordinates in the QR symbol where to write format and version bits, most
// significant bit first. Negative values count from the right or bottom edge.
static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (5, -9), (5, -10), (5, -11),
    (4, -9), (4, -10), (4, -11),
    (3, -9), (3, -10), (3, -11),
    (2, -9), (2, -10), (2, -11),
    (1, -9), (1, -10), (1, -11),
    (0, -9), (0, -10), (0, -11),
];

static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (-9, 5), (-10, 5), (-11, 5),
    (-9, 4), (-10, 4), (-11, 4),
    (-9, 3), (-10, 3), (-11, 3),
    (-9, 2), (-10, 2), (-11, 2),
    (-9, 1), (-10, 1), (-11, 1),
    (-9, 0), (-10, 0), (-11, 0),
];

static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (0, 8), (1, 8), (2, 8), (3, 8), (4, 8), (5, 8), (7, 8), (8, 8),
    (8, 7), (8, 5), (8, 4), (8, 3), (8, 2), (8, 1), (8, 0),
];

static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (8, -1), (8, -2), (8, -3), (8, -4), (8, -5), (8, -6), (8, -7), (-8, 8),
    (-7, 8), (-6, 8), (-5, 8), (-4, 8), (-3, 8), (-2, 8), (-1, 8),
];

// helper function to write format or version bits as function modules.
// bits are written big-endian, num_bits says how many
fn insert_bits_at(m: &mut QrMatrix, bits: u32, num_bits: u32, coords: &[(i16, i16)]) {
    let n = m.size() as i16;
    let mut mask = 1 << (num_bits - 1);

    for &(xoff, yoff) in coords {
        let x = if xoff < 0 { xoff + n } else { xoff };
        let y = if yoff < 0 { yoff + n } else { yoff };
        m[(x as usize, y as usize)] = Cell::Function(mask & bits != 0);
        mask >>= 1;
    }
}

/// Write both copies of the 15 format bits
pub fn insert_format_info(m: &mut QrMatrix, format_bits: u16) {
    insert_bits_at(m, format_bits as u32, 15, &FORMAT_INFO_COORDS_QR_MAIN);
    insert_bits_at(m, format_bits as u32, 15, &FORMAT_INFO_COORDS_QR_SIDE);
}

/// Write both copies of the 18 version bits
pub fn insert_version_info(m: &mut QrMatrix, version_bits: u32) {
    insert_bits_at(m, version_bits, 18, &VERSION_INFO_COORDS_BL);
    insert_bits_at(m, version_bits, 18, &VERSION_INFO_COORDS_TR);
}


//-------------------------------------------------------------------
// TESTS
//-------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{lookup_version, remainder_bits, VERSION_TABLE};

    use std::collections::HashSet;

    fn canvas(version: u8) -> QrMatrix {
        create_qr_canvas(lookup_version(version).unwrap())
    }

    #[test]
    fn test_canvas_sizes() {
        assert_eq!(canvas(1).size(), 21);
        assert_eq!(canvas(2).size(), 25);
        assert_eq!(canvas(10).size(), 57);
    }

    #[test]
    fn test_finder_patterns() {
        let m = canvas(1);
        let n = m.size();
        for &(ox, oy) in &[(0, 0), (n - 7, 0), (0, n - 7)] {
            // outer ring dark, second ring light, 3x3 core dark
            assert!(m.is_dark(ox, oy));
            assert!(m.is_dark(ox + 6, oy + 6));
            assert!(!m.is_dark(ox + 1, oy + 1));
            assert!(!m.is_dark(ox + 5, oy + 3));
            assert!(m.is_dark(ox + 2, oy + 2));
            assert!(m.is_dark(ox + 3, oy + 3));
            assert!(m[(ox + 3, oy + 3)].is_function());
        }
        // separators
        assert_eq!(m[(7, 0)], Cell::Function(false));
        assert_eq!(m[(0, 7)], Cell::Function(false));
        assert_eq!(m[(n - 8, 3)], Cell::Function(false));
        assert_eq!(m[(3, n - 8)], Cell::Function(false));
        assert_eq!(m[(7, 7)], Cell::Function(false));
    }

    #[test]
    fn test_timing_and_dark_module() {
        let m = canvas(2);
        let n = m.size();
        for i in 8..n - 8 {
            assert_eq!(m[(i, 6)], Cell::Function(i % 2 == 0));
            assert_eq!(m[(6, i)], Cell::Function(i % 2 == 0));
        }
        assert_eq!(m[(8, n - 8)], Cell::Function(true));
    }

    #[test]
    fn test_alignment_pattern() {
        let m = canvas(2);
        assert_eq!(m[(18, 18)], Cell::Function(true));
        assert_eq!(m[(17, 18)], Cell::Function(false));
        assert_eq!(m[(16, 16)], Cell::Function(true));
        assert!(canvas(1).count(|c| c == Cell::Unset) == 208);
    }

    #[test]
    fn test_format_info() {
        let m = canvas(1);
        let n = m.size();
        // 0x5412 = 101010000010010, first bit next to the top left finder
        assert_eq!(m[(0, 8)], Cell::Function(true));
        assert_eq!(m[(1, 8)], Cell::Function(false));
        assert_eq!(m[(8, 0)], Cell::Function(false));
        assert_eq!(m[(8, 1)], Cell::Function(true));
        assert_eq!(m[(8, n - 1)], Cell::Function(true));
        assert_eq!(m[(n - 1, 8)], Cell::Function(false));
    }

    #[test]
    fn test_version_info() {
        let m = canvas(7);
        let n = m.size();
        // 0x07c94 = 000111 110010 010100; the last bit sits at (0, n - 11)
        assert_eq!(m[(0, n - 11)], Cell::Function(false));
        assert_eq!(m[(n - 11, 0)], Cell::Function(false));
        assert_eq!(m[(5, n - 9)], Cell::Function(false));
        assert_eq!(m[(4, n - 9)], Cell::Function(true));
        assert_eq!(m[(n - 9, 4)], Cell::Function(true));
        assert!(canvas(6).get(0, 41 - 11).map_or(false, |c| c == Cell::Unset));
    }

    #[test]
    fn test_encoding_region_capacity() {
        for info in VERSION_TABLE {
            let m = create_qr_canvas(info);
            let free = m.count(|c| c == Cell::Unset);
            assert_eq!(free, info.total_codewords * 8 + remainder_bits(info.version),
                       "version {}", info.version);
        }
    }

    #[test]
    fn test_zigzag_order() {
        let order: Vec<(usize, usize)> = ZigZag::new(21).take(6).collect();
        assert_eq!(order, [(20, 20), (19, 20), (20, 19), (19, 19), (20, 18), (19, 18)]);

        // second column pair runs downwards from the top
        let second: Vec<(usize, usize)> = ZigZag::new(21).skip(42).take(3).collect();
        assert_eq!(second, [(18, 0), (17, 0), (18, 1)]);
    }

    #[test]
    fn test_zigzag_visits_every_column_but_timing_once() {
        for &n in &[21usize, 25, 45, 57] {
            let positions: Vec<(usize, usize)> = ZigZag::new(n).collect();
            let unique: HashSet<(usize, usize)> = positions.iter().copied().collect();
            assert_eq!(positions.len(), n * (n - 1));
            assert_eq!(unique.len(), positions.len());
            assert!(positions.iter().all(|&(x, _)| x != 6));
        }
    }

    #[test]
    fn test_payload_fills_every_module() {
        let info = lookup_version(2).unwrap();
        let mut m = create_qr_canvas(info);
        let functions_before: Vec<Cell> = m.cells().map(|(_, _, c)| c).filter(|c| c.is_function()).collect();

        insert_data_payload(&mut m, &vec![0xFF; info.total_codewords]).unwrap();

        assert_eq!(m.count(|c| c == Cell::Unset), 0);
        // all codeword bits are set, the 7 remainder bits are light
        assert_eq!(m.count(|c| c == Cell::Data(true)), info.total_codewords * 8);
        assert_eq!(m.count(|c| c == Cell::Data(false)), 7);
        let functions_after: Vec<Cell> = m.cells().map(|(_, _, c)| c).filter(|c| c.is_function()).collect();
        assert_eq!(functions_before, functions_after);
    }

    #[test]
    fn test_first_bits_in_lower_right_corner() {
        let info = lookup_version(1).unwrap();
        let mut m = create_qr_canvas(info);
        let mut codewords = vec![0u8; info.total_codewords];
        codewords[0] = 0b1010_0000;
        insert_data_payload(&mut m, &codewords).unwrap();

        assert_eq!(m[(20, 20)], Cell::Data(true));
        assert_eq!(m[(19, 20)], Cell::Data(false));
        assert_eq!(m[(20, 19)], Cell::Data(true));
        assert_eq!(m[(19, 19)], Cell::Data(false));
    }

    #[test]
    fn test_too_many_codewords() {
        let info = lookup_version(1).unwrap();
        let mut m = create_qr_canvas(info);
        let result = insert_data_payload(&mut m, &vec![0u8; info.total_codewords + 2]);
        assert!(matches!(result, Err(Error::LayoutMismatch { remaining_bits: 16 })));
    }
}
