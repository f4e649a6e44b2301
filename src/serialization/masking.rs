use crate::matrix::{Cell, QrMatrix};

/// Mask pattern 000: modules with (i + j) mod 2 == 0 are inverted. It is the only
/// mask this crate produces, and the format information written by
/// `create_qr_canvas` announces it.
pub fn mask_condition(x: usize, y: usize) -> bool {
    (x + y) % 2 == 0
}

/// Apply the mask to the encoding region. Function modules and unset modules
/// are left alone, so applying the mask a second time restores the matrix.
pub fn apply_mask(m: &mut QrMatrix) {
    for (x, y, cell) in m.cells_mut() {
        if let Cell::Data(v) = *cell {
            // XOR between mask bit and value bit
            if mask_condition(x, y) {
                *cell = Cell::Data(!v);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::{create_qr_canvas, insert_data_payload};
    use crate::tables::lookup_version;

    fn filled_canvas(version: u8) -> QrMatrix {
        let info = lookup_version(version).unwrap();
        let mut m = create_qr_canvas(info);
        let codewords: Vec<u8> = (0..info.total_codewords).map(|i| (i * 13) as u8).collect();
        insert_data_payload(&mut m, &codewords).unwrap();
        m
    }

    #[test]
    fn test_mask_twice_restores() {
        let original = filled_canvas(3);
        let mut m = original.clone();
        apply_mask(&mut m);
        assert_ne!(m, original);
        apply_mask(&mut m);
        assert_eq!(m, original);
    }

    #[test]
    fn test_function_modules_untouched() {
        let original = filled_canvas(7);
        let mut m = original.clone();
        apply_mask(&mut m);
        for ((x, y, before), (_, _, after)) in original.cells().zip(m.cells()) {
            match before {
                Cell::Function(_) => assert_eq!(before, after),
                Cell::Data(v) => assert_eq!(after, Cell::Data(v ^ mask_condition(x, y))),
                Cell::Unset => unreachable!(),
            }
        }
    }

    #[test]
    fn test_unset_modules_untouched() {
        let mut m = QrMatrix::new(1);
        apply_mask(&mut m);
        assert_eq!(m.count(|c| c == Cell::Unset), 21 * 21);
    }

    #[test]
    fn test_mask_condition() {
        assert!(mask_condition(0, 0));
        assert!(!mask_condition(1, 0));
        assert!(mask_condition(3, 5));
    }
}
