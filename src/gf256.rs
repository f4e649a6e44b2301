//! Arithmetic in GF(2^8) as used by QR codes, i.e. modulo the primitive
//! polynomial x^8 + x^4 + x^3 + x^2 + 1 with generator element alpha = 2.

lazy_static! {
    /// EXP_TABLE[i] = alpha^i. The last entry wraps around to alpha^255 = 1.
    pub static ref EXP_TABLE: [u8; 256] = {
        let mut table = [0u8; 256];
        for i in 0..8 {
            table[i] = 1 << i;
        }
        for i in 8..256 {
            table[i] = table[i - 4] ^ table[i - 5] ^ table[i - 6] ^ table[i - 8];
        }
        table
    };

    /// LOG_TABLE[alpha^i] = i. LOG_TABLE[0] is undefined and left at zero.
    pub static ref LOG_TABLE: [u8; 256] = {
        let mut table = [0u8; 256];
        for i in 0..255 {
            table[EXP_TABLE[i] as usize] = i as u8;
        }
        table
    };
}

/// Multiply two field elements.
pub fn gf_mul(x: u8, y: u8) -> u8 {
    if x == 0 || y == 0 {
        return 0;
    }
    let exponent = (LOG_TABLE[x as usize] as usize + LOG_TABLE[y as usize] as usize) % 255;
    EXP_TABLE[exponent]
}

/// alpha^i
pub fn gf_exp(i: usize) -> u8 {
    EXP_TABLE[i % 255]
}
