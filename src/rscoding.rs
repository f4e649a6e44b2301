//! Systematic Reed-Solomon encoding of the data codewords and the block
//! interleaving that produces the final codeword sequence of a symbol.

use crate::gf256::{gf_exp, gf_mul};
use crate::tables::VersionInfo;

/// Generator polynomial of the given degree, i.e. the product of (x - alpha^i)
/// for i in 0..degree. Coefficients are ordered from the highest degree down,
/// so the result has degree + 1 entries and starts with the leading 1.
pub fn generator_poly(degree: usize) -> Vec<u8> {
    let mut poly = vec![1u8];
    for i in 0..degree {
        let root = gf_exp(i);
        // poly * x + poly * root; subtraction is XOR in GF(2^8)
        let mut next = poly.clone();
        next.push(0);
        for (j, &coef) in poly.iter().enumerate() {
            next[j + 1] ^= gf_mul(coef, root);
        }
        poly = next;
    }
    poly
}

/// Remainder of data(x) * x^ec_count divided by the generator polynomial of
/// degree ec_count. Those are the error correction codewords that follow the
/// unchanged data codewords.
pub fn compute_remainder(data: &[u8], ec_count: usize) -> Vec<u8> {
    let generator = generator_poly(ec_count);
    let mut remainder = vec![0u8; ec_count];
    if ec_count == 0 {
        return remainder;
    }
    for &byte in data {
        let factor = byte ^ remainder[0];
        remainder.rotate_left(1);
        remainder[ec_count - 1] = 0;
        if factor != 0 {
            // the leading coefficient cancels out, only the lower ones are left
            for (r, &g) in remainder.iter_mut().zip(&generator[1..]) {
                *r ^= gf_mul(g, factor);
            }
        }
    }
    remainder
}

/// One Reed-Solomon block: a slice of the data codewords and its error correction.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Block {
    pub data: Vec<u8>,
    pub ec: Vec<u8>,
}

/// Data and error correction codewords of a symbol, kept per block.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Codewords {
    pub blocks: Vec<Block>,
}

impl Codewords {
    /// All data codewords in stream order
    pub fn data_bytes(&self) -> Vec<u8> {
        self.blocks.iter().flat_map(|b| b.data.iter().copied()).collect()
    }

    /// All error correction codewords, block after block
    pub fn ec_bytes(&self) -> Vec<u8> {
        self.blocks.iter().flat_map(|b| b.ec.iter().copied()).collect()
    }

    pub fn data_len(&self) -> usize {
        self.blocks.iter().map(|b| b.data.len()).sum()
    }

    pub fn ec_len(&self) -> usize {
        self.blocks.iter().map(|b| b.ec.len()).sum()
    }

    /// The sequence written into the symbol: the i-th data codeword of every block,
    /// for increasing i, followed by the error correction codewords in the same manner.
    /// With a single block this is just the data followed by the error correction.
    pub fn interleaved(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data_len() + self.ec_len());
        let longest_data = self.blocks.iter().map(|b| b.data.len()).max().unwrap_or(0);
        for i in 0..longest_data {
            out.extend(self.blocks.iter().filter_map(|b| b.data.get(i)));
        }
        let longest_ec = self.blocks.iter().map(|b| b.ec.len()).max().unwrap_or(0);
        for i in 0..longest_ec {
            out.extend(self.blocks.iter().filter_map(|b| b.ec.get(i)));
        }
        out
    }
}

/// Split the data codewords into the blocks of the given version and compute the
/// error correction codewords of each block.
pub fn construct_codewords(data: &[u8], info: &VersionInfo) -> Codewords {
    assert_eq!(data.len(), info.data_codewords(), "data codewords must fill the symbol exactly");

    let mut offset = 0;
    let blocks = info.block_sizes()
        .map(|len| {
            let chunk = &data[offset..offset + len];
            offset += len;
            Block {
                data: chunk.to_vec(),
                ec: compute_remainder(chunk, info.ec_per_block),
            }
        })
        .collect();

    Codewords { blocks }
}
