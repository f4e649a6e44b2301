use crate::error::Result;
use crate::rscoding::{construct_codewords, Codewords};
use crate::tables::{VersionInfo, MODE_INDICATOR_BITS, TERMINATOR_BITS};

use std::cmp;

use bitstream_io::{BitWriter, BitWrite, BigEndian};

type QrBitWriter<'a> = BitWriter<&'a mut Vec<u8>, BigEndian>;

/// Byte mode indicator
const MODE_BYTES: u8 = 0b0100;

/// Pad codewords, alternately appended until the data capacity is filled
const PAD_CODEWORDS: [u8; 2] = [0xEC, 0x11];


fn write_mode_indicator(stream: &mut QrBitWriter) -> Result<()> {
    stream.write(MODE_INDICATOR_BITS as u32, MODE_BYTES)?;
    Ok(())
}

fn write_charcount_indicator(stream: &mut QrBitWriter, count: usize, info: &VersionInfo) -> Result<()> {
    stream.write(info.char_count_bits() as u32, count as u32)?;
    Ok(())
}

fn encode_byte_data(stream: &mut QrBitWriter, input: &[u8]) -> Result<()> {
    // byte mode takes the payload as is, UTF-8 included
    for &l in input {
        stream.write(8, l)?;
    }
    Ok(())
}

/// Write the terminator: up to four zero bits, fewer if the capacity is reached before.
fn write_terminator(stream: &mut QrBitWriter, written_bits: usize, info: &VersionInfo) -> Result<()> {
    let remaining = info.data_bits().saturating_sub(written_bits);
    let bits = cmp::min(TERMINATOR_BITS, remaining);
    if bits > 0 {
        stream.write(bits as u32, 0u8)?;
    }
    Ok(())
}

/// Encode a byte payload into exactly `info.data_codewords()` data codewords:
/// mode indicator, character count, payload, terminator, zero bits up to the
/// next byte boundary and finally the alternating pad codewords.
///
/// The payload must fit the version, see `VersionInfo::fits`.
pub fn encode_data(input: &[u8], info: &VersionInfo) -> Result<Vec<u8>> {
    let mut data: Vec<u8> = Vec::with_capacity(info.data_codewords());
    {
        let mut stream = QrBitWriter::new(&mut data);
        write_mode_indicator(&mut stream)?;
        write_charcount_indicator(&mut stream, input.len(), info)?;
        encode_byte_data(&mut stream, input)?;

        let written = MODE_INDICATOR_BITS + info.char_count_bits() + 8 * input.len();
        write_terminator(&mut stream, written, info)?;
        stream.byte_align()?;
    }

    let pad_len = info.data_codewords().saturating_sub(data.len());
    data.extend(PAD_CODEWORDS.iter().cycle().take(pad_len));
    Ok(data)
}

/// Encode a byte payload and compute the error correction codewords for it.
pub fn encode_codewords(input: &[u8], info: &VersionInfo) -> Result<Codewords> {
    let data = encode_data(input, info)?;
    tracing::trace!(version = info.version, data = data.len(), ec = info.ec_codewords, "computing codewords");
    Ok(construct_codewords(&data, info))
}


//-------------------------------------------------------------------
// TESTS
//-------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{lookup_version, version_for_length, VERSION_TABLE};

    #[test]
    fn test_empty_payload() {
        let info = lookup_version(1).unwrap();
        let data = encode_data(b"", info).unwrap();
        // 0100 00000000 0000 (terminator) then padding
        assert_eq!(&data[..3], &[0b0100_0000, 0b0000_0000, 0xEC]);
        assert_eq!(data.len(), 16);
        assert_eq!(&data[3..7], &[0x11, 0xEC, 0x11, 0xEC]);
    }

    #[test]
    fn test_header_and_payload() {
        let info = lookup_version(1).unwrap();
        let data = encode_data(b"Hi", info).unwrap();
        // 0100 | 00000010 | 01001000 | 01101001 | 0000
        assert_eq!(&data[..4], &[0b0100_0000, 0b0010_0100, 0b1000_0110, 0b1001_0000]);
        assert_eq!(data[4], 0xEC);
    }

    #[test]
    fn test_sixteen_bit_count() {
        let info = lookup_version(10).unwrap();
        let data = encode_data(&[0xFF; 3], info).unwrap();
        // 0100 | 0000000000000011 | 11111111 ...
        assert_eq!(&data[..3], &[0b0100_0000, 0b0000_0000, 0b0011_1111]);
        assert_eq!(data.len(), 216);
    }

    #[test]
    fn test_full_capacity_keeps_terminator() {
        let info = lookup_version(1).unwrap();
        let payload = [0x41; 14];
        let data = encode_data(&payload, info).unwrap();
        // 4 + 8 + 112 + 4 = 128 bits, exactly 16 codewords, no pad codeword
        assert_eq!(data.len(), 16);
        assert_eq!(data[15], 0x10);
        assert!(!data.contains(&0xEC));
    }

    #[test]
    fn test_data_length_matches_version() {
        for len in [0usize, 1, 13, 14, 15, 60, 79, 150, 213].iter().copied() {
            let info = version_for_length(len);
            let payload = vec![b'x'; len];
            assert_eq!(encode_data(&payload, info).unwrap().len(), info.data_codewords());
        }
    }

    #[test]
    fn test_codewords_per_version() {
        for info in VERSION_TABLE {
            let payload = vec![b'q'; info.max_payload_len()];
            let codewords = encode_codewords(&payload, info).unwrap();
            assert_eq!(codewords.data_len(), info.data_codewords());
            assert_eq!(codewords.ec_len(), info.ec_codewords);
        }
    }
}
