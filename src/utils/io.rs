// Byte packing helpers for the RIFF and ID3 writers

/// Pack a signed 16-bit sample little-endian into `dest[0..2]`
pub fn pack_i16_le(dest: &mut [u8], n: i16) {
    dest[..2].copy_from_slice(&n.to_le_bytes());
}

/// Pack an unsigned 16-bit integer little-endian into `dest[0..2]`
pub fn pack_u16_le(dest: &mut [u8], n: u16) {
    dest[..2].copy_from_slice(&n.to_le_bytes());
}

/// Pack an unsigned 32-bit integer little-endian into `dest[0..4]`
pub fn pack_u32_le(dest: &mut [u8], n: u32) {
    dest[..4].copy_from_slice(&n.to_le_bytes());
}

/// Pack a synchsafe 32-bit integer (7 bits per byte) into `dest[0..4]`.
///
/// Only 28 bits fit in the synchsafe layout; bits 28..32 of `val` are
/// discarded. That is a property of the ID3v2 format, which caps tag and
/// frame sizes at 256 MiB.
pub fn pack_synchsafe_u32(dest: &mut [u8], val: u32) {
    dest[0] = ((val & 0x0FE0_0000) >> 21) as u8;
    dest[1] = ((val & 0x001F_C000) >> 14) as u8;
    dest[2] = ((val & 0x0000_3F80) >> 7) as u8;
    dest[3] = (val & 0x0000_007F) as u8;
}

/// Synchsafe bytes for `val`, for callers building a frame by extension
pub fn synchsafe_bytes(val: u32) -> [u8; 4] {
    let mut out = [0u8; 4];
    pack_synchsafe_u32(&mut out, val);
    out
}

/// Parse synchsafe integer (7 bits per byte)
pub fn read_synchsafe_u32(bytes: &[u8]) -> u32 {
    ((bytes[0] as u32 & 0x7F) << 21)
        | ((bytes[1] as u32 & 0x7F) << 14)
        | ((bytes[2] as u32 & 0x7F) << 7)
        | (bytes[3] as u32 & 0x7F)
}

/// Read a little-endian 16-bit integer at `offset`
pub fn read_le_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a little-endian 32-bit integer at `offset`
pub fn read_le_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a little-endian integer of `width` bytes (1..=4) at `offset`
pub fn read_le_uint(data: &[u8], offset: usize, width: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + width)?;
    Some(
        bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32),
    )
}
