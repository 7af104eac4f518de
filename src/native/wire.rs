//! Wire-level helpers for the native boundary.
//!
//! Kept free of any FFI so the packing rules stay unit-testable on every
//! platform.

/// Encode a string as a NUL-terminated UTF-16 buffer.
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Pack a progress bar range into one lparam: low 16 bits carry the minimum,
/// high 16 bits the maximum.
pub fn pack_progress_range(min: i32, max: i32) -> isize {
    let packed = ((max as u32 & 0xFFFF) << 16) | (min as u32 & 0xFFFF);
    packed as i32 as isize
}

/// Split a packed range back into its halves. Inverse of
/// [`pack_progress_range`]; used by tests to prove the round trip.
pub fn unpack_progress_range(packed: isize) -> (i32, i32) {
    let packed = packed as u32;
    ((packed & 0xFFFF) as i32, (packed >> 16) as i32)
}
