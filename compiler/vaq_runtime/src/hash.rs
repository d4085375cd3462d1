//! FNV-1a hashing for string content.

/// 32-bit FNV offset basis.
const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// 32-bit FNV prime.
const FNV_PRIME: u32 = 16_777_619;

/// Hash `bytes` with 32-bit FNV-1a.
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_offset_basis() {
        assert_eq!(fnv1a(b""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn test_known_vectors() {
        // Reference values from the FNV test suite.
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_distinguishes_order() {
        assert_ne!(fnv1a(b"ab"), fnv1a(b"ba"));
    }
}
