/// Seed value of the digest, from the original djb2 formulation.
const SEED: u64 = 5381;

/// Computes the 64-bit djb2 digest of a byte sequence.
///
/// The accumulator starts at 5381 and each byte folds in as
/// `accumulator * 33 + byte`, with all arithmetic wrapping modulo 2^64. The
/// multiplication is the `(h << 5) + h` of the classic formulation. Bucket
/// placement depends on this value bit-for-bit, so the constants must not
/// change.
///
/// The digest is order-sensitive and deterministic: identical byte content
/// always produces the identical value.
///
/// # Examples
///
/// ```rust
/// # use tri_hash::digest::djb2;
/// #
/// assert_eq!(djb2(b""), 5381);
/// assert_eq!(djb2(b"hello"), djb2(b"hello"));
/// assert_ne!(djb2(b"hello"), djb2(b"olleh"));
/// ```
#[must_use]
pub fn djb2(bytes: &[u8]) -> u64 {
    let mut digest = SEED;
    for &byte in bytes {
        digest = digest.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_the_seed() {
        assert_eq!(djb2(b""), 5381);
    }

    #[test]
    fn known_vectors() {
        assert_eq!(djb2(b"a"), 177670);
        assert_eq!(djb2(b"hello"), 210714636441);
    }

    #[test]
    fn matches_the_shift_add_formulation() {
        for bytes in [
            b"".as_slice(),
            b"a",
            b"John Doe",
            &3.2f32.to_ne_bytes(),
            &[0xFF; 64],
        ] {
            let mut digest: u64 = 5381;
            for &byte in bytes {
                digest = (digest << 5)
                    .wrapping_add(digest)
                    .wrapping_add(u64::from(byte));
            }
            assert_eq!(djb2(bytes), digest);
        }
    }

    #[test]
    fn order_sensitive() {
        assert_ne!(djb2(b"ab"), djb2(b"ba"));
        assert_ne!(djb2(&[1, 2, 3]), djb2(&[3, 2, 1]));
    }

    #[test]
    fn float_raw_bytes_are_deterministic() {
        let first = djb2(&3.2f32.to_ne_bytes());
        let second = djb2(&3.2f32.to_ne_bytes());
        assert_eq!(first, second);
        assert_ne!(first, djb2(&4.2f32.to_ne_bytes()));
    }
}
