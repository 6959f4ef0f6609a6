use {
    siphasher::sip::SipHasher13,
    std::{fmt::Write, hash::Hasher},
};

/// Hashes byte strings onto the 32-bit ring.
///
/// Both member replicas and lookup keys are placed with the same hasher, so
/// swapping it changes every key to member assignment.
pub trait RingHasher: Clone {
    fn hash(&self, bytes: &[u8]) -> u32;
}

/// Default hasher. CRC-32 (IEEE polynomial), which keeps assignments
/// reproducible against other CRC-32 based rings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32Hasher;

impl RingHasher for Crc32Hasher {
    #[inline]
    fn hash(&self, bytes: &[u8]) -> u32 {
        crc32fast::hash(bytes)
    }
}

/// SipHash-1-3 with zero keys, with the 64-bit output folded down to 32 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SipHasher32;

impl RingHasher for SipHasher32 {
    fn hash(&self, bytes: &[u8]) -> u32 {
        let mut hasher = SipHasher13::new();
        hasher.write(bytes);
        let hash = hasher.finish();

        ((hash >> 32) ^ hash) as u32
    }
}

/// Positions of the `replicas` virtual nodes of the member `key`, by replica
/// index.
///
/// The replica index is prepended to the key. Appending it instead would
/// produce a different (and more collision prone) set of positions. One buffer
/// is reused for all replicas.
pub(crate) fn replica_positions<'a, H: RingHasher>(
    hasher: &'a H,
    key: &'a str,
    replicas: usize,
) -> impl Iterator<Item = u32> + 'a {
    let mut buf = String::with_capacity(key.len() + 4);

    (0..replicas).map(move |idx| {
        buf.clear();
        // Writing into a `String` cannot fail.
        let _ = write!(buf, "{idx}{key}");
        hasher.hash(buf.as_bytes())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_known_values() {
        assert_eq!(Crc32Hasher.hash(b""), 0);
        assert_eq!(Crc32Hasher.hash(b"123456789"), 0xCBF4_3926);
        assert_eq!(
            Crc32Hasher.hash(b"The quick brown fox jumps over the lazy dog"),
            0x414F_A339
        );
    }

    #[test]
    fn sip_is_deterministic() {
        let hasher = SipHasher32;
        assert_eq!(hasher.hash(b"hello world"), hasher.hash(b"hello world"));
        assert_ne!(hasher.hash(b"hello world"), hasher.hash(b"hello world!"));
    }

    #[test]
    fn replica_index_is_a_prefix() {
        let positions = replica_positions(&Crc32Hasher, "node", 8).collect::<Vec<_>>();

        assert_eq!(positions.len(), 8);
        assert_eq!(positions[7], Crc32Hasher.hash(b"7node"));
        assert_ne!(positions[7], Crc32Hasher.hash(b"node7"));
        assert_ne!(positions[0], positions[1]);
    }

    #[test]
    fn reused_buffer_matches_fresh_strings() {
        // Indices span one to three digits.
        let positions = replica_positions(&Crc32Hasher, "cache-01", 120).collect::<Vec<_>>();

        for (idx, position) in positions.into_iter().enumerate() {
            let fresh = format!("{idx}cache-01");
            assert_eq!(position, Crc32Hasher.hash(fresh.as_bytes()), "replica {idx}");
        }

        assert_eq!(replica_positions(&Crc32Hasher, "cache-01", 0).count(), 0);
    }
}
