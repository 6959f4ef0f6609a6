use super::{Crc32Hasher, Ring, RingHasher, DEFAULT_REPLICAS};

/// Ring builder.
///
/// ```
/// use consistent_ring::{Ring, RingBuilder, SipHasher32};
///
/// let ring: Ring<&str, SipHasher32> = RingBuilder::new()
///     .replicas(64)
///     .hasher(SipHasher32)
///     .build();
///
/// assert_eq!(ring.replicas(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<H: RingHasher = Crc32Hasher> {
    replicas: usize,
    hasher: H,
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RingBuilder {
    /// Create new ring builder with the default replica count and hasher.
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hasher: Crc32Hasher,
        }
    }
}

impl<H: RingHasher> RingBuilder<H> {
    /// Number of virtual nodes given to members added without an explicit
    /// replica count.
    pub fn replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Transform the builder into one using a different hasher.
    pub fn hasher<CustomH: RingHasher>(self, hasher: CustomH) -> RingBuilder<CustomH> {
        RingBuilder {
            replicas: self.replicas,
            hasher,
        }
    }

    /// Build an empty ring.
    pub fn build<V>(self) -> Ring<V, H> {
        Ring::from_parts(self.replicas, self.hasher)
    }
}
