// MIT License

// Copyright (c) 2016 Jerome Froelich

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! A thread-safe consistent hashing ring, as described in [Consistent
//! Hashing and Random Trees: Distributed Caching Protocols for Relieving Hot
//! Spots on the World Wide Web] (https://www.akamai.com/es/es/multimedia/documents/technical-publication/consistent-hashing-and-random-trees-distributed-caching-protocols-for-relieving-hot-spots-on-the-world-wide-web-technical-publication.pdf).
//!
//! Consistent hashing maps keys to a changing set of members (cache servers,
//! shards, ...) so that adding or removing a member only remaps a small
//! fraction of the keys. With a plain `hash(key) % n` scheme almost every key
//! moves whenever `n` changes.
//!
//! Each member is placed on a 32-bit ring as a number of virtual nodes
//! (replicas), and a key is routed to the member owning the first virtual node
//! clockwise from the key's position. [`Ring`] exposes `add`, `remove` and
//! `set` to change the membership, and `get`, `get_two` and `get_n` to find the
//! member(s) responsible for a key. All of them take `&self`, so a ring can be
//! shared between threads as is.
//!
//! ## Example
//!
//! ```
//! use consistent_ring::Ring;
//!
//! let ring = Ring::new();
//! ring.add("cacheA", "10.0.0.1:11211");
//! ring.add("cacheB", "10.0.0.2:11211");
//! ring.add("cacheC", "10.0.0.3:11211");
//!
//! let member = ring.get("user:42").unwrap();
//! println!("user:42 => {} ({})", member.key(), member.value());
//!
//! // The closest two distinct members, e.g. a primary and a fallback.
//! let (primary, fallback) = ring.get_two("user:42").unwrap();
//! assert_ne!(Some(primary.key()), fallback.as_deref().map(|m| m.key()));
//!
//! ring.remove("cacheC");
//! assert_eq!(ring.len(), 2);
//! ```

pub use {
    builder::RingBuilder,
    hash::{Crc32Hasher, RingHasher, SipHasher32},
    range::KeyRange,
    ring::{Member, Ring, DEFAULT_REPLICAS},
};

mod builder;
mod hash;
pub mod range;
mod ring;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Empty ring")]
    EmptyRing,
}

pub type Result<T> = std::result::Result<T, Error>;
