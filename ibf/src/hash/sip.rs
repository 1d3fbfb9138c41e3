// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::hash::Hasher;

use rand::Rng;
use siphasher::sip::SipHasher24;

/// A keyed, deterministic 64-bit hash over byte strings.
///
/// SipHash-2-4 keyed with two opaque 64-bit values. The digest is a pure
/// function of (keys, bytes) and is stable across process restarts, so two
/// filters reconstructed from persisted keys remain comparable.
///
/// Instances with different keys act as independent hash functions; the
/// filter uses several as positioners and one as the digest aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SipHash {
    key0: u64,
    key1: u64,
}

impl SipHash {
    /// Creates a hash function from an explicit key pair.
    pub fn new(key0: u64, key1: u64) -> Self {
        SipHash { key0, key1 }
    }

    /// Draws a fresh key pair from the given random source.
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        SipHash::new(rng.gen(), rng.gen())
    }

    /// Hashes the given bytes to a 64-bit digest.
    pub fn hash(&self, value: &[u8]) -> u64 {
        let mut hasher = SipHasher24::new_with_keys(self.key0, self.key1);
        hasher.write(value);
        hasher.finish()
    }

    /// Returns the key pair.
    pub fn keys(&self) -> (u64, u64) {
        (self.key0, self.key1)
    }
}
