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

use byteorder::BigEndian;
use byteorder::ByteOrder;

/// Size of the big-endian length prefix at the start of every block.
pub(crate) const LENGTH_PREFIX_BYTES: usize = 8;

/// A byte buffer where the first 8 bytes are the big-endian length of the
/// value that follows. Blocks combine via XOR, extending to the right with
/// zero bytes when the operands differ in length.
///
/// When a block holds exactly one value ("pure", see `Cell::is_pure`) the
/// value is recovered losslessly by truncating to the stored length. Blocks
/// rely on external logic to know when that is the case; the value of an
/// impure block is nonsense, and the caller is expected to reject it by
/// comparing against the value digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    data: Vec<u8>,
}

impl Block {
    /// Encodes a value as a new block: its length, then its bytes.
    pub fn new(value: &[u8]) -> Self {
        let mut data = vec![0u8; LENGTH_PREFIX_BYTES + value.len()];
        BigEndian::write_u64(&mut data[..LENGTH_PREFIX_BYTES], value.len() as u64);
        data[LENGTH_PREFIX_BYTES..].copy_from_slice(value);

        Block { data }
    }

    /// Rewraps raw accumulator bytes read back from a serialized filter.
    ///
    /// The caller must have verified that `data` is at least as long as the
    /// length prefix.
    pub fn from_raw(data: Vec<u8>) -> Self {
        debug_assert!(data.len() >= LENGTH_PREFIX_BYTES);
        Block { data }
    }

    /// Returns the raw accumulator bytes, length prefix included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Folds `other` into this block bytewise. The receiver grows with zero
    /// padding if `other` is longer; `other` is never modified, and the
    /// receiver never shrinks.
    pub fn xor(&mut self, other: &Block) {
        if other.data.len() > self.data.len() {
            self.data.resize(other.data.len(), 0);
        }

        for (dst, src) in self.data.iter_mut().zip(other.data.iter()) {
            *dst ^= *src;
        }
    }

    /// Returns the stored value: the number of payload bytes declared by the
    /// length prefix.
    ///
    /// An impure block can declare more bytes than it holds; the result is
    /// then truncated to what is available. Callers compare the value against
    /// its digest (see `Cell::is_pure`) and that catches the truncation.
    pub fn value(&self) -> &[u8] {
        let declared = BigEndian::read_u64(&self.data[..LENGTH_PREFIX_BYTES]) as usize;
        let available = self.data.len() - LENGTH_PREFIX_BYTES;
        let size = declared.min(available);

        &self.data[LENGTH_PREFIX_BYTES..LENGTH_PREFIX_BYTES + size]
    }
}
