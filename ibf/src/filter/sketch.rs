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

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::codec::FilterBytes;
use crate::codec::FilterSlice;
use crate::error::Error;
use crate::filter::block::Block;
use crate::filter::block::LENGTH_PREFIX_BYTES;
use crate::filter::cell::Cell;
use crate::filter::serialization::EMPTY_FLAG_MASK;
use crate::filter::serialization::IBF_FAMILY_ID;
use crate::filter::serialization::LONG_SIZE_BYTES;
use crate::filter::serialization::PREAMBLE_BYTES;
use crate::filter::serialization::PREAMBLE_LONGS;
use crate::filter::serialization::SERIAL_VERSION;
use crate::hash::SipHash;

/// Number of positioners drawn by the seeded constructor.
pub const DEFAULT_POSITIONER_COUNT: usize = 3;

/// An invertible Bloom filter: a fixed array of algebraic cells that supports
/// insertion, removal, union, subtraction, inversion, and, while the
/// represented difference stays small enough, exact extraction of member
/// keys.
///
/// Use [`Self::new`] to build a filter, [`Self::with_hashers`] or
/// [`Self::deserialize`] to build further filters that share its
/// configuration. Two filters are only comparable when their size and every
/// hash key match; cross-filter operations verify this and fail fast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvertibleBloomFilter {
    /// Positioners select which cells a key occupies.
    positioners: Vec<SipHash>,
    /// The aggregator digests key bytes for the purity check.
    aggregator: SipHash,
    /// Cell count, fixed at construction.
    size: u64,
    cells: Vec<Cell>,
    /// Signed running total of net insertions. Not ground truth of set size;
    /// goes negative after inversion.
    cardinality: i64,
}

impl InvertibleBloomFilter {
    /// Creates a filter of `size` cells with hash keys drawn deterministically
    /// from `seed`.
    ///
    /// The same (size, seed) pair always yields the same configuration, so
    /// two parties can construct comparable filters independently.
    ///
    /// # Panics
    ///
    /// Panics if `size` is smaller than the positioner count.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ibf::filter::InvertibleBloomFilter;
    /// let mut filter = InvertibleBloomFilter::new(32, 1);
    /// filter.insert(b"apple");
    /// assert_eq!(filter.cardinality(), 1);
    /// ```
    pub fn new(size: u64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let positioners = (0..DEFAULT_POSITIONER_COUNT)
            .map(|_| SipHash::from_rng(&mut rng))
            .collect();
        let aggregator = SipHash::from_rng(&mut rng);

        Self::with_hashers(size, positioners, aggregator)
    }

    /// Creates an empty filter from explicit hash functions.
    ///
    /// This is how a second filter with parameters matching an existing one
    /// is built when the seed is not at hand.
    ///
    /// # Panics
    ///
    /// Panics if `positioners` is empty or `size` is smaller than the
    /// positioner count. Linear probing needs at least one distinct cell per
    /// positioner.
    pub fn with_hashers(size: u64, positioners: Vec<SipHash>, aggregator: SipHash) -> Self {
        assert!(!positioners.is_empty(), "at least one positioner is required");
        assert!(
            size >= positioners.len() as u64,
            "size must be at least the positioner count"
        );

        let cells = (0..size).map(|_| Cell::new()).collect();

        InvertibleBloomFilter {
            positioners,
            aggregator,
            size,
            cells,
            cardinality: 0,
        }
    }

    /// Reconstructs a filter verbatim from persisted field values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the field values are structurally
    /// inconsistent (no positioners, or a cell vector whose length does not
    /// match `size`).
    pub fn from_parts(
        positioners: Vec<SipHash>,
        aggregator: SipHash,
        size: u64,
        cells: Vec<Cell>,
        cardinality: i64,
    ) -> Result<Self, Error> {
        if positioners.is_empty() {
            return Err(Error::invalid_argument("at least one positioner is required"));
        }
        if size < positioners.len() as u64 {
            return Err(
                Error::invalid_argument("size must be at least the positioner count")
                    .with_context("size", size)
                    .with_context("positioners", positioners.len()),
            );
        }
        if cells.len() as u64 != size {
            return Err(Error::invalid_argument("cell count does not match size")
                .with_context("size", size)
                .with_context("cells", cells.len()));
        }

        Ok(InvertibleBloomFilter {
            positioners,
            aggregator,
            size,
            cells,
            cardinality,
        })
    }

    /// Returns the distinct cell indices the key occupies, one per
    /// positioner, in positioner order.
    ///
    /// A modulo collision between positioners is resolved by probing forward
    /// with wraparound until an unused index is found, so exactly as many
    /// cells as there are positioners are touched for every key.
    pub fn positions(&self, key: &[u8]) -> Vec<usize> {
        let size = self.size as usize;
        let mut indices = Vec::with_capacity(self.positioners.len());

        for positioner in &self.positioners {
            let mut index = (positioner.hash(key) % self.size) as usize;
            while indices.contains(&index) {
                index = (index + 1) % size;
            }
            indices.push(index);
        }

        indices
    }

    /// Adds the key to the filter.
    pub fn insert(&mut self, key: &[u8]) {
        let digest = self.aggregator.hash(key);
        for index in self.positions(key) {
            self.cells[index].insert(key, digest);
        }

        self.cardinality += 1;
    }

    /// Deletes the key from the filter.
    ///
    /// If any of the key's cells is currently the zero element the key cannot
    /// be a member, and the filter is left untouched. The guard is necessary
    /// but not sufficient: removing a non-member whose cells all happen to be
    /// occupied silently corrupts the counts, exactly as documented for
    /// [`Cell::remove`].
    pub fn remove(&mut self, key: &[u8]) {
        let digest = self.aggregator.hash(key);
        let indices = self.positions(key);

        if indices.iter().any(|&index| self.cells[index].is_empty()) {
            return;
        }

        for index in indices {
            self.cells[index].remove(key, digest);
        }

        self.cardinality -= 1;
    }

    /// Removes and returns the first recoverable key.
    ///
    /// Scans for a pure cell, cancels the recovered key out of every cell it
    /// occupies, and returns it. Repeated calls drain the filter toward
    /// emptiness, though completion is not guaranteed.
    ///
    /// # Errors
    ///
    /// - `EmptySet`: every cell is the zero element; nothing is left. The
    ///   expected terminal condition of a drain loop.
    /// - `NoPureCell`: elements remain but none is presently isolatable. The
    ///   represented difference exceeds the filter's recoverable capacity;
    ///   callers must report the listing as incomplete.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ibf::error::ErrorKind;
    /// # use ibf::filter::InvertibleBloomFilter;
    /// let mut filter = InvertibleBloomFilter::new(16, 1);
    /// filter.insert(b"lone");
    ///
    /// assert_eq!(filter.pop().unwrap(), b"lone");
    /// assert_eq!(filter.pop().unwrap_err().kind(), ErrorKind::EmptySet);
    /// ```
    pub fn pop(&mut self) -> Result<Vec<u8>, Error> {
        let mut all_empty = true;
        let mut recovered = None;

        for cell in &self.cells {
            if cell.is_pure(&self.aggregator) {
                recovered = Some(cell.key_bytes());
                break;
            }

            if all_empty && !cell.is_empty() {
                all_empty = false;
            }
        }

        if let Some(key) = recovered {
            self.remove(&key);
            return Ok(key);
        }

        if all_empty {
            Err(Error::empty_set())
        } else {
            Err(Error::no_pure_cell())
        }
    }

    /// Inverts every cell and negates the cardinality.
    ///
    /// After subtracting one filter from another, a drain loop run before and
    /// after inversion extracts first one side's excess keys, then the
    /// other's.
    pub fn invert(&mut self) {
        for cell in &mut self.cells {
            cell.invert();
        }

        self.cardinality = -self.cardinality;
    }

    /// Adds all keys in `other` to this filter cellwise.
    ///
    /// The two filters' key sets must be disjoint; a violation silently
    /// yields a symmetric difference instead of a true union.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the filters are not compatible.
    pub fn union(&mut self, other: &InvertibleBloomFilter) -> Result<(), Error> {
        self.check_compatible(other)?;

        for (cell, other_cell) in self.cells.iter_mut().zip(&other.cells) {
            cell.union(other_cell);
        }
        self.cardinality += other.cardinality;

        Ok(())
    }

    /// Removes all keys in `other` from this filter cellwise.
    ///
    /// `other`'s key set must be a subset of this filter's; a violation
    /// degrades into a symmetric difference the same way union does. That
    /// symmetric difference is exactly what reconciliation exploits: the
    /// subtracted filter of two overlapping sets retains only the keys unique
    /// to either side.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the filters are not compatible.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ibf::filter::InvertibleBloomFilter;
    /// let mut ours = InvertibleBloomFilter::new(3, 1);
    /// for key in [&b"a"[..], b"b", b"c", b"d"] {
    ///     ours.insert(key);
    /// }
    ///
    /// let mut theirs = ours.clone();
    /// theirs.remove(b"a");
    ///
    /// ours.subtract(&theirs).unwrap();
    /// assert_eq!(ours.cardinality(), 1);
    /// assert_eq!(ours.pop().unwrap(), b"a");
    /// ```
    pub fn subtract(&mut self, other: &InvertibleBloomFilter) -> Result<(), Error> {
        self.check_compatible(other)?;

        for (cell, other_cell) in self.cells.iter_mut().zip(&other.cells) {
            cell.subtract(other_cell);
        }
        self.cardinality -= other.cardinality;

        Ok(())
    }

    /// Checks whether two filters can be combined: same size, same
    /// positioner keys, same aggregator key.
    pub fn is_compatible(&self, other: &InvertibleBloomFilter) -> bool {
        self.size == other.size
            && self.positioners == other.positioners
            && self.aggregator == other.aggregator
    }

    fn check_compatible(&self, other: &InvertibleBloomFilter) -> Result<(), Error> {
        if self.is_compatible(other) {
            return Ok(());
        }

        Err(Error::incompatible("incompatible filter configuration")
            .with_context("size", self.size)
            .with_context("other_size", other.size))
    }

    /// Returns true if the filter represents the empty set: zero cardinality
    /// and every cell the zero element.
    pub fn is_empty(&self) -> bool {
        self.cardinality == 0 && self.cells.iter().all(Cell::is_empty)
    }

    /// Returns the cell count.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the signed net-insertion total.
    pub fn cardinality(&self) -> i64 {
        self.cardinality
    }

    /// Returns the positioners.
    pub fn positioners(&self) -> &[SipHash] {
        &self.positioners
    }

    /// Returns the aggregator.
    pub fn aggregator(&self) -> &SipHash {
        &self.aggregator
    }

    /// Serializes the filter to a byte vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ibf::filter::InvertibleBloomFilter;
    /// let mut filter = InvertibleBloomFilter::new(16, 7);
    /// filter.insert(b"persisted");
    ///
    /// let bytes = filter.serialize();
    /// let restored = InvertibleBloomFilter::deserialize(&bytes).unwrap();
    /// assert_eq!(filter, restored);
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let is_empty = self.is_empty();

        let mut capacity = PREAMBLE_BYTES
            + 2 * LONG_SIZE_BYTES
            + 2 * LONG_SIZE_BYTES * (self.positioners.len() + 1);
        if !is_empty {
            for cell in &self.cells {
                capacity += 3 * LONG_SIZE_BYTES + cell.key_block().as_bytes().len();
            }
        }
        let mut bytes = FilterBytes::with_capacity(capacity);

        // Preamble
        bytes.write_u8(PREAMBLE_LONGS); // Byte 0
        bytes.write_u8(SERIAL_VERSION); // Byte 1
        bytes.write_u8(IBF_FAMILY_ID); // Byte 2
        bytes.write_u8(if is_empty { EMPTY_FLAG_MASK } else { 0 }); // Byte 3: flags
        bytes.write_u16_le(self.positioners.len() as u16); // Bytes 4-5
        bytes.write_u16_le(0); // Bytes 6-7: unused

        bytes.write_u64_le(self.size);
        bytes.write_i64_le(self.cardinality);

        for positioner in &self.positioners {
            let (key0, key1) = positioner.keys();
            bytes.write_u64_le(key0);
            bytes.write_u64_le(key1);
        }
        let (key0, key1) = self.aggregator.keys();
        bytes.write_u64_le(key0);
        bytes.write_u64_le(key1);

        if !is_empty {
            for cell in &self.cells {
                let raw = cell.key_block().as_bytes();
                bytes.write_u64_le(raw.len() as u64);
                bytes.write(raw);
                bytes.write_u64_le(cell.digest());
                bytes.write_i64_le(cell.count());
            }
        }

        bytes.into_bytes()
    }

    /// Deserializes a filter from bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` if the data is truncated, carries the wrong
    /// family or serial version, or declares inconsistent dimensions.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = FilterSlice::new(bytes);

        let preamble_longs = cursor
            .read_u8()
            .map_err(|_| Error::insufficient_data("preamble_longs"))?;
        let serial_version = cursor
            .read_u8()
            .map_err(|_| Error::insufficient_data("serial_version"))?;
        let family_id = cursor
            .read_u8()
            .map_err(|_| Error::insufficient_data("family_id"))?;
        let flags = cursor
            .read_u8()
            .map_err(|_| Error::insufficient_data("flags"))?;

        if family_id != IBF_FAMILY_ID {
            return Err(Error::invalid_family(
                IBF_FAMILY_ID,
                family_id,
                "InvertibleBloomFilter",
            ));
        }
        if serial_version != SERIAL_VERSION {
            return Err(Error::unsupported_serial_version(
                SERIAL_VERSION,
                serial_version,
            ));
        }
        if preamble_longs != PREAMBLE_LONGS {
            return Err(Error::invalid_preamble_longs(PREAMBLE_LONGS, preamble_longs));
        }

        let is_empty = (flags & EMPTY_FLAG_MASK) != 0;

        let num_positioners = cursor
            .read_u16_le()
            .map_err(|_| Error::insufficient_data("num_positioners"))?;
        let _unused = cursor
            .read_u16_le()
            .map_err(|_| Error::insufficient_data("unused_header"))?;

        if num_positioners == 0 {
            return Err(Error::deserial("at least one positioner is required"));
        }

        let size = cursor
            .read_u64_le()
            .map_err(|_| Error::insufficient_data("size"))?;
        let cardinality = cursor
            .read_i64_le()
            .map_err(|_| Error::insufficient_data("cardinality"))?;

        if size < u64::from(num_positioners) {
            return Err(Error::deserial("size is smaller than the positioner count")
                .with_context("size", size)
                .with_context("positioners", num_positioners));
        }

        let mut read_hasher = |field: &'static str| -> Result<SipHash, Error> {
            let key0 = cursor
                .read_u64_le()
                .map_err(|_| Error::insufficient_data(field))?;
            let key1 = cursor
                .read_u64_le()
                .map_err(|_| Error::insufficient_data(field))?;
            Ok(SipHash::new(key0, key1))
        };

        let mut positioners = Vec::with_capacity(num_positioners as usize);
        for _ in 0..num_positioners {
            positioners.push(read_hasher("positioner_keys")?);
        }
        let aggregator = read_hasher("aggregator_keys")?;

        let mut cells = Vec::with_capacity(size as usize);
        if is_empty {
            cells.resize_with(size as usize, Cell::new);
        } else {
            for _ in 0..size {
                let raw_len = cursor
                    .read_u64_le()
                    .map_err(|_| Error::insufficient_data("cell_block_len"))?;
                if (raw_len as usize) < LENGTH_PREFIX_BYTES {
                    return Err(Error::deserial("cell block is shorter than its length prefix")
                        .with_context("len", raw_len));
                }

                let mut raw = vec![0u8; raw_len as usize];
                cursor
                    .read_exact(&mut raw)
                    .map_err(|_| Error::insufficient_data("cell_block"))?;

                let digest = cursor
                    .read_u64_le()
                    .map_err(|_| Error::insufficient_data("cell_digest"))?;
                let count = cursor
                    .read_i64_le()
                    .map_err(|_| Error::insufficient_data("cell_count"))?;

                cells.push(Cell::from_parts(Block::from_raw(raw), digest, count));
            }
        }

        Self::from_parts(positioners, aggregator, size, cells, cardinality)
    }
}
