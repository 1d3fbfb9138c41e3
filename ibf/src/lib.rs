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

//! Invertible Bloom filters: compact set sketches that support exact
//! difference listing.
//!
//! The [`filter`] module holds the data structure itself; [`hash`] the keyed
//! hashing it is parameterized by; [`error`] the crate's error type. See the
//! [`filter`] module documentation for the reconciliation workflow.
//!
//! ```rust
//! use ibf::filter::InvertibleBloomFilter;
//!
//! let mut local = InvertibleBloomFilter::new(3, 1);
//! for key in [&b"a"[..], b"b", b"c", b"d"] {
//!     local.insert(key);
//! }
//!
//! let mut remote = local.clone();
//! remote.remove(b"a");
//!
//! let mut diff = local.clone();
//! diff.subtract(&remote).unwrap();
//! assert_eq!(diff.pop().unwrap(), b"a");
//! assert!(diff.is_empty());
//! ```

mod codec;

pub mod error;
pub mod filter;
pub mod hash;
