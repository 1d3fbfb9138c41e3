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

// Wire format, little-endian throughout except the length prefix inside a
// raw block, which keeps its own big-endian encoding:
//
//   long 0: preamble_longs (u8), serial_version (u8), family_id (u8),
//           flags (u8), num_positioners (u16), unused (u16)
//   long 1: size (u64)
//   long 2: cardinality (i64)
//   then    num_positioners + 1 key pairs (2 x u64 each; aggregator last)
//   then    unless the empty flag is set, `size` cells, each serialized as
//           raw block length (u64), raw block bytes, digest (u64),
//           count (i64)

pub(super) const PREAMBLE_LONGS: u8 = 3;
pub(super) const SERIAL_VERSION: u8 = 1;
pub(super) const IBF_FAMILY_ID: u8 = 23;
pub(super) const EMPTY_FLAG_MASK: u8 = 1 << 2;
pub(super) const PREAMBLE_BYTES: usize = 8;
pub(super) const LONG_SIZE_BYTES: usize = 8;
