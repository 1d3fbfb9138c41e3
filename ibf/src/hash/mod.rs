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

//! Keyed hashing for cell positioning and digest aggregation.
//!
//! In order to perform set operations on two filters it is critical that the
//! positioner and aggregator keys are identical for both, otherwise the
//! assumed 1:1 relationship between a key's bytes and the cells it occupies
//! would be violated. The keys are therefore part of a filter's persisted
//! state, and once you have developed a history of stored filters you are
//! stuck with them.
//!
//! Independence between the positioners, and between the positioners and the
//! aggregator, is established only by distinct keys. Nothing structural
//! enforces it; the seeded constructor draws every key pair from the same
//! pseudorandom stream, which makes a collision vanishingly unlikely.

mod sip;

pub use self::sip::SipHash;
