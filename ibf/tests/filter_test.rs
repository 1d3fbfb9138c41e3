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

use ibf::error::ErrorKind;
use ibf::filter::InvertibleBloomFilter;

#[test]
fn test_simple_scenario() {
    let keys: [&[u8]; 4] = [b"a", b"b", b"c", b"d"];

    let mut original = InvertibleBloomFilter::new(3, 1);
    for key in keys {
        original.insert(key);
    }
    assert_eq!(original.cardinality(), keys.len() as i64);

    let mut remote = original.clone();
    remote.remove(keys[0]);
    assert_eq!(original.cardinality(), keys.len() as i64);
    assert_eq!(remote.cardinality(), keys.len() as i64 - 1);

    let mut diff = original.clone();
    diff.subtract(&remote).unwrap();
    assert_eq!(diff.cardinality(), 1);

    assert_eq!(diff.pop().unwrap(), keys[0]);
    assert_eq!(diff.pop().unwrap_err().kind(), ErrorKind::EmptySet);
}

#[test]
fn test_leading_zeros_survive() {
    // Values differing only in leading zero bytes must stay distinct; the
    // length prefix in the key accumulator is what keeps them apart.
    let keys: [&[u8]; 4] = [&[0x00, 0x00, 0x00, 0x01], &[0x00, 0x00, 0x01], &[0x00, 0x01], &[0x01]];

    let mut original = InvertibleBloomFilter::new(3, 2);
    for key in keys {
        original.insert(key);
    }

    let mut remote = original.clone();
    remote.remove(keys[0]);

    let mut diff = original.clone();
    diff.subtract(&remote).unwrap();

    assert_eq!(diff.pop().unwrap(), keys[0]);
}

#[test]
fn test_insert_then_remove_restores_bit_pattern() {
    let mut filter = InvertibleBloomFilter::new(8, 7);
    filter.insert(b"resident");

    let before = filter.clone();
    filter.insert(b"transient");
    filter.remove(b"transient");

    assert_eq!(filter, before);
    assert_eq!(filter.cardinality(), 1);
}

#[test]
fn test_positions_are_distinct() {
    let filter = InvertibleBloomFilter::new(5, 3);

    for i in 0..100 {
        let key = format!("key-{i}");
        let positions = filter.positions(key.as_bytes());

        assert_eq!(positions.len(), 3);
        for (j, &a) in positions.iter().enumerate() {
            assert!((a as u64) < filter.size());
            for &b in &positions[j + 1..] {
                assert_ne!(a, b, "key {key} produced duplicate position {a}");
            }
        }
    }
}

#[test]
fn test_positions_saturate_a_minimal_filter() {
    // With as many positioners as cells every key occupies every cell,
    // whatever the hash values; probing must resolve all collisions.
    let filter = InvertibleBloomFilter::new(3, 99);

    for i in 0..20 {
        let key = format!("key-{i}");
        let mut positions = filter.positions(key.as_bytes());
        positions.sort_unstable();

        assert_eq!(positions, vec![0, 1, 2]);
    }
}

#[test]
fn test_pure_cells_recover_the_inserted_key() {
    let mut filter = InvertibleBloomFilter::new(16, 5);
    filter.insert(b"the key");

    let occupied: Vec<_> = filter
        .cells()
        .iter()
        .filter(|cell| !cell.is_empty())
        .collect();
    assert_eq!(occupied.len(), 3);

    for cell in occupied {
        assert!(cell.is_pure(filter.aggregator()));
        assert_eq!(cell.count(), 1);
        assert_eq!(cell.key_bytes(), b"the key");
        assert_eq!(cell.digest(), filter.aggregator().hash(b"the key"));
    }
}

#[test]
fn test_self_subtraction_drains_everything() {
    let mut filter = InvertibleBloomFilter::new(32, 13);
    for i in 0..10 {
        filter.insert(format!("element-{i}").as_bytes());
    }

    let snapshot = filter.clone();
    filter.subtract(&snapshot).unwrap();

    assert!(filter.is_empty());
    assert_eq!(filter.cardinality(), 0);
    assert_eq!(filter.pop().unwrap_err().kind(), ErrorKind::EmptySet);
}

#[test]
fn test_pop_on_fresh_filter_is_empty_set() {
    let mut filter = InvertibleBloomFilter::new(8, 1);
    assert_eq!(filter.pop().unwrap_err().kind(), ErrorKind::EmptySet);
}

#[test]
fn test_overloaded_filter_reports_no_pure_cell() {
    // Far more elements than cells: draining must stop with the
    // distinguishable "stuck" condition rather than the terminal one.
    let mut filter = InvertibleBloomFilter::new(4, 5);
    for i in 0..12 {
        filter.insert(format!("k-{i}").as_bytes());
    }

    let err = loop {
        match filter.pop() {
            Ok(_) => continue,
            Err(err) => break err,
        }
    };

    assert_eq!(err.kind(), ErrorKind::NoPureCell);
    assert!(!filter.is_empty());
}

#[test]
fn test_remove_of_nonmember_on_empty_cells_is_a_noop() {
    let mut filter = InvertibleBloomFilter::new(16, 3);
    filter.remove(b"ghost");

    assert!(filter.is_empty());
    assert_eq!(filter.cardinality(), 0);
}

#[test]
fn test_empty_key_round_trips() {
    let mut filter = InvertibleBloomFilter::new(16, 11);
    filter.insert(b"");

    assert_eq!(filter.cardinality(), 1);
    assert_eq!(filter.pop().unwrap(), b"");
    assert!(filter.is_empty());
}

#[test]
fn test_invert_negates_cardinality_and_is_an_involution() {
    let mut filter = InvertibleBloomFilter::new(16, 21);
    filter.insert(b"one");
    filter.insert(b"two");

    let original = filter.clone();

    filter.invert();
    assert_eq!(filter.cardinality(), -2);
    assert!(!filter.is_empty());

    filter.invert();
    assert_eq!(filter, original);
}

#[test]
fn test_union_combines_disjoint_filters() {
    let mut left = InvertibleBloomFilter::new(64, 1);
    let mut right = InvertibleBloomFilter::new(64, 1);

    left.insert(b"left-key");
    right.insert(b"right-key");

    left.union(&right).unwrap();
    assert_eq!(left.cardinality(), 2);

    let mut recovered = vec![left.pop().unwrap(), left.pop().unwrap()];
    recovered.sort();
    assert_eq!(recovered, vec![b"left-key".to_vec(), b"right-key".to_vec()]);
    assert_eq!(left.pop().unwrap_err().kind(), ErrorKind::EmptySet);
}

#[test]
fn test_union_rejects_mismatched_configuration() {
    let mut left = InvertibleBloomFilter::new(16, 1);
    let right = InvertibleBloomFilter::new(16, 2);

    assert!(!left.is_compatible(&right));
    let err = left.union(&right).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_subtract_rejects_mismatched_size() {
    let mut left = InvertibleBloomFilter::new(16, 1);
    let right = InvertibleBloomFilter::new(32, 1);

    assert!(!left.is_compatible(&right));
    let err = left.subtract(&right).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_same_seed_filters_are_compatible() {
    let left = InvertibleBloomFilter::new(16, 77);
    let right = InvertibleBloomFilter::new(16, 77);

    assert!(left.is_compatible(&right));
    assert_eq!(left.positioners(), right.positioners());
    assert_eq!(left.aggregator(), right.aggregator());
}

#[test]
fn test_clone_is_independent() {
    let mut original = InvertibleBloomFilter::new(16, 9);
    original.insert(b"shared");

    let mut copy = original.clone();
    copy.insert(b"copy-only");

    assert_eq!(original.cardinality(), 1);
    assert_eq!(copy.cardinality(), 2);
}

#[test]
#[should_panic(expected = "size must be at least the positioner count")]
fn test_size_below_positioner_count() {
    InvertibleBloomFilter::new(2, 1);
}

#[test]
#[should_panic(expected = "at least one positioner is required")]
fn test_no_positioners() {
    use ibf::hash::SipHash;

    InvertibleBloomFilter::with_hashers(8, vec![], SipHash::new(0, 0));
}
