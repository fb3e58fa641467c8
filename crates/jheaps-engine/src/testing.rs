// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Behavioural checks shared by the tests of all addressable heaps.

use crate::element::Handle;
use crate::error::HeapError;
use crate::traits::{AddressableHeap, DoubleEndedAddressableHeap, MergeableHeap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn model_min(live: &[Handle<i64>]) -> Option<i64> {
    live.iter().map(Handle::key).min()
}

fn model_max(live: &[Handle<i64>]) -> Option<i64> {
    live.iter().map(Handle::key).max()
}

fn forget(live: &mut Vec<Handle<i64>>, handle: &Handle<i64>) {
    let pos = live
        .iter()
        .position(|h| h.ptr_eq(handle))
        .expect("returned handle is not tracked by the model");
    live.swap_remove(pos);
}

/// Random insert/extract/decrease/delete workload checked against a model.
pub(crate) fn assert_addressable_contract<H, F>(make: F)
where
    H: AddressableHeap<i64>,
    F: Fn() -> H,
{
    let mut heap = make();
    assert_eq!(heap.find_min().err(), Some(HeapError::NoSuchElement));
    assert_eq!(heap.delete_min().err(), Some(HeapError::NoSuchElement));

    let mut rng = StdRng::seed_from_u64(0x5eed_0f_4ea9);
    let mut live: Vec<Handle<i64>> = Vec::new();
    for step in 0..3000i64 {
        match rng.gen_range(0..10) {
            0..=3 => {
                let key = rng.gen_range(-1000..1000);
                let h = heap.insert(key, step).unwrap();
                assert!(h.is_linked());
                assert_eq!(h.value(), step);
                live.push(h);
            }
            4 | 5 => match heap.delete_min() {
                Ok(h) => {
                    assert_eq!(Some(h.key()), model_min(&live));
                    assert!(!h.is_linked());
                    forget(&mut live, &h);
                }
                Err(e) => {
                    assert_eq!(e, HeapError::NoSuchElement);
                    assert!(live.is_empty());
                }
            },
            6 | 7 if !live.is_empty() => {
                let h = live[rng.gen_range(0..live.len())].clone();
                let key = h.key() - rng.gen_range(0..100);
                heap.decrease_key(&h, key).unwrap();
                assert_eq!(h.key(), key);
            }
            8 if !live.is_empty() => {
                let h = live[rng.gen_range(0..live.len())].clone();
                heap.delete(&h).unwrap();
                assert!(!h.is_linked());
                assert_eq!(heap.delete(&h), Err(HeapError::invalid_handle()));
                forget(&mut live, &h);
            }
            _ => match heap.find_min() {
                Ok(h) => assert_eq!(Some(h.key()), model_min(&live)),
                Err(_) => assert!(live.is_empty()),
            },
        }
        assert_eq!(heap.len(), live.len());
        assert_eq!(heap.is_empty(), live.is_empty());
    }

    if let Some(h) = live.first().cloned() {
        let before = h.key();
        assert_eq!(
            heap.decrease_key(&h, before + 1),
            Err(HeapError::key_not_decreased())
        );
        assert_eq!(h.key(), before);
    }

    let mut drained = Vec::new();
    while let Ok(h) = heap.delete_min() {
        drained.push(h.key());
    }
    let mut expected: Vec<i64> = live.iter().map(Handle::key).collect();
    expected.sort_unstable();
    assert_eq!(drained, expected);

    let kept = heap.insert(1, 1).unwrap();
    heap.clear();
    assert!(heap.is_empty());
    assert!(!kept.is_linked());
    assert_eq!(kept.key(), 1);
    assert_eq!(heap.delete(&kept), Err(HeapError::invalid_handle()));
}

/// Meld postconditions: sizes add up, absorbed handles address the receiver,
/// the donor is empty and usable again.
pub(crate) fn assert_meld_contract<H, F>(make: F)
where
    H: AddressableHeap<i64> + MergeableHeap,
    F: Fn() -> H,
{
    let mut a = make();
    let mut b = make();
    for k in (0..60).step_by(2) {
        a.insert(k, k).unwrap();
    }
    let donated: Vec<_> = (1..60).step_by(2).map(|k| b.insert(k, k).unwrap()).collect();
    let (len_a, len_b) = (a.len(), b.len());

    a.meld(&mut b).unwrap();
    assert_eq!(a.len(), len_a + len_b);
    assert!(b.is_empty());
    assert_eq!(b.find_min().err(), Some(HeapError::NoSuchElement));

    a.decrease_key(&donated[10], -5).unwrap();
    assert!(a.find_min().unwrap().ptr_eq(&donated[10]));
    assert_eq!(b.delete(&donated[3]), Err(HeapError::invalid_handle()));
    a.delete(&donated[3]).unwrap();

    let fresh = b.insert(7, 0).unwrap();
    assert_eq!(b.len(), 1);
    assert_eq!(a.delete(&fresh), Err(HeapError::invalid_handle()));

    let mut keys = Vec::new();
    while let Ok(h) = a.delete_min() {
        keys.push(h.key());
    }
    let mut expected: Vec<i64> = (0..60).filter(|&k| k != 21 && k != 7).collect();
    expected.push(-5);
    expected.sort_unstable();
    assert_eq!(keys, expected);

    // Melding an empty heap is a no-op.
    let mut empty = make();
    b.meld(&mut empty).unwrap();
    assert_eq!(b.len(), 1);
}

/// Random workload over both ends checked against a model.
pub(crate) fn assert_double_ended_contract<H, F>(make: F)
where
    H: DoubleEndedAddressableHeap<i64>,
    F: Fn() -> H,
{
    let mut heap = make();
    assert_eq!(heap.find_max().err(), Some(HeapError::NoSuchElement));
    assert_eq!(heap.delete_max().err(), Some(HeapError::NoSuchElement));

    let mut rng = StdRng::seed_from_u64(0xdeed);
    let mut live: Vec<Handle<i64>> = Vec::new();
    for step in 0..3000i64 {
        match rng.gen_range(0..12) {
            0..=3 => live.push(heap.insert(rng.gen_range(-1000..1000), step).unwrap()),
            4 => {
                if let Ok(h) = heap.delete_min() {
                    assert_eq!(Some(h.key()), model_min(&live));
                    forget(&mut live, &h);
                }
            }
            5 => {
                if let Ok(h) = heap.delete_max() {
                    assert_eq!(Some(h.key()), model_max(&live));
                    assert!(!h.is_linked());
                    forget(&mut live, &h);
                }
            }
            6 | 7 if !live.is_empty() => {
                let h = live[rng.gen_range(0..live.len())].clone();
                let key = h.key() - rng.gen_range(0..100);
                heap.decrease_key(&h, key).unwrap();
                assert_eq!(h.key(), key);
            }
            8 | 9 if !live.is_empty() => {
                let h = live[rng.gen_range(0..live.len())].clone();
                let key = h.key() + rng.gen_range(0..100);
                heap.increase_key(&h, key).unwrap();
                assert_eq!(h.key(), key);
            }
            10 if !live.is_empty() => {
                let h = live[rng.gen_range(0..live.len())].clone();
                heap.delete(&h).unwrap();
                forget(&mut live, &h);
            }
            _ => {
                assert_eq!(heap.find_min().ok().map(|h| h.key()), model_min(&live));
                assert_eq!(heap.find_max().ok().map(|h| h.key()), model_max(&live));
            }
        }
        assert_eq!(heap.len(), live.len());
    }

    if let Some(h) = live.first().cloned() {
        let before = h.key();
        assert_eq!(
            heap.increase_key(&h, before - 1),
            Err(HeapError::key_not_increased())
        );
        assert_eq!(h.key(), before);
    }
}
