//! Integration test: the literal walkthrough scenarios.
//!
//! Runs the five-step push / reserve / erase / insert / resize sequence
//! against a single vector, checking size, capacity and contents after
//! each step, then repeats the walkthrough with an instrumented element to
//! check that every constructed value is dropped exactly once.

use strand::GrowVec;
use strand_test_utils::Obj;

#[test]
fn walkthrough_on_integers() {
    // 1. push 1, 2, 3 onto an empty vector.
    let mut v = GrowVec::new();
    v.push_back(1);
    v.push_back(2);
    v.push_back(3);
    assert_eq!(v.len(), 3);
    assert_eq!(v, [1, 2, 3]);
    assert!(v.capacity() >= 3);

    // 2. reserve(10).
    v.reserve(10);
    assert_eq!(v.capacity(), 10);
    assert_eq!(v, [1, 2, 3]);

    // 3. erase index 1.
    let next = v.erase(1);
    assert_eq!(next, 1);
    assert_eq!(v[next], 3);
    assert_eq!(v, [1, 3]);
    assert_eq!(v.len(), 2);

    // 4. insert 0 at index 0.
    let at = v.insert(0, 0);
    assert_eq!(at, 0);
    assert_eq!(v, [0, 1, 3]);
    assert_eq!(v.len(), 3);

    // 5. resize(1).
    v.resize(1);
    assert_eq!(v, [0]);
    assert_eq!(v.len(), 1);
    assert_eq!(v.capacity(), 10);
}

#[test]
fn walkthrough_on_instrumented_elements() {
    Obj::reset();
    {
        let mut v = GrowVec::new();
        for id in 1..=3 {
            v.push_back(Obj::new(id));
        }
        v.reserve(10);
        v.erase(1);
        v.insert(0, Obj::new(0));
        v.resize(1);
        assert_eq!(v, [0]);
        assert_eq!(Obj::live(), 1);
    }
    let census = Obj::census();
    assert_eq!(census.constructed, 4);
    // Growth relocates by move: nothing is cloned along the way.
    assert_eq!(census.clones, 0);
    assert_eq!(census.drops, 4);
}

#[test]
fn sized_construction_then_growth() {
    Obj::reset();
    let mut v = GrowVec::<Obj>::with_len(2);
    assert_eq!(Obj::census().defaults, 2);
    assert_eq!(v.capacity(), 2);

    v.push_back(Obj::new(5));
    assert_eq!(v.capacity(), 4);
    assert_eq!(v, [0, 0, 5]);

    v.resize(6);
    assert_eq!(v.capacity(), 6);
    assert_eq!(Obj::census().defaults, 5);
    drop(v);
    assert_eq!(Obj::live(), 0);
}

#[test]
fn copies_are_independent() {
    let mut original: GrowVec<String> = ["alpha", "beta"].iter().map(|s| s.to_string()).collect();
    let copy = original.clone();
    original[0].push_str("-changed");
    original.push_back("gamma".into());
    assert_eq!(copy, ["alpha", "beta"]);
    assert_eq!(original, ["alpha-changed", "beta", "gamma"]);
}

#[test]
fn move_then_move_assign() {
    let mut a: GrowVec<i32> = (1..=3).collect();
    let mut b = std::mem::take(&mut a);
    assert!(a.is_empty());
    assert_eq!(b, [1, 2, 3]);

    let mut c: GrowVec<i32> = (7..=8).collect();
    c.swap(&mut b);
    assert_eq!(c, [1, 2, 3]);
    assert_eq!(b, [7, 8]);
}
