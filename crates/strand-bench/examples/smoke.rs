//! Smoke run of the public contract with an instrumented element.
//!
//! Demonstrates: sized construction → append with growth → reserve →
//! insert → erase → copy and move → a deliberately failing append, printing
//! the lifecycle census after each step.

use strand::GrowVec;
use strand_test_utils::{catch_panic, Obj};

fn report(step: &str, v: &GrowVec<Obj>) {
    let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
    let c = Obj::census();
    println!(
        "  {step:<24} len={:>2} cap={:>2} ids={ids:?}  \
         defaults={} new={} clones={} assigns={} drops={}",
        v.len(),
        v.capacity(),
        c.defaults,
        c.constructed,
        c.clones,
        c.clone_assigns,
        c.drops,
    );
}

fn main() {
    println!("=== strand smoke run ===\n");
    Obj::reset();

    let mut v = GrowVec::<Obj>::with_len(2);
    report("with_len(2)", &v);

    for id in 1..=3 {
        v.push_back(Obj::new(id));
    }
    report("push_back x3", &v);

    v.reserve(16);
    report("reserve(16)", &v);

    v.insert(1, Obj::new(42));
    report("insert(1, 42)", &v);

    v.erase(0);
    report("erase(0)", &v);

    let copy = v.clone();
    report("clone (copy)", &copy);

    let mut moved = std::mem::take(&mut v);
    report("take (source)", &v);
    report("take (destination)", &moved);

    moved.resize(2);
    report("resize(2)", &moved);

    let mut full = GrowVec::with_capacity(2);
    full.push_back(Obj::new(7));
    full.push_back(Obj::new(8));
    Obj::fail_after(0);
    let outcome = catch_panic(|| {
        full.emplace_back_with(|| Obj::new(9));
    });
    println!("\n  failing append during growth: {outcome:?}");
    report("after failed append", &full);

    drop((v, copy, moved, full));
    println!("\nlive objects at exit: {}", Obj::live());
    assert_eq!(Obj::live(), 0);
}
