use crate::arrival::{self, ArrivalBound, Periodic, Sporadic};

use crate::tests::d;

#[test]
fn periodic_arrivals() {
    let a = arrival::Periodic { period: d(10) };
    assert_eq!(a.number_arrivals(d(0)), 0);
    assert_eq!(a.number_arrivals(d(1)), 1);
    assert_eq!(a.number_arrivals(d(8)), 1);
    assert_eq!(a.number_arrivals(d(10)), 1);
    assert_eq!(a.number_arrivals(d(11)), 2);
    assert_eq!(a.number_arrivals(d(12)), 2);
    assert_eq!(a.number_arrivals(d(13)), 2);
    assert_eq!(a.number_arrivals(d(100)), 10);
    assert_eq!(a.number_arrivals(d(105)), 11);
}

#[test]
fn sporadic_arrivals() {
    let a = Sporadic::new(d(7));
    assert_eq!(a.number_arrivals(d(0)), 0);
    assert_eq!(a.number_arrivals(d(1)), 1);
    assert_eq!(a.number_arrivals(d(7)), 1);
    assert_eq!(a.number_arrivals(d(8)), 2);
    assert_eq!(a.number_arrivals(d(70)), 10);
    assert_eq!(a.number_arrivals(d(71)), 11);
}

#[test]
fn sporadic_burst() {
    let a = Sporadic::new(d(0));
    assert_eq!(a.number_arrivals(d(0)), 0);
    assert_eq!(a.number_arrivals(d(1)), usize::MAX);
}

#[test]
fn compare_periodic_arrivals() {
    let p = Periodic { period: d(10) };
    let s = Sporadic::from(p);
    assert_eq!(Periodic::from(s), p);
    for delta in 0..1000 {
        assert_eq!(s.number_arrivals(d(delta)), p.number_arrivals(d(delta)));
    }
}

#[test]
fn huge_intervals_do_not_wrap() {
    let p = Periodic { period: d(1) };
    let s = Sporadic::new(d(1));
    let expected = usize::try_from(u64::MAX).unwrap_or(usize::MAX);
    assert_eq!(p.number_arrivals(d(u64::MAX)), expected);
    assert_eq!(s.number_arrivals(d(u64::MAX)), expected);
    // never fewer arrivals for a longer interval
    assert!(p.number_arrivals(d(u64::MAX)) >= p.number_arrivals(d(u32::MAX as u64)));
}
