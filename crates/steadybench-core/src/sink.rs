//! Do-not-optimize sink.
//!
//! Timed loop bodies produce values nothing else reads. Without an escape
//! hatch the optimizer may delete the whole computation and the harness
//! would happily report the cost of an empty loop. [`observe`] forces the
//! value to be treated as observable via a volatile read, which no
//! optimization pass is allowed to elide.

/// Force `value` to be treated as observable, then hand it back.
///
/// Workloads should route every computed result through this:
///
/// ```
/// use steadybench_core::sink;
///
/// let s = "x".repeat(64);
/// sink::observe(s);
/// ```
pub fn observe<T>(value: T) -> T {
    // Volatile read of the value through a raw pointer. The original is
    // forgotten, not dropped, because the read produced the live copy.
    unsafe {
        let observed = std::ptr::read_volatile(&value);
        std::mem::forget(value);
        observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_returns_the_value_unchanged() {
        assert_eq!(observe(17u64), 17);
        assert_eq!(observe(String::from("abc")), "abc");
        assert_eq!(observe(vec![1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn observe_does_not_double_drop() {
        use std::rc::Rc;
        let shared = Rc::new(5);
        let returned = observe(Rc::clone(&shared));
        drop(returned);
        assert_eq!(Rc::strong_count(&shared), 1);
    }
}
