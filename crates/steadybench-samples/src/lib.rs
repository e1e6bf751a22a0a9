//! Sample benchmark cases: the classic string and vector container
//! microbenchmarks. These are workloads only; the harness knows nothing
//! about them.
//!
//! Every case feeds its product through [`sink::observe`] so the timed
//! loop body survives optimization.

#![forbid(unsafe_code)]

use steadybench_core::{BenchmarkCase, BigO, Registry, RegistryError, TimeUnit, sink};

const STRING_SIZES: [u64; 3] = [8, 64, 512];
const VEC_SIZES: [u64; 3] = [128, 1024, 8192];

/// Build a string of `size` repeated bytes in one allocation.
#[must_use]
pub fn string_construction() -> BenchmarkCase {
    BenchmarkCase::new("string_construction", |size| {
        let s = "x".repeat(size as usize);
        sink::observe(s);
    })
    .sizes(STRING_SIZES)
    .unit(TimeUnit::Nanos)
    .complexity(BigO::Auto)
}

/// Grow a string one byte at a time.
#[must_use]
pub fn string_append() -> BenchmarkCase {
    BenchmarkCase::new("string_append", |size| {
        let mut s = String::new();
        for _ in 0..size {
            s.push('x');
        }
        sink::observe(s);
    })
    .sizes(STRING_SIZES)
    .unit(TimeUnit::Nanos)
    .complexity(BigO::Auto)
}

/// Push `0..size` into a pre-reserved vector.
#[must_use]
pub fn vec_push_reserved() -> BenchmarkCase {
    BenchmarkCase::new("vec_push_reserved", |size| {
        let mut v: Vec<u64> = Vec::with_capacity(size as usize);
        for i in 0..size {
            v.push(i);
        }
        sink::observe(v);
    })
    .sizes(VEC_SIZES)
    .unit(TimeUnit::Nanos)
    .complexity(BigO::Auto)
}

/// Sort a reversed `0..size` vector.
#[must_use]
pub fn vec_sort() -> BenchmarkCase {
    BenchmarkCase::new("vec_sort", |size| {
        let mut v: Vec<u64> = (0..size).collect();
        v.reverse();
        v.sort_unstable();
        sink::observe(v);
    })
    .sizes(VEC_SIZES)
    .unit(TimeUnit::Nanos)
    .complexity(BigO::Auto)
}

/// Register all sample cases.
pub fn register_all(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(string_construction())?;
    registry.register(string_append())?;
    registry.register(vec_push_reserved())?;
    registry.register(vec_sort())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_all_installs_four_cases_in_order() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        let names: Vec<&str> = registry.iter().map(BenchmarkCase::name).collect();
        assert_eq!(
            names,
            [
                "string_construction",
                "string_append",
                "vec_push_reserved",
                "vec_sort"
            ]
        );
    }

    #[test]
    fn every_case_opts_into_complexity_fitting() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        assert!(registry.iter().all(|c| c.complexity_model() == Some(BigO::Auto)));
    }

    #[test]
    fn workloads_run_without_panicking() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        for case in registry.iter() {
            case.run(8);
            case.run(0);
        }
    }

    #[test]
    fn registering_twice_is_a_duplicate_error() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        assert!(register_all(&mut registry).is_err());
        assert_eq!(registry.len(), 4);
    }
}
