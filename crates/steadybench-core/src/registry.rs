//! Ordered benchmark case registry.

use indexmap::IndexMap;

use crate::case::BenchmarkCase;
use crate::error::RegistryError;

/// Holds registered cases in registration order.
///
/// An explicit object rather than process-wide state: created by the
/// driver, populated via [`Registry::register`], then handed to the runner
/// by reference.
#[derive(Debug, Default)]
pub struct Registry {
    cases: IndexMap<String, BenchmarkCase>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a case. Rejects duplicates by name; the existing
    /// registration is left untouched.
    pub fn register(&mut self, case: BenchmarkCase) -> Result<(), RegistryError> {
        if self.cases.contains_key(case.name()) {
            return Err(RegistryError::DuplicateCase {
                name: case.name().to_string(),
            });
        }
        self.cases.insert(case.name().to_string(), case);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Cases in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkCase> {
        self.cases.values()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BenchmarkCase> {
        self.cases.get(name)
    }

    /// Keep only cases whose name contains `pattern`; preserves order.
    pub fn retain_matching(&mut self, pattern: &str) {
        self.cases.retain(|name, _| name.contains(pattern));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, sizes: &[u64]) -> BenchmarkCase {
        BenchmarkCase::new(name, |_| {}).sizes(sizes.to_vec())
    }

    #[test]
    fn registration_order_is_preserved() {
        let mut reg = Registry::new();
        reg.register(case("zeta", &[1])).unwrap();
        reg.register(case("alpha", &[2])).unwrap();
        reg.register(case("mid", &[3])).unwrap();
        let names: Vec<&str> = reg.iter().map(BenchmarkCase::name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_registration_is_rejected_and_original_kept() {
        let mut reg = Registry::new();
        reg.register(case("dup", &[8, 64])).unwrap();
        let err = reg.register(case("dup", &[999])).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateCase {
                name: "dup".to_string()
            }
        );
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("dup").unwrap().size_list(), &[8, 64]);
    }

    #[test]
    fn retain_matching_filters_by_substring() {
        let mut reg = Registry::new();
        reg.register(case("string_append", &[1])).unwrap();
        reg.register(case("vec_sort", &[1])).unwrap();
        reg.register(case("string_construction", &[1])).unwrap();
        reg.retain_matching("string");
        let names: Vec<&str> = reg.iter().map(BenchmarkCase::name).collect();
        assert_eq!(names, ["string_append", "string_construction"]);
    }

    #[test]
    fn retain_matching_can_empty_the_registry() {
        let mut reg = Registry::new();
        reg.register(case("vec_sort", &[1])).unwrap();
        reg.retain_matching("nope");
        assert!(reg.is_empty());
    }
}
