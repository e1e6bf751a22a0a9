//! Benchmark case definition.

use serde::{Deserialize, Serialize};

use crate::complexity::BigO;

/// Reporting unit for measured times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanos,
    Micros,
    Millis,
    Secs,
}

impl TimeUnit {
    /// Display suffix for this unit.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Nanos => "ns",
            TimeUnit::Micros => "us",
            TimeUnit::Millis => "ms",
            TimeUnit::Secs => "s",
        }
    }

    /// Convert a nanosecond value into this unit.
    #[must_use]
    pub fn from_ns(self, ns: f64) -> f64 {
        match self {
            TimeUnit::Nanos => ns,
            TimeUnit::Micros => ns / 1_000.0,
            TimeUnit::Millis => ns / 1_000_000.0,
            TimeUnit::Secs => ns / 1_000_000_000.0,
        }
    }
}

/// A user workload parameterized by an integer size.
///
/// The workload must feed any value it produces through [`crate::sink::observe`];
/// otherwise the optimizer is free to delete the very code being measured.
pub type Operation = Box<dyn Fn(u64)>;

/// A named, size-parameterized timing experiment.
///
/// Immutable once registered. Sizes are measured in the order given.
pub struct BenchmarkCase {
    name: String,
    operation: Operation,
    sizes: Vec<u64>,
    unit: TimeUnit,
    complexity: Option<BigO>,
}

impl BenchmarkCase {
    /// Create a case with no sizes, nanosecond reporting, and no complexity fit.
    pub fn new(name: impl Into<String>, operation: impl Fn(u64) + 'static) -> Self {
        Self {
            name: name.into(),
            operation: Box::new(operation),
            sizes: Vec::new(),
            unit: TimeUnit::Nanos,
            complexity: None,
        }
    }

    /// Set the sizes to measure, in measurement order.
    #[must_use]
    pub fn sizes(mut self, sizes: impl Into<Vec<u64>>) -> Self {
        self.sizes = sizes.into();
        self
    }

    /// Set the reporting unit.
    #[must_use]
    pub fn unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Opt in to complexity fitting with the given model (`BigO::Auto` to
    /// let the fitter pick the best candidate).
    #[must_use]
    pub fn complexity(mut self, big_o: BigO) -> Self {
        self.complexity = Some(big_o);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn size_list(&self) -> &[u64] {
        &self.sizes
    }

    #[must_use]
    pub fn time_unit(&self) -> TimeUnit {
        self.unit
    }

    #[must_use]
    pub fn complexity_model(&self) -> Option<BigO> {
        self.complexity
    }

    /// Execute the workload once for the given size.
    pub fn run(&self, size: u64) {
        (self.operation)(size);
    }
}

impl std::fmt::Debug for BenchmarkCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkCase")
            .field("name", &self.name)
            .field("sizes", &self.sizes)
            .field("unit", &self.unit)
            .field("complexity", &self.complexity)
            .finish_non_exhaustive()
    }
}
