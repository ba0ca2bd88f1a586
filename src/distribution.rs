//! Parameter domain types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Domain of a floating-point parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloatDistribution {
    /// Lower bound (inclusive).
    pub low: f64,
    /// Upper bound (inclusive).
    pub high: f64,
    /// Whether the optimizer searches in log space.
    pub log_scale: bool,
}

/// Domain of an integer parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntDistribution {
    /// Lower bound (inclusive).
    pub low: i64,
    /// Upper bound (inclusive).
    pub high: i64,
    /// Whether the optimizer searches in log space.
    pub log_scale: bool,
}

/// Domain of a categorical parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoricalDistribution {
    /// Values in declaration order.
    pub values: Vec<String>,
    /// Index of the declared default in `values`.
    pub default_index: usize,
}

impl CategoricalDistribution {
    /// The declared default value, if the index is in range.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.values.get(self.default_index).map(String::as_str)
    }

    /// Values with the default moved to index 0.
    ///
    /// The default swaps places with whatever occupied the first slot; the
    /// remaining values keep their positions.
    #[must_use]
    pub fn default_first(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.values.iter().map(String::as_str).collect();
        if self.default_index < values.len() {
            values.swap(0, self.default_index);
        }
        values
    }
}

/// Enum wrapping all parameter domain types.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Distribution {
    /// A floating-point domain.
    Float(FloatDistribution),
    /// An integer domain.
    Int(IntDistribution),
    /// A categorical domain.
    Categorical(CategoricalDistribution),
}
