//! Classifier parameter schemas and conditional dependencies.
//!
//! A classifier's tunable surface is a flat list of [`Parameter`]s plus a list
//! of [`Conditional`] edges. Both are immutable once read from the schema
//! source; the [builder](crate::builder) turns them into a choice tree.
//!
//! # Example
//!
//! ```
//! use space_compiler::parameter::{Conditional, ParamKind, Parameter};
//!
//! let kernel = Parameter::categorical("kernel", ["rbf", "poly", "linear"], 0);
//! let degree = Parameter::integer("degree", 2, 5);
//! let gamma = Parameter::log_numeric("gamma", 1e-4, 1.0);
//!
//! assert_eq!(kernel.kind(), ParamKind::Categorical);
//! assert_eq!(gamma.kind(), ParamKind::LogNumeric);
//!
//! let only_poly = Conditional::new("degree", "kernel", ["poly"]);
//! assert!(only_poly.is_active("poly"));
//! assert!(!only_poly.is_active("rbf"));
//! # let _ = degree;
//! ```

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::distribution::{
    CategoricalDistribution, Distribution, FloatDistribution, IntDistribution,
};
use crate::error::{Error, Result};

/// The five parameter kinds a leaf can render as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamKind {
    /// A choice over string values.
    Categorical,
    /// A continuous value, uniform in `[low, high]`.
    Numeric,
    /// A continuous value, uniform in `[ln(low), ln(high)]`.
    LogNumeric,
    /// An integer value, quantized uniform in `[low, high]`.
    Integer,
    /// An integer value, quantized uniform in `[ln(low), ln(high)]`.
    LogInteger,
}

/// One tunable value of a classifier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    /// The parameter name as the classifier knows it.
    pub name: String,
    /// The parameter's domain.
    pub distribution: Distribution,
}

impl Parameter {
    /// Creates a categorical parameter whose default is `values[default_index]`.
    #[must_use]
    pub fn categorical<I, S>(name: impl Into<String>, values: I, default_index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            distribution: Distribution::Categorical(CategoricalDistribution {
                values: values.into_iter().map(Into::into).collect(),
                default_index,
            }),
        }
    }

    /// Creates a continuous parameter over `[low, high]`.
    #[must_use]
    pub fn numeric(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self::float(name, low, high, false)
    }

    /// Creates a continuous parameter searched in log space.
    #[must_use]
    pub fn log_numeric(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self::float(name, low, high, true)
    }

    /// Creates an integer parameter over `[low, high]`.
    #[must_use]
    pub fn integer(name: impl Into<String>, low: i64, high: i64) -> Self {
        Self::int(name, low, high, false)
    }

    /// Creates an integer parameter searched in log space.
    #[must_use]
    pub fn log_integer(name: impl Into<String>, low: i64, high: i64) -> Self {
        Self::int(name, low, high, true)
    }

    fn float(name: impl Into<String>, low: f64, high: f64, log_scale: bool) -> Self {
        Self {
            name: name.into(),
            distribution: Distribution::Float(FloatDistribution {
                low,
                high,
                log_scale,
            }),
        }
    }

    fn int(name: impl Into<String>, low: i64, high: i64, log_scale: bool) -> Self {
        Self {
            name: name.into(),
            distribution: Distribution::Int(IntDistribution {
                low,
                high,
                log_scale,
            }),
        }
    }

    /// Returns the kind this parameter renders as.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match &self.distribution {
            Distribution::Categorical(_) => ParamKind::Categorical,
            Distribution::Float(d) if d.log_scale => ParamKind::LogNumeric,
            Distribution::Float(_) => ParamKind::Numeric,
            Distribution::Int(d) if d.log_scale => ParamKind::LogInteger,
            Distribution::Int(_) => ParamKind::Integer,
        }
    }

    /// Returns the categorical domain, if this is a categorical parameter.
    #[must_use]
    pub fn as_categorical(&self) -> Option<&CategoricalDistribution> {
        match &self.distribution {
            Distribution::Categorical(d) => Some(d),
            _ => None,
        }
    }

    /// Validates the parameter's domain.
    ///
    /// # Errors
    ///
    /// Returns an error if bounds are inverted, log-scale bounds are not
    /// positive, or a categorical domain is empty or has an out-of-range default.
    pub fn validate(&self) -> Result<()> {
        match &self.distribution {
            Distribution::Float(d) => {
                if d.low > d.high {
                    return Err(Error::InvalidBounds {
                        name: self.name.clone(),
                        low: d.low,
                        high: d.high,
                    });
                }
                if d.log_scale && d.low <= 0.0 {
                    return Err(Error::InvalidLogBounds {
                        name: self.name.clone(),
                    });
                }
            }
            Distribution::Int(d) => {
                if d.low > d.high {
                    return Err(Error::InvalidBounds {
                        name: self.name.clone(),
                        low: d.low as f64,
                        high: d.high as f64,
                    });
                }
                if d.log_scale && d.low < 1 {
                    return Err(Error::InvalidLogBounds {
                        name: self.name.clone(),
                    });
                }
            }
            Distribution::Categorical(d) => {
                if d.values.is_empty() {
                    return Err(Error::EmptyChoices {
                        name: self.name.clone(),
                    });
                }
                if d.default_index >= d.values.len() {
                    return Err(Error::InvalidDefault {
                        name: self.name.clone(),
                        index: d.default_index,
                        len: d.values.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// An edge stating that `child` only matters when `parent` takes one of
/// `active_values`.
///
/// A parameter may be the parent of many conditionals but the child of at
/// most one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Conditional {
    /// Name of the dependent parameter.
    pub child: String,
    /// Name of the governing parameter.
    pub parent: String,
    /// Parent values under which the child is active.
    pub active_values: BTreeSet<String>,
}

impl Conditional {
    /// Creates a conditional activating `child` for the given `parent` values.
    #[must_use]
    pub fn new<I, S>(child: impl Into<String>, parent: impl Into<String>, active_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            child: child.into(),
            parent: parent.into(),
            active_values: active_values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the child is active when the parent takes `value`.
    #[must_use]
    pub fn is_active(&self, value: &str) -> bool {
        self.active_values.contains(value)
    }
}
