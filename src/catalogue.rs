//! Classifier schemas grouped by the role they can play in an experiment.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::parameter::{Conditional, Parameter};

/// The parameter schema of one classifier (or attribute-selection component).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassifierSchema {
    /// Fully qualified class name, e.g. `weka.classifiers.trees.J48`.
    pub class_name: String,
    /// Tunable parameters in declaration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<Parameter>,
    /// Conditional dependencies between `params`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditionals: Vec<Conditional>,
}

impl ClassifierSchema {
    /// Creates a schema with no parameters.
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            params: Vec::new(),
            conditionals: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Appends a conditional dependency.
    #[must_use]
    pub fn conditional(mut self, conditional: Conditional) -> Self {
        self.conditionals.push(conditional);
        self
    }
}

/// The role a schema plays in the algorithm-selection hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    /// A standalone classifier.
    Base,
    /// A classifier wrapping one base classifier.
    Meta,
    /// A classifier combining a fixed number of base classifiers.
    Ensemble,
    /// An attribute search method.
    AttributeSearch,
    /// An attribute subset evaluator.
    AttributeEval,
}

/// Restricts which concrete classifiers are eligible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AllowList {
    /// Every classifier is eligible.
    #[default]
    Any,
    /// Only the named classes are eligible.
    Only(BTreeSet<String>),
}

impl AllowList {
    /// Allows only the given class names.
    #[must_use]
    pub fn only<I, S>(class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowList::Only(class_names.into_iter().map(Into::into).collect())
    }

    /// Whether `class_name` is eligible.
    #[must_use]
    pub fn allows(&self, class_name: &str) -> bool {
        match self {
            AllowList::Any => true,
            AllowList::Only(names) => names.contains(class_name),
        }
    }
}

/// Ordered classifier schemas per role.
///
/// Iteration order within a role is the order alternatives appear in the
/// compiled search space.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Catalogue {
    /// Standalone classifiers.
    pub base: Vec<ClassifierSchema>,
    /// Meta-classifiers, each wrapping one base classifier.
    pub meta: Vec<ClassifierSchema>,
    /// Ensemble classifiers, each combining several base classifiers.
    pub ensemble: Vec<ClassifierSchema>,
    /// Attribute search methods.
    pub attribute_search: Vec<ClassifierSchema>,
    /// Attribute subset evaluators.
    pub attribute_eval: Vec<ClassifierSchema>,
}

impl Catalogue {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema under `role`.
    #[must_use]
    pub fn with(mut self, role: Role, schema: ClassifierSchema) -> Self {
        self.role_mut(role).push(schema);
        self
    }

    /// Schemas registered under `role`, in catalogue order.
    #[must_use]
    pub fn role(&self, role: Role) -> &[ClassifierSchema] {
        match role {
            Role::Base => &self.base,
            Role::Meta => &self.meta,
            Role::Ensemble => &self.ensemble,
            Role::AttributeSearch => &self.attribute_search,
            Role::AttributeEval => &self.attribute_eval,
        }
    }

    fn role_mut(&mut self, role: Role) -> &mut Vec<ClassifierSchema> {
        match role {
            Role::Base => &mut self.base,
            Role::Meta => &mut self.meta,
            Role::Ensemble => &mut self.ensemble,
            Role::AttributeSearch => &mut self.attribute_search,
            Role::AttributeEval => &mut self.attribute_eval,
        }
    }

    /// Schemas under `role` that `allow` admits.
    ///
    /// Attribute-selection roles are not classifiers and ignore the allow-list.
    #[must_use]
    pub fn eligible(&self, role: Role, allow: &AllowList) -> Vec<&ClassifierSchema> {
        let schemas = self.role(role);
        match role {
            Role::AttributeSearch | Role::AttributeEval => schemas.iter().collect(),
            Role::Base | Role::Meta | Role::Ensemble => schemas
                .iter()
                .filter(|s| allow.allows(&s.class_name))
                .collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl Catalogue {
    /// Save the catalogue to a pretty-printed JSON file.
    ///
    /// Requires the `serde` feature.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or written.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        crate::output::write_atomic(path, text.as_bytes())?;
        trace_info!(path = %path.display(), bytes = text.len(), "saved catalogue");
        Ok(())
    }

    /// Load a catalogue from a JSON file.
    ///
    /// Requires the `serde` feature.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        serde_json::from_reader(file)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
