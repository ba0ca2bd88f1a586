/// Errors raised while compiling a search space.
///
/// Every variant aborts the enclosing compilation. None of them are transient:
/// they describe defects in the classifier schemas or the catalogue.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when dependent parameters cannot be attached to a branch
    /// parameter in scope.
    #[error("malformed dependency graph at parameter '{parameter}': {reason}")]
    MalformedDependencyGraph {
        /// The parameter whose dependency could not be resolved.
        parameter: String,
        /// What made the graph unresolvable.
        reason: &'static str,
    },

    /// Returned when a parameter governing a conditional is not categorical.
    #[error("invalid conditional parent '{parent}' for '{child}': only categorical parameters can be branch parameters")]
    InvalidConditionalParent {
        /// The non-categorical parent parameter.
        parent: String,
        /// A child parameter depending on it.
        child: String,
    },

    /// Returned when no base classifier is eligible, leaving nothing to search over.
    #[error("empty catalogue: no eligible base classifiers")]
    EmptyCatalogue,

    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds for '{name}': low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The parameter name.
        name: String,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when log scale is used with non-positive bounds.
    #[error("invalid log bounds for '{name}': low must be positive for log scale")]
    InvalidLogBounds {
        /// The parameter name.
        name: String,
    },

    /// Returned when categorical values are empty.
    #[error("categorical parameter '{name}' has no values")]
    EmptyChoices {
        /// The parameter name.
        name: String,
    },

    /// Returned when a categorical default index is outside the value list.
    #[error("default index {index} out of range for '{name}' with {len} values")]
    InvalidDefault {
        /// The parameter name.
        name: String,
        /// The declared default index.
        index: usize,
        /// The number of declared values.
        len: usize,
    },

    /// Returned when one schema declares two parameters with the same name.
    #[error("duplicate parameter '{name}'")]
    DuplicateParameter {
        /// The repeated parameter name.
        name: String,
    },

    /// Wraps an error raised while compiling one classifier's schema.
    #[error("in classifier '{class_name}': {source}")]
    Classifier {
        /// The classifier whose schema failed to compile.
        class_name: String,
        /// The underlying schema error.
        #[source]
        source: Box<Error>,
    },

    /// Returned when writing a compiled search space to disk fails.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach the classifier a schema error originated from.
    pub(crate) fn in_classifier(self, class_name: &str) -> Self {
        Error::Classifier {
            class_name: class_name.to_owned(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
