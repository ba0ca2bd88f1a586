//! Assembles the full experiment search space from a [`Catalogue`].
//!
//! The top-level tree follows the algorithm-selection hierarchy:
//!
//! ```text
//! root {
//!     attribute_selection: NONE | { attribute_search, attribute_eval, attributetime }
//!     is_base: base_choice
//!            | is_meta: meta_choice      (meta wraps meta_base_choice)
//!                     | ensemble_choice  (ensemble_slot_00 -> ensemble_slot_01 -> ...)
//! }
//! ```
//!
//! Every classifier is wrapped in a dictionary [`Group`] carrying a stage
//! prefix segment, so the same schema compiled at different positions yields
//! disjoint labels.
//!
//! # Example
//!
//! ```
//! use space_compiler::prelude::*;
//!
//! let catalogue = Catalogue::new()
//!     .with(
//!         Role::Base,
//!         ClassifierSchema::new("weka.classifiers.trees.J48")
//!             .param(Parameter::numeric("C", 0.05, 0.5)),
//!     )
//!     .with(Role::Base, ClassifierSchema::new("weka.classifiers.bayes.NaiveBayes"));
//!
//! let options = CompileOptions::builder().ensemble_max_size(0).build();
//! let space = SearchSpaceCompiler::new().compile(&catalogue, &options).unwrap();
//!
//! assert_eq!(space.leaf_count(), 1);
//! assert!(space.render().contains("hp.choice('base_choice', ["));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::builder::compile_parameter_tree;
use crate::catalogue::{AllowList, Catalogue, ClassifierSchema, Role};
use crate::error::{Error, Result};
use crate::render;
use crate::tree::{Choice, Group, Literal, NameAllocator, TreeNode};

/// Key of the literal naming the selected top-level classifier.
pub const TARGET_CLASS: &str = "targetclass";
/// Key of the literal naming a meta-classifier's wrapped base classifier.
pub const WRAPPED_CLASS: &str = "wrappedclass";
/// Key of the literal naming an ensemble slot's classifier.
pub const SLOT_CLASS: &str = "slotclass";
/// Key of the literal naming the attribute search method.
pub const ATTRIBUTE_SEARCH: &str = "attributesearch";
/// Key of the literal naming the attribute evaluator.
pub const ATTRIBUTE_EVAL: &str = "attributeeval";
/// Key of the literal carrying the attribute-selection time budget.
pub const ATTRIBUTE_TIME: &str = "attributetime";
/// Value selecting no attribute selection.
pub const NO_ATTRIBUTE_SELECTION: &str = "NONE";

const TOP_STAGE: &str = "_0_";
const WRAPPED_STAGE: &str = "_1_";

/// Selection flags for one compilation.
///
/// # Defaults
///
/// - Base, meta and ensemble classifiers: included
/// - Ensemble size: 5 slots
/// - Attribute selection: disabled, 900 second budget
/// - Allow-list: [`AllowList::Any`]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompileOptions {
    /// Offer standalone base classifiers at the top level.
    pub include_base: bool,
    /// Offer meta-classifiers (downgraded when none are eligible).
    pub include_meta: bool,
    /// Offer ensembles (downgraded when none are eligible or the size is 0).
    pub include_ensemble: bool,
    /// Number of base-classifier slots in each ensemble.
    pub ensemble_max_size: usize,
    /// Offer an attribute-selection stage before classification.
    pub attribute_selection: bool,
    /// Time budget handed to attribute selection, in seconds.
    pub attribute_time_budget_secs: u64,
    /// Which classifiers are eligible.
    pub allow_list: AllowList,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            include_base: true,
            include_meta: true,
            include_ensemble: true,
            ensemble_max_size: 5,
            attribute_selection: false,
            attribute_time_budget_secs: 900,
            allow_list: AllowList::Any,
        }
    }
}

impl CompileOptions {
    /// Returns a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> CompileOptionsBuilder {
        CompileOptionsBuilder {
            options: Self::default(),
        }
    }
}

/// A builder for [`CompileOptions`] with a fluent API.
///
/// ```
/// use space_compiler::catalogue::AllowList;
/// use space_compiler::compiler::CompileOptions;
///
/// let options = CompileOptions::builder()
///     .include_meta(false)
///     .ensemble_max_size(3)
///     .attribute_selection(true)
///     .attribute_time_budget_secs(600)
///     .allow_list(AllowList::only(["weka.classifiers.trees.J48"]))
///     .build();
///
/// assert!(!options.include_meta);
/// assert_eq!(options.ensemble_max_size, 3);
/// ```
#[derive(Clone, Debug)]
pub struct CompileOptionsBuilder {
    options: CompileOptions,
}

impl CompileOptionsBuilder {
    /// Offer standalone base classifiers.
    #[must_use]
    pub fn include_base(mut self, include: bool) -> Self {
        self.options.include_base = include;
        self
    }

    /// Offer meta-classifiers.
    #[must_use]
    pub fn include_meta(mut self, include: bool) -> Self {
        self.options.include_meta = include;
        self
    }

    /// Offer ensembles.
    #[must_use]
    pub fn include_ensemble(mut self, include: bool) -> Self {
        self.options.include_ensemble = include;
        self
    }

    /// Set the number of ensemble slots.
    #[must_use]
    pub fn ensemble_max_size(mut self, size: usize) -> Self {
        self.options.ensemble_max_size = size;
        self
    }

    /// Enable or disable the attribute-selection stage.
    #[must_use]
    pub fn attribute_selection(mut self, enabled: bool) -> Self {
        self.options.attribute_selection = enabled;
        self
    }

    /// Set the attribute-selection time budget in seconds.
    #[must_use]
    pub fn attribute_time_budget_secs(mut self, secs: u64) -> Self {
        self.options.attribute_time_budget_secs = secs;
        self
    }

    /// Restrict the eligible classifiers.
    #[must_use]
    pub fn allow_list(mut self, allow_list: AllowList) -> Self {
        self.options.allow_list = allow_list;
        self
    }

    /// Build the options.
    #[must_use]
    pub fn build(self) -> CompileOptions {
        self.options
    }
}

/// A compiled search space, ready to render.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchSpace {
    root: TreeNode,
}

impl SearchSpace {
    /// The root node (always a dictionary [`Group`]).
    #[must_use]
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Consumes the search space, returning its root node.
    #[must_use]
    pub fn into_root(self) -> TreeNode {
        self.root
    }

    /// Renders the search-space expression.
    #[must_use]
    pub fn render(&self) -> String {
        render::render(&self.root)
    }

    /// All rendered leaf and choice labels in render order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        render::labels(&self.root)
    }

    /// Number of parameter leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Number of choices.
    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.root.choice_count()
    }
}

/// Compiles catalogues into search spaces.
///
/// Each call to [`compile`](Self::compile) starts from a fresh copy of the
/// compiler's [`NameAllocator`], so repeated compilations of the same input
/// produce identical trees.
#[derive(Clone, Debug, Default)]
pub struct SearchSpaceCompiler {
    names: NameAllocator,
}

impl SearchSpaceCompiler {
    /// Creates a compiler naming anonymous groups from `auto_param_0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compiler that starts naming from `names`' current state.
    #[must_use]
    pub fn with_allocator(names: NameAllocator) -> Self {
        Self { names }
    }

    /// Compiles `catalogue` under `options`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyCatalogue`] if no base classifier is eligible, or
    ///   nothing selectable remains once base classifiers are excluded.
    /// - [`Error::Classifier`] wrapping any schema error, naming the classifier.
    pub fn compile(&self, catalogue: &Catalogue, options: &CompileOptions) -> Result<SearchSpace> {
        let plan = Plan::new(catalogue, options)?;
        let mut assembly = Assembly {
            names: self.names.clone(),
            plan,
        };
        let root = assembly.root()?;
        let space = SearchSpace { root: root.into() };

        trace_info!(
            leaves = space.leaf_count(),
            choices = space.choice_count(),
            "compiled search space"
        );

        Ok(space)
    }
}

/// Eligible schemas and the flags left after silent downgrades.
struct Plan<'a> {
    base: Vec<&'a ClassifierSchema>,
    meta: Vec<&'a ClassifierSchema>,
    ensemble: Vec<&'a ClassifierSchema>,
    attribute_search: Vec<&'a ClassifierSchema>,
    attribute_eval: Vec<&'a ClassifierSchema>,
    include_base: bool,
    include_meta: bool,
    include_ensemble: bool,
    ensemble_max_size: usize,
    attribute_selection: bool,
    attribute_time_budget_secs: u64,
}

impl<'a> Plan<'a> {
    fn new(catalogue: &'a Catalogue, options: &CompileOptions) -> Result<Self> {
        let allow = &options.allow_list;
        let base = catalogue.eligible(Role::Base, allow);
        if base.is_empty() {
            return Err(Error::EmptyCatalogue);
        }

        let meta = catalogue.eligible(Role::Meta, allow);
        let ensemble = catalogue.eligible(Role::Ensemble, allow);
        let attribute_search = catalogue.eligible(Role::AttributeSearch, allow);
        let attribute_eval = catalogue.eligible(Role::AttributeEval, allow);

        let include_meta = options.include_meta && !meta.is_empty();
        let include_ensemble =
            options.include_ensemble && !ensemble.is_empty() && options.ensemble_max_size > 0;
        let attribute_selection = options.attribute_selection
            && !attribute_search.is_empty()
            && !attribute_eval.is_empty();

        if include_meta != options.include_meta
            || include_ensemble != options.include_ensemble
            || attribute_selection != options.attribute_selection
        {
            trace_debug!(
                include_meta,
                include_ensemble,
                attribute_selection,
                "downgraded unavailable stages"
            );
        }

        if !options.include_base && !include_meta && !include_ensemble {
            return Err(Error::EmptyCatalogue);
        }

        Ok(Self {
            base,
            meta,
            ensemble,
            attribute_search,
            attribute_eval,
            include_base: options.include_base,
            include_meta,
            include_ensemble,
            ensemble_max_size: options.ensemble_max_size,
            attribute_selection,
            attribute_time_budget_secs: options.attribute_time_budget_secs,
        })
    }
}

struct Assembly<'a> {
    names: NameAllocator,
    plan: Plan<'a>,
}

impl Assembly<'_> {
    fn root(&mut self) -> Result<Group> {
        let name = self.names.next_name();
        let mut children = Vec::with_capacity(2);
        if self.plan.attribute_selection {
            children.push(self.attribute_selection()?.into());
        }
        children.push(self.is_base()?.into());
        Ok(Group::dict(name, children))
    }

    fn attribute_selection(&mut self) -> Result<Choice> {
        let searches = self.plan.attribute_search.clone();
        let evaluators = self.plan.attribute_eval.clone();
        let search = self.role_choice("attribute_search", &searches, TOP_STAGE, ATTRIBUTE_SEARCH)?;
        let eval = self.role_choice("attribute_eval", &evaluators, TOP_STAGE, ATTRIBUTE_EVAL)?;
        let budget = Literal::fixed(
            ATTRIBUTE_TIME,
            self.plan.attribute_time_budget_secs.to_string(),
        );
        let selected = Group::dict(
            self.names.next_name(),
            vec![search.into(), eval.into(), budget.into()],
        );

        Ok(Choice::new(
            "attribute_selection",
            vec![
                Literal::fixed(ATTRIBUTE_SEARCH, NO_ATTRIBUTE_SELECTION).into(),
                selected.into(),
            ],
        ))
    }

    fn is_base(&mut self) -> Result<Choice> {
        let mut alternatives = Vec::with_capacity(2);
        if self.plan.include_base {
            let base = self.plan.base.clone();
            alternatives.push(
                self.role_choice("base_choice", &base, TOP_STAGE, TARGET_CLASS)?
                    .into(),
            );
        }
        if self.plan.include_meta || self.plan.include_ensemble {
            let mut is_meta = Vec::with_capacity(2);
            if self.plan.include_meta {
                is_meta.push(self.meta_choice()?.into());
            }
            if self.plan.include_ensemble {
                is_meta.push(self.ensemble_choice()?.into());
            }
            alternatives.push(Choice::new("is_meta", is_meta).into());
        }
        Ok(Choice::new("is_base", alternatives))
    }

    fn meta_choice(&mut self) -> Result<Choice> {
        let meta = self.plan.meta.clone();
        let base = self.plan.base.clone();
        let mut alternatives = Vec::with_capacity(meta.len());
        for schema in meta {
            let wrapped = self.role_choice("meta_base_choice", &base, WRAPPED_STAGE, WRAPPED_CLASS)?;
            let segment = stage_segment(TOP_STAGE, &schema.class_name);
            alternatives.push(
                self.classifier_group(schema, segment, TARGET_CLASS, vec![wrapped.into()])?
                    .into(),
            );
        }
        Ok(Choice::new("meta_choice", alternatives))
    }

    fn ensemble_choice(&mut self) -> Result<Choice> {
        let slots = self.slot_chain()?;
        let ensemble = self.plan.ensemble.clone();
        let mut alternatives = Vec::with_capacity(ensemble.len());
        for schema in ensemble {
            let segment = stage_segment(TOP_STAGE, &schema.class_name);
            let tail = slots.iter().cloned().map(TreeNode::from).collect();
            alternatives.push(
                self.classifier_group(schema, segment, TARGET_CLASS, tail)?
                    .into(),
            );
        }
        Ok(Choice::new("ensemble_choice", alternatives))
    }

    /// Builds the right-leaning slot chain, last slot first.
    ///
    /// Slot `i`'s group holds slot `i`'s choice followed by the group of slot
    /// `i + 1`, so the chain holds `base * slots` classifier groups.
    fn slot_chain(&mut self) -> Result<Option<Group>> {
        let base = self.plan.base.clone();
        let mut next: Option<Group> = None;
        for slot in (0..self.plan.ensemble_max_size).rev() {
            let name = self.names.next_name();
            let mut alternatives = Vec::with_capacity(base.len());
            for schema in &base {
                alternatives.push(self.slot_group(schema, slot)?.into());
            }
            let mut children = vec![
                Choice::new(format!("ensemble_slot_{slot:02}"), alternatives).into(),
            ];
            if let Some(next) = next.take() {
                children.push(next.into());
            }
            next = Some(Group::dict(name, children));
        }
        Ok(next)
    }

    /// One base classifier in `slot`, bracketed by the slot markers.
    fn slot_group(&mut self, schema: &ClassifierSchema, slot: usize) -> Result<Group> {
        let segment = format!(
            "{WRAPPED_STAGE}{slot:02}_{}",
            sanitize_class_name(&schema.class_name)
        );
        let name = self.names.next_name();
        let params = self.compile_schema(schema)?;
        let children = vec![
            Literal::slot_open("slot_open").into(),
            Literal::fixed(SLOT_CLASS, &schema.class_name).into(),
            params.into(),
            Literal::slot_close("slot_close").into(),
        ];
        Ok(Group::dict(name, children).with_prefix(segment))
    }

    /// A choice over `schemas`, each wrapped with `stage` and a `class_key` literal.
    fn role_choice(
        &mut self,
        name: &str,
        schemas: &[&ClassifierSchema],
        stage: &str,
        class_key: &str,
    ) -> Result<Choice> {
        let mut alternatives = Vec::with_capacity(schemas.len());
        for schema in schemas {
            let segment = stage_segment(stage, &schema.class_name);
            alternatives.push(
                self.classifier_group(schema, segment, class_key, Vec::new())?
                    .into(),
            );
        }
        Ok(Choice::new(name, alternatives))
    }

    fn classifier_group(
        &mut self,
        schema: &ClassifierSchema,
        segment: String,
        class_key: &str,
        tail: Vec<TreeNode>,
    ) -> Result<Group> {
        let name = self.names.next_name();
        let params = self.compile_schema(schema)?;
        let mut children = Vec::with_capacity(2 + tail.len());
        children.push(Literal::fixed(class_key, &schema.class_name).into());
        children.push(params.into());
        children.extend(tail);
        Ok(Group::dict(name, children).with_prefix(segment))
    }

    fn compile_schema(&mut self, schema: &ClassifierSchema) -> Result<Group> {
        trace_debug!(class_name = %schema.class_name, "compiling classifier schema");
        compile_parameter_tree(&schema.params, &schema.conditionals, &mut self.names)
            .map_err(|e| e.in_classifier(&schema.class_name))
    }
}

fn stage_segment(stage: &str, class_name: &str) -> String {
    format!("{stage}{}", sanitize_class_name(class_name))
}

/// Replaces every non-alphanumeric character with `_`.
///
/// ```
/// use space_compiler::compiler::sanitize_class_name;
///
/// assert_eq!(
///     sanitize_class_name("weka.classifiers.trees.J48"),
///     "weka_classifiers_trees_J48"
/// );
/// ```
#[must_use]
pub fn sanitize_class_name(class_name: &str) -> String {
    class_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
