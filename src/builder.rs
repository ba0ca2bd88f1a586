//! Compiles one classifier's flat parameter schema into a choice tree.
//!
//! Parameters are partitioned level by level:
//!
//! | Bucket | Meaning | Output |
//! |---|---|---|
//! | independent | neither child nor parent of an in-scope conditional | [`Leaf`](crate::tree::Leaf) |
//! | branch | parent of some conditional, child of none | [`Choice`] over its values |
//! | dependent | child of some conditional | nested under the branch its chain reaches |
//!
//! Each branch value becomes a dictionary [`Group`] holding a literal for the
//! chosen value plus the recursively compiled set of dependents active for it.
//! Dependents that are themselves parents are re-classified as branches one
//! level down, so chained dependencies nest naturally.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::parameter::{Conditional, Parameter};
use crate::tree::{Choice, Group, Literal, NameAllocator, TreeNode};

/// Compiles `params` and their `conditionals` into a dictionary [`Group`].
///
/// Independent parameters come first in declaration order, followed by one
/// [`Choice`] per branch parameter in declaration order. Conditionals whose
/// child is not among `params` are ignored. Neither input is modified.
///
/// # Errors
///
/// - [`Error::MalformedDependencyGraph`] if a dependent's chain cannot be walked
///   back to a branch parameter in scope, the chain loops, or a parameter is
///   the child of more than one conditional.
/// - [`Error::InvalidConditionalParent`] if a branch parameter is not categorical.
/// - Parameter validation errors for invalid domains or duplicate names.
///
/// # Example
///
/// ```
/// use space_compiler::builder::compile_parameter_tree;
/// use space_compiler::parameter::{Conditional, Parameter};
/// use space_compiler::tree::{NameAllocator, TreeNode};
///
/// let params = vec![
///     Parameter::numeric("C", 0.1, 10.0),
///     Parameter::categorical("kernel", ["rbf", "poly"], 0),
///     Parameter::integer("degree", 2, 5),
/// ];
/// let conditionals = vec![Conditional::new("degree", "kernel", ["poly"])];
///
/// let mut names = NameAllocator::new();
/// let tree = compile_parameter_tree(&params, &conditionals, &mut names).unwrap();
///
/// assert_eq!(tree.children.len(), 2);
/// assert!(matches!(&tree.children[1], TreeNode::Choice(c) if c.name == "kernel"));
/// ```
pub fn compile_parameter_tree(
    params: &[Parameter],
    conditionals: &[Conditional],
    names: &mut NameAllocator,
) -> Result<Group> {
    let mut seen = HashSet::with_capacity(params.len());
    for param in params {
        param.validate()?;
        if !seen.insert(param.name.as_str()) {
            return Err(Error::DuplicateParameter {
                name: param.name.clone(),
            });
        }
    }

    let scoped: Vec<&Conditional> = conditionals
        .iter()
        .filter(|c| seen.contains(c.child.as_str()))
        .collect();

    let mut governed = HashSet::with_capacity(scoped.len());
    for cond in &scoped {
        if !governed.insert(cond.child.as_str()) {
            return Err(Error::MalformedDependencyGraph {
                parameter: cond.child.clone(),
                reason: "parameter is the child of more than one conditional",
            });
        }
    }

    let params: Vec<&Parameter> = params.iter().collect();
    resolve_level(&params, &scoped, names)
}

/// Where a dependent's chain of conditionals leads, seen from one branch.
enum Chain<'a> {
    /// The chain reaches the branch through `edge`; `via` holds the
    /// conditionals walked before it.
    Reaches {
        edge: &'a Conditional,
        via: Vec<&'a Conditional>,
    },
    /// The chain ends at a different branch.
    Elsewhere,
}

fn resolve_level(
    params: &[&Parameter],
    conditionals: &[&Conditional],
    names: &mut NameAllocator,
) -> Result<Group> {
    let group_name = names.next_name();
    let in_scope: HashSet<&str> = params.iter().map(|p| p.name.as_str()).collect();
    let scoped: Vec<&Conditional> = conditionals
        .iter()
        .copied()
        .filter(|c| in_scope.contains(c.child.as_str()))
        .collect();

    let mut independent = Vec::new();
    let mut branch = Vec::new();
    let mut dependent = Vec::new();
    for &param in params {
        let is_child = scoped.iter().any(|c| c.child == param.name);
        let is_parent = scoped.iter().any(|c| c.parent == param.name);
        match (is_child, is_parent) {
            (true, _) => dependent.push(param),
            (false, true) => branch.push(param),
            (false, false) => independent.push(param),
        }
    }

    trace_debug!(
        independent = independent.len(),
        branch = branch.len(),
        dependent = dependent.len(),
        "partitioned parameter level"
    );

    if let Some(orphan) = dependent.first()
        && branch.is_empty()
    {
        return Err(Error::MalformedDependencyGraph {
            parameter: orphan.name.clone(),
            reason: "dependent parameter has no branch parameter in scope",
        });
    }

    let mut children: Vec<TreeNode> = independent
        .into_iter()
        .map(|p| TreeNode::from(p.clone()))
        .collect();

    for &parent in &branch {
        let Some(domain) = parent.as_categorical() else {
            let child = scoped
                .iter()
                .find(|c| c.parent == parent.name)
                .map(|c| c.child.clone())
                .unwrap_or_default();
            return Err(Error::InvalidConditionalParent {
                parent: parent.name.clone(),
                child,
            });
        };

        let mut chains = Vec::with_capacity(dependent.len());
        for &candidate in &dependent {
            if let Chain::Reaches { edge, via } = walk_chain(candidate, parent, &scoped, &in_scope)? {
                chains.push((candidate, edge, via));
            }
        }

        let mut alternatives = Vec::with_capacity(domain.values.len());
        for value in &domain.values {
            let mut active = Vec::new();
            let mut carried: HashSet<&str> = HashSet::new();
            for (candidate, edge, via) in &chains {
                if edge.is_active(value) {
                    active.push(*candidate);
                    carried.extend(via.iter().map(|c| c.child.as_str()));
                }
            }
            let carried: Vec<&Conditional> = scoped
                .iter()
                .copied()
                .filter(|c| carried.contains(c.child.as_str()))
                .collect();

            let alt_name = names.next_name();
            let nested = resolve_level(&active, &carried, names)?;
            let alternative = Group::dict(
                alt_name,
                vec![Literal::plain(&parent.name, value).into(), nested.into()],
            )
            .with_prefix(&parent.name);
            alternatives.push(alternative.into());
        }

        children.push(Choice::new(&parent.name, alternatives).into());
    }

    Ok(Group::dict(group_name, children))
}

/// Walks upward from `candidate` until the chain reaches `branch` or ends.
fn walk_chain<'a>(
    candidate: &Parameter,
    branch: &Parameter,
    scoped: &[&'a Conditional],
    in_scope: &HashSet<&str>,
) -> Result<Chain<'a>> {
    let mut via: Vec<&'a Conditional> = Vec::new();
    let mut current = candidate.name.as_str();

    while let Some(edge) = scoped.iter().copied().find(|c| c.child == current) {
        if edge.parent == branch.name {
            return Ok(Chain::Reaches { edge, via });
        }
        if !in_scope.contains(edge.parent.as_str()) {
            return Err(Error::MalformedDependencyGraph {
                parameter: edge.child.clone(),
                reason: "conditional parent is not in scope",
            });
        }
        if via.iter().any(|c| c.child == edge.child) {
            return Err(Error::MalformedDependencyGraph {
                parameter: edge.child.clone(),
                reason: "conditional chain forms a cycle",
            });
        }
        via.push(edge);
        current = edge.parent.as_str();
    }

    Ok(Chain::Elsewhere)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Leaf;

    fn leaf_names(group: &Group) -> Vec<&str> {
        group
            .children
            .iter()
            .filter_map(|c| match c {
                TreeNode::Leaf(Leaf { param }) => Some(param.name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn nested(alternative: &TreeNode) -> &Group {
        match alternative {
            TreeNode::Group(g) => match &g.children[1] {
                TreeNode::Group(inner) => inner,
                other => panic!("expected nested group, got {other:?}"),
            },
            other => panic!("expected alternative group, got {other:?}"),
        }
    }

    #[test]
    fn independent_parameters_become_leaves() {
        let params = vec![
            Parameter::numeric("a", 0.0, 1.0),
            Parameter::integer("b", 1, 10),
        ];
        let tree = compile_parameter_tree(&params, &[], &mut NameAllocator::new()).unwrap();
        assert_eq!(leaf_names(&tree), vec!["a", "b"]);
        assert!(tree.dict_framed);
        assert_eq!(tree.name, "auto_param_0");
    }

    #[test]
    fn branch_expands_every_value() {
        let params = vec![
            Parameter::categorical("A", ["x", "y", "z"], 0),
            Parameter::numeric("B", 0.0, 1.0),
        ];
        let conds = vec![Conditional::new("B", "A", ["x", "z"])];
        let tree = compile_parameter_tree(&params, &conds, &mut NameAllocator::new()).unwrap();

        let TreeNode::Choice(choice) = &tree.children[0] else {
            panic!("expected choice");
        };
        assert_eq!(choice.name, "A");
        assert_eq!(choice.alternatives.len(), 3);
        assert_eq!(leaf_names(nested(&choice.alternatives[0])), vec!["B"]);
        assert!(leaf_names(nested(&choice.alternatives[1])).is_empty());
        assert_eq!(leaf_names(nested(&choice.alternatives[2])), vec!["B"]);

        let TreeNode::Group(alt) = &choice.alternatives[1] else {
            panic!("expected group");
        };
        assert_eq!(alt.prefix, "A");
        assert_eq!(
            alt.children[0],
            TreeNode::Literal(Literal::plain("A", "y"))
        );
    }

    #[test]
    fn non_categorical_branch_is_rejected() {
        let params = vec![
            Parameter::numeric("A", 0.0, 1.0),
            Parameter::numeric("B", 0.0, 1.0),
        ];
        let conds = vec![Conditional::new("B", "A", ["1"])];
        let err = compile_parameter_tree(&params, &conds, &mut NameAllocator::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConditionalParent { ref parent, ref child } if parent == "A" && child == "B"
        ));
    }

    #[test]
    fn second_parent_is_rejected() {
        let params = vec![
            Parameter::categorical("A", ["x"], 0),
            Parameter::categorical("B", ["y"], 0),
            Parameter::numeric("C", 0.0, 1.0),
        ];
        let conds = vec![
            Conditional::new("C", "A", ["x"]),
            Conditional::new("C", "B", ["y"]),
        ];
        let err = compile_parameter_tree(&params, &conds, &mut NameAllocator::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedDependencyGraph { ref parameter, .. } if parameter == "C"
        ));
    }

    #[test]
    fn cycle_is_rejected() {
        let params = vec![
            Parameter::categorical("R", ["on"], 0),
            Parameter::numeric("Q", 0.0, 1.0),
            Parameter::categorical("X", ["a"], 0),
            Parameter::categorical("Y", ["b"], 0),
        ];
        let conds = vec![
            Conditional::new("Q", "R", ["on"]),
            Conditional::new("X", "Y", ["b"]),
            Conditional::new("Y", "X", ["a"]),
        ];
        let err = compile_parameter_tree(&params, &conds, &mut NameAllocator::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedDependencyGraph { .. }));
    }

    #[test]
    fn missing_parent_is_rejected_even_with_other_branches() {
        let params = vec![
            Parameter::categorical("A", ["x"], 0),
            Parameter::numeric("B", 0.0, 1.0),
            Parameter::numeric("C", 0.0, 1.0),
        ];
        let conds = vec![
            Conditional::new("B", "A", ["x"]),
            Conditional::new("C", "Missing", ["v"]),
        ];
        let err = compile_parameter_tree(&params, &conds, &mut NameAllocator::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedDependencyGraph { ref parameter, .. } if parameter == "C"
        ));
    }

    #[test]
    fn conditionals_on_unknown_children_are_ignored() {
        let params = vec![Parameter::numeric("a", 0.0, 1.0)];
        let conds = vec![Conditional::new("ghost", "a", ["1"])];
        let tree = compile_parameter_tree(&params, &conds, &mut NameAllocator::new()).unwrap();
        assert_eq!(leaf_names(&tree), vec!["a"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let params = vec![
            Parameter::numeric("a", 0.0, 1.0),
            Parameter::integer("a", 1, 2),
        ];
        assert!(matches!(
            compile_parameter_tree(&params, &[], &mut NameAllocator::new()),
            Err(Error::DuplicateParameter { .. })
        ));
    }

    #[test]
    fn inputs_are_left_untouched() {
        let params = vec![
            Parameter::categorical("A", ["x", "y"], 1),
            Parameter::numeric("B", 0.0, 1.0),
        ];
        let conds = vec![Conditional::new("B", "A", ["x"])];
        let (p0, c0) = (params.clone(), conds.clone());
        compile_parameter_tree(&params, &conds, &mut NameAllocator::new()).unwrap();
        assert_eq!(params, p0);
        assert_eq!(conds, c0);
    }
}
