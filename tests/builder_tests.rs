use space_compiler::prelude::*;

fn compile(params: &[Parameter], conditionals: &[Conditional]) -> Result<Group> {
    compile_parameter_tree(params, conditionals, &mut NameAllocator::new())
}

fn choice_at(group: &Group, index: usize) -> &Choice {
    match &group.children[index] {
        TreeNode::Choice(choice) => choice,
        other => panic!("expected choice at {index}, got {other:?}"),
    }
}

/// The recursively compiled group inside a branch alternative.
fn branch_body(alternative: &TreeNode) -> &Group {
    let TreeNode::Group(group) = alternative else {
        panic!("expected alternative group, got {alternative:?}");
    };
    match &group.children[1] {
        TreeNode::Group(body) => body,
        other => panic!("expected nested group, got {other:?}"),
    }
}

fn names(group: &Group) -> Vec<String> {
    group
        .children
        .iter()
        .map(|c| match c {
            TreeNode::Leaf(leaf) => leaf.param.name.clone(),
            TreeNode::Choice(choice) => format!("choice:{}", choice.name),
            TreeNode::Literal(literal) => format!("literal:{}", literal.name),
            TreeNode::Group(group) => format!("group:{}", group.name),
        })
        .collect()
}

#[test]
fn empty_schema_compiles_to_empty_group() {
    let tree = compile(&[], &[]).unwrap();
    assert!(tree.children.is_empty());
    assert!(tree.dict_framed);
}

#[test]
fn independents_precede_branches() {
    let params = vec![
        Parameter::categorical("mode", ["fast", "slow"], 0),
        Parameter::numeric("alpha", 0.0, 1.0),
        Parameter::integer("depth", 1, 4),
        Parameter::numeric("beta", 0.0, 1.0),
    ];
    let conds = vec![Conditional::new("depth", "mode", ["slow"])];
    let tree = compile(&params, &conds).unwrap();
    assert_eq!(names(&tree), vec!["alpha", "beta", "choice:mode"]);
}

#[test]
fn alternatives_follow_declared_value_order() {
    let params = vec![
        Parameter::categorical("mode", ["a", "b", "c"], 2),
        Parameter::numeric("x", 0.0, 1.0),
    ];
    let conds = vec![Conditional::new("x", "mode", ["c"])];
    let tree = compile(&params, &conds).unwrap();
    let choice = choice_at(&tree, 0);

    let values: Vec<&str> = choice
        .alternatives
        .iter()
        .map(|alt| {
            let TreeNode::Group(group) = alt else {
                panic!("expected group");
            };
            let TreeNode::Literal(literal) = &group.children[0] else {
                panic!("expected literal");
            };
            literal.value.as_str()
        })
        .collect();
    assert_eq!(values, vec!["a", "b", "c"]);
}

#[test]
fn multiple_branches_resolve_their_own_children() {
    let params = vec![
        Parameter::categorical("P", ["p1", "p2"], 0),
        Parameter::categorical("Q", ["q1", "q2"], 0),
        Parameter::numeric("under_p", 0.0, 1.0),
        Parameter::numeric("under_q", 0.0, 1.0),
    ];
    let conds = vec![
        Conditional::new("under_p", "P", ["p2"]),
        Conditional::new("under_q", "Q", ["q1"]),
    ];
    let tree = compile(&params, &conds).unwrap();

    let p = choice_at(&tree, 0);
    assert!(names(branch_body(&p.alternatives[0])).is_empty());
    assert_eq!(names(branch_body(&p.alternatives[1])), vec!["under_p"]);

    let q = choice_at(&tree, 1);
    assert_eq!(names(branch_body(&q.alternatives[0])), vec!["under_q"]);
    assert!(names(branch_body(&q.alternatives[1])).is_empty());
}

#[test]
fn three_level_chain_nests_each_hop() {
    let params = vec![
        Parameter::categorical("A", ["x", "y"], 0),
        Parameter::categorical("B", ["b1", "b2"], 0),
        Parameter::categorical("C", ["c1", "c2"], 0),
        Parameter::numeric("D", 0.0, 1.0),
    ];
    let conds = vec![
        Conditional::new("B", "A", ["x"]),
        Conditional::new("C", "B", ["b2"]),
        Conditional::new("D", "C", ["c1"]),
    ];
    let tree = compile(&params, &conds).unwrap();

    let a = choice_at(&tree, 0);
    let under_x = branch_body(&a.alternatives[0]);
    assert_eq!(names(under_x), vec!["choice:B"]);
    assert!(names(branch_body(&a.alternatives[1])).is_empty());

    let b = choice_at(under_x, 0);
    assert!(names(branch_body(&b.alternatives[0])).is_empty());
    let under_b2 = branch_body(&b.alternatives[1]);
    assert_eq!(names(under_b2), vec!["choice:C"]);

    let c = choice_at(under_b2, 0);
    assert_eq!(names(branch_body(&c.alternatives[0])), vec!["D"]);
    assert!(names(branch_body(&c.alternatives[1])).is_empty());
}

#[test]
fn only_dependents_without_branch_fail() {
    let params = vec![
        Parameter::numeric("a", 0.0, 1.0),
        Parameter::numeric("b", 0.0, 1.0),
    ];
    let conds = vec![Conditional::new("b", "nowhere", ["x"])];
    let err = compile(&params, &conds).unwrap_err();
    assert!(err.to_string().contains("'b'"));
}

#[test]
fn invalid_domain_is_reported_by_name() {
    let params = vec![Parameter::categorical("mode", ["a"], 3)];
    let err = compile(&params, &[]).unwrap_err();
    assert!(matches!(err, Error::InvalidDefault { ref name, .. } if name == "mode"));
}

#[test]
fn anonymous_groups_take_sequential_names() {
    let params = vec![
        Parameter::categorical("A", ["x", "y"], 0),
        Parameter::numeric("B", 0.0, 1.0),
    ];
    let conds = vec![Conditional::new("B", "A", ["x"])];
    let mut names = NameAllocator::starting_at(10);
    let tree = compile_parameter_tree(&params, &conds, &mut names).unwrap();

    assert_eq!(tree.name, "auto_param_10");
    let a = choice_at(&tree, 0);
    let TreeNode::Group(first) = &a.alternatives[0] else {
        panic!("expected group");
    };
    assert_eq!(first.name, "auto_param_11");
    assert_eq!(branch_body(&a.alternatives[0]).name, "auto_param_12");
    assert_eq!(names.allocated(), 15);
}
