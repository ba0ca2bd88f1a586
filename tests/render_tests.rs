use space_compiler::prelude::*;

#[test]
fn single_base_classifier_golden() {
    let catalogue = Catalogue::new().with(
        Role::Base,
        ClassifierSchema::new("a.J48").param(Parameter::numeric("C", 0.1, 0.5)),
    );
    let space = SearchSpaceCompiler::new()
        .compile(&catalogue, &CompileOptions::default())
        .unwrap();

    let expected = "\
{
    'is_base': hp.choice('is_base', [
        hp.choice('base_choice', [
            {
                'targetclass': 'a.J48',
                '_0_a_J48_00_auto_param_2': {
                    '_0_a_J48_00_C': hp.uniform('_0_a_J48_00_C', 0.1, 0.5),
                },
            },
        ]),
    ]),
}
";
    assert_eq!(space.render(), expected);
}

#[test]
fn ensemble_slot_golden() {
    let catalogue = Catalogue::new()
        .with(Role::Base, ClassifierSchema::new("b.NB"))
        .with(Role::Ensemble, ClassifierSchema::new("e.Vote"));
    let options = CompileOptions::builder()
        .include_base(false)
        .ensemble_max_size(1)
        .build();
    let space = SearchSpaceCompiler::new().compile(&catalogue, &options).unwrap();

    let expected = "\
{
    'is_base': hp.choice('is_base', [
        hp.choice('is_meta', [
            hp.choice('ensemble_choice', [
                {
                    'targetclass': 'e.Vote',
                    '_0_e_Vote_00_auto_param_5': {
                    },
                    '_0_e_Vote_00_auto_param_1': {
                        '_0_e_Vote_00_ensemble_slot_00': hp.choice('_0_e_Vote_00_ensemble_slot_00', [
                            {
                                '_0_e_Vote_00__1_00_b_NB_00_slot_open': 'QUOTE_START',
                                'slotclass': 'b.NB',
                                '_0_e_Vote_00__1_00_b_NB_00_auto_param_3': {
                                },
                                '_0_e_Vote_00__1_00_b_NB_00_slot_close': 'QUOTE_END',
                            },
                        ]),
                    },
                },
            ]),
        ]),
    ]),
}
";
    assert_eq!(space.render(), expected);
}

#[test]
fn attribute_selection_offers_none_first() {
    let catalogue = Catalogue::new()
        .with(Role::Base, ClassifierSchema::new("b.NB"))
        .with(Role::AttributeSearch, ClassifierSchema::new("s.BestFirst"))
        .with(Role::AttributeEval, ClassifierSchema::new("s.Cfs"));
    let options = CompileOptions::builder()
        .attribute_selection(true)
        .attribute_time_budget_secs(120)
        .build();
    let text = SearchSpaceCompiler::new()
        .compile(&catalogue, &options)
        .unwrap()
        .render();

    let expected_head = "\
{
    'attribute_selection': hp.choice('attribute_selection', [
        'NONE',
        {
            'attribute_search': hp.choice('attribute_search', [
                {
                    'attributesearch': 's.BestFirst',
";
    assert!(text.starts_with(expected_head), "{text}");
    assert!(text.contains("            'attributetime': '120',\n"));
    assert!(text.contains("                    'attributeeval': 's.Cfs',\n"));
}

#[test]
fn every_distribution_kind_renders() {
    let root: TreeNode = Group::dict(
        "root",
        vec![
            Parameter::categorical("cat", ["a", "b"], 1).into(),
            Parameter::numeric("num", -2.5, 2.5).into(),
            Parameter::log_numeric("lognum", 1.0, 100.0).into(),
            Parameter::integer("int", 0, 9).into(),
            Parameter::log_integer("logint", 1, 1024).into(),
        ],
    )
    .into();

    let text = render(&root);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "    'cat': hp.choice('cat', ['b', 'a']),");
    assert_eq!(lines[2], "    'num': hp.uniform('num', -2.5, 2.5),");
    assert_eq!(
        lines[3],
        format!("    'lognum': hp.loguniform('lognum', 0.0, {:?}),", 100f64.ln())
    );
    assert_eq!(lines[4], "    'int': hp.quniform('int', 0, 9, 1),");
    assert_eq!(
        lines[5],
        format!("    'logint': hp.qloguniform('logint', 0.0, {:?}, 1),", 1024f64.ln())
    );
    assert_eq!(lines[6], "}");
}

#[test]
fn choice_inside_tuple_is_positional() {
    let root: TreeNode = Group::tuple(
        "t",
        vec![Choice::new("c", vec![Literal::plain("v", "one").into()]).into()],
    )
    .into();
    assert_eq!(
        render(&root),
        "(\n    hp.choice('c', [\n        'one',\n    ]),\n)\n"
    );
}

#[test]
fn string_values_are_escaped() {
    let root: TreeNode = Group::dict(
        "root",
        vec![
            Literal::fixed("path", r"C:\data").into(),
            Parameter::categorical("q", ["it's"], 0).into(),
        ],
    )
    .into();
    let text = render(&root);
    assert!(text.contains(r"'path': 'C:\\data',"));
    assert!(text.contains(r"hp.choice('q', ['it\'s'])"));
}
