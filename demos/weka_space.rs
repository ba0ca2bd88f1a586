//! Compile a small Weka classifier catalogue into a hyperopt search space.
//!
//! Builds schemas for a support vector machine, a decision tree, a bagging
//! meta-classifier, a voting ensemble and one attribute-selection pair, then
//! writes the rendered space to the path given as the first argument (or
//! prints it to stdout when no path is given).
//!
//! Run with: `cargo run --example weka_space -- /tmp/space.py`

use space_compiler::prelude::*;

fn catalogue() -> Catalogue {
    let smo = ClassifierSchema::new("weka.classifiers.functions.SMO")
        .param(Parameter::log_numeric("C", 0.5, 1.5))
        .param(Parameter::categorical("N", ["0", "1", "2"], 0))
        .param(Parameter::categorical(
            "K",
            [
                "weka.classifiers.functions.supportVector.NormalizedPolyKernel",
                "weka.classifiers.functions.supportVector.PolyKernel",
                "weka.classifiers.functions.supportVector.RBFKernel",
            ],
            1,
        ))
        .param(Parameter::numeric("E", 1.0, 5.0))
        .param(Parameter::categorical("L", ["REMOVED", "REMOVE_PREV"], 0))
        .param(Parameter::log_numeric("G", 1e-4, 1.0))
        .conditional(Conditional::new(
            "E",
            "K",
            [
                "weka.classifiers.functions.supportVector.NormalizedPolyKernel",
                "weka.classifiers.functions.supportVector.PolyKernel",
            ],
        ))
        .conditional(Conditional::new(
            "L",
            "K",
            [
                "weka.classifiers.functions.supportVector.NormalizedPolyKernel",
                "weka.classifiers.functions.supportVector.PolyKernel",
            ],
        ))
        .conditional(Conditional::new(
            "G",
            "K",
            ["weka.classifiers.functions.supportVector.RBFKernel"],
        ));

    let j48 = ClassifierSchema::new("weka.classifiers.trees.J48")
        .param(Parameter::categorical("O", ["REMOVED", "REMOVE_PREV"], 0))
        .param(Parameter::categorical("U", ["REMOVED", "REMOVE_PREV"], 0))
        .param(Parameter::numeric("C", 0.05, 0.5))
        .param(Parameter::log_integer("M", 1, 64))
        .conditional(Conditional::new("C", "U", ["REMOVED"]));

    let bagging = ClassifierSchema::new("weka.classifiers.meta.Bagging")
        .param(Parameter::integer("P", 10, 100))
        .param(Parameter::log_integer("I", 2, 128));

    let vote = ClassifierSchema::new("weka.classifiers.meta.Vote").param(Parameter::categorical(
        "R",
        ["AVG", "PROD", "MAJ", "MIN", "MAX"],
        0,
    ));

    let best_first = ClassifierSchema::new("weka.attributeSelection.BestFirst")
        .param(Parameter::categorical("D", ["0", "1", "2"], 1))
        .param(Parameter::integer("N", 2, 10));

    let cfs = ClassifierSchema::new("weka.attributeSelection.CfsSubsetEval")
        .param(Parameter::categorical("M", ["REMOVED", "REMOVE_PREV"], 0));

    Catalogue::new()
        .with(Role::Base, smo)
        .with(Role::Base, j48)
        .with(Role::Meta, bagging)
        .with(Role::Ensemble, vote)
        .with(Role::AttributeSearch, best_first)
        .with(Role::AttributeEval, cfs)
}

fn main() -> space_compiler::Result<()> {
    let options = CompileOptions::builder()
        .attribute_selection(true)
        .attribute_time_budget_secs(300)
        .build();
    let compiler = SearchSpaceCompiler::new();

    if let Some(path) = std::env::args().nth(1) {
        let space = compile_to_file(&compiler, &catalogue(), &options, &path)?;
        println!(
            "Wrote {} parameters and {} choices to {path}",
            space.leaf_count(),
            space.choice_count(),
        );
    } else {
        let space = compiler.compile(&catalogue(), &options)?;
        print!("{}", space.render());
    }

    Ok(())
}
