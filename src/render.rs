//! Serializes a compiled tree into a hyperopt search-space expression.
//!
//! # Output grammar
//!
//! | Node | Rendering |
//! |---|---|
//! | dict [`Group`] | `{` children `}` |
//! | tuple [`Group`] | `(` children `)` |
//! | [`Choice`] | `hp.choice('<label>', [` alternatives `])` |
//! | categorical leaf | `hp.choice('<label>', ['<default>', ...])` |
//! | numeric leaf | `hp.uniform('<label>', low, high)` |
//! | log-numeric leaf | `hp.loguniform('<label>', ln(low), ln(high))` |
//! | integer leaf | `hp.quniform('<label>', low, high, 1)` |
//! | log-integer leaf | `hp.qloguniform('<label>', ln(low), ln(high), 1)` |
//! | [`Literal`] | `'<value>'` |
//!
//! One node per line, four spaces per depth, every nested entry followed by
//! a comma. Inside a dictionary each entry is keyed by its label.
//!
//! # Labels
//!
//! A group with a local prefix segment `s` at sibling index `i` extends the
//! prefix for its descendants to `prefix + s + "_" + i + "_"` (index padded to
//! two digits). Leaf, choice and group labels are the accumulated prefix plus
//! the node's own name; fixed-name literals ignore the prefix.

use core::fmt::Write as _;

use crate::distribution::Distribution;
use crate::tree::{Choice, Group, Leaf, Literal, LiteralRole, TreeNode};

const INDENT: &str = "    ";

/// Renders `root` as a search-space expression terminated by a newline.
///
/// ```
/// use space_compiler::parameter::Parameter;
/// use space_compiler::render::render;
/// use space_compiler::tree::{Group, TreeNode};
///
/// let root: TreeNode = Group::dict("root", vec![Parameter::integer("n", 1, 8).into()]).into();
/// assert_eq!(
///     render(&root),
///     "{\n    'n': hp.quniform('n', 1, 8, 1),\n}\n"
/// );
/// ```
#[must_use]
pub fn render(root: &TreeNode) -> String {
    let mut out = String::with_capacity(4096);
    let ctx = Context {
        prefix: "",
        depth: 0,
        index: 0,
        parent_dict: false,
    };
    write_node(&mut out, root, &ctx, "");
    out
}

/// Flattens every rendered leaf and choice label, in render order.
#[must_use]
pub fn labels(root: &TreeNode) -> Vec<String> {
    let mut out = Vec::new();
    collect_labels(root, "", 0, &mut out);
    out
}

/// Where a node sits while it is being rendered.
struct Context<'p> {
    prefix: &'p str,
    depth: usize,
    index: usize,
    parent_dict: bool,
}

fn write_node(out: &mut String, node: &TreeNode, ctx: &Context<'_>, terminator: &str) {
    indent(out, ctx.depth);
    if ctx.parent_dict {
        let _ = write!(out, "{}: ", quote(&node_label(node, ctx.prefix)));
    }

    match node {
        TreeNode::Leaf(leaf) => write_leaf(out, leaf, ctx.prefix),
        TreeNode::Literal(literal) => write_literal(out, literal),
        TreeNode::Choice(choice) => write_choice(out, choice, ctx),
        TreeNode::Group(group) => write_group(out, group, ctx),
    }

    out.push_str(terminator);
    out.push('\n');
}

fn write_leaf(out: &mut String, leaf: &Leaf, prefix: &str) {
    let label = quote(&format!("{prefix}{}", leaf.param.name));
    let _ = match &leaf.param.distribution {
        Distribution::Categorical(d) => {
            let values: Vec<String> = d.default_first().into_iter().map(quote).collect();
            write!(out, "hp.choice({label}, [{}])", values.join(", "))
        }
        Distribution::Float(d) if d.log_scale => {
            write!(out, "hp.loguniform({label}, {:?}, {:?})", d.low.ln(), d.high.ln())
        }
        Distribution::Float(d) => write!(out, "hp.uniform({label}, {:?}, {:?})", d.low, d.high),
        Distribution::Int(d) if d.log_scale => write!(
            out,
            "hp.qloguniform({label}, {:?}, {:?}, 1)",
            (d.low as f64).ln(),
            (d.high as f64).ln()
        ),
        Distribution::Int(d) => write!(out, "hp.quniform({label}, {}, {}, 1)", d.low, d.high),
    };
}

fn write_literal(out: &mut String, literal: &Literal) {
    match literal.role {
        LiteralRole::PlainValue => out.push_str(&quote(&literal.value)),
        LiteralRole::SlotOpenMarker => {
            let _ = write!(out, "'{}'", crate::tree::SLOT_OPEN_TOKEN);
        }
        LiteralRole::SlotCloseMarker => {
            let _ = write!(out, "'{}'", crate::tree::SLOT_CLOSE_TOKEN);
        }
    }
}

fn write_choice(out: &mut String, choice: &Choice, ctx: &Context<'_>) {
    let _ = writeln!(
        out,
        "hp.choice({}, [",
        quote(&format!("{}{}", ctx.prefix, choice.name))
    );
    for (index, alternative) in choice.alternatives.iter().enumerate() {
        let inner = Context {
            prefix: ctx.prefix,
            depth: ctx.depth + 1,
            index,
            parent_dict: false,
        };
        write_node(out, alternative, &inner, ",");
    }
    indent(out, ctx.depth);
    out.push_str("])");
}

fn write_group(out: &mut String, group: &Group, ctx: &Context<'_>) {
    let (open, close) = if group.dict_framed { ('{', '}') } else { ('(', ')') };
    out.push(open);
    out.push('\n');

    let prefix = child_prefix(ctx.prefix, group, ctx.index);
    for (index, child) in group.children.iter().enumerate() {
        let inner = Context {
            prefix: &prefix,
            depth: ctx.depth + 1,
            index,
            parent_dict: group.dict_framed,
        };
        write_node(out, child, &inner, ",");
    }

    indent(out, ctx.depth);
    out.push(close);
}

fn collect_labels(node: &TreeNode, prefix: &str, index: usize, out: &mut Vec<String>) {
    match node {
        TreeNode::Leaf(leaf) => out.push(format!("{prefix}{}", leaf.param.name)),
        TreeNode::Literal(_) => {}
        TreeNode::Choice(choice) => {
            out.push(format!("{prefix}{}", choice.name));
            for (i, alternative) in choice.alternatives.iter().enumerate() {
                collect_labels(alternative, prefix, i, out);
            }
        }
        TreeNode::Group(group) => {
            let prefix = child_prefix(prefix, group, index);
            for (i, child) in group.children.iter().enumerate() {
                collect_labels(child, &prefix, i, out);
            }
        }
    }
}

fn node_label(node: &TreeNode, prefix: &str) -> String {
    match node {
        TreeNode::Leaf(leaf) => format!("{prefix}{}", leaf.param.name),
        TreeNode::Literal(literal) if literal.fixed_name => literal.name.clone(),
        TreeNode::Literal(literal) => format!("{prefix}{}", literal.name),
        TreeNode::Choice(choice) => format!("{prefix}{}", choice.name),
        TreeNode::Group(group) => format!("{prefix}{}", group.name),
    }
}

fn child_prefix(prefix: &str, group: &Group, index: usize) -> String {
    if group.prefix.is_empty() {
        prefix.to_owned()
    } else {
        format!("{prefix}{}_{index:02}_", group.prefix)
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Single-quotes `s`, escaping backslashes and quotes.
fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}
