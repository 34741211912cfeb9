//! Terminal output for compiled queries and execution plans

use crate::query::{ExecutionPlan, QueryNode, SortPlan};
use crate::utils::FieldPrefixes;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout_for(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print a query tree, one node per line, children indented under their operator.
/// Field prefixes in `prefixes` are highlighted separately from term values.
pub fn print_query_tree(
    node: &QueryNode,
    prefixes: &FieldPrefixes,
    color: bool,
) -> io::Result<()> {
    let mut stdout = stdout_for(color);
    write_query_tree(&mut stdout, node, prefixes)
}

pub fn write_query_tree<W: WriteColor>(
    out: &mut W,
    node: &QueryNode,
    prefixes: &FieldPrefixes,
) -> io::Result<()> {
    write_node(out, node, prefixes, 0)
}

fn write_node<W: WriteColor>(
    out: &mut W,
    node: &QueryNode,
    prefixes: &FieldPrefixes,
    depth: usize,
) -> io::Result<()> {
    write!(out, "{}", "  ".repeat(depth))?;

    match node {
        QueryNode::Term(term) => {
            write_prefixed(out, term, prefixes)?;
            writeln!(out)?;
        }
        QueryNode::Wildcard(term) => {
            write_prefixed(out, term, prefixes)?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            writeln!(out, "*")?;
            out.reset()?;
        }
        QueryNode::MatchAll | QueryNode::MatchNothing => {
            let label = if matches!(node, QueryNode::MatchAll) {
                "<all documents>"
            } else {
                "<no documents>"
            };
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_italic(true))?;
            writeln!(out, "{}", label)?;
            out.reset()?;
        }
        QueryNode::Combine(op, children) => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
            writeln!(out, "{}", op.keyword())?;
            out.reset()?;
            for child in children {
                write_node(out, child, prefixes, depth + 1)?;
            }
        }
    }

    Ok(())
}

/// Split a prefixed term into its field prefix and value.
///
/// The longest matching known prefix wins, so `XEXACTSabc` is never read as a
/// title term. Terms without a known prefix are body terms.
pub fn split_prefix<'t>(term: &'t str, prefixes: &FieldPrefixes) -> (&'t str, &'t str) {
    let known = [
        &prefixes.exact_title,
        &prefixes.title,
        &prefixes.content_type,
        &prefixes.id,
        &prefixes.tag,
    ];
    let len = known
        .iter()
        .filter(|p| !p.is_empty() && term.starts_with(p.as_str()))
        .map(|p| p.len())
        .max()
        .unwrap_or(0);
    term.split_at(len)
}

fn write_prefixed<W: WriteColor>(
    out: &mut W,
    term: &str,
    prefixes: &FieldPrefixes,
) -> io::Result<()> {
    let (prefix, value) = split_prefix(term, prefixes);

    if !prefix.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
        write!(out, "{}", prefix)?;
        out.reset()?;
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(out, "{}", value)?;
    out.reset()
}

/// Print the sort, cutoff and paging settings of a plan
pub fn print_execution_plan(plan: &ExecutionPlan, color: bool) -> io::Result<()> {
    let mut stdout = stdout_for(color);
    write_execution_plan(&mut stdout, plan)
}

pub fn write_execution_plan<W: WriteColor>(out: &mut W, plan: &ExecutionPlan) -> io::Result<()> {
    match plan.sort {
        Some(SortPlan::Value { slot, descending }) => {
            let order = if descending { "descending" } else { "ascending" };
            write_field(out, "sort", &format!("slot {} {}", slot, order))?;
        }
        Some(SortPlan::Relevance { cutoff }) => {
            write_field(out, "sort", "relevance")?;
            write_field(out, "cutoff", &format!("{}%", cutoff))?;
        }
        None => write_field(out, "sort", "unset")?,
    }

    write_field(out, "offset", &plan.offset.to_string())?;
    match plan.limit {
        Some(limit) => write_field(out, "limit", &limit.to_string()),
        None => write_field(out, "limit", "unlimited"),
    }
}

/// Print sanitized terms, one per line
pub fn print_terms(terms: &[String], color: bool) -> io::Result<()> {
    let mut stdout = stdout_for(color);

    for (i, term) in terms.iter().enumerate() {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{}", i + 1)?;
        stdout.reset()?;
        writeln!(stdout, ":{}", term)?;
    }

    Ok(())
}

fn write_field<W: WriteColor>(out: &mut W, name: &str, value: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    write!(out, "{}", name)?;
    out.reset()?;
    writeln!(out, ": {}", value)
}
