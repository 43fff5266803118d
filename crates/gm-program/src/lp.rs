//! LP-format text serialization, for debugging and solver interoperability.
//!
//! The output follows the CPLEX LP file conventions (`Minimize`/`Maximize`,
//! `Subject To`, `Bounds`, `Binary`/`General`), which GLPK and Gurobi also
//! accept.

use crate::expr::{LinearExpr, QuadExpr};
use crate::program::{Program, Sense};
use crate::variable::VariableKind;
use std::fmt::Write as _;

fn variable_name(program: &Program, id: usize) -> String {
    program
        .variable(id)
        .map(|v| v.name.clone())
        .unwrap_or_else(|| format!("x{id}"))
}

fn write_linear_expr(out: &mut String, program: &Program, expr: &LinearExpr) {
    let mut terms: Vec<_> = expr.terms().collect();
    terms.sort_by_key(|&(id, _)| id);
    if terms.is_empty() {
        out.push_str("0");
    }
    for (i, (id, coeff)) in terms.iter().enumerate() {
        let sign = if *coeff < 0.0 { "-" } else if i == 0 { "" } else { "+" };
        let magnitude = coeff.abs();
        let _ = write!(out, " {sign} {magnitude} {}", variable_name(program, *id));
    }
}

fn write_quad_expr(out: &mut String, program: &Program, expr: &QuadExpr) {
    write_linear_expr(out, program, &expr.linear);
    let mut quad: Vec<_> = expr.quad_terms().collect();
    quad.sort_by_key(|&((a, b), _)| (a, b));
    for ((a, b), coeff) in quad {
        let sign = if coeff < 0.0 { "-" } else { "+" };
        let magnitude = coeff.abs();
        let an = variable_name(program, a);
        let bn = variable_name(program, b);
        if a == b {
            let _ = write!(out, " {sign} [ {magnitude} {an} ^2 ] / 2");
        } else {
            let _ = write!(out, " {sign} [ {magnitude} {an} * {bn} ] / 2");
        }
    }
}

/// Serializes `program` to LP text format.
pub fn to_lp_string(program: &Program) -> String {
    let mut out = String::new();
    let sense_kw = match program.sense {
        Sense::Min => "Minimize",
        Sense::Max => "Maximize",
    };
    let _ = writeln!(out, "{sense_kw}");
    out.push_str(" obj:");
    write_quad_expr(&mut out, program, program.objective());
    out.push('\n');

    out.push_str("Subject To\n");
    for c in program.linear_constraints() {
        let _ = write!(out, " c{}:", c.id);
        write_linear_expr(&mut out, program, &c.expr);
        let _ = writeln!(out, " {} {}", c.relation.as_lp_symbol(), c.rhs);
    }
    for c in program.quad_constraints() {
        let _ = write!(out, " c{}:", c.id);
        write_quad_expr(&mut out, program, &c.expr);
        let _ = writeln!(out, " {} {}", c.relation.as_lp_symbol(), c.rhs);
    }

    let mut binaries = Vec::new();
    let mut generals = Vec::new();
    let mut bounds = String::new();
    let mut vars: Vec<_> = program.variables().collect();
    vars.sort_by_key(|v| v.id);
    for v in vars {
        match v.kind {
            VariableKind::Binary => binaries.push(v.name.clone()),
            VariableKind::BoundedInteger => {
                let _ = writeln!(bounds, " {} <= {} <= {}", v.lower, v.name, v.upper);
                generals.push(v.name.clone());
            }
            VariableKind::Continuous => {
                let _ = writeln!(bounds, " {} <= {} <= {}", v.lower, v.name, v.upper);
            }
        }
    }

    if !bounds.is_empty() {
        out.push_str("Bounds\n");
        out.push_str(&bounds);
    }
    if !binaries.is_empty() {
        out.push_str("Binary\n ");
        out.push_str(&binaries.join(" "));
        out.push('\n');
    }
    if !generals.is_empty() {
        out.push_str("General\n ");
        out.push_str(&generals.join(" "));
        out.push('\n');
    }
    out.push_str("End\n");
    out
}
