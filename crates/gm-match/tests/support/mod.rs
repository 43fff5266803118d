//! Shared fixtures for the scenario tests: graph builders and a brute-force
//! solver back-end that actually solves the small binary programs these
//! scenarios produce, rather than a canned-assignment stub.

use gm_core::graph::{AttributeValue, Graph, VertexIndex};
use gm_match::evaluate_objective;
use gm_program::{Program, Sense, VariableId, VariableKind};
use gm_solver::error::SolverResult;
use gm_solver::{SolveConfig, SolverBackend, SolverStatus};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn labeled_vertex(g: &mut Graph, label: &str) -> VertexIndex {
    let v = g.add_vertex();
    g.set_vertex_attr(v, "label", AttributeValue::Symbol(label.into()));
    v
}

/// Exhaustively enumerates every assignment of the program's binary
/// variables, keeping the best feasible one. Small enough for the fixtures
/// here (at most a handful of binary variables) and exact, unlike a real
/// MIP back-end we can't license in a test environment.
#[derive(Default)]
pub struct BruteForceSolver {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    program: Option<Program>,
    assignment: Option<HashMap<VariableId, f64>>,
}

fn constraint_satisfied(lhs: f64, relation: gm_program::Relation, rhs: f64) -> bool {
    const TOL: f64 = 1e-9;
    match relation {
        gm_program::Relation::Eq => (lhs - rhs).abs() <= TOL,
        gm_program::Relation::Le => lhs <= rhs + TOL,
        gm_program::Relation::Ge => lhs >= rhs - TOL,
    }
}

impl SolverBackend for BruteForceSolver {
    fn name(&self) -> &'static str {
        "brute-force"
    }

    fn load(&self, program: &Program) -> SolverResult<()> {
        let mut state = self.state.lock().unwrap();
        state.program = Some(program.clone());
        state.assignment = None;
        Ok(())
    }

    fn configure(&self, _config: SolveConfig) -> SolverResult<()> {
        Ok(())
    }

    fn solve(&self) -> SolverResult<SolverStatus> {
        let mut state = self.state.lock().unwrap();
        let program = state.program.clone().expect("load must run before solve");

        let mut binary_vars: Vec<VariableId> = program
            .variables()
            .filter(|v| matches!(v.kind, VariableKind::Binary))
            .map(|v| v.id)
            .collect();
        binary_vars.sort_unstable();
        // Continuous variables (F4 topology penalties) are fixed at their
        // midpoint-optimal value given the binary assignment; none of the
        // scenarios exercised here use Topology, so this only needs to
        // leave the program feasible, not find the penalty's true optimum.
        let continuous_vars: Vec<(VariableId, f64, f64)> = program
            .variables()
            .filter(|v| matches!(v.kind, VariableKind::Continuous))
            .map(|v| (v.id, v.lower, v.upper))
            .collect();

        let mut best: Option<(f64, HashMap<VariableId, f64>)> = None;
        let combinations = 1u64 << binary_vars.len();
        for mask in 0..combinations {
            let mut assignment: HashMap<VariableId, f64> = HashMap::new();
            for (bit, &var) in binary_vars.iter().enumerate() {
                let value = if (mask >> bit) & 1 == 1 { 1.0 } else { 0.0 };
                assignment.insert(var, value);
            }
            for &(var, lower, _upper) in &continuous_vars {
                // start pessimistic; tightened below once binary vars are fixed
                assignment.insert(var, lower);
            }

            // Tighten each continuous variable to the smallest value that
            // keeps every constraint referencing it feasible (these are all
            // `penalty - cap*x_ik - cap*x_jl >= -cap` constraints, linear in
            // the penalty alone once the binaries are fixed).
            for &(var, lower, upper) in &continuous_vars {
                let mut needed = lower;
                for c in program.linear_constraints() {
                    let coeff = c.expr.coefficient(var);
                    if coeff == 0.0 {
                        continue;
                    }
                    let rest: f64 = c
                        .expr
                        .terms()
                        .filter(|&(v, _)| v != var)
                        .map(|(v, coeff)| coeff * assignment.get(&v).copied().unwrap_or(0.0))
                        .sum::<f64>()
                        + c.expr.constant;
                    if let gm_program::Relation::Ge = c.relation {
                        let bound = (c.rhs - rest) / coeff;
                        if coeff > 0.0 {
                            needed = needed.max(bound);
                        }
                    }
                }
                assignment.insert(var, needed.clamp(lower, upper));
            }

            let feasible = program.linear_constraints().iter().all(|c| {
                let lhs = c.expr.constant
                    + c.expr
                        .terms()
                        .map(|(v, coeff)| coeff * assignment.get(&v).copied().unwrap_or(0.0))
                        .sum::<f64>();
                constraint_satisfied(lhs, c.relation, c.rhs)
            }) && program.quad_constraints().iter().all(|c| {
                let mut lhs = c.expr.linear.constant
                    + c.expr
                        .linear
                        .terms()
                        .map(|(v, coeff)| coeff * assignment.get(&v).copied().unwrap_or(0.0))
                        .sum::<f64>();
                for ((u, v), coeff) in c.expr.quad_terms() {
                    lhs += coeff
                        * assignment.get(&u).copied().unwrap_or(0.0)
                        * assignment.get(&v).copied().unwrap_or(0.0);
                }
                constraint_satisfied(lhs, c.relation, c.rhs)
            });

            if !feasible {
                continue;
            }

            let objective = evaluate_objective(&program, &assignment);
            let better = match (&best, program.sense) {
                (None, _) => true,
                (Some((best_obj, _)), Sense::Min) => objective < *best_obj,
                (Some((best_obj, _)), Sense::Max) => objective > *best_obj,
            };
            if better {
                best = Some((objective, assignment));
            }
        }

        match best {
            Some((_, assignment)) => {
                state.assignment = Some(assignment);
                Ok(SolverStatus::Optimal)
            }
            None => Ok(SolverStatus::Infeasible),
        }
    }

    fn read_assignment(&self) -> SolverResult<HashMap<VariableId, f64>> {
        let state = self.state.lock().unwrap();
        Ok(state.assignment.clone().unwrap_or_default())
    }
}
