//! Gurobi back-end, built on the [`grb`] crate.

use crate::backend::{SolveConfig, SolverBackend, SolverStatus};
use crate::error::{SolverError, SolverResult};
use gm_program::{Program, Relation, Sense, VariableId, VariableKind};
use grb::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;

const NAME: &str = "gurobi";

fn init_err(reason: impl std::fmt::Display) -> SolverError {
    SolverError::Initialization {
        backend: NAME,
        reason: reason.to_string(),
    }
}

fn load_err(reason: impl std::fmt::Display) -> SolverError {
    SolverError::Load {
        backend: NAME,
        reason: reason.to_string(),
    }
}

fn solve_err(reason: impl std::fmt::Display) -> SolverError {
    SolverError::Solve {
        backend: NAME,
        reason: reason.to_string(),
    }
}

fn read_err(reason: impl std::fmt::Display) -> SolverError {
    SolverError::ReadAssignment {
        backend: NAME,
        reason: reason.to_string(),
    }
}

struct Loaded {
    model: Model,
    vars: HashMap<VariableId, Var>,
}

#[derive(Default)]
pub struct GurobiSolver {
    state: Mutex<Option<Loaded>>,
}

impl std::fmt::Debug for GurobiSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GurobiSolver").finish()
    }
}

impl SolverBackend for GurobiSolver {
    fn name(&self) -> &'static str {
        NAME
    }

    fn load(&self, program: &Program) -> SolverResult<()> {
        let env = Env::new("").map_err(init_err)?;
        let mut model = Model::with_env("gm-match", env).map_err(init_err)?;

        let mut vars = HashMap::with_capacity(program.variable_count());
        for variable in program.variables() {
            let var_type = match variable.kind {
                VariableKind::Binary => grb::VarType::Binary,
                VariableKind::BoundedInteger => grb::VarType::Integer,
                VariableKind::Continuous => grb::VarType::Continuous,
            };
            let var = model
                .add_var(
                    &variable.name,
                    var_type,
                    0.0,
                    variable.lower,
                    variable.upper,
                    std::iter::empty(),
                )
                .map_err(load_err)?;
            vars.insert(variable.id, var);
        }
        model.update().map_err(load_err)?;

        for constraint in program.linear_constraints() {
            let expr = build_linear_expr(&vars, constraint.expr.terms(), constraint.expr.constant)?;
            let name = format!("c{}", constraint.id);
            match constraint.relation {
                Relation::Eq => model.add_constr(&name, c!(expr == constraint.rhs)),
                Relation::Le => model.add_constr(&name, c!(expr <= constraint.rhs)),
                Relation::Ge => model.add_constr(&name, c!(expr >= constraint.rhs)),
            }
            .map_err(load_err)?;
        }

        for constraint in program.quad_constraints() {
            let name = format!("qc{}", constraint.id);
            let expr = build_quad_expr(&vars, &constraint.expr)?;
            match constraint.relation {
                Relation::Eq => model.add_qconstr(&name, c!(expr == constraint.rhs)),
                Relation::Le => model.add_qconstr(&name, c!(expr <= constraint.rhs)),
                Relation::Ge => model.add_qconstr(&name, c!(expr >= constraint.rhs)),
            }
            .map_err(load_err)?;
        }

        let obj = build_quad_expr(&vars, program.objective())?;
        model
            .set_objective(obj, sense_of(program.sense))
            .map_err(load_err)?;
        model.update().map_err(load_err)?;

        *self.state.lock().expect("gurobi solver lock poisoned") = Some(Loaded { model, vars });
        Ok(())
    }

    fn configure(&self, config: SolveConfig) -> SolverResult<()> {
        let mut guard = self.state.lock().expect("gurobi solver lock poisoned");
        let loaded = guard.as_mut().ok_or_else(|| load_err("configure called before load"))?;
        loaded
            .model
            .set_param(param::TimeLimit, config.time_limit_seconds)
            .map_err(load_err)?;
        loaded
            .model
            .set_param(param::Threads, config.thread_count as i32)
            .map_err(load_err)?;
        if let Some(hint) = config.upper_bound_hint {
            loaded.model.set_param(param::Cutoff, hint).map_err(load_err)?;
        }
        loaded
            .model
            .set_param(param::OutputFlag, if config.verbose { 1 } else { 0 })
            .map_err(load_err)?;
        Ok(())
    }

    fn solve(&self) -> SolverResult<SolverStatus> {
        let _span = tracing::info_span!("solver.solve", backend = NAME).entered();
        let mut guard = self.state.lock().expect("gurobi solver lock poisoned");
        let loaded = guard.as_mut().ok_or_else(|| solve_err("solve called before load"))?;
        loaded.model.optimize().map_err(solve_err)?;
        let status = loaded.model.status().map_err(solve_err)?;
        Ok(match status {
            Status::Optimal => SolverStatus::Optimal,
            Status::TimeLimit | Status::SolutionLimit => {
                if loaded.model.get_attr(attr::SolCount).unwrap_or(0) > 0 {
                    SolverStatus::Suboptimal
                } else {
                    SolverStatus::TimedOut
                }
            }
            Status::Infeasible | Status::InfOrUnbd => SolverStatus::Infeasible,
            other => return Err(solve_err(format!("unexpected Gurobi status: {other:?}"))),
        })
    }

    fn read_assignment(&self) -> SolverResult<HashMap<VariableId, f64>> {
        let guard = self.state.lock().expect("gurobi solver lock poisoned");
        let loaded = guard.as_ref().ok_or_else(|| read_err("read_assignment called before load"))?;
        let mut values = HashMap::with_capacity(loaded.vars.len());
        for (&id, var) in loaded.vars.iter() {
            let value = loaded
                .model
                .get_obj_attr(attr::X, var)
                .map_err(read_err)?;
            values.insert(id, value);
        }
        Ok(values)
    }
}

fn sense_of(sense: Sense) -> grb::ModelSense {
    match sense {
        Sense::Min => grb::ModelSense::Minimize,
        Sense::Max => grb::ModelSense::Maximize,
    }
}

fn build_linear_expr(
    vars: &HashMap<VariableId, Var>,
    terms: impl Iterator<Item = (VariableId, f64)>,
    constant: f64,
) -> SolverResult<Expr> {
    let mut expr = Expr::from(constant);
    for (id, coeff) in terms {
        let var = vars.get(&id).ok_or_else(|| load_err(format!("unknown variable id {id}")))?;
        expr = expr + *var * coeff;
    }
    Ok(expr)
}

fn build_quad_expr(vars: &HashMap<VariableId, Var>, expr: &gm_program::QuadExpr) -> SolverResult<QuadExpr> {
    let linear = build_linear_expr(vars, expr.linear.terms(), expr.linear.constant)?;
    let mut quad = QuadExpr::from(linear);
    for ((a, b), coeff) in expr.quad_terms() {
        let va = vars.get(&a).ok_or_else(|| load_err(format!("unknown variable id {a}")))?;
        let vb = vars.get(&b).ok_or_else(|| load_err(format!("unknown variable id {b}")))?;
        quad = quad + *va * *vb * coeff;
    }
    Ok(quad)
}
