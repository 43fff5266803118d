//! GLPK back-end, built directly on the `glpk-sys` FFI bindings (GLPK has
//! no native Rust wrapper in the ecosystem with a stable quadratic API, so
//! this back-end only ever loads linear programs).

use crate::backend::{SolveConfig, SolverBackend, SolverStatus};
use crate::error::{SolverError, SolverResult};
use gm_program::{Program, Relation, Sense, VariableId, VariableKind};
use libc::c_int;
use std::collections::HashMap;
use std::sync::Mutex;

const NAME: &str = "glpk";

// GLPK row/column bound kinds.
const GLP_FX: c_int = 5;
const GLP_DB: c_int = 4;
const GLP_UP: c_int = 3;
const GLP_LO: c_int = 2;
const GLP_FR: c_int = 1;

// GLPK variable kinds.
const GLP_CV: c_int = 1;
const GLP_IV: c_int = 2;
const GLP_BV: c_int = 3;

// GLPK optimization directions.
const GLP_MIN: c_int = 1;
const GLP_MAX: c_int = 2;

// GLPK MIP solution statuses (glp_mip_status).
const GLP_UNDEF: c_int = 1;
const GLP_OPT: c_int = 5;
const GLP_FEAS: c_int = 2;
const GLP_NOFEAS: c_int = 4;

fn init_err(reason: impl std::fmt::Display) -> SolverError {
    SolverError::Initialization { backend: NAME, reason: reason.to_string() }
}

fn load_err(reason: impl std::fmt::Display) -> SolverError {
    SolverError::Load { backend: NAME, reason: reason.to_string() }
}

fn solve_err(reason: impl std::fmt::Display) -> SolverError {
    SolverError::Solve { backend: NAME, reason: reason.to_string() }
}

fn read_err(reason: impl std::fmt::Display) -> SolverError {
    SolverError::ReadAssignment { backend: NAME, reason: reason.to_string() }
}

/// Owns the raw `glp_prob*` handle; dropped through `glp_delete_prob`.
struct ProblemHandle {
    raw: *mut glpk_sys::glp_prob,
    /// variable id -> 1-based GLPK column index.
    columns: HashMap<VariableId, c_int>,
}

unsafe impl Send for ProblemHandle {}

impl Drop for ProblemHandle {
    fn drop(&mut self) {
        unsafe { glpk_sys::glp_delete_prob(self.raw) };
    }
}

#[derive(Default)]
pub struct GlpkSolver {
    state: Mutex<Option<ProblemHandle>>,
    config: Mutex<SolveConfig>,
}

impl std::fmt::Debug for GlpkSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlpkSolver").finish()
    }
}

impl SolverBackend for GlpkSolver {
    fn name(&self) -> &'static str {
        NAME
    }

    fn load(&self, program: &Program) -> SolverResult<()> {
        if !program.is_linear() {
            return Err(load_err("GLPK back-end only supports linear programs; use F1 or F4, not F2"));
        }

        let mut ordered: Vec<_> = program.variables().collect();
        ordered.sort_by_key(|v| v.id);

        let raw = unsafe { glpk_sys::glp_create_prob() };
        if raw.is_null() {
            return Err(init_err("glp_create_prob returned null"));
        }
        let mut handle = ProblemHandle {
            raw,
            columns: HashMap::with_capacity(ordered.len()),
        };

        unsafe {
            glpk_sys::glp_set_obj_dir(handle.raw, sense_of(program.sense));
            glpk_sys::glp_add_cols(handle.raw, ordered.len() as c_int);
            for (i, variable) in ordered.iter().enumerate() {
                let col = (i + 1) as c_int;
                handle.columns.insert(variable.id, col);
                let (kind, bound_kind) = match variable.kind {
                    VariableKind::Binary => (GLP_BV, GLP_DB),
                    VariableKind::BoundedInteger => (GLP_IV, bound_kind_for(variable.lower, variable.upper)),
                    VariableKind::Continuous => (GLP_CV, bound_kind_for(variable.lower, variable.upper)),
                };
                glpk_sys::glp_set_col_kind(handle.raw, col, kind);
                glpk_sys::glp_set_col_bnds(handle.raw, col, bound_kind, variable.lower, variable.upper);
                glpk_sys::glp_set_obj_coef(handle.raw, col, program.objective().linear.coefficient(variable.id));
            }

            let constraints = program.linear_constraints();
            glpk_sys::glp_add_rows(handle.raw, constraints.len() as c_int);
            let mut ia = vec![0i32];
            let mut ja = vec![0i32];
            let mut ar = vec![0f64];
            for (i, constraint) in constraints.iter().enumerate() {
                let row = (i + 1) as c_int;
                let (bound_kind, lo, hi) = match constraint.relation {
                    Relation::Eq => (GLP_FX, constraint.rhs, constraint.rhs),
                    Relation::Le => (GLP_UP, 0.0, constraint.rhs),
                    Relation::Ge => (GLP_LO, constraint.rhs, 0.0),
                };
                glpk_sys::glp_set_row_bnds(handle.raw, row, bound_kind, lo, hi);
                for (var_id, coeff) in constraint.expr.terms() {
                    let col = *handle
                        .columns
                        .get(&var_id)
                        .ok_or_else(|| load_err(format!("unknown variable id {var_id}")))?;
                    ia.push(row);
                    ja.push(col);
                    ar.push(coeff);
                }
            }
            glpk_sys::glp_load_matrix(handle.raw, (ia.len() - 1) as c_int, ia.as_ptr(), ja.as_ptr(), ar.as_ptr());
        }

        *self.state.lock().expect("glpk solver lock poisoned") = Some(handle);
        Ok(())
    }

    fn configure(&self, config: SolveConfig) -> SolverResult<()> {
        *self.config.lock().expect("glpk config lock poisoned") = config;
        Ok(())
    }

    fn solve(&self) -> SolverResult<SolverStatus> {
        let _span = tracing::info_span!("solver.solve", backend = NAME).entered();
        let guard = self.state.lock().expect("glpk solver lock poisoned");
        let handle = guard.as_ref().ok_or_else(|| solve_err("solve called before load"))?;
        let config = *self.config.lock().expect("glpk config lock poisoned");

        let mut params = unsafe {
            let mut p: glpk_sys::glp_iocp = std::mem::zeroed();
            glpk_sys::glp_init_iocp(&mut p);
            p
        };
        params.presolve = 1;
        params.tm_lim = (config.time_limit_seconds * 1000.0) as c_int;

        let ret = unsafe { glpk_sys::glp_intopt(handle.raw, &mut params) };
        if ret != 0 {
            return Err(solve_err(format!("glp_intopt returned code {ret}")));
        }
        let status = unsafe { glpk_sys::glp_mip_status(handle.raw) };
        Ok(match status {
            GLP_OPT => SolverStatus::Optimal,
            GLP_FEAS => SolverStatus::Suboptimal,
            GLP_NOFEAS => SolverStatus::Infeasible,
            GLP_UNDEF => SolverStatus::TimedOut,
            other => return Err(solve_err(format!("unexpected GLPK status code {other}"))),
        })
    }

    fn read_assignment(&self) -> SolverResult<HashMap<VariableId, f64>> {
        let guard = self.state.lock().expect("glpk solver lock poisoned");
        let handle = guard.as_ref().ok_or_else(|| read_err("read_assignment called before load"))?;
        let mut values = HashMap::with_capacity(handle.columns.len());
        for (&id, &col) in handle.columns.iter() {
            let value = unsafe { glpk_sys::glp_mip_col_val(handle.raw, col) };
            values.insert(id, value);
        }
        Ok(values)
    }
}

fn bound_kind_for(lower: f64, upper: f64) -> c_int {
    if lower == upper {
        GLP_FX
    } else if lower.is_finite() && upper.is_finite() {
        GLP_DB
    } else if lower.is_finite() {
        GLP_LO
    } else if upper.is_finite() {
        GLP_UP
    } else {
        GLP_FR
    }
}

fn sense_of(sense: Sense) -> c_int {
    match sense {
        Sense::Min => GLP_MIN,
        Sense::Max => GLP_MAX,
    }
}
