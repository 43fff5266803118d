//! Solver-neutral intermediate representation for binary and quadratic
//! integer programs: variables, expressions, constraints, and a serializable
//! [`Program`](program::Program). The formulation engine builds a `Program`
//! per matching instance; the solver abstraction lowers it to a back-end.
//!
//! ## Quick start
//!
//! ```
//! use gm_program::constraint::Relation;
//! use gm_program::expr::LinearExpr;
//! use gm_program::program::{Program, Sense};
//!
//! let mut program = Program::new_linear(Sense::Min);
//! let x = program.add_binary("x0_0");
//! let y = program.add_binary("x0_1");
//! program.set_objective(LinearExpr::term(x, 2.0));
//! program.add_linear_constraint(LinearExpr::sum([x, y]), Relation::Le, 1.0);
//! assert_eq!(program.variable_count(), 2);
//! ```

pub mod constraint;
pub mod expr;
pub mod lp;
pub mod program;
pub mod variable;

pub use constraint::{ConstraintId, Relation};
pub use expr::{LinearExpr, QuadExpr};
pub use program::{Program, Sense};
pub use variable::{Variable, VariableId, VariableKind};
