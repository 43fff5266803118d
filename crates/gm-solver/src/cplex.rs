//! CPLEX back-end. No native CPLEX Rust binding exists in the ecosystem;
//! this shells out to the `cplex` interactive executable and parses the
//! `.sol` file it writes, the way `rust-or-lp-solvers`'s Cplex solver does.

use crate::backend::{SolveConfig, SolverBackend, SolverStatus};
use crate::error::{SolverError, SolverResult};
use gm_program::lp::to_lp_string;
use gm_program::{Program, VariableId};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::Write;
use std::process::Command;
use std::sync::Mutex;
use tempfile::NamedTempFile;

const NAME: &str = "cplex";

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

struct Loaded {
    lp_text: String,
    /// variable name (as emitted into the LP file) -> id, for read-back.
    name_to_id: HashMap<String, VariableId>,
    /// populated by `solve` once a `.sol` file has been parsed.
    assignment: HashMap<VariableId, f64>,
}

pub struct CplexSolver {
    command: String,
    state: Mutex<Option<Loaded>>,
    config: Mutex<SolveConfig>,
}

impl Default for CplexSolver {
    fn default() -> Self {
        CplexSolver {
            command: "cplex".to_string(),
            state: Mutex::new(None),
            config: Mutex::new(SolveConfig::default()),
        }
    }
}

impl std::fmt::Debug for CplexSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CplexSolver").field("command", &self.command).finish()
    }
}

impl CplexSolver {
    pub fn with_command(command: impl Into<String>) -> Self {
        CplexSolver {
            command: command.into(),
            ..CplexSolver::default()
        }
    }
}

impl SolverBackend for CplexSolver {
    fn name(&self) -> &'static str {
        NAME
    }

    fn load(&self, program: &Program) -> SolverResult<()> {
        let name_to_id = program
            .variables()
            .map(|v| (v.name.clone(), v.id))
            .collect::<HashMap<_, _>>();
        if name_to_id.len() != program.variable_count() {
            return Err(load_err("variable names must be unique for CPLEX round-trip"));
        }
        *self.state.lock().expect("cplex solver lock poisoned") = Some(Loaded {
            lp_text: to_lp_string(program),
            name_to_id,
            assignment: HashMap::new(),
        });
        Ok(())
    }

    fn configure(&self, config: SolveConfig) -> SolverResult<()> {
        *self.config.lock().expect("cplex config lock poisoned") = config;
        Ok(())
    }

    fn solve(&self) -> SolverResult<SolverStatus> {
        let _span = tracing::info_span!("solver.solve", backend = NAME).entered();
        let mut guard = self.state.lock().expect("cplex solver lock poisoned");
        let loaded = guard.as_mut().ok_or_else(|| solve_err("solve called before load"))?;
        let config = *self.config.lock().expect("cplex config lock poisoned");

        let mut lp_file = NamedTempFile::new().map_err(|e| init_err(e.to_string()))?;
        lp_file
            .write_all(loaded.lp_text.as_bytes())
            .map_err(|e| init_err(e.to_string()))?;
        let sol_path = lp_file.path().with_extension("sol");

        let script = format!(
            "READ \"{}\"\nset timelimit {}\nset threads {}\noptimize\nWRITE \"{}\"\nquit",
            lp_file.path().display(),
            config.time_limit_seconds,
            config.thread_count,
            sol_path.display(),
        );

        let output = Command::new(&self.command)
            .arg("-c")
            .arg(&script)
            .output()
            .map_err(|e| init_err(format!("failed to launch '{}': {e}", self.command)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.contains("No solution exists") || stdout.contains("infeasible") {
            return Ok(SolverStatus::Infeasible);
        }
        if !sol_path.exists() {
            return Err(solve_err(format!(
                "cplex produced no solution file; stdout: {stdout}"
            )));
        }

        let status = if stdout.contains("time limit exceeded") {
            SolverStatus::Suboptimal
        } else {
            SolverStatus::Optimal
        };

        loaded.assignment = parse_sol_file(&sol_path, &loaded.name_to_id)?;
        let _ = std::fs::remove_file(&sol_path);
        Ok(status)
    }

    fn read_assignment(&self) -> SolverResult<HashMap<VariableId, f64>> {
        let guard = self.state.lock().expect("cplex solver lock poisoned");
        let loaded = guard
            .as_ref()
            .ok_or_else(|| read_err("read_assignment called before a successful solve"))?;
        Ok(loaded.assignment.clone())
    }
}

fn parse_sol_file(path: &std::path::Path, name_to_id: &HashMap<String, VariableId>) -> SolverResult<HashMap<VariableId, f64>> {
    let file = std::fs::File::open(path).map_err(|e| read_err(e.to_string()))?;
    let reader_inner = std::io::BufReader::new(file);
    let mut reader = Reader::from_reader(reader_inner);
    let mut buf = Vec::new();
    let mut values = HashMap::with_capacity(name_to_id.len());

    loop {
        match reader.read_event_into(&mut buf).map_err(|e| read_err(e.to_string()))? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"variable" => {
                let (name, value) = extract_variable(e)?;
                if let Some(&id) = name_to_id.get(&name) {
                    values.insert(id, value);
                }
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(values)
}

fn extract_variable(tag: BytesStart) -> SolverResult<(String, f64)> {
    let mut name = None;
    let mut value = None;
    for attribute in tag.attributes() {
        let attribute = attribute.map_err(|e| read_err(format!("attribute error: {e}")))?;
        match attribute.key.as_ref() {
            b"name" => name = Some(String::from_utf8_lossy(attribute.value.as_ref()).to_string()),
            b"value" => {
                value = Some(
                    String::from_utf8_lossy(attribute.value.as_ref())
                        .parse::<f64>()
                        .map_err(|e| read_err(format!("invalid variable value: {e}")))?,
                );
            }
            _ => {}
        }
    }
    name.zip(value).ok_or_else(|| read_err("name and value not found for variable"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SOL: &str = r##"<?xml version="1.0" standalone="yes"?>
<CPLEXSolution version="1.2">
 <variables>
  <variable name="x0_0" index="0" value="1"/>
  <variable name="x0_1" index="1" value="0"/>
 </variables>
</CPLEXSolution>"##;

    #[test]
    fn sol_file_parsing_maps_names_back_to_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_SOL.as_bytes()).unwrap();
        let mut name_to_id = HashMap::new();
        name_to_id.insert("x0_0".to_string(), 10);
        name_to_id.insert("x0_1".to_string(), 11);
        let values = parse_sol_file(file.path(), &name_to_id).unwrap();
        assert_eq!(values.get(&10), Some(&1.0));
        assert_eq!(values.get(&11), Some(&0.0));
    }
}
