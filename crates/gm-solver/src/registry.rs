//! Static registry of solver back-ends (C2), keyed by name.
//!
//! Dynamic plugin loading is not required: every back-end this crate knows
//! about is compiled in behind a feature flag and registered once, at
//! first use, keyed by name in a process-wide static map.

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{Arc, RwLock},
};

use super::backend::SolverBackend;

#[cfg(feature = "gurobi")]
use crate::gurobi::GurobiSolver;
#[cfg(feature = "glpk")]
use crate::glpk::GlpkSolver;
#[cfg(feature = "cplex")]
use crate::cplex::CplexSolver;

type SolverConstructor = fn() -> Arc<dyn SolverBackend>;

struct SolverEntry {
    canonical: &'static str,
    constructor: SolverConstructor,
}

struct SolverRegistry {
    entries: HashMap<String, SolverEntry>,
}

impl SolverRegistry {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn register(&mut self, name: &'static str, constructor: SolverConstructor) -> bool {
        let key = normalize(name);
        let entry = SolverEntry {
            canonical: name,
            constructor,
        };
        self.entries.insert(key, entry).is_none()
    }

    fn entry_for(&self, name: &str) -> Option<&SolverEntry> {
        let key = normalize(name);
        self.entries.get(&key)
    }

    fn constructor_for(&self, canonical: &'static str) -> Option<SolverConstructor> {
        self.entries
            .values()
            .find(|entry| entry.canonical == canonical)
            .map(|entry| entry.constructor)
    }

    fn available(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.entries.values().map(|entry| entry.canonical).collect();
        names.sort_unstable();
        names
    }
}

static GLOBAL_SOLVER_REGISTRY: Lazy<RwLock<SolverRegistry>> = Lazy::new(|| {
    let mut registry = SolverRegistry::new();
    #[cfg(feature = "gurobi")]
    registry.register("gurobi", || Arc::new(GurobiSolver::default()));
    #[cfg(feature = "cplex")]
    registry.register("cplex", || Arc::new(CplexSolver::default()));
    #[cfg(feature = "glpk")]
    registry.register("glpk", || Arc::new(GlpkSolver::default()));
    RwLock::new(registry)
});

fn normalize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "default" => "gurobi".to_string(),
        other => other.to_string(),
    }
}

/// Allows registering additional solver constructors.
pub fn register_solver(name: &'static str, constructor: SolverConstructor) -> bool {
    let mut registry = GLOBAL_SOLVER_REGISTRY
        .write()
        .expect("solver registry lock poisoned");
    registry.register(name, constructor)
}

/// Data-driven solver identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverKind(&'static str);

impl SolverKind {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn available() -> Vec<&'static str> {
        let registry = GLOBAL_SOLVER_REGISTRY
            .read()
            .expect("solver registry lock poisoned");
        registry.available()
    }

    pub fn build_solver(&self) -> Arc<dyn SolverBackend> {
        let registry = GLOBAL_SOLVER_REGISTRY
            .read()
            .expect("solver registry lock poisoned");
        registry
            .constructor_for(self.0)
            .map(|constructor| constructor())
            .expect("solver constructor missing for registered kind")
    }
}

impl Default for SolverKind {
    fn default() -> Self {
        SolverKind("gurobi")
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for SolverKind {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let registry = GLOBAL_SOLVER_REGISTRY
            .read()
            .expect("solver registry lock poisoned");
        if let Some(entry) = registry.entry_for(input) {
            Ok(SolverKind(entry.canonical))
        } else {
            Err(anyhow!(
                "unknown solver '{}'; supported values: {}",
                input,
                registry.available().join(", ")
            ))
        }
    }
}
