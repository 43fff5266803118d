//! Job pool (C7): a fixed-size rayon worker pool that drives a queue of
//! graph pairs through the matcher (C6) and writes each objective into a
//! shared distance matrix, per spec.md §4.7 and §5.

use crate::job::{enumerate_pairs, BatchJob, BatchJobRecord};
use crate::manifest::{write_batch_manifest, BatchManifest};
use crate::matrix::DistanceMatrix;
use anyhow::Result;
use chrono::Utc;
use gm_core::graph::Graph;
use gm_core::problem::ProblemKind;
use gm_core::weights::WeightsConfig;
use gm_formulate::{FormulationConfig, FormulationRequest};
use gm_match::{run_match, CutStrategy, MatchRequest};
use gm_solver::{SolveConfig, SolverKind};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything the pool needs to drive a full batch of pairs to completion.
pub struct PoolConfig {
    pub query_graphs: Vec<Arc<Graph>>,
    pub target_graphs: Vec<Arc<Graph>>,
    /// Whether `query_graphs` and `target_graphs` are the same set, in
    /// which case only the upper triangle is enqueued and the lower
    /// triangle is filled by symmetry at finalization.
    pub same_set: bool,
    pub kind: ProblemKind,
    pub weights: WeightsConfig,
    pub formulation_request: FormulationRequest,
    pub formulation_config: FormulationConfig,
    pub solve_config: SolveConfig,
    pub cut_strategy: CutStrategy,
    pub solution_count: usize,
    pub solver_kind: SolverKind,
    /// Number of parallel workers (P).
    pub parallelism: usize,
    /// If set, the matrix and manifest are written under this directory.
    pub output_dir: Option<PathBuf>,
}

/// The finalized result of one batch run.
pub struct BatchOutcome {
    pub matrix: DistanceMatrix,
    pub manifest: BatchManifest,
}

fn run_one(job: &BatchJob, config: &PoolConfig, thread_budget: usize) -> Result<f64, String> {
    let query = config.query_graphs[job.query_index].clone();
    let target = config.target_graphs[job.target_index].clone();
    let solver = config.solver_kind.build_solver();

    let request = MatchRequest {
        kind: config.kind,
        query,
        target,
        weights: &config.weights,
        formulation_request: config.formulation_request,
        formulation_config: config.formulation_config,
        solve_config: SolveConfig {
            thread_count: thread_budget,
            ..config.solve_config
        },
        cut_strategy: config.cut_strategy,
        solution_count: config.solution_count,
        solver: solver.as_ref(),
    };

    run_match(request).map(|report| report.objective).map_err(|err| err.to_string())
}

/// Runs every enumerated pair through the matcher and returns the
/// finalized matrix and manifest. Per spec.md §4.7, aggregate thread
/// budget per worker is `max(1, totalThreads / P)`.
pub fn run_pool(config: PoolConfig) -> Result<BatchOutcome> {
    let _span = tracing::info_span!("batch.run", same_set = config.same_set).entered();
    let jobs = enumerate_pairs(config.query_graphs.len(), config.target_graphs.len(), config.same_set);
    let parallelism = config.parallelism.max(1);
    let thread_budget = (num_cpus::get() / parallelism).max(1);

    tracing::info!(
        jobs = jobs.len(),
        parallelism,
        thread_budget,
        "starting batch run"
    );

    let pool = ThreadPoolBuilder::new().num_threads(parallelism).build()?;
    let outcomes: Vec<(BatchJob, Result<f64, String>)> = pool.install(|| {
        jobs.par_iter()
            .map(|job| (*job, run_one(job, &config, thread_budget)))
            .collect()
    });

    let mut matrix = DistanceMatrix::new(config.query_graphs.len(), config.target_graphs.len());
    let mut records = Vec::with_capacity(outcomes.len());
    for (job, outcome) in outcomes {
        match outcome {
            Ok(objective) => {
                matrix.set(job.query_index, job.target_index, Some(objective));
                records.push(BatchJobRecord::ok(&job, objective));
            }
            Err(reason) => {
                tracing::warn!(pair = %crate::job::pair_id(&job), error = %reason, "batch job failed");
                matrix.set(job.query_index, job.target_index, None);
                records.push(BatchJobRecord::failed(&job, reason));
            }
        }
    }

    if config.same_set {
        matrix.symmetrize();
    }

    let kind = match config.kind {
        ProblemKind::Ged => "ged",
        ProblemKind::Sub => "sub",
    };
    let manifest = BatchManifest::new(kind, Utc::now(), records);

    if let Some(dir) = &config.output_dir {
        matrix.write_to_file(&dir.join("distance_matrix.json"))?;
        write_batch_manifest(&dir.join("batch_manifest.json"), &manifest)?;
    }

    Ok(BatchOutcome { matrix, manifest })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::graph::AttributeValue;
    use gm_core::weights::{WeightKind, WeightTable};
    use gm_formulate::GedFormulation;
    use gm_program::{Program, VariableId};
    use gm_solver::error::SolverResult;
    use gm_solver::registry::register_solver;
    use gm_solver::{SolverBackend, SolverStatus};
    use std::collections::HashMap;

    fn single_vertex_graph(label: &str) -> Arc<Graph> {
        let mut g = Graph::new(false);
        let v = g.add_vertex();
        g.set_vertex_attr(v, "label", AttributeValue::Symbol(label.into()));
        Arc::new(g)
    }

    /// Always reports every variable matched, independent of the program —
    /// enough to exercise the pool's fan-out and matrix writes without a
    /// real MIP back-end.
    #[derive(Debug, Default)]
    struct AlwaysMatchSolver;

    impl SolverBackend for AlwaysMatchSolver {
        fn name(&self) -> &'static str {
            "always-match"
        }
        fn load(&self, _program: &Program) -> SolverResult<()> {
            Ok(())
        }
        fn configure(&self, _config: SolveConfig) -> SolverResult<()> {
            Ok(())
        }
        fn solve(&self) -> SolverResult<SolverStatus> {
            Ok(SolverStatus::Optimal)
        }
        fn read_assignment(&self) -> SolverResult<HashMap<VariableId, f64>> {
            Ok(HashMap::new())
        }
    }

    #[test]
    fn batch_run_populates_every_cell_for_distinct_sets() {
        register_solver("always-match", || Arc::new(AlwaysMatchSolver));
        let query_graphs = vec![single_vertex_graph("a"), single_vertex_graph("b")];
        let target_graphs = vec![single_vertex_graph("a"), single_vertex_graph("b")];

        let mut weights = WeightsConfig::new();
        weights.vertex_substitution = WeightTable::new(0.0);
        weights.vertex_substitution.set("label", WeightKind::SymbolEquality, 1.0);

        let config = PoolConfig {
            query_graphs,
            target_graphs,
            same_set: false,
            kind: ProblemKind::Ged,
            weights,
            formulation_request: FormulationRequest::Ged(GedFormulation::Linear),
            formulation_config: FormulationConfig::default(),
            solve_config: SolveConfig::default(),
            cut_strategy: CutStrategy::Solution,
            solution_count: 1,
            solver_kind: "always-match".parse().unwrap(),
            parallelism: 2,
            output_dir: None,
        };

        let outcome = run_pool(config).unwrap();
        assert_eq!(outcome.manifest.num_jobs, 4);
        assert_eq!(outcome.manifest.success, 4);
    }

    #[test]
    fn same_set_enumeration_only_schedules_upper_triangle() {
        let jobs = enumerate_pairs(3, 3, true);
        assert_eq!(jobs.len(), 3);
    }

    /// Property 8: when both input sets are the same graphs, the emitted
    /// matrix is symmetric, end to end through `run_pool`'s `same_set`
    /// symmetrization, not just `DistanceMatrix::symmetrize` in isolation.
    #[test]
    fn same_set_run_produces_a_symmetric_matrix() {
        register_solver("always-match", || Arc::new(AlwaysMatchSolver));
        let graphs = vec![single_vertex_graph("a"), single_vertex_graph("b"), single_vertex_graph("c")];

        let mut weights = WeightsConfig::new();
        weights.vertex_substitution = WeightTable::new(0.0);
        weights.vertex_substitution.set("label", WeightKind::SymbolEquality, 1.0);

        let config = PoolConfig {
            query_graphs: graphs.clone(),
            target_graphs: graphs.clone(),
            same_set: true,
            kind: ProblemKind::Ged,
            weights,
            formulation_request: FormulationRequest::Ged(GedFormulation::Linear),
            formulation_config: FormulationConfig::default(),
            solve_config: SolveConfig::default(),
            cut_strategy: CutStrategy::Solution,
            solution_count: 1,
            solver_kind: "always-match".parse().unwrap(),
            parallelism: 2,
            output_dir: None,
        };

        let outcome = run_pool(config).unwrap();
        assert_eq!(outcome.manifest.num_jobs, 3);
        for i in 0..graphs.len() {
            for j in 0..graphs.len() {
                assert_eq!(outcome.matrix.get(i, j), outcome.matrix.get(j, i));
            }
        }
    }
}
