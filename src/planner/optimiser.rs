use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::{debug, info};

use crate::models::DietPlan;
use crate::planner::program::{DietProblem, build_program};
use crate::planner::relaxation::{RelaxationPolicy, Tolerances};
use crate::planner::report::format_plan;
use crate::solver::{MilpSolver, ProgramSolution, SolverError};

/// Cooperative stop signal for a running search.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a relaxation search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The least-relaxed combination that solved.
    Optimised(DietPlan),
    /// Every combination failed.
    Exhausted,
    /// Stopped by the caller before a solution was found.
    Aborted,
}

impl SearchOutcome {
    pub fn plan(self) -> Option<DietPlan> {
        match self {
            SearchOutcome::Optimised(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Least-cost search over macro-goal relaxations.
pub struct DietOptimiser {
    solver: Arc<dyn MilpSolver>,
    policy: RelaxationPolicy,
    workers: usize,
}

impl DietOptimiser {
    pub fn new(solver: Arc<dyn MilpSolver>, policy: RelaxationPolicy) -> Self {
        Self {
            solver,
            policy,
            workers: 1,
        }
    }

    /// Solve up to `workers` combinations at a time. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn policy(&self) -> &RelaxationPolicy {
        &self.policy
    }

    /// Visit tolerance combinations in ascending-sum order and return the
    /// first one the solver accepts. Only macro axes with a goal are relaxed.
    ///
    /// A failed or timed-out solve moves the search on to the next combination.
    ///
    /// With several workers, combinations are solved in consecutive batches
    /// and the earliest success in search order wins, so the result is the
    /// same as a sequential search.
    pub fn optimise(&self, problem: &DietProblem<'_>, cancel: &CancellationToken) -> SearchOutcome {
        let combos = self.policy.combinations_for(problem.goals);
        info!(
            solver = self.solver.name(),
            foods = problem.len(),
            combinations = combos.len(),
            workers = self.workers,
            "Starting relaxation search"
        );

        for batch in combos.chunks(self.workers) {
            if cancel.is_cancelled() {
                info!("Relaxation search aborted");
                return SearchOutcome::Aborted;
            }

            let results = self.solve_batch(problem, batch);
            for (tolerances, result) in batch.iter().zip(results) {
                match result {
                    Ok(solution) => {
                        info!(
                            tolerances = ?tolerances.values(),
                            total_overflow = tolerances.sum(),
                            cost = solution.objective,
                            "Found feasible diet"
                        );
                        return SearchOutcome::Optimised(format_plan(
                            problem,
                            &solution.values,
                            tolerances,
                        ));
                    }
                    Err(e) => {
                        debug!(tolerances = ?tolerances.values(), error = %e, "Combination failed");
                    }
                }
            }
        }

        info!("No tolerance combination produced a feasible diet");
        SearchOutcome::Exhausted
    }

    fn solve_batch(
        &self,
        problem: &DietProblem<'_>,
        batch: &[Tolerances],
    ) -> Vec<Result<ProgramSolution, SolverError>> {
        if batch.len() == 1 {
            return batch.iter().map(|t| self.solve_one(problem, t)).collect();
        }

        thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|t| scope.spawn(move || self.solve_one(problem, t)))
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join().unwrap_or_else(|_| {
                        Err(SolverError::Backend("solver worker panicked".to_string()))
                    })
                })
                .collect()
        })
    }

    fn solve_one(
        &self,
        problem: &DietProblem<'_>,
        tolerances: &Tolerances,
    ) -> Result<ProgramSolution, SolverError> {
        let program = build_program(problem, tolerances);
        self.solver.solve(&program)
    }
}
