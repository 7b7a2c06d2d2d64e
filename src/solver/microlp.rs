//! Pure-Rust MILP backend via good_lp's microlp solver.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use good_lp::solvers::microlp::microlp;
use good_lp::{
    Expression, ResolutionError, Solution, SolverModel, constraint, variable, variables,
};
use tracing::warn;

use super::{
    ConstraintSense, DietProgram, MilpSolver, ProgramSolution, SolverError, VariableKind,
};

/// Timed-out solves allowed to keep running before new solves are refused.
pub const DEFAULT_MAX_DETACHED: usize = 1;

const RUNNING: u8 = 0;
const FINISHED: u8 = 1;
const ABANDONED: u8 = 2;

/// microlp-based LP/MILP solver with an optional per-call time limit.
///
/// microlp cannot be interrupted, so a solve that outlives its limit keeps
/// its thread until it finishes. While `max_detached` of those are still
/// running, further solves fail fast with `Timeout` instead of spawning.
#[derive(Debug, Clone)]
pub struct MicroLpSolver {
    timeout: Option<Duration>,
    max_detached: usize,
    detached: Arc<AtomicUsize>,
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::with_timeout(None)
    }
}

impl MicroLpSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up on any single solve after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            max_detached: DEFAULT_MAX_DETACHED,
            detached: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Cap on abandoned solves still running. Zero is treated as one.
    pub fn with_max_detached(mut self, max_detached: usize) -> Self {
        self.max_detached = max_detached.max(1);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Timed-out solves whose threads have not finished yet.
    pub fn detached_solves(&self) -> usize {
        self.detached.load(Ordering::SeqCst)
    }

    /// Run the solve on a worker thread and stop waiting after `limit`.
    fn solve_with_deadline(
        &self,
        program: &DietProgram,
        limit: Duration,
    ) -> Result<ProgramSolution, SolverError> {
        let detached = self.detached_solves();
        if detached >= self.max_detached {
            warn!(detached, "Earlier timed-out solves still running, skipping");
            return Err(SolverError::Timeout(limit));
        }

        let state = Arc::new(AtomicU8::new(RUNNING));
        let guard = WorkerGuard {
            state: Arc::clone(&state),
            detached: Arc::clone(&self.detached),
        };
        let program = program.clone();
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("microlp-solve".to_string())
            .spawn(move || {
                let _guard = guard;
                let _ = tx.send(solve_with_good_lp(&program));
            })
            .map_err(|e| SolverError::Backend(e.to_string()))?;

        match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                self.detached.fetch_add(1, Ordering::SeqCst);
                if state
                    .compare_exchange(RUNNING, ABANDONED, Ordering::SeqCst, Ordering::SeqCst)
                    .is_err()
                {
                    // Finished after the deadline but before we gave up on it.
                    self.detached.fetch_sub(1, Ordering::SeqCst);
                    if let Ok(result) = rx.try_recv() {
                        return result;
                    }
                }
                warn!(?limit, "Solve timed out");
                Err(SolverError::Timeout(limit))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(SolverError::Backend(
                "solver thread exited without a result".to_string(),
            )),
        }
    }
}

impl MilpSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, program: &DietProgram) -> Result<ProgramSolution, SolverError> {
        match self.timeout {
            None => solve_with_good_lp(program),
            Some(limit) => self.solve_with_deadline(program, limit),
        }
    }
}

/// Releases the detached slot when an abandoned worker ends, even by panic.
struct WorkerGuard {
    state: Arc<AtomicU8>,
    detached: Arc<AtomicUsize>,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if self.state.swap(FINISHED, Ordering::SeqCst) == ABANDONED {
            self.detached.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

fn solve_with_good_lp(program: &DietProgram) -> Result<ProgramSolution, SolverError> {
    if program.num_vars() == 0 {
        return Ok(ProgramSolution {
            values: vec![],
            objective: 0.0,
        });
    }

    let mut vars = variables!();
    let mut handles = Vec::with_capacity(program.num_vars());

    for spec in &program.variables {
        let mut v = variable().name(spec.name.clone());
        match spec.kind {
            VariableKind::Binary => v = v.binary(),
            VariableKind::Integer | VariableKind::Continuous => {
                if spec.kind == VariableKind::Integer {
                    v = v.integer();
                }
                v = v.min(spec.lower);
                if spec.upper.is_finite() {
                    v = v.max(spec.upper);
                }
            }
        }
        handles.push(vars.add(v));
    }

    let objective: Expression = handles
        .iter()
        .zip(program.objective.iter())
        .map(|(v, c)| *c * *v)
        .sum();

    let mut model = vars.minimise(&objective).using(microlp);

    for c in &program.constraints {
        let lhs: Expression = c
            .terms
            .iter()
            .filter_map(|&(i, coef)| handles.get(i).map(|v| coef * *v))
            .sum();
        let rhs = c.rhs;

        model = match c.sense {
            ConstraintSense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
            ConstraintSense::LessEqual => model.with(constraint!(lhs <= rhs)),
            ConstraintSense::Equal => model.with(constraint!(lhs == rhs)),
        };
    }

    match model.solve() {
        Ok(solution) => {
            let values: Vec<f64> = handles.iter().map(|v| solution.value(*v)).collect();
            let objective = values
                .iter()
                .zip(program.objective.iter())
                .map(|(v, c)| v * c)
                .sum();
            Ok(ProgramSolution { values, objective })
        }
        Err(ResolutionError::Infeasible) => Err(SolverError::Infeasible),
        Err(ResolutionError::Unbounded) => Err(SolverError::Unbounded),
        Err(other) => Err(SolverError::Backend(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{LinearConstraint, VariableSpec};

    #[test]
    fn test_solver_name() {
        assert_eq!(MicroLpSolver::new().name(), "microlp");
    }

    #[test]
    fn test_simple_lp() {
        // Minimise x + 2y subject to x + y >= 1.
        let program = DietProgram {
            variables: vec![
                VariableSpec::continuous("x", 0.0, f64::INFINITY),
                VariableSpec::continuous("y", 0.0, f64::INFINITY),
            ],
            objective: vec![1.0, 2.0],
            constraints: vec![LinearConstraint::geq("cover", vec![(0, 1.0), (1, 1.0)], 1.0)],
        };

        let solution = MicroLpSolver::new().solve(&program).unwrap();
        assert!((solution.values[0] - 1.0).abs() < 1e-6);
        assert!(solution.values[1].abs() < 1e-6);
        assert!((solution.objective - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_integer_rounds_up() {
        // Minimise x subject to x >= 1.5, x integer.
        let program = DietProgram {
            variables: vec![VariableSpec::integer("x", 0.0, 10.0)],
            objective: vec![1.0],
            constraints: vec![LinearConstraint::geq("min", vec![(0, 1.0)], 1.5)],
        };

        let solution = MicroLpSolver::new().solve(&program).unwrap();
        assert!((solution.values[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_binary_equality() {
        let program = DietProgram {
            variables: vec![VariableSpec::binary("used")],
            objective: vec![1.0],
            constraints: vec![LinearConstraint::eq("forced", vec![(0, 1.0)], 1.0)],
        };

        let solution = MicroLpSolver::new().solve(&program).unwrap();
        assert!((solution.values[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible() {
        let program = DietProgram {
            variables: vec![VariableSpec::continuous("x", 0.0, 1.0)],
            objective: vec![1.0],
            constraints: vec![LinearConstraint::geq("too_much", vec![(0, 1.0)], 5.0)],
        };

        let err = MicroLpSolver::new().solve(&program).unwrap_err();
        assert_eq!(err, SolverError::Infeasible);
    }

    #[test]
    fn test_timeout_wrapper_returns_result() {
        let program = DietProgram {
            variables: vec![VariableSpec::continuous("x", 2.0, 3.0)],
            objective: vec![1.0],
            constraints: vec![],
        };

        let solver = MicroLpSolver::with_timeout(Some(Duration::from_secs(30)));
        let solution = solver.solve(&program).unwrap();
        assert!((solution.values[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_program() {
        let solution = MicroLpSolver::new().solve(&DietProgram::default()).unwrap();
        assert!(solution.values.is_empty());
    }

    /// Σ 2·x_i = 101 has no integer solution, and branch and bound takes
    /// far longer than a millisecond to prove it.
    fn parity_program() -> DietProgram {
        let n = 30;
        DietProgram {
            variables: (0..n)
                .map(|i| VariableSpec::integer(format!("x{}", i), 0.0, 10.0))
                .collect(),
            objective: vec![1.0; n],
            constraints: vec![LinearConstraint::eq(
                "odd",
                (0..n).map(|i| (i, 2.0)).collect(),
                101.0,
            )],
        }
    }

    #[test]
    fn test_deadline_expires_and_abandoned_solves_stay_bounded() {
        let limit = Duration::from_millis(1);
        let solver = MicroLpSolver::with_timeout(Some(limit));
        let program = parity_program();

        for _ in 0..20 {
            assert_eq!(solver.solve(&program), Err(SolverError::Timeout(limit)));
            assert!(solver.detached_solves() <= DEFAULT_MAX_DETACHED);
        }
    }

    #[test]
    fn test_finished_worker_releases_its_slot() {
        let state = Arc::new(AtomicU8::new(ABANDONED));
        let detached = Arc::new(AtomicUsize::new(1));
        drop(WorkerGuard {
            state: Arc::clone(&state),
            detached: Arc::clone(&detached),
        });
        assert_eq!(detached.load(Ordering::SeqCst), 0);
        assert_eq!(state.load(Ordering::SeqCst), FINISHED);

        // A worker nobody gave up on leaves the count alone.
        let state = Arc::new(AtomicU8::new(RUNNING));
        drop(WorkerGuard {
            state,
            detached: Arc::clone(&detached),
        });
        assert_eq!(detached.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_max_detached_means_one() {
        let solver =
            MicroLpSolver::with_timeout(Some(Duration::from_secs(1))).with_max_detached(0);
        assert_eq!(solver.max_detached, 1);
    }
}
