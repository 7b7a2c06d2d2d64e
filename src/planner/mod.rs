pub mod feasibility;
pub mod optimiser;
pub mod program;
pub mod relaxation;
pub mod report;

pub use feasibility::{ExcessIssue, FeasibilityReport, ShortfallIssue, analyse};
pub use optimiser::{CancellationToken, DietOptimiser, SearchOutcome};
pub use program::{DietProblem, build_program};
pub use relaxation::{RelaxationPolicy, Tolerances};
pub use report::format_plan;
