//! Streaming pipeline assembly and execution.
//!
//! Instances flow through typed stages: Reader → zero-or-more Filters →
//! Learner → Evaluator. The runner pulls one instance at a time and follows
//! the predict-before-learn protocol of online-learning evaluation.
//!
//! # Architecture
//!
//! ```text
//! [Reader] ──► [Filter]* ──► [Learner] ──► [Evaluator]
//!                               │ predict, then train
//! ```
//!
//! # Design
//!
//! - **One flat trait per category** — no inheritance chains; shared behavior
//!   lives in free functions and the runner.
//! - **Ownership transfers stage by stage** — each `Instance` is owned by one
//!   stage at a time; the pipeline owns its stages for the run's lifetime and
//!   `dismantle` hands them back (e.g. to reuse a trained learner).
//! - **Single-threaded cooperative loop** — no overlap between reader I/O,
//!   filter transforms, learner update, and evaluator accept.
//! - **Outbound snapshots** — periodic measure reports go out over a bounded
//!   crossbeam channel and never disturb the loop.

pub mod assembler;
pub mod error;
pub mod runner;
pub mod stage;

pub use assembler::{assemble, PipelineSpec, StageSpec};
pub use error::{PipelineError, PipelineResult, ReadError};
pub use runner::{
    report_channel, Pipeline, PipelineStages, RunReport, RunState, Runner, RunnerMessage,
};
pub use stage::{ComponentHandle, Evaluator, Filter, Learner, Reader};
