//! Core library for the adjustment-tools command line application.
//!
//! The library exposes the workbook transformations behind the command-line
//! interface as well as the integration tests. Responsibilities are kept
//! narrow: IO adapters live under [`adjustment::tools::io`], the in-memory
//! table representation inside [`adjustment::tools::model`], the sort and
//! highlight pipeline in [`adjustment::tools::pipeline`], the cost
//! summaries in [`adjustment::tools::summary`], and the
//! load-transform-save orchestration under [`adjustment::tools::sync`].

pub mod adjustment;

pub use adjustment::tools::{
    Result, ToolError, config, error, highlight, io, model, pipeline, purge, split, summary,
    sync,
};
