//! Parallel compilation of independent libraries.
//!
//! A library's run is pure given its already-compiled dependencies, so
//! libraries that do not depend on each other can be compiled concurrently.
//! Passes within one library still run sequentially. Ordering libraries by
//! dependency is up to the caller.

use crate::config::CompilerOptions;
use crate::pipeline::{CompiledLibrary, LibraryInput, Pipeline};
use anyhow::Result;
use rayon::prelude::*;
use tracing::info;

/// Compile every input on the rayon pool. Results come back in input order;
/// one library failing does not stop the others.
pub fn compile_batch(
    options: &CompilerOptions,
    inputs: &[LibraryInput],
) -> Vec<Result<CompiledLibrary>> {
    let pipeline = Pipeline::new(options.clone());
    let results: Vec<Result<CompiledLibrary>> = inputs
        .par_iter()
        .map(|input| pipeline.compile(input))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(libraries = inputs.len(), failed, "batch compiled");
    results
}
