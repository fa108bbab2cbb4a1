//! Batch validation and report caching.
//!
//! Scene `i` of a batch is validated with scenes `0..i` as its continuity context. Each call owns
//! its inputs, so with `advanced.parallel_processing` the batch runs on a worker pool with no
//! shared mutable state; reports are still returned in input order.

pub(crate) mod cache;

use crate::foundation::error::{SceneError, SceneResult};
use crate::report::validation::ValidationReport;
use crate::scene::model::Scene;
use crate::validate::Validator;
use crate::validate::continuity::ContinuityContext;
use rayon::prelude::*;

impl Validator {
    /// Validate an ordered batch of scenes.
    ///
    /// Fails only when the worker pool cannot be built.
    #[tracing::instrument(skip_all, fields(scenes = scenes.len()))]
    pub fn validate_batch(&self, scenes: &[Scene]) -> SceneResult<Vec<ValidationReport>> {
        let advanced = &self.config().advanced;
        if !advanced.parallel_processing || scenes.len() < 2 {
            return Ok(scenes
                .iter()
                .enumerate()
                .map(|(i, scene)| self.validate_in_context(scene, &ContinuityContext::new(&scenes[..i])))
                .collect());
        }

        let pool = build_thread_pool(advanced.max_workers)?;
        let reports = pool.install(|| {
            (0..scenes.len())
                .into_par_iter()
                .map(|i| self.validate_in_context(&scenes[i], &ContinuityContext::new(&scenes[..i])))
                .collect::<Vec<_>>()
        });
        tracing::info!(
            workers = advanced.max_workers,
            failed = reports.iter().filter(|r| !r.pass).count(),
            "batch validated"
        );
        Ok(reports)
    }
}

fn build_thread_pool(threads: usize) -> SceneResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(SceneError::config("advanced.max_workers must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("sceneval-worker-{i}"))
        .build()
        .map_err(|e| SceneError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/mod.rs"]
mod tests;
