use crate::config::ValidatorConfig;
use crate::report::validation::ValidationReport;
use crate::scene::model::Scene;
use crate::validate::continuity::ContinuityContext;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5ce7_e0a1_d8c3_94b2;

/// Stable 128-bit fingerprint of one validation input (scene, prior context, configuration).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Time-bounded memo of validation reports keyed by [`InputFingerprint`].
#[derive(Debug)]
pub struct ReportCache {
    ttl: Duration,
    entries: Mutex<HashMap<InputFingerprint, (Instant, ValidationReport)>>,
}

impl ReportCache {
    /// Create an empty cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fingerprint the inputs of one validation call.
    ///
    /// Returns `None` when an input cannot be serialized; such calls are not cached.
    pub fn fingerprint(
        scene: &Scene,
        ctx: &ContinuityContext<'_>,
        config: &ValidatorConfig,
    ) -> Option<InputFingerprint> {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        write_json(&mut h, config)?;
        write_json(&mut h, scene)?;
        h.update(&(ctx.prior_scenes().len() as u64).to_le_bytes());
        for prior in ctx.prior_scenes() {
            write_json(&mut h, prior)?;
        }
        let v = h.digest128();
        Some(InputFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        })
    }

    /// Return a live entry, dropping it when expired.
    pub fn get(&self, key: InputFingerprint) -> Option<ValidationReport> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(&key) {
            Some((at, report)) if at.elapsed() < self.ttl => Some(report.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store `report` under `key`, dropping every expired entry first.
    pub fn insert(&self, key: InputFingerprint, report: ValidationReport) {
        if let Ok(mut entries) = self.entries.lock() {
            let ttl = self.ttl;
            entries.retain(|_, (at, _)| at.elapsed() < ttl);
            entries.insert(key, (Instant::now(), report));
        }
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|_, (at, _)| at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Return `true` when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Length-prefixed JSON bytes so that adjacent documents cannot alias.
fn write_json<T: serde::Serialize>(h: &mut Xxh3, value: &T) -> Option<()> {
    let bytes = serde_json::to_vec(value).ok()?;
    h.update(&(bytes.len() as u64).to_le_bytes());
    h.update(&bytes);
    Some(())
}

#[cfg(test)]
#[path = "../../tests/unit/batch/cache.rs"]
mod tests;
