//! Configuration for the threaded SpGEMM kernel

use std::fmt;
use std::sync::Arc;

/// Phase boundaries reported to a [`PhaseObserver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Per-thread Gustavson multiply over the partitioned rows of A
    Multiply,
    /// Prefix sum of thread totals and copy into the global buffers
    Merge,
    /// Per-row column sort of the merged output
    Sort,
    /// Sorted triple handed back to the caller for finalization
    Finalize,
}

impl Phase {
    /// Short name used in span and timer labels
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Multiply => "core",
            Phase::Merge => "merge",
            Phase::Sort => "sort",
            Phase::Finalize => "finalize",
        }
    }
}

/// Side-channel hook invoked at phase transitions
///
/// Observers never influence the computation; they exist for timers and
/// external instrumentation.
pub trait PhaseObserver: Send + Sync {
    /// Called when `phase` begins. `label` is the configured label, or an
    /// empty string.
    fn phase_started(&self, label: &str, phase: Phase);

    /// Called when `phase` has completed
    fn phase_finished(&self, _label: &str, _phase: Phase) {}
}

/// Observer that emits a `tracing` event per phase transition
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PhaseObserver for TracingObserver {
    fn phase_started(&self, label: &str, phase: Phase) {
        tracing::debug!(label, phase = phase.name(), "phase started");
    }

    fn phase_finished(&self, label: &str, phase: Phase) {
        tracing::debug!(label, phase = phase.name(), "phase finished");
    }
}

/// Thread counts above this trigger a warning
pub const MAX_RECOMMENDED_THREADS: usize = 128;

/// Configuration for the kernel
#[derive(Clone)]
pub struct SpgemmConfig {
    /// Number of worker threads, and number of row ranges A is split into
    pub n_threads: usize,

    /// Label for instrumentation only
    pub label: Option<String>,

    /// Overrides the estimated nonzeros per output row
    /// If None, the estimate is derived from the operands
    pub nnz_per_row_hint: Option<usize>,

    /// Optional phase-transition hook
    pub observer: Option<Arc<dyn PhaseObserver>>,
}

impl Default for SpgemmConfig {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
            label: None,
            nnz_per_row_hint: None,
            observer: None,
        }
    }
}

impl SpgemmConfig {
    /// Default configuration with a fixed worker count
    pub fn with_threads(n_threads: usize) -> Self {
        Self {
            n_threads,
            ..Self::default()
        }
    }

    /// Sets the instrumentation label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Forces the per-row size estimate
    pub fn nnz_per_row_hint(mut self, hint: usize) -> Self {
        self.nnz_per_row_hint = Some(hint);
        self
    }

    /// Installs a phase observer
    pub fn observer(mut self, observer: Arc<dyn PhaseObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub(crate) fn label_str(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    pub(crate) fn notify_start(&self, phase: Phase) {
        if let Some(observer) = &self.observer {
            observer.phase_started(self.label_str(), phase);
        }
    }

    pub(crate) fn notify_finish(&self, phase: Phase) {
        if let Some(observer) = &self.observer {
            observer.phase_finished(self.label_str(), phase);
        }
    }
}

impl fmt::Debug for SpgemmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpgemmConfig")
            .field("n_threads", &self.n_threads)
            .field("label", &self.label)
            .field("nnz_per_row_hint", &self.nnz_per_row_hint)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
