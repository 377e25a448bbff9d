use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Resource snapshot taken at the end of a load phase.
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

#[cfg(feature = "cli")]
struct ProcessProbe {
    system: System,
    pid: Pid,
    peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
impl ProcessProbe {
    fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid().ok()?;
        Some(Self {
            system: System::new(),
            pid,
            peak_memory_mb: 0,
        })
    }

    fn sample(&mut self) -> Option<(u64, u64)> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        let memory_mb = self.system.process(self.pid)?.memory() / 1024 / 1024;
        self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);
        Some((memory_mb, self.peak_memory_mb))
    }
}

/// Tracks how long each phase of a load takes and, with the `cli` feature,
/// how much memory the process holds afterwards.
pub struct LoadMonitor {
    enabled: bool,
    start_time: Instant,
    #[cfg(feature = "cli")]
    probe: Option<Mutex<ProcessProbe>>,
}

impl LoadMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            start_time: Instant::now(),
            #[cfg(feature = "cli")]
            probe: if enabled {
                ProcessProbe::new().map(Mutex::new)
            } else {
                None
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn phase_stats(&self, phase: &str) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }

        let (memory_usage_mb, peak_memory_mb) = self.sample_memory().unwrap_or((0, 0));

        Some(PhaseStats {
            phase: phase.to_string(),
            memory_usage_mb,
            peak_memory_mb,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    #[cfg(feature = "cli")]
    fn sample_memory(&self) -> Option<(u64, u64)> {
        let probe = self.probe.as_ref()?;
        let mut probe = probe.lock().ok()?;
        probe.sample()
    }

    #[cfg(not(feature = "cli"))]
    fn sample_memory(&self) -> Option<(u64, u64)> {
        None
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some(stats) = self.phase_stats(phase) {
            tracing::info!(
                phase = %stats.phase,
                memory_mb = stats.memory_usage_mb,
                peak_mb = stats.peak_memory_mb,
                elapsed = ?stats.elapsed_time,
                "phase finished"
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(stats) = self.phase_stats("total") {
            tracing::info!(
                "Load finished in {:?}, peak memory {}MB",
                stats.elapsed_time,
                stats.peak_memory_mb
            );
        }
    }
}

impl Default for LoadMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
