use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub elapsed: Duration,
    pub memory_usage_mb: Option<u64>,
}

/// Records how long each job step took and, with the `cli` feature, the
/// process memory after it.
pub struct PhaseMonitor {
    enabled: bool,
    start_time: Instant,
    phase_start: Instant,
    peak_memory_mb: u64,
    phases: Vec<PhaseStats>,
    #[cfg(feature = "cli")]
    probe: Option<(System, Pid)>,
}

impl PhaseMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            start_time: now,
            phase_start: now,
            peak_memory_mb: 0,
            phases: Vec::new(),
            #[cfg(feature = "cli")]
            probe: if enabled { Self::open_probe() } else { None },
        }
    }

    #[cfg(feature = "cli")]
    fn open_probe() -> Option<(System, Pid)> {
        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();
        Some((system, pid))
    }

    #[cfg(feature = "cli")]
    fn sample_memory_mb(&mut self) -> Option<u64> {
        let (system, pid) = self.probe.as_mut()?;
        system.refresh_all();
        let process = system.process(*pid)?;
        Some(process.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn sample_memory_mb(&mut self) -> Option<u64> {
        None
    }

    /// Closes the current phase and starts timing the next one.
    pub fn record(&mut self, phase: &str) {
        if !self.enabled {
            return;
        }

        let elapsed = self.phase_start.elapsed();
        let memory_usage_mb = self.sample_memory_mb();
        if let Some(memory) = memory_usage_mb {
            self.peak_memory_mb = self.peak_memory_mb.max(memory);
        }

        match memory_usage_mb {
            Some(memory) => tracing::info!(
                "📊 {} - Time: {:?}, Memory: {}MB, Peak: {}MB",
                phase,
                elapsed,
                memory,
                self.peak_memory_mb
            ),
            None => tracing::info!("📊 {} - Time: {:?}", phase, elapsed),
        }

        self.phases.push(PhaseStats {
            phase: phase.to_string(),
            elapsed,
            memory_usage_mb,
        });
        self.phase_start = Instant::now();
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        tracing::info!(
            "📊 Final Stats - Steps: {}, Total Time: {:?}, Peak Memory: {}MB",
            self.phases.len(),
            self.start_time.elapsed(),
            self.peak_memory_mb
        );
    }

    pub fn phases(&self) -> &[PhaseStats] {
        &self.phases
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for PhaseMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
