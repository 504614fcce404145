#[cfg(feature = "cli")]
use std::sync::{Arc, Mutex};
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub phase_time: Duration,
    pub elapsed_time: Duration,
}

/// 記錄每個階段（extract / render / write）的耗時與記憶體
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Arc<Mutex<System>>,
    pid: Option<Pid>,
    start_time: Instant,
    phase_start: Arc<Mutex<Instant>>,
    peak_memory: Arc<Mutex<u64>>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());
        if enabled {
            system.refresh_all();
        }

        let pid = sysinfo::get_current_pid().ok();
        let now = Instant::now();

        Self {
            system: Arc::new(Mutex::new(system)),
            pid,
            start_time: now,
            phase_start: Arc::new(Mutex::new(now)),
            peak_memory: Arc::new(Mutex::new(0)),
            enabled,
        }
    }

    /// 結束目前階段並回傳統計，下一個階段從現在開始計時
    pub fn finish_phase(&self) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }

        let phase_time = {
            let mut phase_start = self.phase_start.lock().ok()?;
            let elapsed = phase_start.elapsed();
            *phase_start = Instant::now();
            elapsed
        };

        let mut system = self.system.lock().ok()?;
        system.refresh_all();
        let process = system.process(self.pid?)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = self.peak_memory.lock().ok()?;
        *peak = (*peak).max(memory_mb);

        Some(PhaseStats {
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: memory_mb,
            peak_memory_mb: *peak,
            phase_time,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some(stats) = self.finish_phase() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Phase: {:?}, Total: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.phase_time,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        let peak = self.peak_memory.lock().map(|p| *p).unwrap_or(0);
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
            self.start_time.elapsed(),
            peak
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 建置時的空實作
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
