//! Wall-clock breakdown of a solve, compiled in with the `timing` feature.
//! Without the feature every recorder is a plain passthrough.
#[cfg(feature = "timing")]
use std::cell::RefCell;
use std::time::Duration;

#[derive(Default, Clone)]
pub struct TimingStats {
    pub neighbor_times: Vec<Duration>,
    pub assembly_times: Vec<Duration>,
    pub pseudo_inverse_times: Vec<Duration>,
    pub stepping_times: Vec<Duration>,
    pub total_time: Duration,
}

impl TimingStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "timing")]
    pub fn log_summary(&self) {
        let sum = |times: &[Duration]| times.iter().sum::<Duration>();
        let neighbors = sum(&self.neighbor_times);
        let assembly = sum(&self.assembly_times);
        let pinv = sum(&self.pseudo_inverse_times);
        let stepping = sum(&self.stepping_times);
        let overhead = self
            .total_time
            .saturating_sub(neighbors + assembly + pinv + stepping);

        log::info!("{}", "=".repeat(60));
        log::info!("{:^60}", "GFD TIMING SUMMARY");
        log::info!("{}", "=".repeat(60));
        log::info!("Total time:          {:>10.3}ms", ms(self.total_time));
        log::info!("  Neighbor search:   {:>10.3}ms", ms(neighbors));
        log::info!(
            "  Stencil assembly:  {:>10.3}ms  ({} calls)",
            ms(assembly),
            self.assembly_times.len()
        );
        log::info!(
            "  Pseudoinverse/SVD: {:>10.3}ms  ({} calls)",
            ms(pinv),
            self.pseudo_inverse_times.len()
        );
        log::info!(
            "  Time stepping:     {:>10.3}ms  ({} levels)",
            ms(stepping),
            self.stepping_times.len()
        );
        log::info!("  Overhead/other:    {:>10.3}ms", ms(overhead));
    }

    #[cfg(not(feature = "timing"))]
    pub fn log_summary(&self) {}
}

#[cfg(feature = "timing")]
fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(feature = "timing")]
thread_local! {
    static TIMING_STATS: RefCell<TimingStats> = RefCell::new(TimingStats::new());
}

#[cfg(feature = "timing")]
fn record<F, R>(f: F, slot: fn(&mut TimingStats) -> &mut Vec<Duration>) -> R
where
    F: FnOnce() -> R,
{
    let start = std::time::Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    TIMING_STATS.with(|stats| slot(&mut stats.borrow_mut()).push(elapsed));
    result
}

#[cfg(feature = "timing")]
pub fn reset_timing() {
    TIMING_STATS.with(|stats| {
        *stats.borrow_mut() = TimingStats::new();
    });
}

#[cfg(not(feature = "timing"))]
pub fn reset_timing() {}

#[cfg(feature = "timing")]
pub fn record_neighbors<F: FnOnce() -> R, R>(f: F) -> R {
    record(f, |s| &mut s.neighbor_times)
}

#[cfg(not(feature = "timing"))]
pub fn record_neighbors<F: FnOnce() -> R, R>(f: F) -> R {
    f()
}

#[cfg(feature = "timing")]
pub fn record_assembly<F: FnOnce() -> R, R>(f: F) -> R {
    record(f, |s| &mut s.assembly_times)
}

#[cfg(not(feature = "timing"))]
pub fn record_assembly<F: FnOnce() -> R, R>(f: F) -> R {
    f()
}

#[cfg(feature = "timing")]
pub fn record_pseudo_inverse<F: FnOnce() -> R, R>(f: F) -> R {
    record(f, |s| &mut s.pseudo_inverse_times)
}

#[cfg(not(feature = "timing"))]
pub fn record_pseudo_inverse<F: FnOnce() -> R, R>(f: F) -> R {
    f()
}

#[cfg(feature = "timing")]
pub fn record_step<F: FnOnce() -> R, R>(f: F) -> R {
    record(f, |s| &mut s.stepping_times)
}

#[cfg(not(feature = "timing"))]
pub fn record_step<F: FnOnce() -> R, R>(f: F) -> R {
    f()
}

#[cfg(feature = "timing")]
pub fn finalize_timing(total_time: Duration) -> TimingStats {
    TIMING_STATS.with(|stats| {
        let mut s = stats.borrow_mut();
        s.total_time = total_time;
        s.clone()
    })
}

#[cfg(not(feature = "timing"))]
pub fn finalize_timing(_total_time: Duration) -> TimingStats {
    TimingStats::new()
}

#[cfg(feature = "timing")]
pub fn finalize_and_log(total_time: Duration) {
    finalize_timing(total_time).log_summary();
}

#[cfg(not(feature = "timing"))]
pub fn finalize_and_log(_total_time: Duration) {}
