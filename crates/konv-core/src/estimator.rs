//! Progress estimation for one item.
//!
//! Upload progress is exact (bytes sent / bytes total, at most 99). Once the
//! body is sent the service reports nothing until it answers, so the
//! conversion phase is simulated on its own track: restart at the seed and
//! creep upward by small random steps, never reaching the ceiling. Values only
//! rise within a phase. Only a real success moves the value to 100.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunables for the simulated conversion phase (optional `[estimator]` section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Value shown when the conversion phase starts.
    pub seed_percent: u8,
    /// Simulation stays strictly below this value.
    pub ceiling_percent: u8,
    /// Upper bound of one random step; each step is uniform in (0, max_step].
    pub max_step: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            seed_percent: 30,
            ceiling_percent: 95,
            max_step: 3.0,
        }
    }
}

impl EstimatorConfig {
    /// Highest value the simulation may show (ceiling - 1, at most 99).
    fn cap(&self) -> u8 {
        self.ceiling_percent.clamp(1, 100) - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uploading,
    Converting,
    Finished,
}

/// Per-item progress state. Shown values never decrease.
#[derive(Debug, Clone)]
pub struct ProgressEstimator {
    cfg: EstimatorConfig,
    phase: Phase,
    /// Unrounded simulated value during the conversion phase.
    simulated: f64,
    shown: u8,
}

impl ProgressEstimator {
    pub fn new(cfg: EstimatorConfig) -> Self {
        Self {
            cfg,
            phase: Phase::Uploading,
            simulated: 0.0,
            shown: 0,
        }
    }

    /// Last value handed out.
    pub fn shown(&self) -> u8 {
        self.shown
    }

    /// Apply a transport upload tick. Returns the new value if it moved.
    pub fn observe_upload(&mut self, sent: u64, total: u64) -> Option<u8> {
        if self.phase != Phase::Uploading {
            return None;
        }
        self.raise(upload_percent(sent, total).min(99))
    }

    /// Body fully sent: switch to simulation, restarting at `seed_percent`.
    /// Returns the value to show.
    pub fn start_converting(&mut self) -> u8 {
        if self.phase == Phase::Uploading {
            self.phase = Phase::Converting;
            let seed = self.cfg.seed_percent.min(self.cfg.cap());
            self.simulated = f64::from(seed);
            self.shown = seed;
        }
        self.shown
    }

    /// One simulation step. Returns the new value if the rounded value moved.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u8> {
        if self.phase != Phase::Converting {
            return None;
        }
        let cap = f64::from(self.cfg.cap());
        if self.simulated >= cap {
            return None;
        }
        // gen::<f64>() is in [0, 1), so the step is in (0, max_step].
        let step = self.cfg.max_step * (1.0 - rng.gen::<f64>());
        self.simulated = (self.simulated + step).min(cap);
        self.raise(self.simulated.round() as u8)
    }

    /// The real outcome arrived; no further ticks apply. Success shows 100,
    /// failure keeps the last shown value.
    pub fn finish(&mut self, success: bool) -> u8 {
        if self.phase != Phase::Finished {
            self.phase = Phase::Finished;
            if success {
                self.shown = 100;
            }
        }
        self.shown
    }

    fn raise(&mut self, pct: u8) -> Option<u8> {
        if pct > self.shown {
            self.shown = pct;
            Some(pct)
        } else {
            None
        }
    }
}

/// `floor(sent / total * 100)`, clamped to 0..=100. Zero when `total` is 0.
pub fn upload_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (u128::from(sent.min(total)) * 100) / u128::from(total);
    pct as u8
}
