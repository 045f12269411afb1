//! Engine tunables.
//!
//! Defaults mirror the timings the production host's drag sensor was
//! calibrated against. The embedding's settings layer distributes config
//! as JSON; unknown keys are ignored and missing keys fall back to the
//! defaults, so stale settings never brick the engine.

use std::time::Duration;

use serde::Deserialize;

/// Pointer- and mouse-drag pacing.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PointerTuning {
    /// Movement (px) required before the host's sensor activates.
    pub threshold_px: f64,
    /// Pause after crossing the activation threshold.
    pub dwell_ms: u64,
    /// Interpolated sub-steps per row of travel.
    pub steps_per_row: u32,
    /// Pause between interpolated sub-steps.
    pub step_delay_ms: u64,
    /// Pause between per-row segments so virtualization can re-mount.
    pub segment_pause_ms: u64,
}

impl Default for PointerTuning {
    fn default() -> Self {
        Self {
            threshold_px: 16.0,
            dwell_ms: 40,
            steps_per_row: 8,
            step_delay_ms: 10,
            segment_pause_ms: 100,
        }
    }
}

impl PointerTuning {
    /// Threshold dwell as a duration.
    #[must_use]
    pub const fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    /// Sub-step delay as a duration.
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Between-segment pause as a duration.
    #[must_use]
    pub const fn segment_pause(&self) -> Duration {
        Duration::from_millis(self.segment_pause_ms)
    }
}

/// Accessible keyboard sequence pacing.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyboardTuning {
    /// Hold time between key-down and key-up of the lift press.
    pub lift_hold_ms: u64,
    /// Settle time after the lift before the first move key.
    pub lift_settle_ms: u64,
    /// Hold time for each move/drop press.
    pub press_ms: u64,
    /// Pause between move steps.
    pub step_pause_ms: u64,
    /// Settle time before the drop press.
    pub drop_settle_ms: u64,
}

impl Default for KeyboardTuning {
    fn default() -> Self {
        Self {
            lift_hold_ms: 40,
            lift_settle_ms: 120,
            press_ms: 20,
            step_pause_ms: 60,
            drop_settle_ms: 80,
        }
    }
}

impl KeyboardTuning {
    /// Lift hold as a duration.
    #[must_use]
    pub const fn lift_hold(&self) -> Duration {
        Duration::from_millis(self.lift_hold_ms)
    }

    /// Post-lift settle as a duration.
    #[must_use]
    pub const fn lift_settle(&self) -> Duration {
        Duration::from_millis(self.lift_settle_ms)
    }

    /// Key press hold as a duration.
    #[must_use]
    pub const fn press(&self) -> Duration {
        Duration::from_millis(self.press_ms)
    }

    /// Between-step pause as a duration.
    #[must_use]
    pub const fn step_pause(&self) -> Duration {
        Duration::from_millis(self.step_pause_ms)
    }

    /// Pre-drop settle as a duration.
    #[must_use]
    pub const fn drop_settle(&self) -> Duration {
        Duration::from_millis(self.drop_settle_ms)
    }
}

/// Complete engine configuration.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Pointer/mouse drag pacing.
    pub pointer: PointerTuning,
    /// Keyboard sequence pacing.
    pub keyboard: KeyboardTuning,
    /// Rendered row height used for drag travel planning.
    pub row_height_px: f64,
    /// Verification bound for input-simulation strategies.
    pub verify_ms: u64,
    /// Verification bound for paths that re-render immediately when they
    /// work at all (store dispatch, visual splice).
    pub quick_verify_ms: u64,
    /// Whether the privileged input bridge may be used.
    pub bridge_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pointer: PointerTuning::default(),
            keyboard: KeyboardTuning::default(),
            row_height_px: 56.0,
            verify_ms: 1500,
            quick_verify_ms: 800,
            bridge_enabled: false,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from the embedding's settings JSON.
    pub fn from_settings(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Full verification bound.
    #[must_use]
    pub const fn verify(&self) -> Duration {
        Duration::from_millis(self.verify_ms)
    }

    /// Short verification bound.
    #[must_use]
    pub const fn quick_verify(&self) -> Duration {
        Duration::from_millis(self.quick_verify_ms)
    }
}
