//! Device-adaptive animation tuning.
//!
//! The server classifies the client from request hints and hands the page
//! an [`AnimationConfig`] so low-end phones never start the heavy effects.
//! After hydration the client reports frame timings; [`FrameSampler`]
//! downgrades the tier when the device cannot keep up.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Fraction of the target FPS below which a tier is downgraded.
const DOWNGRADE_RATIO: f64 = 0.8;

/// Hints a browser sends about itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceHints {
    pub user_agent: Option<String>,
    /// `Sec-CH-UA-Mobile: ?1`.
    pub mobile_hint: Option<bool>,
    /// `Save-Data: on`.
    pub save_data: bool,
    /// `Device-Memory` in GiB (0.25 .. 8).
    pub device_memory_gb: Option<f32>,
    /// `ECT`: `slow-2g`, `2g`, `3g` or `4g`.
    pub effective_connection: Option<String>,
    /// `Sec-CH-Prefers-Reduced-Motion: reduce`.
    pub prefers_reduced_motion: bool,
}

impl DeviceHints {
    /// Build hints from a header lookup function (lowercase names).
    pub fn from_lookup<'a, F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        Self {
            user_agent: get("user-agent").map(str::to_owned),
            mobile_hint: get("sec-ch-ua-mobile").map(|v| v.trim() == "?1"),
            save_data: get("save-data").is_some_and(|v| v.trim().eq_ignore_ascii_case("on")),
            device_memory_gb: get("device-memory").and_then(|v| v.trim().parse().ok()),
            effective_connection: get("ect").map(|v| v.trim().to_ascii_lowercase()),
            prefers_reduced_motion: get("sec-ch-prefers-reduced-motion")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("reduce")),
        }
    }

    /// Mobile per client hint, else per user-agent sniffing.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        if let Some(mobile) = self.mobile_hint {
            return mobile;
        }
        self.user_agent.as_deref().is_some_and(|ua| {
            let ua = ua.to_ascii_lowercase();
            ["mobile", "android", "iphone", "ipad", "ipod"]
                .iter()
                .any(|needle| ua.contains(needle))
        })
    }

    fn slow_connection(&self) -> bool {
        matches!(
            self.effective_connection.as_deref(),
            Some("slow-2g" | "2g" | "3g")
        )
    }
}

/// Coarse capability tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Low,
    Mid,
    High,
}

impl DeviceTier {
    /// Frame rate the effects are tuned for.
    #[must_use]
    pub fn target_fps(self) -> f64 {
        match self {
            Self::Low => 30.0,
            Self::Mid | Self::High => 60.0,
        }
    }

    /// One tier down, saturating at `Low`.
    #[must_use]
    pub fn downgrade(self) -> Self {
        match self {
            Self::High => Self::Mid,
            Self::Mid | Self::Low => Self::Low,
        }
    }
}

/// Classified device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub tier: DeviceTier,
    pub is_touch: bool,
    pub reduced_motion: bool,
}

impl DeviceProfile {
    /// Classify a client.
    ///
    /// Save-Data, ≤ 2 GiB memory or a slow connection ⇒ `Low`; mobile or
    /// ≤ 4 GiB ⇒ `Mid`; everything else ⇒ `High`.
    #[must_use]
    pub fn classify(hints: &DeviceHints) -> Self {
        let memory = hints.device_memory_gb;
        let is_mobile = hints.is_mobile();

        let tier = if hints.save_data
            || memory.is_some_and(|m| m <= 2.0)
            || hints.slow_connection()
        {
            DeviceTier::Low
        } else if is_mobile || memory.is_some_and(|m| m <= 4.0) {
            DeviceTier::Mid
        } else {
            DeviceTier::High
        };

        Self {
            tier,
            is_touch: is_mobile,
            reduced_motion: hints.prefers_reduced_motion,
        }
    }
}

/// Effect settings sent to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    pub tier: DeviceTier,
    pub magnetic_cursor: bool,
    pub parallax: bool,
    pub particle_count: u32,
    pub target_fps: f64,
    /// Frames per performance sample the client reports.
    pub frame_sample_size: usize,
    pub analytics_batch_size: usize,
    pub analytics_flush_interval_ms: u64,
}

impl AnimationConfig {
    /// Settings for `profile`.
    #[must_use]
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        let (particles, parallax, batch, flush_ms) = match profile.tier {
            DeviceTier::Low => (0, false, 5, 30_000),
            DeviceTier::Mid => (40, true, 10, 15_000),
            DeviceTier::High => (120, true, 20, 10_000),
        };
        let motion_ok = !profile.reduced_motion;

        Self {
            tier: profile.tier,
            magnetic_cursor: motion_ok && !profile.is_touch && profile.tier != DeviceTier::Low,
            parallax: motion_ok && parallax,
            particle_count: if motion_ok { particles } else { 0 },
            target_fps: profile.tier.target_fps(),
            frame_sample_size: 120,
            analytics_batch_size: batch,
            analytics_flush_interval_ms: flush_ms,
        }
    }
}

/// Sliding window of frame durations.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    window: VecDeque<f64>,
    capacity: usize,
}

impl FrameSampler {
    /// Sampler keeping the last `capacity` frames (at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one frame duration in milliseconds. Non-finite or
    /// non-positive values are ignored.
    pub fn record(&mut self, frame_ms: f64) {
        if !frame_ms.is_finite() || frame_ms <= 0.0 {
            return;
        }
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(frame_ms);
    }

    /// Whether the window holds `capacity` samples.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    /// Mean frames per second over the window.
    #[must_use]
    pub fn average_fps(&self) -> Option<f64> {
        if self.window.is_empty() {
            return None;
        }
        let mean_ms = self.window.iter().sum::<f64>() / self.window.len() as f64;
        Some(1000.0 / mean_ms)
    }

    /// A lower tier if a full window averages below 80% of `tier`'s target.
    #[must_use]
    pub fn recommend(&self, tier: DeviceTier) -> Option<DeviceTier> {
        if !self.is_full() || tier == DeviceTier::Low {
            return None;
        }
        let fps = self.average_fps()?;
        (fps < tier.target_fps() * DOWNGRADE_RATIO).then(|| tier.downgrade())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn hints(pairs: &[(&str, &str)]) -> DeviceHints {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        DeviceHints::from_lookup(|name| map.get(name).map(String::as_str))
    }

    const DESKTOP_UA: &str =
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 Safari/605.1.15";
    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";

    #[test]
    fn desktop_is_high_tier() {
        let profile = DeviceProfile::classify(&hints(&[("user-agent", DESKTOP_UA)]));
        assert_eq!(profile.tier, DeviceTier::High);
        assert!(!profile.is_touch);
        let config = AnimationConfig::for_profile(&profile);
        assert!(config.magnetic_cursor);
        assert_eq!(config.particle_count, 120);
    }

    #[test]
    fn phone_is_mid_without_magnetic_cursor() {
        let profile = DeviceProfile::classify(&hints(&[("user-agent", IPHONE_UA)]));
        assert_eq!(profile.tier, DeviceTier::Mid);
        assert!(profile.is_touch);
        assert!(!AnimationConfig::for_profile(&profile).magnetic_cursor);
    }

    #[test]
    fn client_hint_overrides_user_agent() {
        let h = hints(&[("user-agent", IPHONE_UA), ("sec-ch-ua-mobile", "?0")]);
        assert!(!h.is_mobile());
    }

    #[test]
    fn save_data_and_low_memory_are_low_tier() {
        let save = DeviceProfile::classify(&hints(&[("save-data", "on")]));
        assert_eq!(save.tier, DeviceTier::Low);
        let small = DeviceProfile::classify(&hints(&[("device-memory", "2")]));
        assert_eq!(small.tier, DeviceTier::Low);
        let slow = DeviceProfile::classify(&hints(&[("ect", "3g")]));
        assert_eq!(slow.tier, DeviceTier::Low);
        let mid = DeviceProfile::classify(&hints(&[("device-memory", "4")]));
        assert_eq!(mid.tier, DeviceTier::Mid);
    }

    #[test]
    fn reduced_motion_disables_effects() {
        let profile = DeviceProfile::classify(&hints(&[
            ("user-agent", DESKTOP_UA),
            ("sec-ch-prefers-reduced-motion", "reduce"),
        ]));
        let config = AnimationConfig::for_profile(&profile);
        assert_eq!(config.tier, DeviceTier::High);
        assert!(!config.magnetic_cursor);
        assert!(!config.parallax);
        assert_eq!(config.particle_count, 0);
    }

    #[test]
    fn sampler_ignores_garbage() {
        let mut sampler = FrameSampler::new(4);
        sampler.record(f64::NAN);
        sampler.record(-3.0);
        sampler.record(0.0);
        assert!(sampler.average_fps().is_none());
    }

    #[test]
    fn sampler_window_slides() {
        let mut sampler = FrameSampler::new(2);
        sampler.record(100.0);
        sampler.record(10.0);
        sampler.record(10.0);
        let fps = sampler.average_fps().unwrap_or_default();
        assert!((fps - 100.0).abs() < 1e-9);
    }

    #[test]
    fn slow_frames_downgrade_once_window_full() {
        let mut sampler = FrameSampler::new(10);
        for _ in 0..9 {
            sampler.record(40.0);
        }
        assert_eq!(sampler.recommend(DeviceTier::High), None);
        sampler.record(40.0);
        assert_eq!(sampler.recommend(DeviceTier::High), Some(DeviceTier::Mid));
        assert_eq!(sampler.recommend(DeviceTier::Low), None);
    }

    #[test]
    fn smooth_frames_keep_tier() {
        let mut sampler = FrameSampler::new(10);
        for _ in 0..10 {
            sampler.record(16.0);
        }
        assert_eq!(sampler.recommend(DeviceTier::High), None);
    }
}
