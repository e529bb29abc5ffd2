//! Device-adaptive animation settings.

use axum::Json;
use axum::http::HeaderMap;
use serde::Deserialize;

use atelier_core::device::{AnimationConfig, DeviceHints, DeviceProfile, DeviceTier, FrameSampler};

use crate::error::{ApiJson, AppError};

/// Most frame timings accepted in one report.
const MAX_FRAME_SAMPLES: usize = 1000;

/// Frame timings sampled by the client after hydration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    /// Tier the client is currently running.
    pub tier: DeviceTier,
    pub frame_times_ms: Vec<f64>,
}

fn hints(headers: &HeaderMap) -> DeviceHints {
    DeviceHints::from_lookup(|name| headers.get(name).and_then(|v| v.to_str().ok()))
}

/// `GET /api/device-config`
pub async fn device_config(headers: HeaderMap) -> Json<AnimationConfig> {
    let profile = DeviceProfile::classify(&hints(&headers));
    Json(AnimationConfig::for_profile(&profile))
}

/// `POST /api/device-config`
///
/// Returns the settings to continue with: the reported tier (never above
/// what the request headers allow), one step lower if the frames were slow.
pub async fn report_frames(
    headers: HeaderMap,
    ApiJson(report): ApiJson<FrameReport>,
) -> Result<Json<AnimationConfig>, AppError> {
    if report.frame_times_ms.is_empty() {
        return Err(AppError::BadRequest("frameTimesMs must not be empty".to_owned()));
    }
    if report.frame_times_ms.len() > MAX_FRAME_SAMPLES {
        return Err(AppError::PayloadTooLarge(format!(
            "at most {MAX_FRAME_SAMPLES} frame samples per report"
        )));
    }

    let mut profile = DeviceProfile::classify(&hints(&headers));
    profile.tier = report.tier.min(profile.tier);
    let current = profile.tier;

    // Window size is what the server asked the client to sample; shorter
    // reports (after dropping unusable samples) never downgrade.
    let window = AnimationConfig::for_profile(&profile).frame_sample_size;
    let mut sampler = FrameSampler::new(window);
    for frame_ms in &report.frame_times_ms {
        sampler.record(*frame_ms);
    }

    profile.tier = match sampler.recommend(current) {
        Some(lower) => {
            tracing::info!(
                from = ?current,
                to = ?lower,
                fps = sampler.average_fps().unwrap_or_default(),
                "downgrading animation tier"
            );
            lower
        }
        None => current,
    };

    Ok(Json(AnimationConfig::for_profile(&profile)))
}
