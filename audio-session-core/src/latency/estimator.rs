use std::sync::Arc;

use crate::models::capabilities::Capabilities;
use crate::models::config::DEFAULT_FALLBACK_LATENCY_MS;
use crate::models::host::DeviceProperty;
use crate::models::latency::{LatencyEstimate, LatencySource};
use crate::session::engine_binding::EngineBinding;
use crate::traits::host_audio::HostAudioSubsystem;

/// Output latency in milliseconds for one buffer, or the 20 ms fallback when
/// either input is missing or the sample rate is zero.
pub fn estimate(buffer_frames: Option<u32>, sample_rate_hz: Option<u32>) -> f64 {
    buffer_latency_ms(buffer_frames, sample_rate_hz).unwrap_or(DEFAULT_FALLBACK_LATENCY_MS)
}

fn buffer_latency_ms(buffer_frames: Option<u32>, sample_rate_hz: Option<u32>) -> Option<f64> {
    match (buffer_frames, sample_rate_hz) {
        (Some(frames), Some(rate)) if rate > 0 => Some(frames as f64 / rate as f64 * 1000.0),
        _ => None,
    }
}

fn parse_property(raw: Option<String>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse().ok())
}

/// Computes output latency from device-reported buffer size and sample rate.
///
/// Never fails: when the device cannot be introspected the configured
/// fallback is returned instead. Nothing is cached, since the output route
/// (and with it both properties) can change between calls.
pub struct LatencyEstimator {
    capabilities: Capabilities,
    fallback_ms: f64,
    engine: Option<Arc<EngineBinding>>,
}

impl LatencyEstimator {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            fallback_ms: DEFAULT_FALLBACK_LATENCY_MS,
            engine: None,
        }
    }

    /// Override the fallback. Values that are not a positive, finite number
    /// of milliseconds are ignored and the current fallback is kept.
    pub fn with_fallback_ms(mut self, fallback_ms: f64) -> Self {
        if fallback_ms.is_finite() && fallback_ms > 0.0 {
            self.fallback_ms = fallback_ms;
        } else {
            log::warn!(
                "Ignoring invalid fallback latency {}; keeping {} ms",
                fallback_ms,
                self.fallback_ms
            );
        }
        self
    }

    pub fn with_engine(mut self, engine: Arc<EngineBinding>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn estimate(&self, buffer_frames: Option<u32>, sample_rate_hz: Option<u32>) -> f64 {
        buffer_latency_ms(buffer_frames, sample_rate_hz).unwrap_or(self.fallback_ms)
    }

    /// Read the current device properties from `host` and derive an estimate.
    pub fn query(&self, host: &dyn HostAudioSubsystem) -> LatencyEstimate {
        if !self.capabilities.latency_introspection {
            return self.fallback(None, None);
        }

        let buffer_frames = parse_property(host.device_property(DeviceProperty::OutputFramesPerBuffer));
        let sample_rate_hz = parse_property(host.device_property(DeviceProperty::OutputSampleRate));

        match buffer_latency_ms(buffer_frames, sample_rate_hz) {
            Some(milliseconds) => LatencyEstimate {
                buffer_frames,
                sample_rate_hz,
                milliseconds,
                source: LatencySource::Device,
            },
            None => {
                log::debug!(
                    "Device latency properties unusable (frames {:?}, rate {:?}); using fallback",
                    buffer_frames,
                    sample_rate_hz
                );
                self.fallback(buffer_frames, sample_rate_hz)
            }
        }
    }

    /// Cumulative buffer underruns reported by the native engine.
    ///
    /// Known limitation: returns 0 when no engine is loaded or the engine
    /// does not track underruns. That 0 is a placeholder, not a measurement.
    pub fn buffer_underrun_count(&self) -> u64 {
        self.engine
            .as_ref()
            .and_then(|binding| binding.engine())
            .and_then(|engine| engine.underrun_count())
            .unwrap_or(0)
    }

    fn fallback(&self, buffer_frames: Option<u32>, sample_rate_hz: Option<u32>) -> LatencyEstimate {
        LatencyEstimate {
            buffer_frames,
            sample_rate_hz,
            milliseconds: self.fallback_ms,
            source: LatencySource::Fallback,
        }
    }
}
