use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;
use vellum::{
    inflect_fields, slider_range,
    types::LightType,
    ui::{Action, Dropdown, Hex, Slider},
};

/// Two fields with explicit labels.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlagCount {
    pub flag: bool,
    pub count: u8,
}

inflect_fields!(FlagCount { flag: "Flag", count: "Count" });

slider_range!(pub ExposureRange: f32 = -4.0, 4.0, 0.5);

static RESETS: AtomicU32 = AtomicU32::new(0);

/// A settings struct touching most inspectable kinds. Labels are derived from
/// the field names.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub light_type: Dropdown<LightType>,
    pub sun_direction: Vec3,
    pub exposure: Slider<f32, ExposureRange>,
    pub mask: Hex<u32>,
    pub tags: Vec<String>,
    pub counters: FlagCount,
    pub reset: Action<RenderSettings>,
}

impl RenderSettings {
    /// Number of times any settings window asked for a reset.
    pub fn resets() -> u32 {
        RESETS.load(Ordering::Relaxed)
    }

    fn request_reset(&self) {
        log::info!("Reset requested, exposure was {}", self.exposure.get());
        RESETS.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            light_type: Dropdown(LightType::Directional),
            sun_direction: Vec3::Y,
            exposure: Slider::new(0.0),
            mask: Hex::new(0xFF),
            tags: vec!["hdr".into(), "bloom".into()],
            counters: FlagCount::default(),
            reset: Action(Self::request_reset),
        }
    }
}

inflect_fields!(RenderSettings {
    light_type,
    sun_direction,
    exposure,
    mask,
    tags,
    counters,
    reset,
});
