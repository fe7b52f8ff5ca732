use serde::{Deserialize, Serialize};
use vellum_types::SceneObjectCategory;

/// Capacity of every category of the scene object table.
///
/// Capacities are fixed for the lifetime of the table; adds past them fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLimits {
    pub lights: u32,
    pub materials: u32,
    pub triangles: u32,
    pub spheres: u32,
    pub cubes: u32,
    pub planes: u32,
}

impl SceneLimits {
    pub fn get(&self, category: SceneObjectCategory) -> u32 {
        match category {
            SceneObjectCategory::Light => self.lights,
            SceneObjectCategory::Material => self.materials,
            SceneObjectCategory::Triangle => self.triangles,
            SceneObjectCategory::Sphere => self.spheres,
            SceneObjectCategory::Cube => self.cubes,
            SceneObjectCategory::Plane => self.planes,
        }
    }

    /// Limits with every category set to `count`.
    pub fn uniform(count: u32) -> Self {
        Self {
            lights: count,
            materials: count,
            triangles: count,
            spheres: count,
            cubes: count,
            planes: count,
        }
    }
}

impl Default for SceneLimits {
    fn default() -> Self {
        Self {
            lights: 65536,
            materials: 65536,
            triangles: 65536,
            spheres: 16384,
            cubes: 32768,
            planes: 256,
        }
    }
}

/// Layout constants of the inspector.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiOptions {
    /// Height of a read-only row.
    pub row_height: f32,
    /// Height of a row holding an edit field.
    pub editable_row_height: f32,
    /// Height of a list whose elements are not edited inline.
    pub list_height: f32,
    /// Slider step used when a float slider declares a step of zero, as a
    /// fraction of its range.
    pub default_slider_resolution: f64,
    /// Expected size of a frame's draw commands. Backends reserve this up front.
    pub command_memory_hint: usize,
}

impl Default for GuiOptions {
    fn default() -> Self {
        Self {
            row_height: 15.0,
            editable_row_height: 20.0,
            list_height: 200.0,
            default_slider_resolution: 1e-4,
            command_memory_hint: 4 * 1024 * 1024,
        }
    }
}
