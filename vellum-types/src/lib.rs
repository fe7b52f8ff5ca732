//! Type declarations for the vellum scene object table.
//!
//! This is reexported in the vellum crate proper and includes the plain-old-data
//! layouts of every scene object category, as they are laid out in the buffers
//! handed to the graphics backend.

use std::{
    fmt::{self, Debug},
    mem::size_of,
    num::NonZeroU64,
};

use bytemuck::{Pod, Zeroable};
/// Reexport of the glam version vellum is using.
pub use glam;
/// Reexport of the half version vellum is using.
pub use half;
use glam::Vec3;
use half::f16;
use thiserror::Error;

/// Stable external identifier of an object stored in the scene object table.
///
/// Handles are assigned from a monotonically increasing counter and are never
/// reused while the object they name is alive. The physical slot an object lives
/// in may change every compaction; the handle does not.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneObjectHandle(NonZeroU64);

impl SceneObjectHandle {
    /// Wraps a raw handle value. Zero is never a valid handle.
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Underlying value of the handle.
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl Debug for SceneObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SceneObjectHandle").field(&self.get()).finish()
    }
}

/// The closed set of object kinds the scene object table stores.
///
/// The declaration order is the order categories are compacted and flushed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SceneObjectCategory {
    Light,
    Material,
    Triangle,
    Sphere,
    Cube,
    Plane,
}

impl SceneObjectCategory {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Light,
        Self::Material,
        Self::Triangle,
        Self::Sphere,
        Self::Cube,
        Self::Plane,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Geometry categories carry a material reference.
    pub const fn is_geometry(self) -> bool {
        matches!(self, Self::Triangle | Self::Sphere | Self::Cube | Self::Plane)
    }

    /// Size in bytes of a single object of this category.
    pub const fn stride(self) -> usize {
        match self {
            Self::Light => size_of::<Light>(),
            Self::Material => size_of::<Material>(),
            Self::Triangle => size_of::<Triangle>(),
            Self::Sphere => size_of::<Sphere>(),
            Self::Cube => size_of::<Cube>(),
            Self::Plane => size_of::<Plane>(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "lights",
            Self::Material => "materials",
            Self::Triangle => "triangles",
            Self::Sphere => "spheres",
            Self::Cube => "cubes",
            Self::Plane => "planes",
        }
    }
}

/// Binds a plain-old-data type to the category it is stored in.
pub trait SceneObject: Pod {
    const CATEGORY: SceneObjectCategory;
}

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
#[error("{0} is not a valid light type")]
pub struct InvalidLightType(pub u16);

/// Subtype of a light. Lights are kept sorted by this in their buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u16)]
pub enum LightType {
    #[default]
    Directional = 0,
    Spot = 1,
    Point = 2,
}

impl LightType {
    pub const COUNT: usize = 3;

    pub const ALL: [Self; Self::COUNT] = [Self::Directional, Self::Spot, Self::Point];

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u16> for LightType {
    type Error = InvalidLightType;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Directional),
            1 => Ok(Self::Spot),
            2 => Ok(Self::Point),
            v => Err(InvalidLightType(v)),
        }
    }
}

/// Packs a unit normal into 64 bits: 22 bits for x and y, 20 bits for z.
pub fn encode_normal(n: Vec3) -> [u32; 2] {
    let n = n * 0.5 + 0.5;
    let x = (n.x * ((1u32 << 22) - 1) as f32) as u32;
    let y = (n.y * ((1u32 << 22) - 1) as f32) as u32;
    let z = (n.z * ((1u32 << 20) - 1) as f32) as u32;

    [(x << 10) | (y >> 12), (y << 20) | z]
}

/// Inverse of [`encode_normal`], up to quantization.
pub fn decode_normal(packed: [u32; 2]) -> Vec3 {
    let x = packed[0] >> 10;
    let y = ((packed[0] & 0x3FF) << 12) | (packed[1] >> 20);
    let z = packed[1] & 0xF_FFFF;

    let n = Vec3::new(
        x as f32 / ((1u32 << 22) - 1) as f32,
        y as f32 / ((1u32 << 22) - 1) as f32,
        z as f32 / ((1u32 << 20) - 1) as f32,
    );
    n * 2.0 - 1.0
}

#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Light {
    pub pos: Vec3,
    pub rad: f16,
    pub origin: f16,
    /// Direction packed with [`encode_normal`].
    pub dir: [u32; 2],
    pub r: f16,
    pub g: f16,
    pub b: f16,
    /// Raw [`LightType`] discriminant.
    pub light_type: u16,
}

impl Light {
    pub fn directional(dir: Vec3, color: Vec3) -> Self {
        Self {
            dir: encode_normal(dir),
            light_type: LightType::Directional as u16,
            ..Self::colored(color)
        }
    }

    pub fn point(pos: Vec3, color: Vec3, rad: f32, origin: f32) -> Self {
        Self {
            pos,
            rad: f16::from_f32(rad),
            origin: f16::from_f32(origin),
            light_type: LightType::Point as u16,
            ..Self::colored(color)
        }
    }

    pub fn spot(pos: Vec3, dir: Vec3, color: Vec3, rad: f32, origin: f32) -> Self {
        Self {
            pos,
            rad: f16::from_f32(rad),
            origin: f16::from_f32(origin),
            dir: encode_normal(dir),
            light_type: LightType::Spot as u16,
            ..Self::colored(color)
        }
    }

    fn colored(color: Vec3) -> Self {
        Self {
            r: f16::from_f32(color.x),
            g: f16::from_f32(color.y),
            b: f16::from_f32(color.z),
            ..Self::zeroed()
        }
    }

    pub fn kind(&self) -> Result<LightType, InvalidLightType> {
        LightType::try_from(self.light_type)
    }

    pub fn color(&self) -> Vec3 {
        Vec3::new(self.r.to_f32(), self.g.to_f32(), self.b.to_f32())
    }
}

impl SceneObject for Light {
    const CATEGORY: SceneObjectCategory = SceneObjectCategory::Light;
}

#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Material {
    pub albedo_r: f16,
    pub albedo_g: f16,
    pub albedo_b: f16,
    pub metallic: f16,

    pub ambient_r: f16,
    pub ambient_g: f16,
    pub ambient_b: f16,
    pub roughness: f16,

    pub emission_r: f16,
    pub emission_g: f16,
    pub emission_b: f16,
    pub _padding: f16,

    pub transparency: f32,
    pub material_info: u32,
}

impl Material {
    pub fn new(albedo: Vec3, ambient: Vec3, emission: Vec3, metallic: f32, roughness: f32, transparency: f32) -> Self {
        Self {
            albedo_r: f16::from_f32(albedo.x),
            albedo_g: f16::from_f32(albedo.y),
            albedo_b: f16::from_f32(albedo.z),
            metallic: f16::from_f32(metallic),
            ambient_r: f16::from_f32(ambient.x),
            ambient_g: f16::from_f32(ambient.y),
            ambient_b: f16::from_f32(ambient.z),
            roughness: f16::from_f32(roughness),
            emission_r: f16::from_f32(emission.x),
            emission_g: f16::from_f32(emission.y),
            emission_b: f16::from_f32(emission.z),
            _padding: f16::ZERO,
            transparency,
            material_info: 0,
        }
    }
}

impl SceneObject for Material {
    const CATEGORY: SceneObjectCategory = SceneObjectCategory::Material;
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Triangle {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl SceneObject for Triangle {
    const CATEGORY: SceneObjectCategory = SceneObjectCategory::Triangle;
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Sphere {
    pub pos: Vec3,
    pub rad: f32,
}

impl SceneObject for Sphere {
    const CATEGORY: SceneObjectCategory = SceneObjectCategory::Sphere;
}

/// Axis aligned box.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Cube {
    pub min: Vec3,
    pub max: Vec3,
}

impl SceneObject for Cube {
    const CATEGORY: SceneObjectCategory = SceneObjectCategory::Cube;
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Plane {
    pub dir: Vec3,
    pub dist: f32,
}

impl SceneObject for Plane {
    const CATEGORY: SceneObjectCategory = SceneObjectCategory::Plane;
}

/// Header the backend binds alongside the object buffers.
///
/// `object_count` is indexed by [`SceneObjectCategory::index`], `light_count` by
/// [`LightType::index`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct SceneGraphInfo {
    pub object_count: [u32; SceneObjectCategory::COUNT],
    pub light_count: [u32; LightType::COUNT],
}

impl SceneGraphInfo {
    pub fn count(&self, category: SceneObjectCategory) -> u32 {
        self.object_count[category.index()]
    }

    pub fn lights(&self, ty: LightType) -> u32 {
        self.light_count[ty.index()]
    }
}

#[cfg(test)]
mod test {
    use glam::Vec3;

    use super::*;

    #[test]
    fn strides() {
        assert_eq!(SceneObjectCategory::Light.stride(), 32);
        assert_eq!(SceneObjectCategory::Material.stride(), 32);
        assert_eq!(SceneObjectCategory::Triangle.stride(), 36);
        assert_eq!(SceneObjectCategory::Sphere.stride(), 16);
        assert_eq!(SceneObjectCategory::Cube.stride(), 24);
        assert_eq!(SceneObjectCategory::Plane.stride(), 16);
        assert_eq!(size_of::<SceneGraphInfo>(), 36);
    }

    #[test]
    fn handle_zero_is_invalid() {
        assert_eq!(SceneObjectHandle::new(0), None);
        assert_eq!(SceneObjectHandle::new(7).map(SceneObjectHandle::get), Some(7));
    }

    #[test]
    fn light_constructors() {
        let d = Light::directional(Vec3::Y, Vec3::ONE);
        assert_eq!(d.kind(), Ok(LightType::Directional));
        assert_eq!(d.color(), Vec3::ONE);

        let p = Light::point(Vec3::new(1.0, 2.0, 3.0), Vec3::X, 4.0, 0.5);
        assert_eq!(p.kind(), Ok(LightType::Point));
        assert_eq!(p.rad.to_f32(), 4.0);

        let mut bad = p;
        bad.light_type = 9;
        assert_eq!(bad.kind(), Err(InvalidLightType(9)));
    }

    #[test]
    fn normal_packing() {
        for n in [Vec3::X, Vec3::NEG_Y, Vec3::new(0.6, 0.0, -0.8)] {
            let decoded = decode_normal(encode_normal(n));
            assert!((decoded - n).abs().max_element() < 1e-4, "{n} -> {decoded}");
        }
    }
}
