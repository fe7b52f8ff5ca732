use anyhow::Context;
use glam::Vec3;
use vellum::{
    scene::SceneObjectTable,
    types::{Cube, Light, LightType, Material, Plane, SceneObjectCategory, SceneObjectHandle, Sphere, Triangle},
    SceneLimits,
};
use vellum_test::{init_logger, RecordingSceneBackend};

fn table(capacity: u32) -> anyhow::Result<SceneObjectTable> {
    init_logger();
    SceneObjectTable::new(SceneLimits::uniform(capacity)).context("scene table creation failed")
}

fn sphere(rad: f32) -> Sphere {
    Sphere { pos: Vec3::ZERO, rad }
}

fn material(v: f32) -> Material {
    Material::new(Vec3::splat(v), Vec3::ZERO, Vec3::ZERO, 0.0, 0.5, 0.0)
}

fn slot(table: &SceneObjectTable, handle: SceneObjectHandle) -> Option<u32> {
    table.entry(handle).map(|e| e.slot)
}

/// Slots `0..count` of every category are occupied after a compaction, and the
/// backend's copy of each buffer matches the table's.
fn assert_compacted(table: &SceneObjectTable, backend: &RecordingSceneBackend, handles: &[SceneObjectHandle]) {
    for category in SceneObjectCategory::ALL {
        let count = table.count(category);
        let mut slots: Vec<u32> = handles
            .iter()
            .filter_map(|&h| table.entry(h))
            .filter(|e| e.category == category)
            .map(|e| e.slot)
            .collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..count).collect::<Vec<_>>(), "{} has holes", category.name());

        let live = count as usize * table.stride(category);
        assert_eq!(table.buffer(category)[..live], backend.buffer(category)[..live]);
        assert_eq!(table.info().count(category), count);
    }
}

#[test]
pub fn lights_sorted_by_type() -> anyhow::Result<()> {
    let mut table = table(8)?;
    let mut backend = RecordingSceneBackend::new();

    let d1 = table.add(&Light::directional(Vec3::NEG_Y, Vec3::ONE)).context("d1")?;
    let p1 = table.add(&Light::point(Vec3::ONE, Vec3::X, 2.0, 0.1)).context("p1")?;
    let d2 = table.add(&Light::directional(Vec3::X, Vec3::ONE)).context("d2")?;

    table.compact_and_flush(&mut backend);

    assert_eq!(slot(&table, d1), Some(0));
    assert_eq!(slot(&table, d2), Some(1));
    assert_eq!(slot(&table, p1), Some(2));

    let info = backend.last_info().context("no info written")?;
    assert_eq!(info.lights(LightType::Directional), 2);
    assert_eq!(info.lights(LightType::Spot), 0);
    assert_eq!(info.lights(LightType::Point), 1);
    assert_eq!(info.count(SceneObjectCategory::Light), 3);

    assert_compacted(&table, &backend, &[d1, p1, d2]);
    Ok(())
}

#[test]
pub fn lights_stay_sorted_through_churn() -> anyhow::Result<()> {
    let mut table = table(32)?;
    let mut backend = RecordingSceneBackend::new();
    let mut live = Vec::new();

    for round in 0..6u32 {
        for i in 0..5u32 {
            let light = match (round + i) % 3 {
                0 => Light::point(Vec3::splat(i as f32), Vec3::ONE, 1.0, 0.0),
                1 => Light::spot(Vec3::ZERO, Vec3::NEG_Z, Vec3::ONE, 1.0, 0.0),
                _ => Light::directional(Vec3::NEG_Y, Vec3::ONE),
            };
            if let Some(handle) = table.add(&light) {
                live.push(handle);
            }
        }

        let removed: Vec<_> = live.iter().copied().step_by(3).collect();
        table.remove(&removed);
        live.retain(|h| !removed.contains(h));

        table.compact_and_flush(&mut backend);
        assert_compacted(&table, &backend, &live);

        let mut previous = LightType::Directional;
        for slot in 0..table.count(SceneObjectCategory::Light) {
            let handle = live
                .iter()
                .copied()
                .find(|&h| table.entry(h).map(|e| e.slot) == Some(slot))
                .context("slot without owner")?;
            let kind = table.get::<Light>(handle).context("light missing")?.kind()?;
            assert!(kind >= previous, "{kind:?} after {previous:?} in slot {slot}");
            previous = kind;
        }

        let info = table.info();
        assert_eq!(info.light_count.iter().sum::<u32>(), live.len() as u32);
    }
    Ok(())
}

#[test]
pub fn handles_are_unique_and_nonzero() -> anyhow::Result<()> {
    let mut table = table(64)?;
    let mut backend = RecordingSceneBackend::new();
    let mut live: Vec<SceneObjectHandle> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for round in 0..10 {
        for i in 0..8 {
            let handle = table.add(&sphere((round * 8 + i) as f32)).context("sphere table full")?;
            assert_ne!(handle.get(), 0);
            assert!(seen.insert(handle), "handle {handle:?} was handed out twice");
            live.push(handle);
        }
        let removed: Vec<_> = live.drain(..4).collect();
        table.remove(&removed);
        if round % 2 == 0 {
            table.compact_and_flush(&mut backend);
        }
    }

    assert_eq!(table.len(), live.len());
    assert!(live.iter().all(|&h| table.contains(h)));
    Ok(())
}

#[test]
pub fn removed_slot_is_reused_first() -> anyhow::Result<()> {
    let mut table = table(8)?;
    let handles = table.add_all(&[sphere(1.0), sphere(2.0), sphere(3.0)]);
    assert_eq!(handles.len(), 3);

    table.remove(&[handles[1]]);
    assert_eq!(table.count(SceneObjectCategory::Sphere), 3);

    let fresh = table.add(&sphere(4.0)).context("sphere table full")?;
    assert_eq!(slot(&table, fresh), Some(1));
    assert_eq!(table.count(SceneObjectCategory::Sphere), 3);
    assert!(!table.contains(handles[1]));
    assert_ne!(fresh, handles[1]);

    let extra = table.add(&sphere(5.0)).context("sphere table full")?;
    assert_eq!(slot(&table, extra), Some(3));
    Ok(())
}

#[test]
pub fn identical_update_flushes_nothing() -> anyhow::Result<()> {
    let mut table = table(8)?;
    let mut backend = RecordingSceneBackend::new();

    let cubes = table.add_all(&[Cube::default(), Cube { min: Vec3::ONE, max: Vec3::splat(2.0) }]);
    table.compact_and_flush(&mut backend);
    assert_eq!(backend.writes_of(SceneObjectCategory::Cube), [(0, 48)]);

    backend.clear_writes();
    assert!(table.update(cubes[1], &Cube { min: Vec3::ONE, max: Vec3::splat(2.0) }));
    table.compact_and_flush(&mut backend);
    assert!(backend.writes.is_empty());

    assert!(table.update(cubes[1], &Cube::default()));
    table.compact_and_flush(&mut backend);
    assert_eq!(backend.writes_of(SceneObjectCategory::Cube), [(24, 24)]);
    Ok(())
}

#[test]
pub fn mismatched_update_leaves_data() -> anyhow::Result<()> {
    let mut table = table(4)?;
    let plane = table.add(&Plane { dir: Vec3::Y, dist: 1.0 }).context("plane")?;

    assert!(!table.update(plane, &sphere(9.0)));
    assert_eq!(table.get::<Plane>(plane), Some(Plane { dir: Vec3::Y, dist: 1.0 }));
    assert!(!table.update(SceneObjectHandle::new(999).context("zero")?, &Plane::default()));
    Ok(())
}

#[test]
pub fn full_category_returns_none() -> anyhow::Result<()> {
    let mut table = table(2)?;
    assert!(table.add(&Triangle::default()).is_some());
    assert!(table.add(&Triangle::default()).is_some());
    assert!(table.add(&Triangle::default()).is_none());
    // Other categories are unaffected.
    assert!(table.add(&sphere(1.0)).is_some());
    Ok(())
}

#[test]
pub fn compaction_moves_tail_objects() -> anyhow::Result<()> {
    let mut table = table(8)?;
    let mut backend = RecordingSceneBackend::new();

    let spheres = table.add_all(&[sphere(0.0), sphere(1.0), sphere(2.0), sphere(3.0)]);
    table.compact_and_flush(&mut backend);
    backend.clear_writes();

    table.remove(&[spheres[0], spheres[2]]);
    table.compact_and_flush(&mut backend);

    assert_eq!(table.count(SceneObjectCategory::Sphere), 2);
    assert_eq!(table.get::<Sphere>(spheres[1]).map(|s| s.rad), Some(1.0));
    assert_eq!(table.get::<Sphere>(spheres[3]).map(|s| s.rad), Some(3.0));
    assert_eq!(slot(&table, spheres[1]), Some(0));
    assert_eq!(slot(&table, spheres[3]), Some(1));
    assert_compacted(&table, &backend, &spheres);
    Ok(())
}

/// Material indices are assigned by a running id over triangles, spheres,
/// cubes and planes. Reassigning materials while geometry and materials move
/// must keep every index pointing at the right material slot.
#[test]
pub fn interleaved_material_reassignment() -> anyhow::Result<()> {
    let mut table = table(8)?;
    let mut backend = RecordingSceneBackend::new();

    let materials = table.add_all(&[material(0.0), material(0.25), material(0.5), material(0.75)]);
    let triangles = table.add_all(&[Triangle::default(); 3]);
    let spheres = table.add_all(&[sphere(1.0), sphere(2.0)]);
    let cubes = table.add_all(&[Cube::default(); 2]);
    let planes = table.add_all(&[Plane::default()]);

    let assign = |table: &mut SceneObjectTable, geometry: SceneObjectHandle, material: usize| {
        assert!(table.set_material(geometry, Some(materials[material])));
    };

    assign(&mut table, triangles[0], 3);
    assign(&mut table, triangles[2], 1);
    assign(&mut table, spheres[1], 2);
    assign(&mut table, cubes[0], 3);
    assign(&mut table, planes[0], 1);
    table.compact_and_flush(&mut backend);

    // triangles 0..3, spheres 3..5, cubes 5..7, plane 7
    assert_eq!(table.material_indices(), [3, 0, 1, 0, 2, 3, 0, 1]);

    // Drop a material, a triangle and a cube, and reassign across categories
    // in the same cycle.
    table.remove(&[materials[0], triangles[1], cubes[1]]);
    assign(&mut table, spheres[0], 3);
    assign(&mut table, cubes[0], 1);
    assign(&mut table, triangles[0], 2);
    table.compact_and_flush(&mut backend);

    // Materials 1, 2, 3 slid into slots 0, 1, 2.
    let material_slot = |i: usize| slot(&table, materials[i]);
    assert_eq!(material_slot(1), Some(0));
    assert_eq!(material_slot(2), Some(1));
    assert_eq!(material_slot(3), Some(2));

    // triangles 0..2, spheres 2..4, cube 4, plane 5
    assert_eq!(table.material_indices(), [1, 0, 2, 1, 0, 0]);
    for (geometry_id, &expected) in table.material_indices().iter().enumerate() {
        assert_eq!(backend.material_index(geometry_id), Some(expected), "geometry {geometry_id}");
    }

    assert_compacted(
        &table,
        &backend,
        &[
            materials.as_slice(),
            triangles.as_slice(),
            spheres.as_slice(),
            cubes.as_slice(),
            planes.as_slice(),
        ]
        .concat(),
    );
    Ok(())
}

#[test]
pub fn info_tracks_every_flush() -> anyhow::Result<()> {
    let mut table = table(4)?;
    let mut backend = RecordingSceneBackend::new();

    table.add(&Light::spot(Vec3::ZERO, Vec3::NEG_Z, Vec3::ONE, 3.0, 0.2)).context("spot")?;
    let ball = table.add(&sphere(1.0)).context("sphere")?;
    table.compact_and_flush(&mut backend);
    table.remove(&[ball]);
    table.compact_and_flush(&mut backend);

    assert_eq!(backend.infos.len(), 2);
    assert_eq!(backend.infos[0].count(SceneObjectCategory::Sphere), 1);
    assert_eq!(backend.infos[1].count(SceneObjectCategory::Sphere), 0);
    assert_eq!(backend.infos[1].lights(LightType::Spot), 1);
    Ok(())
}
