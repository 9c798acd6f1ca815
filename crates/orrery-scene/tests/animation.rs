use std::f32::consts::TAU;

use glam::Vec3;
use orrery_scene::{Camera, CameraRig, Orrery, SceneBuilder, SystemTable, Viewport};

fn default_orrery() -> Orrery {
    let table = SystemTable::default();
    let scene = SceneBuilder::new(&table).star_seed(Some(2024)).build();
    let camera = Camera {
        position: Vec3::new(-90.0, 140.0, 140.0),
        ..Camera::perspective(45.0, 1.0, 0.1, 2000.0)
    };
    Orrery::new(scene, camera, CameraRig::default(), Viewport::new(1280, 720))
}

#[test]
fn earth_after_one_thousand_ticks() {
    let mut orrery = default_orrery();
    for _ in 0..1000 {
        orrery.tick();
    }

    let earth = orrery.scene().pivot("Earth").unwrap();
    // 1000 × 0.01 = 10 rad of revolution, 1000 × 0.02 = 20 rad of spin.
    assert!((earth.revolution - 10.0f32.rem_euclid(TAU)).abs() < 1e-3);
    assert!((earth.revolution - 3.717).abs() < 1e-3);
    assert!((earth.mesh.spin - 20.0f32.rem_euclid(TAU)).abs() < 1e-3);
    assert!((earth.mesh.spin - 1.150).abs() < 1e-3);
}

#[test]
fn camera_orbit_after_one_thousand_ticks() {
    let mut orrery = default_orrery();
    for _ in 0..1000 {
        orrery.tick();
    }

    let camera = orrery.camera();
    assert!((camera.position.x - 140.0 * 1.0f32.sin()).abs() < 1e-2);
    assert!((camera.position.z - 140.0 * 1.0f32.cos()).abs() < 1e-2);
    assert_eq!(camera.position.y, 140.0);
    let to_origin = (-camera.position).normalize();
    assert!((camera.forward() - to_origin).length() < 1e-4);
}

#[test]
fn every_body_stays_on_its_orbit() {
    let mut orrery = default_orrery();
    for _ in 0..5000 {
        orrery.tick();
    }

    for instance in orrery.scene().mesh_instances() {
        let centre = instance.world.transform_point3(Vec3::ZERO);
        assert!(centre.y.abs() < 1e-3, "{} left the ecliptic", instance.node.name);
    }
    for pivot in &orrery.scene().pivots {
        let distance = pivot.body_position().length();
        assert!(
            (distance - pivot.body.orbital_distance).abs() < 1e-2,
            "{} drifted to {distance}",
            pivot.body.name
        );
        assert!((0.0..TAU).contains(&pivot.revolution));
        assert!((0.0..TAU).contains(&pivot.mesh.spin));
    }
}

#[test]
fn resize_then_tick_keeps_aspect() {
    let mut orrery = default_orrery();
    orrery.resize(0, 0);
    assert_eq!(orrery.viewport().size(), (1, 1));
    orrery.resize(2560, 1440);
    orrery.tick();
    assert!((orrery.camera().aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
}

#[test]
fn custom_table_drives_animation() {
    let text = r#"(
        sun: (radius: 8.0, texture: Sun, self_rotation_speed: 0.1),
        bodies: [
            (name: "Inner", radius: 1.0, texture: Mercury, orbital_distance: 20.0,
             self_rotation_speed: 0.5, orbital_revolution_speed: 0.25),
        ],
    )"#;
    let table = SystemTable::from_ron(text).unwrap();
    let scene = SceneBuilder::new(&table).star_count(10).star_seed(Some(1)).build();
    let mut orrery = Orrery::new(
        scene,
        Camera::default(),
        CameraRig::default(),
        Viewport::new(640, 480),
    );
    for _ in 0..4 {
        orrery.tick();
    }
    let inner = orrery.scene().pivot("Inner").unwrap();
    assert!((inner.revolution - 1.0).abs() < 1e-5);
    assert!((inner.mesh.spin - 2.0).abs() < 1e-5);
    assert_eq!(orrery.scene().mesh_instances().len(), 2);
}
