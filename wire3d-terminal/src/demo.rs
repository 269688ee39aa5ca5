//! The cube-grid demo scene and its scripted camera path
use nalgebra::{Point3, Vector3};
use wire3d_core::{Observer, RenderConfig, Scene, Shape};

/// Distance between neighbouring cube centers
const GRID_SPACING: f32 = 1.1;

/// Depth of the cube grid
const GRID_DEPTH: f32 = 4.0;

/// Build a 5x5 grid of unit cubes in front of the observer
pub fn demo_scene(config: RenderConfig) -> Scene {
    let mut scene = Scene::new(config);
    for i in -2..=2 {
        for j in -2..=2 {
            let center = Point3::new(
                GRID_SPACING * i as f32,
                GRID_SPACING * j as f32,
                GRID_DEPTH,
            );
            scene.add_shape(Shape::cuboid(center, 1.0));
        }
    }
    scene
}

/// Scripted observer motion: back off, then slide along +Y, then along +X
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoPath {
    pub speed: f32,
    pub back_limit: f32,
    pub y_limit: f32,
    pub x_limit: f32,
}

impl DemoPath {
    /// Movement for this frame, or `None` once the path is finished
    pub fn next_move(&self, observer: &Observer) -> Option<Vector3<f32>> {
        let position = observer.position;
        if position.z > self.back_limit {
            Some(Vector3::new(0.0, 0.0, -self.speed))
        } else if position.y < self.y_limit {
            Some(Vector3::new(0.0, self.speed, 0.0))
        } else if position.x < self.x_limit {
            Some(Vector3::new(self.speed, 0.0, 0.0))
        } else {
            None
        }
    }

    /// Apply one step of the path to a scene
    pub fn advance(&self, scene: &mut Scene) -> bool {
        match self.next_move(scene.observer()) {
            Some(delta) => {
                scene.translate_observer(delta);
                true
            }
            None => false,
        }
    }
}

impl Default for DemoPath {
    fn default() -> Self {
        Self {
            speed: 0.05,
            back_limit: -2.0,
            y_limit: 1.0,
            x_limit: 1.0,
        }
    }
}
