//! Orbit camera driven by [`InputEvent`]s.
//!
//! The camera orbits a focus point at a fixed distance. Left drag rotates,
//! shift + left drag or right drag pans, the wheel zooms. With damping the
//! drag feeds a pending rotation that [`OrbitCamera::update`] drains over
//! several frames.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

use crate::input::{InputEvent, MouseButton};
use crate::scene::CameraOverride;
use crate::surface::{CameraSetup, OrbitSettings, Projection};

const ROTATE_PER_PIXEL: f32 = 0.005;
const PAN_PER_PIXEL: f32 = 0.0015;
const ZOOM_PER_TICK: f32 = 0.1;
const MIN_DISTANCE: f32 = 0.05;
const MAX_DISTANCE: f32 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    Rotate,
    Pan,
}

/// Orbit camera state for one surface.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    setup: CameraSetup,
    settings: OrbitSettings,
    orientation: Quat,
    distance: f32,
    initial_distance: f32,
    focus: Vec3,
    pending_rotation: Vec2,
    drag: Option<Drag>,
    shift: bool,
    last_cursor: Option<Vec2>,
}

impl OrbitCamera {
    /// Camera placed as `setup` describes.
    #[must_use]
    pub fn new(setup: CameraSetup, settings: OrbitSettings) -> Self {
        let offset = setup.position - setup.target;
        let distance = offset.length().max(MIN_DISTANCE);
        Self {
            setup,
            settings,
            orientation: look_rotation(offset),
            distance,
            initial_distance: distance,
            focus: setup.target,
            pending_rotation: Vec2::ZERO,
            drag: None,
            shift: false,
            last_cursor: None,
        }
    }

    /// Return to the configured placement.
    pub fn reset(&mut self) {
        *self = Self::new(self.setup, self.settings);
    }

    /// Apply a sample's camera request. Unset fields keep the current
    /// placement, and the result becomes the new reset placement.
    pub fn retarget(&mut self, request: &CameraOverride) {
        let setup = CameraSetup {
            position: request.position.unwrap_or_else(|| self.eye()),
            target: request.target.unwrap_or(self.focus),
            projection: request.projection,
        };
        *self = Self::new(setup, self.settings);
    }

    /// Eye position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.focus + self.orientation * Vec3::Z * self.distance
    }

    /// Orbit pivot.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.focus
    }

    /// Camera up vector.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Projection, with orthographic height following the zoom.
    #[must_use]
    pub fn projection(&self) -> Projection {
        match self.setup.projection {
            Projection::Orthographic { height, near, far } => {
                Projection::Orthographic {
                    height: height * self.distance / self.initial_distance,
                    near,
                    far,
                }
            }
            perspective @ Projection::Perspective { .. } => perspective,
        }
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), self.focus, self.up());
        self.projection().matrix(aspect) * view
    }

    /// Feed one pointer event. Returns `true` if the camera consumed it.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.settings.enabled {
            return false;
        }
        match *event {
            InputEvent::ModifiersChanged { shift } => {
                self.shift = shift;
                false
            }
            InputEvent::MouseButton { button, pressed } => {
                self.drag = match (pressed, button) {
                    (false, _) | (true, MouseButton::Middle) => None,
                    (true, MouseButton::Left) if !self.shift => Some(Drag::Rotate),
                    (true, _) => Some(Drag::Pan),
                };
                true
            }
            InputEvent::CursorMoved { x, y } => {
                let cursor = Vec2::new(x, y);
                let delta = self.last_cursor.map_or(Vec2::ZERO, |last| cursor - last);
                self.last_cursor = Some(cursor);
                match self.drag {
                    Some(Drag::Rotate) => {
                        let angle = delta * ROTATE_PER_PIXEL * self.settings.rotate_speed;
                        if self.settings.damping.is_some() {
                            self.pending_rotation += angle;
                        } else {
                            self.rotate(angle);
                        }
                        true
                    }
                    Some(Drag::Pan) => {
                        self.pan(delta);
                        true
                    }
                    None => false,
                }
            }
            InputEvent::Scroll { delta } => {
                self.zoom(delta);
                true
            }
        }
    }

    /// Advance damping and auto-rotation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.settings.auto_rotate != 0.0 {
            self.orientation =
                (Quat::from_rotation_y(self.settings.auto_rotate * dt) * self.orientation)
                    .normalize();
        }
        if let Some(damping) = self.settings.damping {
            let step = self.pending_rotation * damping;
            self.rotate(step);
            self.pending_rotation -= step;
            if self.pending_rotation.length_squared() < 1e-10 {
                self.pending_rotation = Vec2::ZERO;
            }
        }
    }

    fn rotate(&mut self, angle: Vec2) {
        // Yaw around world up keeps the horizon level.
        let yaw = Quat::from_rotation_y(-angle.x);
        let right = yaw * self.orientation * Vec3::X;
        let pitch = Quat::from_axis_angle(right, -angle.y);
        let next = (pitch * yaw * self.orientation).normalize();
        // Stop just short of the poles.
        if (next * Vec3::Y).y > 0.01 {
            self.orientation = next;
        } else {
            self.orientation = (yaw * self.orientation).normalize();
        }
    }

    fn pan(&mut self, delta: Vec2) {
        let scale = PAN_PER_PIXEL * self.distance * self.settings.pan_speed;
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        self.focus += right * (-delta.x * scale) + up * (delta.y * scale);
    }

    fn zoom(&mut self, delta: f32) {
        let factor = 1.0 - delta * ZOOM_PER_TICK * self.settings.zoom_speed;
        self.distance =
            (self.distance * factor.max(0.1)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

/// Rotation whose +Z axis points along `offset` with +Y as close to world up
/// as possible.
fn look_rotation(offset: Vec3) -> Quat {
    let z = offset.try_normalize().unwrap_or(Vec3::Z);
    let x = Vec3::Y.cross(z).try_normalize().unwrap_or(Vec3::X);
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> CameraSetup {
        CameraSetup {
            position: Vec3::new(5.0, 5.0, 5.0),
            target: Vec3::ZERO,
            projection: Projection::perspective(50.0),
        }
    }

    fn undamped() -> OrbitSettings {
        OrbitSettings {
            damping: None,
            ..OrbitSettings::default()
        }
    }

    fn drag(cam: &mut OrbitCamera, button: MouseButton, to: Vec2) {
        let _ = cam.handle_input(&InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        let _ = cam.handle_input(&InputEvent::MouseButton { button, pressed: true });
        let _ = cam.handle_input(&InputEvent::CursorMoved { x: to.x, y: to.y });
        let _ = cam.handle_input(&InputEvent::MouseButton { button, pressed: false });
    }

    #[test]
    fn starts_at_configured_placement() {
        let cam = OrbitCamera::new(setup(), undamped());
        assert!(cam.eye().distance(Vec3::splat(5.0)) < 1e-4);
        assert_eq!(cam.target(), Vec3::ZERO);
        assert!(cam.up().y > 0.0);
    }

    #[test]
    fn rotation_keeps_distance_and_reset_restores() {
        let mut cam = OrbitCamera::new(setup(), undamped());
        let before = cam.eye();
        drag(&mut cam, MouseButton::Left, Vec2::new(120.0, 30.0));
        assert!(cam.eye().distance(before) > 0.1);
        assert!((cam.eye().length() - before.length()).abs() < 1e-3);
        cam.reset();
        assert!(cam.eye().distance(before) < 1e-4);
    }

    #[test]
    fn right_drag_pans_focus() {
        let mut cam = OrbitCamera::new(setup(), undamped());
        drag(&mut cam, MouseButton::Right, Vec2::new(50.0, 0.0));
        assert_ne!(cam.target(), Vec3::ZERO);
    }

    #[test]
    fn damping_drains_after_release() {
        let mut cam = OrbitCamera::new(setup(), OrbitSettings::default());
        let before = cam.eye();
        drag(&mut cam, MouseButton::Left, Vec2::new(200.0, 0.0));
        assert!(cam.eye().distance(before) < 1e-4);
        cam.update(1.0 / 60.0);
        let moved = cam.eye();
        assert!(moved.distance(before) > 1e-4);
        cam.update(1.0 / 60.0);
        assert!(cam.eye().distance(moved) > 0.0);
    }

    #[test]
    fn scroll_zooms_in() {
        let mut cam = OrbitCamera::new(setup(), undamped());
        let before = cam.eye().length();
        assert!(cam.handle_input(&InputEvent::Scroll { delta: 1.0 }));
        assert!(cam.eye().length() < before);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let settings = OrbitSettings {
            enabled: false,
            ..undamped()
        };
        let mut cam = OrbitCamera::new(setup(), settings);
        assert!(!cam.handle_input(&InputEvent::Scroll { delta: 3.0 }));
        drag(&mut cam, MouseButton::Left, Vec2::new(100.0, 100.0));
        assert!(cam.eye().distance(Vec3::splat(5.0)) < 1e-4);
    }

    #[test]
    fn retarget_keeps_unset_fields() {
        let mut cam = OrbitCamera::new(setup(), undamped());
        drag(&mut cam, MouseButton::Left, Vec2::new(80.0, 0.0));
        let eye = cam.eye();
        cam.retarget(&CameraOverride {
            projection: Projection::Orthographic {
                height: 8.0,
                near: 0.1,
                far: 100.0,
            },
            position: None,
            target: Some(Vec3::X),
        });
        assert!(cam.eye().distance(eye) < 1e-4);
        assert_eq!(cam.target(), Vec3::X);
        assert!(matches!(cam.projection(), Projection::Orthographic { .. }));
        cam.reset();
        assert!(cam.eye().distance(eye) < 1e-4);
    }

    #[test]
    fn orthographic_height_follows_zoom() {
        let ortho = CameraSetup {
            projection: Projection::Orthographic {
                height: 10.0,
                near: 0.1,
                far: 100.0,
            },
            ..setup()
        };
        let mut cam = OrbitCamera::new(ortho, undamped());
        let _ = cam.handle_input(&InputEvent::Scroll { delta: 2.0 });
        match cam.projection() {
            Projection::Orthographic { height, .. } => assert!(height < 10.0),
            Projection::Perspective { .. } => unreachable!(),
        }
    }
}
