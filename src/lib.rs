pub mod bridge;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controller;
pub mod debug_visuals;
pub mod events;
pub mod input;
pub mod modes;
pub mod recording;
pub mod rig;
pub mod trigger;
pub mod viewer;

pub use bridge::CoordinateBridge;
pub use controller::NavigationController;
pub use modes::NavigationModeKind;
pub use rig::NavigationRig;

pub(crate) fn wrap_angle(mut radians: f32) -> f32 {
    let two_pi = 2.0 * std::f32::consts::PI;
    while radians > std::f32::consts::PI {
        radians -= two_pi;
    }
    while radians < -std::f32::consts::PI {
        radians += two_pi;
    }
    radians
}
