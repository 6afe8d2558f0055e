use crate::bridge::CoordinateBridge;
use crate::camera::VirtualCamera;
use crate::config::NavigationConfig;
use crate::events::{EventBus, NavigationEvent};
use crate::input::{ControllerId, ControllerSet, InputEvent, TriggerEdge};
use crate::modes::{
    FlyMode, FrameContext, ModeSlots, NavigationModeKind, RotateScaleMode, TransitionContext, TranslateMode,
};
use crate::rig::{rotation_facing, NavigationRig, SCENE_UP};
use crate::trigger::TriggerSet;
use crate::viewer::ViewerHost;
use glam::Vec3;
use tracing::{debug, info, warn};

/// Drives the rig from controller input.
///
/// Trigger edges select the active mode (none held: fly, one: translate, two: rotate/scale);
/// `update` advances the active mode once per rendered frame.
pub struct NavigationController {
    config: NavigationConfig,
    rig: NavigationRig,
    controllers: ControllerSet,
    triggered: TriggerSet,
    active: NavigationModeKind,
    modes: ModeSlots,
    events: EventBus,
}

impl NavigationController {
    pub fn new(config: NavigationConfig) -> Self {
        let mut controller = Self {
            config,
            rig: NavigationRig::default(),
            controllers: ControllerSet::new(),
            triggered: TriggerSet::default(),
            active: NavigationModeKind::Fly,
            modes: ModeSlots::default(),
            events: EventBus::default(),
        };
        controller.controllers.capture_start_poses();
        let ctx = TransitionContext {
            rig: &controller.rig,
            controllers: &controller.controllers,
            triggered: controller.triggered,
        };
        controller.modes.get_mut(NavigationModeKind::Fly).enter(&ctx);
        controller
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn rig(&self) -> &NavigationRig {
        &self.rig
    }

    pub fn set_rig(&mut self, rig: NavigationRig) {
        debug_assert!(rig.is_valid(), "rig must have a positive scale and unit orientation");
        self.rig = rig;
    }

    pub fn controllers(&self) -> &ControllerSet {
        &self.controllers
    }

    pub fn triggered(&self) -> TriggerSet {
        self.triggered
    }

    pub fn active_mode(&self) -> NavigationModeKind {
        self.active
    }

    pub fn fly(&self) -> &FlyMode {
        &self.modes.fly
    }

    pub fn translate(&self) -> &TranslateMode {
        &self.modes.translate
    }

    pub fn rotate_scale(&self) -> &RotateScaleMode {
        &self.modes.rotate_scale
    }

    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        self.events.drain()
    }

    /// Virtual camera for the current rig. Recomputed on every call.
    pub fn camera(&self) -> VirtualCamera {
        VirtualCamera::from_rig(&self.rig, &self.config.camera)
    }

    pub fn to_scene(&self, local: Vec3) -> Vec3 {
        CoordinateBridge::from_camera(&self.camera()).to_scene(local)
    }

    pub fn to_vr(&self, scene: Vec3) -> Vec3 {
        CoordinateBridge::from_camera(&self.camera()).to_vr(scene)
    }

    /// Applies one event from the device layer, switching modes on trigger edges.
    pub fn handle_input(&mut self, event: InputEvent) {
        match &event {
            InputEvent::Connected { controller, .. } => {
                self.events.push(NavigationEvent::ControllerConnected { controller: *controller });
            }
            InputEvent::Disconnected { controller } => {
                self.events.push(NavigationEvent::ControllerDisconnected { controller: *controller });
            }
            _ => {}
        }
        if let Some(TriggerEdge { controller, pressed }) = self.controllers.push(event) {
            if pressed {
                self.on_trigger_start(controller);
            } else {
                self.on_trigger_end(controller);
            }
        }
    }

    pub fn on_trigger_start(&mut self, controller: ControllerId) {
        self.triggered.press(controller);
        self.events.push(NavigationEvent::TriggerPressed { controller });
        self.apply_trigger_state();
    }

    pub fn on_trigger_end(&mut self, controller: ControllerId) {
        self.triggered.release(controller);
        self.events.push(NavigationEvent::TriggerReleased { controller });
        self.apply_trigger_state();
    }

    /// Resolves the mode for the held triggers and switches to it. Returns whether a transition
    /// happened; resolving an unchanged trigger set is a no-op.
    pub fn apply_trigger_state(&mut self) -> bool {
        self.set_mode(NavigationModeKind::for_trigger_count(self.triggered.count()))
    }

    /// Exits the active mode, re-snapshots both controllers, then enters `next`.
    pub fn set_mode(&mut self, next: NavigationModeKind) -> bool {
        if next == self.active {
            return false;
        }
        let previous = self.active;
        {
            let ctx =
                TransitionContext { rig: &self.rig, controllers: &self.controllers, triggered: self.triggered };
            self.modes.get_mut(previous).exit(&ctx);
        }

        // Every mode measures deltas from the poses held at entry, including controllers that
        // did not cause the transition.
        self.controllers.capture_start_poses();

        self.active = next;
        let ctx = TransitionContext { rig: &self.rig, controllers: &self.controllers, triggered: self.triggered };
        self.modes.get_mut(next).enter(&ctx);

        debug!(from = %previous, to = %next, triggered = self.triggered.count(), "navigation mode changed");
        self.events.push(NavigationEvent::ModeChanged { from: previous, to: next });
        true
    }

    /// Advances the active mode by one frame of `delta` seconds.
    pub fn update(&mut self, delta: f32, viewer: &mut dyn ViewerHost) {
        if !delta.is_finite() || delta < 0.0 {
            warn!(delta, "ignoring frame with invalid delta");
            return;
        }
        let mut ctx = FrameContext {
            rig: &mut self.rig,
            controllers: &self.controllers,
            config: &self.config,
            viewer,
        };
        self.modes.get_mut(self.active).update(&mut ctx, delta);
        debug_assert!(self.rig.is_valid(), "navigation produced an invalid rig: {:?}", self.rig);
    }

    /// Re-anchors the rig to the viewer's current view when an immersive session begins.
    ///
    /// The rig takes the view position, faces the horizontal view direction with its local up on
    /// the scene up axis, and adopts the viewer's movement speed as its scale.
    pub fn start_session(&mut self, viewer: &dyn ViewerHost) {
        let view = viewer.view();
        self.rig.position = view.position;

        let facing = -view.direction;
        let toward = Vec3::new(facing.x, facing.y, 0.0);
        match rotation_facing(toward, SCENE_UP) {
            Some(orientation) => self.rig.orientation = orientation,
            None => warn!(direction = ?view.direction, "view direction is vertical, keeping rig orientation"),
        }

        let speed = viewer.move_speed();
        if speed.is_finite() && speed > 0.0 {
            self.rig.scale = speed;
        } else {
            warn!(speed, "viewer move speed is not a usable scale, keeping {}", self.rig.scale);
        }

        info!(position = ?self.rig.position, scale = self.rig.scale, "immersive session started");
        self.events.push(NavigationEvent::SessionStarted { scale: self.rig.scale });
    }

    pub fn end_session(&mut self) {
        info!(mode = %self.active, "immersive session ended");
        self.events.push(NavigationEvent::SessionEnded);
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}
