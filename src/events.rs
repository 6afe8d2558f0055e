use crate::input::ControllerId;
use crate::modes::NavigationModeKind;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    ModeChanged { from: NavigationModeKind, to: NavigationModeKind },
    TriggerPressed { controller: ControllerId },
    TriggerReleased { controller: ControllerId },
    ControllerConnected { controller: ControllerId },
    ControllerDisconnected { controller: ControllerId },
    SessionStarted { scale: f32 },
    SessionEnded,
}

impl fmt::Display for NavigationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationEvent::ModeChanged { from, to } => write!(f, "ModeChanged from={from} to={to}"),
            NavigationEvent::TriggerPressed { controller } => {
                write!(f, "TriggerPressed controller={controller}")
            }
            NavigationEvent::TriggerReleased { controller } => {
                write!(f, "TriggerReleased controller={controller}")
            }
            NavigationEvent::ControllerConnected { controller } => {
                write!(f, "ControllerConnected controller={controller}")
            }
            NavigationEvent::ControllerDisconnected { controller } => {
                write!(f, "ControllerDisconnected controller={controller}")
            }
            NavigationEvent::SessionStarted { scale } => write!(f, "SessionStarted scale={scale:.3}"),
            NavigationEvent::SessionEnded => write!(f, "SessionEnded"),
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<NavigationEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: NavigationEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<NavigationEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
