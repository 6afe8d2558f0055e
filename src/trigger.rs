use crate::input::ControllerId;
use bitflags::bitflags;

bitflags! {
    /// Controllers whose trigger is currently held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TriggerSet: u8 {
        const PRIMARY = 1;
        const SECONDARY = 1 << 1;
    }
}

impl TriggerSet {
    pub fn flag(id: ControllerId) -> Self {
        match id {
            ControllerId::Primary => TriggerSet::PRIMARY,
            ControllerId::Secondary => TriggerSet::SECONDARY,
        }
    }

    pub fn press(&mut self, id: ControllerId) {
        self.insert(Self::flag(id));
    }

    pub fn release(&mut self, id: ControllerId) {
        self.remove(Self::flag(id));
    }

    pub fn is_pressed(&self, id: ControllerId) -> bool {
        self.contains(Self::flag(id))
    }

    pub fn count(&self) -> u32 {
        self.bits().count_ones()
    }

    /// First held controller, primary before secondary.
    pub fn first(&self) -> Option<ControllerId> {
        ControllerId::ALL.into_iter().find(|id| self.is_pressed(*id))
    }
}
