/// Single-request-in-flight flag shared by every pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusyGate {
    busy: bool,
}

impl BusyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false without side effects when a call is already outstanding.
    pub fn try_enter(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn exit(&mut self) {
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
