#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FocusPhase {
    #[default]
    Unmounted,
    Mounted {
        focused: bool,
    },
}

/// Which mechanism currently turns key presses or taps into buffer edits.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ActiveSurface {
    #[default]
    None,
    Native,
    Custom,
}

/// Handle for one scheduled auto-focus, bound to the mount that issued it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct FocusTicket(u64);

impl FocusTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Window focus handle shared by every element rendered from one view.
///
/// Created on first use and kept for the view's lifetime, so re-renders track the same handle.
#[derive(Clone, Debug)]
pub struct HandleSlot<H> {
    handle: Option<H>,
}

impl<H> Default for HandleSlot<H> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<H: Clone> HandleSlot<H> {
    pub fn resolve(&mut self, create: impl FnOnce() -> H) -> H {
        self.handle.get_or_insert_with(create).clone()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FocusCoordinator {
    phase: FocusPhase,
    surface: ActiveSurface,
    generation: u64,
    pending: Option<FocusTicket>,
}

impl FocusCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FocusPhase {
        self.phase
    }

    pub fn active_surface(&self) -> ActiveSurface {
        self.surface
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.phase, FocusPhase::Mounted { .. })
    }

    pub fn is_focused(&self) -> bool {
        matches!(self.phase, FocusPhase::Mounted { focused: true })
    }

    /// Enters the mounted phase and issues the ticket for the deferred focus.
    ///
    /// Returns `None` when already mounted, so a render loop may call this every frame.
    pub fn mount(&mut self) -> Option<FocusTicket> {
        if self.is_mounted() {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        let ticket = FocusTicket(self.generation);
        self.phase = FocusPhase::Mounted { focused: false };
        self.surface = ActiveSurface::None;
        self.pending = Some(ticket);
        Some(ticket)
    }

    pub fn unmount(&mut self) {
        self.phase = FocusPhase::Unmounted;
        self.surface = ActiveSurface::None;
        self.pending = None;
    }

    pub fn is_ticket_live(&self, ticket: FocusTicket) -> bool {
        self.is_mounted() && self.pending == Some(ticket)
    }

    /// Consumes a ticket issued by [`Self::mount`]. Stale or reused tickets are rejected.
    pub fn redeem(&mut self, ticket: FocusTicket) -> bool {
        if !self.is_ticket_live(ticket) {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn acquire(&mut self, surface: ActiveSurface) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let changed = !self.is_focused() || self.surface != surface;
        self.phase = FocusPhase::Mounted { focused: true };
        self.surface = surface;
        changed
    }

    pub fn release(&mut self) -> bool {
        if !self.is_focused() {
            return false;
        }
        self.phase = FocusPhase::Mounted { focused: false };
        self.surface = ActiveSurface::None;
        true
    }

    /// Auto-release once a secure code is complete. Non-secure entry keeps focus.
    pub fn after_buffer_change(&mut self, len: usize, digit_count: usize, secure: bool) -> bool {
        if secure && len == digit_count {
            return self.release();
        }
        false
    }

    /// A tap on the display re-focuses only a mounted view holding a complete code.
    pub fn tap_refocuses(&self, len: usize, digit_count: usize) -> bool {
        self.is_mounted() && len == digit_count
    }

    pub fn tap_display(&mut self, len: usize, digit_count: usize, surface: ActiveSurface) -> bool {
        if !self.tap_refocuses(len, digit_count) {
            return false;
        }
        self.acquire(surface)
    }
}
