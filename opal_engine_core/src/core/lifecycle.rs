//! Tracks which subsystems were successfully brought up, so that teardown
//! releases exactly what was acquired, in reverse acquisition order.

/// The subsystems the engine acquires, in acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    /// The event bus.
    Events,
    /// The built-in event callbacks registered on the bus.
    Callbacks,
    /// The platform window.
    Window,
    /// GPU-side resources (graphics context, buffers, pipeline).
    Render,
}

/// Acquisition order; teardown walks this backwards.
const ACQUISITION_ORDER: [Subsystem; 4] = [
    Subsystem::Events,
    Subsystem::Callbacks,
    Subsystem::Window,
    Subsystem::Render,
];

/// One flag per subsystem.
///
/// A flag is set immediately after the corresponding acquisition succeeds and
/// consumed exactly once, during teardown. This guarantees teardown never
/// touches a resource that was never acquired and never releases one twice.
#[derive(Debug, Default)]
pub struct CleanupState {
    events_initialized: bool,
    callbacks_registered: bool,
    window_initialized: bool,
    render_initialized: bool,
}

impl CleanupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `subsystem` was successfully brought up.
    pub fn mark_up(&mut self, subsystem: Subsystem) {
        *self.flag_mut(subsystem) = true;
    }

    pub fn is_up(&self, subsystem: Subsystem) -> bool {
        match subsystem {
            Subsystem::Events => self.events_initialized,
            Subsystem::Callbacks => self.callbacks_registered,
            Subsystem::Window => self.window_initialized,
            Subsystem::Render => self.render_initialized,
        }
    }

    /// Returns the subsystems to release, in reverse acquisition order, and
    /// clears their flags.
    ///
    /// Only subsystems whose flag is set appear in the result, so a partially
    /// failed startup unwinds exactly as far as it got. Draining twice yields
    /// an empty list the second time.
    pub fn drain_for_teardown(&mut self) -> Vec<Subsystem> {
        let mut stages = Vec::with_capacity(ACQUISITION_ORDER.len());
        for subsystem in ACQUISITION_ORDER.iter().rev() {
            let flag = self.flag_mut(*subsystem);
            if *flag {
                *flag = false;
                stages.push(*subsystem);
            }
        }
        stages
    }

    fn flag_mut(&mut self, subsystem: Subsystem) -> &mut bool {
        match subsystem {
            Subsystem::Events => &mut self.events_initialized,
            Subsystem::Callbacks => &mut self.callbacks_registered,
            Subsystem::Window => &mut self.window_initialized,
            Subsystem::Render => &mut self.render_initialized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_acquired_means_nothing_to_release() {
        let mut state = CleanupState::new();
        assert!(state.drain_for_teardown().is_empty());
    }

    #[test]
    fn full_startup_unwinds_in_reverse_order() {
        let mut state = CleanupState::new();
        state.mark_up(Subsystem::Events);
        state.mark_up(Subsystem::Callbacks);
        state.mark_up(Subsystem::Window);
        state.mark_up(Subsystem::Render);

        assert_eq!(
            state.drain_for_teardown(),
            vec![
                Subsystem::Render,
                Subsystem::Window,
                Subsystem::Callbacks,
                Subsystem::Events,
            ]
        );
    }

    #[test]
    fn partial_startup_unwinds_only_acquired_subsystems() {
        // Window acquisition failed: only callbacks and events get released.
        let mut state = CleanupState::new();
        state.mark_up(Subsystem::Events);
        state.mark_up(Subsystem::Callbacks);

        assert_eq!(
            state.drain_for_teardown(),
            vec![Subsystem::Callbacks, Subsystem::Events]
        );
    }

    #[test]
    fn draining_clears_the_flags() {
        let mut state = CleanupState::new();
        state.mark_up(Subsystem::Events);
        state.mark_up(Subsystem::Render);
        assert!(state.is_up(Subsystem::Events));

        let first = state.drain_for_teardown();
        assert_eq!(first, vec![Subsystem::Render, Subsystem::Events]);
        assert!(!state.is_up(Subsystem::Events));
        assert!(!state.is_up(Subsystem::Render));
        assert!(state.drain_for_teardown().is_empty());
    }
}
