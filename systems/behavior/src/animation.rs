//! Flipbook playback shared by every species.

/// Four-beat walk cycle alternating between two stride frames.
pub(crate) const WALK_CYCLE: &[usize] = &[0, 1, 0, 2];
/// Four sequential frames, used by tank treads and four-stage spawn-ins.
pub(crate) const FOUR_FRAMES: &[usize] = &[0, 1, 2, 3];
/// Six sequential frames, used by the prog spawn-in.
pub(crate) const SIX_FRAMES: &[usize] = &[0, 1, 2, 3, 4, 5];
/// Full pregnant telegraph cycle.
pub(crate) const SEVEN_FRAMES: &[usize] = &[0, 1, 2, 3, 4, 5, 6];
/// Single still frame.
pub(crate) const FIRST_FRAME: &[usize] = &[0];
/// Alternate still frame, used by electrodes.
pub(crate) const SECOND_FRAME: &[usize] = &[1];

/// Ticks between flipbook steps for walk cycles.
pub(crate) const WALK_FRAME_DELAY: u32 = 10;
/// Ticks between spawn-in and telegraph steps.
pub(crate) const STAGE_FRAME_DELAY: u32 = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Animation {
    action: &'static str,
    flipbook: &'static [usize],
    index: usize,
    delay: u32,
    frame_delay: u32,
    flip_x: bool,
}

impl Animation {
    pub(crate) fn new(action: &'static str, flipbook: &'static [usize], frame_delay: u32) -> Self {
        debug_assert!(!flipbook.is_empty(), "flipbooks must hold a frame");
        Self {
            action,
            flipbook,
            index: 0,
            delay: 0,
            frame_delay: frame_delay.max(1),
            flip_x: false,
        }
    }

    pub(crate) const fn action(&self) -> &'static str {
        self.action
    }

    pub(crate) fn frame(&self) -> usize {
        self.flipbook[self.index % self.flipbook.len()]
    }

    pub(crate) const fn flip_x(&self) -> bool {
        self.flip_x
    }

    pub(crate) fn set_flip_x(&mut self, flip_x: bool) {
        self.flip_x = flip_x;
    }

    /// Switches animation, restarting playback only when something changed.
    pub(crate) fn play(&mut self, action: &'static str, flipbook: &'static [usize]) {
        if self.action != action || self.flipbook != flipbook {
            self.action = action;
            self.flipbook = flipbook;
            self.index = 0;
            self.delay = 0;
        }
    }

    /// Counts one tick and steps the flipbook once the delay elapses.
    pub(crate) fn advance(&mut self) {
        self.delay += 1;
        if self.delay >= self.frame_delay {
            self.delay = 0;
            self.step();
        }
    }

    /// Steps the flipbook immediately.
    pub(crate) fn step(&mut self) {
        self.index = (self.index + 1) % self.flipbook.len();
    }

    #[cfg(test)]
    pub(crate) const fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_wraps_within_flipbook() {
        let mut animation = Animation::new("walk", WALK_CYCLE, 2);
        for _ in 0..101 {
            animation.advance();
            assert!(animation.index() < WALK_CYCLE.len());
        }
        assert_eq!(animation.index(), (101 / 2) % WALK_CYCLE.len());
    }

    #[test]
    fn replaying_same_animation_keeps_progress() {
        let mut animation = Animation::new("walk", WALK_CYCLE, 1);
        animation.advance();
        animation.play("walk", WALK_CYCLE);
        assert_eq!(animation.index(), 1);

        animation.play("walk_up", WALK_CYCLE);
        assert_eq!(animation.index(), 0);
        assert_eq!(animation.action(), "walk_up");
    }

    #[test]
    fn walk_cycle_alternates_strides() {
        let mut animation = Animation::new("walk", WALK_CYCLE, 1);
        let frames: Vec<usize> = (0..4)
            .map(|_| {
                animation.step();
                animation.frame()
            })
            .collect();
        assert_eq!(frames, vec![1, 0, 2, 0]);
    }
}
