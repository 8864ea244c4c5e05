/// Iteration index sequence for hyperbolic CORDIC.
///
/// Emits `1, 2, 3, 4, 4, 5, ..., 13, 13, 14, ..., 40, 40, ...` up to `n_iter`:
/// index `k` is emitted twice when it equals the current repeat trigger, and
/// the trigger then moves to `3k + 1`. Without these repeats the hyperbolic
/// rotations cannot cover the residual angle and the kernel does not converge.
///
/// The schedule is finite and input-independent, so every kernel invocation
/// runs exactly `len()` steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatSchedule {
    n_iter: u32,
    index: u32,
    trigger: u32,
}

impl RepeatSchedule {
    pub fn new(n_iter: u32) -> Self {
        Self {
            n_iter,
            index: 1,
            trigger: 4,
        }
    }

    /// Rewind to the first index.
    pub fn restart(&mut self) {
        self.index = 1;
        self.trigger = 4;
    }

    pub fn n_iter(&self) -> u32 {
        self.n_iter
    }

    /// True for indices in the repeat set `{4, 13, 40, 121, ...}`.
    pub fn is_repeat(k: u32) -> bool {
        let mut trigger = 4u64;
        while trigger < k as u64 {
            trigger = 3 * trigger + 1;
        }
        trigger == k as u64
    }

    /// Total number of steps for `n_iter`: `n_iter` plus one per repeat index.
    pub fn total_steps(n_iter: u32) -> usize {
        let mut repeats = 0usize;
        let mut trigger = 4u64;
        while trigger <= n_iter as u64 {
            repeats += 1;
            trigger = 3 * trigger + 1;
        }
        n_iter as usize + repeats
    }

    fn remaining(&self) -> usize {
        if self.index > self.n_iter {
            return 0;
        }
        // A repeat index whose trigger has already moved on was emitted once.
        let done = Self::total_steps(self.index - 1);
        let emitted_once = usize::from(self.index != self.trigger && Self::is_repeat(self.index));
        Self::total_steps(self.n_iter) - done - emitted_once
    }
}

impl Iterator for RepeatSchedule {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.index > self.n_iter {
            return None;
        }
        let current = self.index;
        if current == self.trigger {
            // Stay on this index for one more step.
            self.trigger = current.saturating_mul(3).saturating_add(1);
        } else {
            self.index += 1;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for RepeatSchedule {}

impl core::iter::FusedIterator for RepeatSchedule {}
