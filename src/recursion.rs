//! Depth and work-budget guard for recursive walks over node trees.
//!
//! Node trees are owned (`Box`/`Vec`), so a walk can't revisit a node through
//! an alias and plain descent is bounded by the input size. What it can do is
//! go very deep, or keep re-entering itself when a conditional collapses and
//! its branch is substituted again. The guard bounds both: nesting depth via
//! [`enter`](RecursionGuard::enter), and re-entries per top-level call via
//! [`tick`](RecursionGuard::tick).
//!
//! ```ignore
//! let mut guard = RecursionGuard::with_profile(RecursionProfile::Substitution);
//! match guard.enter() {
//!     RecursionResult::Entered => {
//!         let out = walk(node, &mut guard);
//!         guard.leave();
//!         out
//!     }
//!     _ => node.clone(),
//! }
//! ```

/// Named limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Generic substitution, including conditionals resolved along the way.
    ///
    /// depth = 128, re-entries = 100,000
    Substitution,

    /// Custom limits for one-off or test scenarios.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Substitution => 128,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::Substitution => 100_000,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

#[derive(Debug)]
pub struct RecursionGuard {
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl RecursionGuard {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self { depth: 0, iterations: 0, max_depth, max_iterations, exceeded: false }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// One level deeper. Every `Entered` must be paired with exactly one
    /// [`leave`](Self::leave). Does not spend the iteration budget.
    pub fn enter(&mut self) -> RecursionResult {
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }

        self.depth += 1;
        RecursionResult::Entered
    }

    /// Spend one unit of the iteration budget before re-walking a tree that
    /// was already walked. Nothing to pair it with.
    pub fn tick(&mut self) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        RecursionResult::Entered
    }

    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "RecursionGuard::leave() without a matching enter()");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether any limit was hit since construction.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

impl Drop for RecursionGuard {
    fn drop(&mut self) {
        if cfg!(debug_assertions) && !std::thread::panicking() {
            debug_assert_eq!(self.depth, 0, "RecursionGuard dropped with {} unmatched enter()", self.depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_limit_denies_and_recovers() {
        let mut guard = RecursionGuard::new(2, 100);
        assert!(guard.enter().is_entered());
        assert!(guard.enter().is_entered());
        assert_eq!(guard.enter(), RecursionResult::DepthExceeded);
        assert!(guard.is_exceeded());
        guard.leave();
        assert!(guard.enter().is_entered());
        guard.leave();
        guard.leave();
        assert_eq!(guard.depth(), 0);
    }

    #[test]
    fn iteration_budget_is_spent_by_ticks_only() {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Custom { max_depth: 10, max_iterations: 3 });
        for _ in 0..50 {
            assert!(guard.enter().is_entered());
            guard.leave();
        }
        assert_eq!(guard.iterations(), 0);
        for _ in 0..3 {
            assert!(guard.tick().is_entered());
        }
        assert_eq!(guard.tick(), RecursionResult::IterationExceeded);
        assert!(guard.is_exceeded());
        assert_eq!(guard.iterations(), 4);
    }

    #[test]
    fn substitution_profile_limits() {
        assert_eq!(RecursionProfile::Substitution.max_depth(), 128);
        assert_eq!(RecursionProfile::Substitution.max_iterations(), 100_000);
    }
}
