use std::fmt::Debug;

/// Unwrap a value whose absence would be a bug in flint itself (never a user error).
pub trait OrBug<T> {
    /// Unwrap or panic with a `[BUG]` message naming the broken invariant.
    #[track_caller]
    fn or_bug(self, invariant: &str) -> T;
}

impl<T, E: Debug> OrBug<T> for Result<T, E> {
    #[track_caller]
    fn or_bug(self, invariant: &str) -> T {
        self.unwrap_or_else(|e| panic!("[BUG] {invariant}: {e:?}"))
    }
}

impl<T> OrBug<T> for Option<T> {
    #[track_caller]
    fn or_bug(self, invariant: &str) -> T {
        self.unwrap_or_else(|| panic!("[BUG] {invariant}"))
    }
}
