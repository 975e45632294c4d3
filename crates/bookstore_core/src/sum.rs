//! crates/bookstore_core/src/sum.rs
//!
//! Three alternative implementations of summing the integers `1..=n`.

/// Iterative loop. O(n) time, O(1) space.
pub fn sum_to_n_iterative(n: u64) -> u64 {
    (1..=n).sum()
}

/// Closed form `n(n+1)/2`. O(1) time, O(1) space.
pub fn sum_to_n_closed_form(n: u64) -> u64 {
    n * (n + 1) / 2
}

/// Recursion. O(n) time, O(n) stack; overflows the stack when `n` exceeds
/// what the calling thread's stack can hold.
pub fn sum_to_n_recursive(n: u64) -> u64 {
    if n <= 1 {
        n
    } else {
        n + sum_to_n_recursive(n - 1)
    }
}
