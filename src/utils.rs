use std::io;

use rand::Rng;
use thiserror::Error;

/// Error types for building and querying a grammar
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

/// Source of the random choices made while generating.
///
/// Every expansion point asks for one index among `count` alternatives.
/// `count` is always at least 1 and the answer must lie in `0..count`.
pub trait RandomPick {
    fn pick(&mut self, count: usize) -> usize;
}

impl<F> RandomPick for F
where
    F: FnMut(usize) -> usize,
{
    fn pick(&mut self, count: usize) -> usize {
        self(count)
    }
}

/// Uniform picks backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngPick<R>(pub R);

impl<R: Rng> RandomPick for RngPick<R> {
    fn pick(&mut self, count: usize) -> usize {
        self.0.gen_range(0..count)
    }
}

/// Picks drawn from the calling thread's generator
pub fn thread_pick() -> RngPick<rand::rngs::ThreadRng> {
    RngPick(rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_closure_pick() {
        let mut script = vec![2usize, 0, 1].into_iter();
        let mut pick = move |_count: usize| script.next().unwrap_or(0);

        assert_eq!(pick.pick(3), 2);
        assert_eq!(pick.pick(3), 0);
        assert_eq!(pick.pick(3), 1);
    }

    #[test]
    fn test_rng_pick_in_range() {
        let mut pick = RngPick(StdRng::seed_from_u64(7));
        for count in 1..50 {
            assert!(pick.pick(count) < count);
        }
    }

    #[test]
    fn test_single_choice_is_zero() {
        let mut pick = thread_pick();
        for _ in 0..20 {
            assert_eq!(pick.pick(1), 0);
        }
    }

    #[test]
    fn test_error_messages() {
        let err = GrammarError::InvalidGrammar("empty grammar".to_string());
        assert_eq!(err.to_string(), "Invalid grammar: empty grammar");

        let err = GrammarError::InvalidArgument("unknown symbol: <x>".to_string());
        assert_eq!(err.to_string(), "Invalid argument: unknown symbol: <x>");
    }
}
