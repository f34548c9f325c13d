//! # Stack Capture
//!
//! The unwinding engine lives outside this crate. [`Unwinder`] is the seam it
//! plugs into: `notify` asks the installed unwinder for the current call stack
//! and forwards whatever comes back.

use crate::types::StackFrame;

/// Produces the frames of the calling thread's stack, innermost first.
pub trait Unwinder
{
    /// Capture at most `max_frames` frames.
    fn capture(&self, max_frames: usize) -> Vec<StackFrame>;
}

/// Captures nothing. Used until a real unwinder is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUnwinder;

impl Unwinder for NoopUnwinder
{
    fn capture(&self, _max_frames: usize) -> Vec<StackFrame>
    {
        Vec::new()
    }
}

/// Replays a fixed stack, e.g. one a signal handler captured earlier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedStack
{
    frames: Vec<StackFrame>,
}

impl CapturedStack
{
    pub fn new(frames: Vec<StackFrame>) -> Self
    {
        Self { frames }
    }

    pub fn frames(&self) -> &[StackFrame]
    {
        &self.frames
    }
}

impl Unwinder for CapturedStack
{
    fn capture(&self, max_frames: usize) -> Vec<StackFrame>
    {
        self.frames.iter().take(max_frames).cloned().collect()
    }
}

impl From<Vec<StackFrame>> for CapturedStack
{
    fn from(frames: Vec<StackFrame>) -> Self
    {
        Self::new(frames)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_captured_stack_truncates()
    {
        let stack = CapturedStack::new((0..10_u64).map(StackFrame::at).collect());

        let frames = stack.capture(3);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2], StackFrame::at(2_u64));
    }

    #[test]
    fn test_noop_captures_nothing()
    {
        assert!(NoopUnwinder.capture(192).is_empty());
    }
}
