//! Stack frame types.

use super::Address;

/// One captured frame, as produced by the unwinder.
///
/// Frames are immutable once captured. `method` is empty when the unwinder
/// could not symbolicate the frame; the marshaler then falls back to the
/// frame address rendered as hex.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackFrame
{
    /// Program counter of the frame.
    pub frame_address: Address,
    /// Symbol name, or empty if unknown.
    pub method: String,
    /// Source or object file the frame belongs to.
    pub filename: String,
    /// Line number within `filename` (0 if unknown).
    pub line_number: u32,
}

impl StackFrame
{
    /// Frame with only an address, the common case for unsymbolicated native code.
    pub fn at(frame_address: impl Into<Address>) -> Self
    {
        Self {
            frame_address: frame_address.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter for the symbol name.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self
    {
        self.method = method.into();
        self
    }

    /// Builder-style setter for file and line.
    #[must_use]
    pub fn with_location(mut self, filename: impl Into<String>, line_number: u32) -> Self
    {
        self.filename = filename.into();
        self.line_number = line_number;
        self
    }

    /// Returns `true` if the unwinder resolved a symbol for this frame.
    pub fn is_symbolicated(&self) -> bool
    {
        !self.method.is_empty()
    }
}
