use std::fmt::{self, Write};

/// Strongly typed code address of a captured frame
///
/// This wrapper around `u64` keeps instruction addresses apart from line
/// numbers and other integers that travel through the same frame record.
///
/// ## Example
///
/// ```rust
/// use crashbridge_core::types::Address;
///
/// let addr = Address::from(0x1A2B_u64);
/// assert_eq!(addr.to_string(), "0x1a2b");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    ///
    /// This is equivalent to `Address::from(value)` but can be used in const contexts.
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<usize> for Address
{
    fn from(value: usize) -> Self
    {
        Address(value as u64)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

/// Lowercase, `0x`-prefixed, unpadded hexadecimal.
impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{:#x}", self.0)
    }
}

/// Longest rendering of an [`Address`]: `0x` plus 16 hex digits.
const HEX_ADDRESS_CAPACITY: usize = 18;

/// An [`Address`] rendered as text in a fixed, stack-allocated buffer
///
/// The frame marshaler synthesizes a method name from the frame address when
/// the unwinder could not symbolicate a frame. That can happen while a crash
/// is being handled, so the rendering must not touch the heap.
#[derive(Clone, Copy)]
pub struct HexAddress
{
    buf: [u8; HEX_ADDRESS_CAPACITY],
    len: usize,
}

impl HexAddress
{
    /// Render `address`. Returns `None` if the text does not fit the buffer.
    pub fn new(address: Address) -> Option<Self>
    {
        let mut rendered = Self {
            buf: [0; HEX_ADDRESS_CAPACITY],
            len: 0,
        };
        write!(rendered, "{address}").ok()?;
        Some(rendered)
    }

    /// The rendered text, e.g. `0x1a2b`.
    pub fn as_str(&self) -> &str
    {
        // Only ASCII hex digits are ever written.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }
}

impl Write for HexAddress
{
    fn write_str(&mut self, s: &str) -> fmt::Result
    {
        let end = self.len.checked_add(s.len()).ok_or(fmt::Error)?;
        let slot = self.buf.get_mut(self.len..end).ok_or(fmt::Error)?;
        slot.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl fmt::Debug for HexAddress
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_tuple("HexAddress").field(&self.as_str()).finish()
    }
}
