//! Native text to managed `byte[]`.
//!
//! Text crosses the boundary as raw bytes rather than as a managed string, so
//! embedded NULs and invalid sequences arrive untouched. The array is
//! write-once: dropping the returned [`LocalRef`] releases it.

use tracing::warn;

use crate::boundary::LocalRef;
use crate::resolver::Resolver;

/// Encode `text` as a managed byte array.
///
/// Returns `None` for absent text, and also when the allocation fails (after
/// logging it); callers pass `None` downstream as `null`.
pub fn encode<'b>(resolver: &Resolver<'b>, text: Option<&[u8]>) -> Option<LocalRef<'b>>
{
    let text = text?;
    match resolver.new_byte_array(text) {
        Ok(array) => Some(array),
        Err(error) => {
            warn!(%error, "passing null in place of unencodable text");
            None
        }
    }
}
