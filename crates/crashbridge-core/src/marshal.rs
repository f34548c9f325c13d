//! # Stack Frame Marshaling
//!
//! Converts captured [`StackFrame`]s into a managed `StackTraceElement[]`.
//!
//! The output array always has one slot per input frame. A frame whose
//! element cannot be built is logged and its slot stays empty; a partial trace
//! is still worth reporting, so a single frame never aborts the whole array.

use tracing::debug;

use crate::boundary::{Arg, LocalRef, MethodId};
use crate::error::{BridgeError, BridgeResult};
use crate::resolver::Resolver;
use crate::symbols::{STACK_TRACE_ELEMENT_CLASS, STACK_TRACE_ELEMENT_CTOR};
use crate::types::{HexAddress, StackFrame};

/// A resolved `StackTraceElement` class and constructor.
pub struct FrameMarshaler<'r, 'b>
{
    resolver: &'r Resolver<'b>,
    element_class: LocalRef<'b>,
    constructor: MethodId,
}

impl<'r, 'b> FrameMarshaler<'r, 'b>
{
    /// Resolve the managed frame class and its constructor.
    pub fn resolve(resolver: &'r Resolver<'b>) -> BridgeResult<Self>
    {
        let element_class = resolver.find_class(STACK_TRACE_ELEMENT_CLASS)?;
        let constructor = resolver.method(&element_class, STACK_TRACE_ELEMENT_CTOR)?;
        Ok(Self {
            resolver,
            element_class,
            constructor,
        })
    }

    /// Build the managed array. Fails only if the array itself cannot be allocated.
    pub fn marshal(&self, frames: &[StackFrame]) -> BridgeResult<LocalRef<'b>>
    {
        let array = self.resolver.new_object_array(frames.len(), &self.element_class)?;
        for (index, frame) in frames.iter().enumerate() {
            let stored = self
                .element(frame)
                .and_then(|element| self.resolver.set_element(&array, index, &element))
                .map_err(|error| BridgeError::FrameMarshalFailed {
                    index,
                    reason: error.to_string(),
                });
            if let Err(error) = stored {
                debug!(%error, "leaving stack frame slot empty");
            }
        }
        Ok(array)
    }

    fn element(&self, frame: &StackFrame) -> BridgeResult<LocalRef<'b>>
    {
        // The unwinder tracks no class context.
        let declaring_class = self.resolver.new_string("")?;
        let method = if frame.is_symbolicated() {
            self.resolver.new_string(&frame.method)?
        } else {
            let hex = HexAddress::new(frame.frame_address)
                .ok_or_else(|| BridgeError::AllocationFailed("frame address text".to_string()))?;
            self.resolver.new_string(hex.as_str())?
        };
        let filename = self.resolver.new_string(&frame.filename)?;
        let line_number = i32::try_from(frame.line_number).unwrap_or(i32::MAX);

        self.resolver.new_object(
            &self.element_class,
            self.constructor,
            &[
                Arg::object(&declaring_class),
                Arg::object(&method),
                Arg::object(&filename),
                Arg::Int(line_number),
            ],
        )
    }
}
