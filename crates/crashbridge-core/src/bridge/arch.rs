use tracing::warn;

use super::Bridge;
use crate::boundary::{Arg, LocalRef};
use crate::error::BridgeResult;
use crate::symbols::SET_BINARY_ARCH_METHOD;

impl<'b> Bridge<'b>
{
    /// Report the configured binary architecture through an already-resolved
    /// `NativeInterface`. Failure is logged and otherwise ignored.
    pub(crate) fn push_binary_arch(&self, interface: &LocalRef<'b>)
    {
        if let Err(error) = self.try_push_binary_arch(interface) {
            warn!(%error, arch = %self.config.binary_arch, "could not report binary architecture");
        }
    }

    fn try_push_binary_arch(&self, interface: &LocalRef<'b>) -> BridgeResult<()>
    {
        let method = self.resolver.static_method(interface, SET_BINARY_ARCH_METHOD)?;
        let arch = self.resolver.new_string(self.config.binary_arch.identifier())?;
        self.resolver.call_static_void(interface, method, SET_BINARY_ARCH_METHOD.name, &[Arg::object(&arch)])
    }
}
