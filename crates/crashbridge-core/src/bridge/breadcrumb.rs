use tracing::warn;

use super::Bridge;
use crate::boundary::Arg;
use crate::encoder::encode;
use crate::error::BridgeResult;
use crate::symbols::{LEAVE_BREADCRUMB_METHOD, NATIVE_INTERFACE_CLASS};
use crate::types::BreadcrumbType;

impl Bridge<'_>
{
    /// Leave a breadcrumb on the managed timeline.
    pub fn leave_breadcrumb(&self, message: &[u8], kind: BreadcrumbType)
    {
        if let Err(error) = self.try_leave_breadcrumb(message, kind) {
            warn!(%error, %kind, "dropping breadcrumb");
        }
    }

    /// [`Bridge::leave_breadcrumb`], returning why the breadcrumb was dropped.
    pub fn try_leave_breadcrumb(&self, message: &[u8], kind: BreadcrumbType) -> BridgeResult<()>
    {
        let interface = self.resolver.find_class(NATIVE_INTERFACE_CLASS)?;
        let method = self.resolver.static_method(&interface, LEAVE_BREADCRUMB_METHOD)?;
        let kind = self.resolver.constant(kind)?;
        let message = encode(&self.resolver, Some(message));

        self.resolver.call_static_void(
            &interface,
            method,
            LEAVE_BREADCRUMB_METHOD.name,
            &[Arg::nullable(message.as_ref()), Arg::object(&kind)],
        )
    }
}
