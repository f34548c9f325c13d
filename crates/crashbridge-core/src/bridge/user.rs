use tracing::warn;

use super::Bridge;
use crate::boundary::Arg;
use crate::encoder::encode;
use crate::error::BridgeResult;
use crate::symbols::{NATIVE_INTERFACE_CLASS, SET_USER_METHOD};
use crate::types::UserIdentity;

impl Bridge<'_>
{
    /// Attach a user to subsequent reports. Absent fields are sent as `null`.
    pub fn set_user(&self, user: &UserIdentity<'_>)
    {
        if let Err(error) = self.try_set_user(user) {
            warn!(%error, "dropping user update");
        }
    }

    /// [`Bridge::set_user`], returning why the update was dropped.
    pub fn try_set_user(&self, user: &UserIdentity<'_>) -> BridgeResult<()>
    {
        let interface = self.resolver.find_class(NATIVE_INTERFACE_CLASS)?;
        let method = self.resolver.static_method(&interface, SET_USER_METHOD)?;
        let id = encode(&self.resolver, user.id);
        let email = encode(&self.resolver, user.email);
        let name = encode(&self.resolver, user.name);

        self.resolver.call_static_void(
            &interface,
            method,
            SET_USER_METHOD.name,
            &[Arg::nullable(id.as_ref()), Arg::nullable(email.as_ref()), Arg::nullable(name.as_ref())],
        )
    }
}
