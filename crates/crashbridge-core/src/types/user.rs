/// User attached to subsequent reports.
///
/// Each field is independently optional and forwarded as-is: the bridge does
/// no validation, and an absent field reaches the managed side as `null`.
/// Values are raw bytes since native callers may hand over anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserIdentity<'a>
{
    /// Application-specific user id
    pub id: Option<&'a [u8]>,
    /// Email address
    pub email: Option<&'a [u8]>,
    /// Display name
    pub name: Option<&'a [u8]>,
}

impl<'a> UserIdentity<'a>
{
    /// Bundle the three fields.
    pub const fn new(id: Option<&'a [u8]>, email: Option<&'a [u8]>, name: Option<&'a [u8]>) -> Self
    {
        Self { id, email, name }
    }
}
