use tracing::{debug, warn};

use super::Bridge;
use crate::boundary::{Arg, LocalRef, MethodId};
use crate::encoder::encode;
use crate::error::BridgeResult;
use crate::marshal::FrameMarshaler;
use crate::resolver::Resolver;
use crate::symbols::{ManagedConstant, NATIVE_INTERFACE_CLASS, NOTIFY_METHOD};
use crate::types::{NotificationEvent, Severity};

/// Everything `notify` resolves before touching the stack.
struct NotifyTargets<'r, 'b>
{
    interface: LocalRef<'b>,
    notify: MethodId,
    severity_class: LocalRef<'b>,
    frames: FrameMarshaler<'r, 'b>,
}

impl<'r, 'b> NotifyTargets<'r, 'b>
{
    fn resolve(resolver: &'r Resolver<'b>) -> BridgeResult<Self>
    {
        let interface = resolver.find_class(NATIVE_INTERFACE_CLASS)?;
        let notify = resolver.static_method(&interface, NOTIFY_METHOD)?;
        let frames = FrameMarshaler::resolve(resolver)?;
        let severity_class = resolver.find_class(Severity::CLASS)?;
        Ok(Self {
            interface,
            notify,
            severity_class,
            frames,
        })
    }
}

impl<'b> Bridge<'b>
{
    /// Report a native error with the current call stack.
    pub fn notify(&self, name: &[u8], message: &[u8], severity: Severity)
    {
        if let Err(error) = self.try_notify(name, message, severity) {
            warn!(%error, "dropping native notification");
        }
    }

    /// [`Bridge::notify`], returning why the notification was dropped.
    pub fn try_notify(&self, name: &[u8], message: &[u8], severity: Severity) -> BridgeResult<()>
    {
        let targets = NotifyTargets::resolve(&self.resolver)?;
        let stacktrace = self.unwinder.capture(self.config.max_frames);
        debug!(frames = stacktrace.len(), "captured native stack");
        self.send(&targets, &NotificationEvent::new(name, message, severity, &stacktrace))
    }

    /// Report a native error whose stack was captured ahead of time.
    pub fn deliver(&self, event: &NotificationEvent<'_>)
    {
        if let Err(error) = self.try_deliver(event) {
            warn!(%error, "dropping native notification");
        }
    }

    /// [`Bridge::deliver`], returning why the notification was dropped.
    pub fn try_deliver(&self, event: &NotificationEvent<'_>) -> BridgeResult<()>
    {
        let targets = NotifyTargets::resolve(&self.resolver)?;
        self.send(&targets, event)
    }

    fn send(&self, targets: &NotifyTargets<'_, 'b>, event: &NotificationEvent<'_>) -> BridgeResult<()>
    {
        let frames = &event.stacktrace[..event.stacktrace.len().min(self.config.max_frames)];
        let stacktrace = targets.frames.marshal(frames)?;
        let severity = self.resolver.constant_in(&targets.severity_class, event.severity)?;
        let name = encode(&self.resolver, Some(event.name));
        let message = encode(&self.resolver, Some(event.message));

        self.push_binary_arch(&targets.interface);

        self.resolver.call_static_void(
            &targets.interface,
            targets.notify,
            NOTIFY_METHOD.name,
            &[
                Arg::nullable(name.as_ref()),
                Arg::nullable(message.as_ref()),
                Arg::object(&severity),
                Arg::object(&stacktrace),
            ],
        )
    }
}
