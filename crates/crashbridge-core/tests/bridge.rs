//! Tests for the notify, user and breadcrumb bridges

use crashbridge_core::boundary::recording::{Invocation, Snapshot};
use crashbridge_core::boundary::RecordingBoundary;
use crashbridge_core::bridge::Bridge;
use crashbridge_core::config::BridgeConfig;
use crashbridge_core::error::{BridgeError, SymbolKind};
use crashbridge_core::symbols::{ManagedConstant, NATIVE_INTERFACE_CLASS, STACK_TRACE_ELEMENT_CLASS};
use crashbridge_core::types::{
    Architecture, BreadcrumbType, NotificationEvent, Severity, StackFrame, UserIdentity,
};
use crashbridge_core::unwind::{CapturedStack, NoopUnwinder};

fn constant<T: ManagedConstant>(value: T) -> Snapshot
{
    Snapshot::Constant {
        class: T::CLASS.to_string(),
        name: value.constant_name().to_string(),
    }
}

fn bytes(text: &[u8]) -> Snapshot
{
    Snapshot::Bytes(text.to_vec())
}

fn assert_clean(boundary: &RecordingBoundary)
{
    assert_eq!(boundary.outstanding_handles(), 0, "leaked handles");
    assert!(boundary.violations().is_empty(), "violations: {:?}", boundary.violations());
    assert!(!crashbridge_core::boundary::Boundary::fault_pending(boundary));
}

fn last_invocation(boundary: &RecordingBoundary) -> Invocation
{
    boundary.invocations().pop().unwrap()
}

fn sample_stack() -> CapturedStack
{
    CapturedStack::new(vec![
        StackFrame::at(0x1A2B_u64),
        StackFrame::at(0x2000_u64).with_method("handle_signal").with_location("handler.c", 17),
    ])
}

// notify

#[test]
fn test_notify_invokes_managed_notifier()
{
    let boundary = RecordingBoundary::with_notifier_schema();
    let stack = sample_stack();
    let bridge = Bridge::new(&boundary, &stack).with_config(BridgeConfig::default().with_binary_arch(Architecture::Arm64));

    bridge.try_notify(b"SIGSEGV", b"Segmentation violation", Severity::Error).unwrap();

    let invocations = boundary.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(
        invocations[0],
        Invocation {
            class: NATIVE_INTERFACE_CLASS.to_string(),
            method: "setBinaryArch".to_string(),
            args: vec![Snapshot::Str("arm64".to_string())],
        }
    );

    let notify = &invocations[1];
    assert_eq!(notify.method, "notify");
    assert_eq!(notify.args[0], bytes(b"SIGSEGV"));
    assert_eq!(notify.args[1], bytes(b"Segmentation violation"));
    assert_eq!(notify.args[2], constant(Severity::Error));
    match &notify.args[3] {
        Snapshot::Array { element_class, elements } => {
            assert_eq!(element_class, STACK_TRACE_ELEMENT_CLASS);
            assert_eq!(elements.len(), 2);
            let Some(Snapshot::Instance { args, .. }) = &elements[0] else {
                panic!("first frame missing");
            };
            assert_eq!(args[1], Snapshot::Str("0x1a2b".to_string()));
        }
        other => panic!("expected a frame array, got {other:?}"),
    }
    assert_clean(&boundary);
}

#[test]
fn test_notify_maps_every_severity()
{
    for severity in [Severity::Error, Severity::Warning, Severity::Info] {
        let boundary = RecordingBoundary::with_notifier_schema();
        Bridge::new(&boundary, &NoopUnwinder).notify(b"name", b"message", severity);

        assert_eq!(last_invocation(&boundary).args[2], constant(severity));
        assert_clean(&boundary);
    }
}

#[test]
fn test_notify_resolves_each_symbol_once()
{
    let boundary = RecordingBoundary::with_notifier_schema();
    let stack = sample_stack();

    Bridge::new(&boundary, &stack).notify(b"name", b"message", Severity::Warning);

    assert_eq!(boundary.count_calls("find_class", NATIVE_INTERFACE_CLASS), 1);
    assert_eq!(boundary.count_calls("find_class", STACK_TRACE_ELEMENT_CLASS), 1);
    assert_eq!(boundary.count_calls("find_class", Severity::CLASS), 1);
    assert_eq!(boundary.count_calls("static_method_id", "notify([B[BLcom/bugsnag/android/Severity;[Ljava/lang/StackTraceElement;)V"), 1);
    assert_eq!(boundary.count_calls("static_method_id", "setBinaryArch(Ljava/lang/String;)V"), 1);
    assert_eq!(boundary.count_calls("static_field_id", "WARNING"), 0);
    assert_eq!(boundary.count_calls("static_field_id", "WARNINGLcom/bugsnag/android/Severity;"), 1);
    assert_clean(&boundary);
}

#[test]
fn test_notify_truncates_to_max_frames()
{
    let boundary = RecordingBoundary::with_notifier_schema();
    let stack = CapturedStack::new((0..10_u64).map(StackFrame::at).collect());

    Bridge::new(&boundary, &stack).with_config(BridgeConfig::default().with_max_frames(4)).notify(
        b"name",
        b"message",
        Severity::Info,
    );

    let invocation = last_invocation(&boundary);
    assert_eq!(invocation.args[3].elements().unwrap().len(), 4);
    assert_clean(&boundary);
}

#[test]
fn test_notify_aborts_without_notifier_class()
{
    let boundary = RecordingBoundary::with_notifier_schema().without_class(NATIVE_INTERFACE_CLASS);

    let result = Bridge::new(&boundary, &NoopUnwinder).try_notify(b"name", b"message", Severity::Error);

    assert_eq!(result, Err(BridgeError::resolution(SymbolKind::Class, NATIVE_INTERFACE_CLASS)));
    assert!(boundary.invocations().is_empty());
    assert_clean(&boundary);
}

#[test]
fn test_notify_cleans_up_on_every_failed_lookup()
{
    let variants: Vec<(&str, RecordingBoundary)> = vec![
        ("notify method", RecordingBoundary::with_notifier_schema().without_method(NATIVE_INTERFACE_CLASS, "notify")),
        ("frame class", RecordingBoundary::with_notifier_schema().without_class(STACK_TRACE_ELEMENT_CLASS)),
        ("frame ctor", RecordingBoundary::with_notifier_schema().without_method(STACK_TRACE_ELEMENT_CLASS, "<init>")),
        ("severity class", RecordingBoundary::with_notifier_schema().without_class(Severity::CLASS)),
        ("severity field", RecordingBoundary::with_notifier_schema().without_field(Severity::CLASS, "ERROR")),
    ];

    for (label, boundary) in variants {
        let stack = sample_stack();
        let result = Bridge::new(&boundary, &stack).try_notify(b"name", b"message", Severity::Error);

        assert!(matches!(result, Err(BridgeError::ResolutionFailed { .. })), "{label}: {result:?}");
        assert!(boundary.invocations().iter().all(|call| call.method != "notify"), "{label}");
        assert_eq!(boundary.outstanding_handles(), 0, "{label}");
        assert!(boundary.violations().is_empty(), "{label}: {:?}", boundary.violations());
    }
}

#[test]
fn test_notify_survives_missing_binary_arch_setter()
{
    let boundary = RecordingBoundary::with_notifier_schema().without_method(NATIVE_INTERFACE_CLASS, "setBinaryArch");

    Bridge::new(&boundary, &NoopUnwinder).try_notify(b"name", b"message", Severity::Error).unwrap();

    let methods: Vec<_> = boundary.invocations().into_iter().map(|call| call.method).collect();
    assert_eq!(methods, ["notify"]);
    assert_clean(&boundary);
}

#[test]
fn test_notify_survives_faulting_binary_arch_setter()
{
    let boundary = RecordingBoundary::with_notifier_schema().faulting_method("setBinaryArch");

    Bridge::new(&boundary, &NoopUnwinder).try_notify(b"name", b"message", Severity::Error).unwrap();

    assert_eq!(last_invocation(&boundary).method, "notify");
    assert_clean(&boundary);
}

#[test]
fn test_notify_with_failing_allocations_sends_nothing()
{
    let boundary = RecordingBoundary::with_notifier_schema().failing_allocations();
    let stack = sample_stack();

    let result = Bridge::new(&boundary, &stack).try_notify(b"name", b"message", Severity::Error);

    assert!(matches!(result, Err(BridgeError::AllocationFailed(_))));
    assert!(boundary.invocations().is_empty());
    assert_clean(&boundary);
}

#[test]
fn test_notify_reports_managed_fault()
{
    let boundary = RecordingBoundary::with_notifier_schema().faulting_method("notify");

    let result = Bridge::new(&boundary, &NoopUnwinder).try_notify(b"name", b"message", Severity::Error);

    assert_eq!(result, Err(BridgeError::InvocationFailed("notify".to_string())));
    assert_clean(&boundary);
}

#[test]
fn test_notify_with_partial_trace()
{
    let boundary = RecordingBoundary::with_notifier_schema().failing_construction(0);
    let stack = sample_stack();

    Bridge::new(&boundary, &stack).notify(b"name", b"message", Severity::Error);

    let elements = last_invocation(&boundary).args[3].elements().unwrap().to_vec();
    assert_eq!(elements.len(), 2);
    assert!(elements[0].is_none());
    assert!(elements[1].is_some());
    assert_clean(&boundary);
}

#[test]
fn test_deliver_uses_supplied_frames()
{
    let boundary = RecordingBoundary::with_notifier_schema();
    let frames = [StackFrame::at(0xDEAD_u64)];
    let event = NotificationEvent::new(b"SIGABRT", b"abort()", Severity::Error, &frames);

    // The installed unwinder is ignored
    Bridge::new(&boundary, &sample_stack()).try_deliver(&event).unwrap();

    let elements = last_invocation(&boundary).args[3].elements().unwrap().to_vec();
    assert_eq!(elements.len(), 1);
    let Some(Snapshot::Instance { args, .. }) = &elements[0] else {
        panic!("frame missing");
    };
    assert_eq!(args[1], Snapshot::Str("0xdead".to_string()));
    assert_clean(&boundary);
}

#[test]
fn test_notify_passes_raw_bytes()
{
    let boundary = RecordingBoundary::with_notifier_schema();

    Bridge::new(&boundary, &NoopUnwinder).notify(b"bad\0name", b"\xff\xfe", Severity::Error);

    let invocation = last_invocation(&boundary);
    assert_eq!(invocation.args[0], bytes(b"bad\0name"));
    assert_eq!(invocation.args[1], bytes(b"\xff\xfe"));
}

// set_user

#[test]
fn test_set_user_forwards_all_fields()
{
    let boundary = RecordingBoundary::with_notifier_schema();
    let user = UserIdentity::new(Some(b"1234"), Some(b"ada@example.com"), Some(b"Ada"));

    Bridge::new(&boundary, &NoopUnwinder).try_set_user(&user).unwrap();

    assert_eq!(
        boundary.invocations(),
        vec![Invocation {
            class: NATIVE_INTERFACE_CLASS.to_string(),
            method: "setUser".to_string(),
            args: vec![bytes(b"1234"), bytes(b"ada@example.com"), bytes(b"Ada")],
        }]
    );
    assert_clean(&boundary);
}

#[test]
fn test_set_user_forwards_absent_fields_as_null()
{
    let boundary = RecordingBoundary::with_notifier_schema();
    let user = UserIdentity::new(None, Some(b"ada@example.com"), None);

    Bridge::new(&boundary, &NoopUnwinder).set_user(&user);

    assert_eq!(last_invocation(&boundary).args, vec![Snapshot::Null, bytes(b"ada@example.com"), Snapshot::Null]);
    assert_clean(&boundary);
}

#[test]
fn test_set_user_with_failing_allocations_sends_nulls()
{
    let boundary = RecordingBoundary::with_notifier_schema().failing_allocations();
    let user = UserIdentity::new(Some(b"1"), Some(b"2"), Some(b"3"));

    Bridge::new(&boundary, &NoopUnwinder).set_user(&user);

    assert_eq!(last_invocation(&boundary).args, vec![Snapshot::Null; 3]);
    assert_clean(&boundary);
}

#[test]
fn test_set_user_without_setter_is_dropped()
{
    let boundary = RecordingBoundary::with_notifier_schema().without_method(NATIVE_INTERFACE_CLASS, "setUser");

    let result = Bridge::new(&boundary, &NoopUnwinder).try_set_user(&UserIdentity::default());

    assert!(matches!(result, Err(BridgeError::ResolutionFailed { kind: SymbolKind::Method, .. })));
    assert!(boundary.invocations().is_empty());
    assert_clean(&boundary);
}

// leave_breadcrumb

#[test]
fn test_leave_breadcrumb_forwards_type()
{
    let boundary = RecordingBoundary::with_notifier_schema();

    Bridge::new(&boundary, &NoopUnwinder).try_leave_breadcrumb(b"Tapped buy", BreadcrumbType::User).unwrap();

    assert_eq!(
        last_invocation(&boundary),
        Invocation {
            class: NATIVE_INTERFACE_CLASS.to_string(),
            method: "leaveBreadcrumb".to_string(),
            args: vec![bytes(b"Tapped buy"), constant(BreadcrumbType::User)],
        }
    );
    assert_clean(&boundary);
}

#[test]
fn test_leave_breadcrumb_with_unknown_type_is_manual()
{
    let boundary = RecordingBoundary::with_notifier_schema();
    let bridge = Bridge::new(&boundary, &NoopUnwinder);

    bridge.leave_breadcrumb(b"x", BreadcrumbType::from_raw(42));
    bridge.leave_breadcrumb(b"x", "teleport".parse().unwrap());

    for invocation in boundary.invocations() {
        assert_eq!(invocation.args[1], constant(BreadcrumbType::Manual));
    }
    assert_eq!(boundary.invocations().len(), 2);
    assert_clean(&boundary);
}

#[test]
fn test_leave_breadcrumb_without_constant_is_dropped()
{
    let boundary = RecordingBoundary::with_notifier_schema().without_field(BreadcrumbType::CLASS, "LOG");

    let result = Bridge::new(&boundary, &NoopUnwinder).try_leave_breadcrumb(b"log line", BreadcrumbType::Log);

    assert_eq!(result, Err(BridgeError::resolution(SymbolKind::Field, "LOG")));
    assert!(boundary.invocations().is_empty());
    assert_clean(&boundary);
}

// release on every failure path

#[test]
fn test_set_user_cleans_up_on_every_failure()
{
    let variants: Vec<(&str, RecordingBoundary)> = vec![
        ("notifier class", RecordingBoundary::with_notifier_schema().without_class(NATIVE_INTERFACE_CLASS)),
        ("setter method", RecordingBoundary::with_notifier_schema().without_method(NATIVE_INTERFACE_CLASS, "setUser")),
        ("faulting setter", RecordingBoundary::with_notifier_schema().faulting_method("setUser")),
    ];
    let user = UserIdentity::new(Some(b"1234"), Some(b"ada@example.com"), Some(b"Ada"));

    for (label, boundary) in variants {
        let result = Bridge::new(&boundary, &NoopUnwinder).try_set_user(&user);

        assert!(result.is_err(), "{label}");
        assert_eq!(boundary.outstanding_handles(), 0, "{label}");
        assert!(boundary.violations().is_empty(), "{label}: {:?}", boundary.violations());
        assert!(!crashbridge_core::boundary::Boundary::fault_pending(&boundary), "{label}");
    }
}

#[test]
fn test_leave_breadcrumb_cleans_up_on_every_failure()
{
    let variants: Vec<(&str, RecordingBoundary)> = vec![
        ("notifier class", RecordingBoundary::with_notifier_schema().without_class(NATIVE_INTERFACE_CLASS)),
        (
            "breadcrumb method",
            RecordingBoundary::with_notifier_schema().without_method(NATIVE_INTERFACE_CLASS, "leaveBreadcrumb"),
        ),
        ("type class", RecordingBoundary::with_notifier_schema().without_class(BreadcrumbType::CLASS)),
        ("type field", RecordingBoundary::with_notifier_schema().without_field(BreadcrumbType::CLASS, "ERROR")),
        ("faulting method", RecordingBoundary::with_notifier_schema().faulting_method("leaveBreadcrumb")),
    ];

    for (label, boundary) in variants {
        let result = Bridge::new(&boundary, &NoopUnwinder).try_leave_breadcrumb(b"Crashed", BreadcrumbType::Error);

        assert!(result.is_err(), "{label}");
        assert_eq!(boundary.outstanding_handles(), 0, "{label}");
        assert!(boundary.violations().is_empty(), "{label}: {:?}", boundary.violations());
        assert!(!crashbridge_core::boundary::Boundary::fault_pending(&boundary), "{label}");
    }
}

#[test]
fn test_faulting_breadcrumb_does_not_poison_later_calls()
{
    let boundary = RecordingBoundary::with_notifier_schema().faulting_method("leaveBreadcrumb");
    let bridge = Bridge::new(&boundary, &NoopUnwinder);

    assert_eq!(
        bridge.try_leave_breadcrumb(b"first", BreadcrumbType::Log),
        Err(BridgeError::InvocationFailed("leaveBreadcrumb".to_string()))
    );
    bridge.try_set_user(&UserIdentity::new(Some(b"42"), None, None)).unwrap();

    assert_eq!(last_invocation(&boundary).method, "setUser");
    assert_clean(&boundary);
}
