use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use crashbridge_core::boundary::RecordingBoundary;
use crashbridge_core::bridge::Bridge;
use crashbridge_core::config::BridgeConfig;
use crashbridge_core::root::{RootEvidence, RootScanner, SysrootProbe};
use crashbridge_core::types::{Address, BreadcrumbType, Severity, StackFrame, UserIdentity};
use crashbridge_core::unwind::CapturedStack;
use crashbridge_core::BridgeResult;
use crashbridge_utils::{info, init_logging_with, LogFormat, LogLevel, LoggingConfig};

/// Diagnostics for the crashbridge native crash reporting bridge.
#[derive(Parser, Debug)]
#[command(name = "crashbridge")]
#[command(version)]
#[command(about = "Diagnostics for the crashbridge native crash reporting bridge", long_about = None)]
struct Cli
{
    /// Log level (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    /// Log format: pretty or json (overrides CRASHBRIDGE_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Run the root heuristic
    RootCheck
    {
        /// Treat this directory as `/` (e.g. a mounted system image)
        #[arg(long)]
        sysroot: Option<PathBuf>,
    },
    /// Drive a bridge operation against an in-memory managed runtime
    DryRun
    {
        #[command(flatten)]
        faults: FaultOptions,
        #[command(subcommand)]
        operation: Operation,
    },
}

#[derive(Args, Debug)]
struct FaultOptions
{
    /// Pretend this managed class does not exist (repeatable)
    #[arg(long, global = true)]
    without_class: Vec<String>,
    /// Fail the N-th managed object construction, counting from 0 (repeatable)
    #[arg(long, global = true)]
    fail_construction: Vec<usize>,
    /// Fail every managed string and array allocation
    #[arg(long, global = true, default_value_t = false)]
    fail_allocations: bool,
}

#[derive(Subcommand, Debug)]
enum Operation
{
    /// Report a native error
    Notify
    {
        /// Error name
        #[arg(long, default_value = "SIGSEGV")]
        name: String,
        /// Error message
        #[arg(long, default_value = "Segmentation violation")]
        message: String,
        /// error, warning or info
        #[arg(long, default_value = "error")]
        severity: Severity,
        /// Frame address in hex, innermost first (repeatable)
        #[arg(long = "frame", value_parser = parse_address)]
        frames: Vec<Address>,
        /// Most frames to send
        #[arg(long)]
        max_frames: Option<usize>,
    },
    /// Attach a user to later reports
    User
    {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Leave a breadcrumb
    Breadcrumb
    {
        /// Breadcrumb message
        message: String,
        /// Breadcrumb type; unknown names become MANUAL
        #[arg(long = "type", default_value = "manual")]
        kind: BreadcrumbType,
    },
}

fn parse_address(raw: &str) -> Result<Address, String>
{
    let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map(Address::from)
        .map_err(|e| format!("invalid frame address {raw}: {e}"))
}

fn main()
{
    let cli = Cli::parse();

    let config = match LoggingConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };
    let _guard = match init_logging_with(logging_overrides(config, cli.log_level, cli.log_format)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Apply the command-line flags on top of the environment; an absent flag keeps the environment's value.
fn logging_overrides(config: LoggingConfig, level: Option<LogLevel>, format: Option<LogFormat>) -> LoggingConfig
{
    let config = match level {
        Some(level) => config.with_level(level),
        None => config,
    };
    match format {
        Some(format) => config.with_format(format),
        None => config,
    }
}

fn run_command(command: Commands) -> BridgeResult<()>
{
    match command {
        Commands::RootCheck { sysroot } => {
            let evidence = match sysroot {
                Some(root) => {
                    info!("Scanning sysroot {}", root.display());
                    RootScanner::with_probe(SysrootProbe::new(root)).scan()
                }
                None => RootScanner::new().scan(),
            };
            print_root_result(evidence);
            Ok(())
        }
        Commands::DryRun { faults, operation } => dry_run(&faults, operation),
    }
}

fn print_root_result(evidence: Option<RootEvidence>)
{
    match evidence {
        Some(evidence) => println!("rooted: {evidence}"),
        None => println!("not rooted"),
    }
}

fn recording_boundary(faults: &FaultOptions) -> RecordingBoundary
{
    let mut boundary = RecordingBoundary::with_notifier_schema();
    for class in &faults.without_class {
        boundary = boundary.without_class(class);
    }
    for nth in &faults.fail_construction {
        boundary = boundary.failing_construction(*nth);
    }
    if faults.fail_allocations {
        boundary = boundary.failing_allocations();
    }
    boundary
}

fn dry_run(faults: &FaultOptions, operation: Operation) -> BridgeResult<()>
{
    let boundary = recording_boundary(faults);

    let result = match operation {
        Operation::Notify {
            name,
            message,
            severity,
            frames,
            max_frames,
        } => {
            let stack = CapturedStack::new(frames.into_iter().map(StackFrame::at).collect());
            let config = max_frames.map_or_else(BridgeConfig::from_env, |max| BridgeConfig::default().with_max_frames(max));
            Bridge::new(&boundary, &stack).with_config(config).try_notify(name.as_bytes(), message.as_bytes(), severity)
        }
        Operation::User { id, email, name } => {
            let user = UserIdentity::new(
                id.as_deref().map(str::as_bytes),
                email.as_deref().map(str::as_bytes),
                name.as_deref().map(str::as_bytes),
            );
            Bridge::new(&boundary, &CapturedStack::default()).try_set_user(&user)
        }
        Operation::Breadcrumb { message, kind } => {
            Bridge::new(&boundary, &CapturedStack::default()).try_leave_breadcrumb(message.as_bytes(), kind)
        }
    };

    print_transcript(&boundary);
    result
}

fn print_transcript(boundary: &RecordingBoundary)
{
    println!("Boundary calls:");
    for record in boundary.transcript() {
        println!("  {record}");
    }

    println!("Managed invocations:");
    for invocation in boundary.invocations() {
        println!("  {}.{}", invocation.class, invocation.method);
        for (index, arg) in invocation.args.iter().enumerate() {
            println!("    [{index}] {arg:?}");
        }
    }

    println!("Outstanding handles: {}", boundary.outstanding_handles());
    let violations = boundary.violations();
    if violations.is_empty() {
        println!("Violations: none");
    } else {
        println!("Violations:");
        for violation in violations {
            println!("  {violation}");
        }
    }
}
