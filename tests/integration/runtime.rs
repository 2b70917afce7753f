//! Program files run through the runtime entry points.

use std::path::{Path, PathBuf};

use concuma_foundation::ErrorKind;
use concuma_language::VmConfig;
use concuma_language::emit::{Expr, ProgramBuilder, Stmt};
use concuma_language::opcode::BinaryOp;
use concuma_runtime::{RuntimeConfig, RuntimeError, config, load_program, run_file};

struct TempProgram(PathBuf);

impl TempProgram {
    fn new(name: &str, bytes: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!(
            "concuma-it-{}-{name}.ccm",
            std::process::id()
        ));
        std::fs::write(&path, bytes).unwrap();
        Self(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempProgram {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn quiet() -> RuntimeConfig {
    RuntimeConfig::default().with_vm(VmConfig::default())
}

fn endless_loop() -> ProgramBuilder {
    let mut builder = ProgramBuilder::new();
    let n = builder.symbol("n");
    builder.extend([
        Stmt::declare(n, Expr::int(0)),
        Stmt::for_loop(
            None,
            Expr::bool(true),
            None,
            Stmt::assign(n, Expr::binary(BinaryOp::Add, Expr::var(n), Expr::int(1))),
        ),
    ]);
    builder
}

// =============================================================================
// Running Files
// =============================================================================

#[test]
fn run_file_returns_output() {
    let mut builder = ProgramBuilder::new();
    let floor = builder.symbol("floor");
    builder.extend([
        Stmt::Import {
            symbol: floor,
            alias: None,
        },
        Stmt::print(Expr::call(floor, vec![Expr::float(2.7)])),
        Stmt::print(Expr::string("ok")),
    ]);
    let file = TempProgram::new("floor", &builder.build());
    assert_eq!(run_file(file.path(), &quiet()).unwrap(), ["2", "ok"]);
}

#[test]
fn load_program_reads_name_table() {
    let mut builder = ProgramBuilder::new();
    builder.symbol("alpha");
    builder.symbol("beta");
    let file = TempProgram::new("names", &builder.build());
    let program = load_program(file.path()).unwrap();
    assert_eq!(program.names().len(), 2);
}

#[test]
fn fuel_from_environment_stops_endless_loop() {
    let mut config = RuntimeConfig::from_lookup(|name| {
        (name == config::FUEL_VAR).then(|| "500".to_string())
    })
    .unwrap();
    assert_eq!(config.vm.exec_fuel, Some(500));
    config.vm = config.vm.with_echo_output(false);
    let file = TempProgram::new("endless", &endless_loop().build());
    let err = run_file(file.path(), &config).unwrap_err();
    let RuntimeError::Vm(inner) = &err else {
        panic!("expected a VM error, got {err:?}");
    };
    assert!(matches!(inner.kind, ErrorKind::LimitExceeded(_)));
    assert!(err.report().starts_with("RuntimeError: limit exceeded"));
}

#[test]
fn invalid_environment_is_config_error() {
    let err = RuntimeConfig::from_lookup(|name| {
        (name == config::MAX_CALL_DEPTH_VAR).then(|| "deep".to_string())
    })
    .unwrap_err();
    assert!(matches!(err, RuntimeError::Config { .. }));
    assert!(err.report().starts_with("Error: invalid CONCUMA_MAX_CALL_DEPTH"));
}

// =============================================================================
// Error Reports
// =============================================================================

#[test]
fn report_lists_offset_and_frames() {
    let mut builder = ProgramBuilder::new();
    let f = builder.symbol("f");
    let missing = builder.symbol("missing");
    builder.extend([
        Stmt::function(f, vec![], Stmt::print(Expr::var(missing))),
        Stmt::call(f, vec![]),
    ]);
    let file = TempProgram::new("frames", &builder.build());
    let report = run_file(file.path(), &quiet()).unwrap_err().report();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "RuntimeError: unknown variable: missing");
    assert!(lines[1].starts_with("at offset 0x"));
    assert_eq!(lines[2], "  in f");
}

#[test]
fn missing_file_reports_io_error() {
    let err = run_file(Path::new("/definitely/not/here.ccm"), &quiet()).unwrap_err();
    assert!(matches!(err, RuntimeError::Io { .. }));
    assert!(err.report().contains("/definitely/not/here.ccm"));
}
