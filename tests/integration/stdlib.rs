//! Standard host functions reached through Import.

use concuma_foundation::{Arity, ErrorCategory, ErrorKind, Value};
use concuma_language::emit::{Expr, ProgramBuilder, Stmt};
use concuma_language::opcode::BinaryOp;
use concuma_language::{NativeFn, Vm};

fn stdlib_vm() -> Vm {
    concuma_stdlib::vm_with_stdlib(Vm::new()).unwrap()
}

fn import(builder: &mut ProgramBuilder, name: &str) -> concuma_foundation::SymbolId {
    let symbol = builder.symbol(name);
    builder.push(Stmt::Import {
        symbol,
        alias: None,
    });
    symbol
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn math_and_string_functions() {
    let mut builder = ProgramBuilder::new();
    let sqrt = import(&mut builder, "sqrt");
    let max = import(&mut builder, "max");
    let upper = import(&mut builder, "upper");
    let len = import(&mut builder, "len");
    let str_fn = import(&mut builder, "str");
    builder.extend([
        Stmt::print(Expr::call(sqrt, vec![Expr::int(16)])),
        Stmt::print(Expr::call(
            max,
            vec![Expr::int(3), Expr::float(7.5), Expr::int(1)],
        )),
        Stmt::print(Expr::call(upper, vec![Expr::string("abc")])),
        Stmt::print(Expr::call(len, vec![Expr::string("hello")])),
        Stmt::print(Expr::binary(
            BinaryOp::Add,
            Expr::string("n="),
            Expr::call(str_fn, vec![Expr::int(2)]),
        )),
    ]);
    let mut vm = stdlib_vm();
    vm.run(&builder.build_program().unwrap()).unwrap();
    assert_eq!(vm.output(), ["4", "7.5", "ABC", "5", "n=2"]);
}

#[test]
fn import_under_alias() {
    let mut builder = ProgramBuilder::new();
    let pow = builder.symbol("pow");
    let power = builder.symbol("power");
    builder.extend([
        Stmt::Import {
            symbol: pow,
            alias: Some(power),
        },
        Stmt::print(Expr::call(power, vec![Expr::int(2), Expr::int(10)])),
        Stmt::print(Expr::var(power)),
        Stmt::print(Expr::var(pow)),
    ]);
    let mut vm = stdlib_vm();
    let err = vm.run(&builder.build_program().unwrap()).unwrap_err();
    assert_eq!(vm.output(), ["1024", "<power>"]);
    assert!(matches!(err.kind, ErrorKind::UnknownSymbol(_)));
}

#[test]
fn imports_are_scoped_like_declarations() {
    let mut builder = ProgramBuilder::new();
    let abs = builder.symbol("abs");
    builder.extend([
        Stmt::Block(vec![
            Stmt::Import {
                symbol: abs,
                alias: None,
            },
            Stmt::print(Expr::call(abs, vec![Expr::int(-3)])),
        ]),
        Stmt::print(Expr::call(abs, vec![Expr::int(-3)])),
    ]);
    let mut vm = stdlib_vm();
    let err = vm.run(&builder.build_program().unwrap()).unwrap_err();
    assert_eq!(vm.output(), ["3"]);
    assert!(matches!(err.kind, ErrorKind::UnknownSymbol(_)));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn host_errors_unwind_through_user_frames() {
    let mut builder = ProgramBuilder::new();
    let sqrt = import(&mut builder, "sqrt");
    let root = builder.symbol("root");
    builder.extend([
        Stmt::function(
            root,
            vec![],
            Stmt::ret(Expr::call(sqrt, vec![Expr::string("x")])),
        ),
        Stmt::call(root, vec![]),
    ]);
    let mut vm = stdlib_vm();
    let err = vm.run(&builder.build_program().unwrap()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument { .. }));
    assert_eq!(err.context.unwrap().stack, ["root"]);
}

#[test]
fn host_arity_is_enforced() {
    let mut builder = ProgramBuilder::new();
    let clock = import(&mut builder, "clock");
    builder.push(Stmt::print(Expr::call(clock, vec![Expr::int(1)])));
    let mut vm = stdlib_vm();
    let err = vm.run(&builder.build_program().unwrap()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ArityMismatch { actual: 1, .. }));
    assert_eq!(err.category(), ErrorCategory::Call);
}

#[test]
fn stdlib_cannot_be_registered_twice() {
    let err = concuma_stdlib::vm_with_stdlib(stdlib_vm()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidNative { .. }));
}

#[test]
fn host_functions_mix_with_stdlib() {
    let mut builder = ProgramBuilder::new();
    let greet = import(&mut builder, "greet");
    let lower = import(&mut builder, "lower");
    builder.push(Stmt::print(Expr::call(
        lower,
        vec![Expr::call(greet, vec![Expr::string("WORLD")])],
    )));
    let mut vm = stdlib_vm();
    vm.register_native(NativeFn::new("greet", Arity::Exact(1), |args| {
        Ok(Value::from(format!("Hello, {}", args[0])))
    }))
    .unwrap();
    vm.run(&builder.build_program().unwrap()).unwrap();
    assert_eq!(vm.output(), ["hello, world"]);
}
