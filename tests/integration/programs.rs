//! Whole programs built with the emitter and run on the VM.

use concuma_foundation::{ErrorKind, SymbolId};
use concuma_language::emit::{Expr, ProgramBuilder, Stmt};
use concuma_language::opcode::BinaryOp;
use concuma_language::{Vm, VmConfig};

fn run(builder: &ProgramBuilder) -> Vec<String> {
    let mut vm = Vm::new();
    vm.run(&builder.build_program().unwrap()).expect("run failed");
    vm.take_output()
}

fn op(op: BinaryOp, a: Expr, b: Expr) -> Expr {
    Expr::binary(op, a, b)
}

fn increment(symbol: SymbolId) -> Stmt {
    Stmt::assign(symbol, op(BinaryOp::Add, Expr::var(symbol), Expr::int(1)))
}

fn fib_function(builder: &mut ProgramBuilder) -> SymbolId {
    let fib = builder.symbol("fib");
    let n = builder.symbol("n");
    builder.push(Stmt::function(
        fib,
        vec![n],
        Stmt::Block(vec![
            Stmt::when(
                op(BinaryOp::LessEqual, Expr::var(n), Expr::int(1)),
                Stmt::ret(Expr::var(n)),
            ),
            Stmt::ret(op(
                BinaryOp::Add,
                Expr::call(fib, vec![op(BinaryOp::Subtract, Expr::var(n), Expr::int(1))]),
                Expr::call(fib, vec![op(BinaryOp::Subtract, Expr::var(n), Expr::int(2))]),
            )),
        ]),
    ));
    fib
}

// =============================================================================
// Functions and Loops
// =============================================================================

#[test]
fn fibonacci_sequence() {
    let mut builder = ProgramBuilder::new();
    let fib = fib_function(&mut builder);
    let i = builder.symbol("i");
    builder.push(Stmt::for_loop(
        Some(Stmt::declare(i, Expr::int(0))),
        op(BinaryOp::Less, Expr::var(i), Expr::int(10)),
        Some(increment(i)),
        Stmt::print(Expr::call(fib, vec![Expr::var(i)])),
    ));
    assert_eq!(
        run(&builder),
        ["0", "1", "1", "2", "3", "5", "8", "13", "21", "34"]
    );
}

#[test]
fn loop_without_init_or_step() {
    let mut builder = ProgramBuilder::new();
    let i = builder.symbol("i");
    builder.extend([
        Stmt::declare(i, Expr::int(0)),
        Stmt::for_loop(
            None,
            op(BinaryOp::Less, Expr::var(i), Expr::int(3)),
            None,
            Stmt::Block(vec![increment(i), Stmt::print(Expr::var(i))]),
        ),
        Stmt::print(Expr::string("done")),
    ]);
    assert_eq!(run(&builder), ["1", "2", "3", "done"]);
}

#[test]
fn search_with_break() {
    let mut builder = ProgramBuilder::new();
    let i = builder.symbol("i");
    let found = builder.symbol("found");
    builder.extend([
        Stmt::declare(found, Expr::int(-1)),
        Stmt::for_loop(
            Some(Stmt::declare(i, Expr::int(0))),
            op(BinaryOp::Less, Expr::var(i), Expr::int(100)),
            Some(increment(i)),
            Stmt::Block(vec![Stmt::when(
                op(
                    BinaryOp::Equal,
                    op(BinaryOp::Multiply, Expr::var(i), Expr::var(i)),
                    Expr::int(49),
                ),
                Stmt::Block(vec![Stmt::assign(found, Expr::var(i)), Stmt::Break]),
            )]),
        ),
        Stmt::print(Expr::var(found)),
    ]);
    assert_eq!(run(&builder), ["7"]);
}

#[test]
fn nested_loops_with_inner_break() {
    let mut builder = ProgramBuilder::new();
    let i = builder.symbol("i");
    let j = builder.symbol("j");
    let pairs = builder.symbol("pairs");
    builder.extend([
        Stmt::declare(pairs, Expr::int(0)),
        Stmt::for_loop(
            Some(Stmt::declare(i, Expr::int(0))),
            op(BinaryOp::Less, Expr::var(i), Expr::int(4)),
            Some(increment(i)),
            Stmt::for_loop(
                Some(Stmt::declare(j, Expr::int(0))),
                Expr::bool(true),
                Some(increment(j)),
                Stmt::if_else(
                    op(BinaryOp::GreaterEqual, Expr::var(j), Expr::var(i)),
                    Stmt::Break,
                    increment(pairs),
                ),
            ),
        ),
        Stmt::print(Expr::var(pairs)),
    ]);
    assert_eq!(run(&builder), ["6"]);
}

#[test]
fn functions_are_values_of_their_scope() {
    let mut builder = ProgramBuilder::new();
    let greeting = builder.symbol("greeting");
    let greet = builder.symbol("greet");
    let who = builder.symbol("who");
    builder.extend([
        Stmt::declare(greeting, Expr::string("hello")),
        Stmt::function(
            greet,
            vec![who],
            Stmt::print(op(
                BinaryOp::Add,
                op(BinaryOp::Add, Expr::var(greeting), Expr::string(", ")),
                Expr::var(who),
            )),
        ),
        Stmt::call(greet, vec![Expr::string("world")]),
        Stmt::assign(greeting, Expr::string("bye")),
        Stmt::call(greet, vec![Expr::string("moon")]),
        Stmt::print(Expr::var(greet)),
    ]);
    assert_eq!(run(&builder), ["hello, world", "bye, moon", "<greet>"]);
}

#[test]
fn deep_recursion_hits_call_depth_limit() {
    let mut builder = ProgramBuilder::new();
    let down = builder.symbol("down");
    builder.extend([
        Stmt::function(down, vec![], Stmt::call(down, vec![])),
        Stmt::call(down, vec![]),
    ]);
    let mut vm = Vm::with_config(VmConfig::default().with_max_call_depth(32));
    let err = vm.run(&builder.build_program().unwrap()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
    assert_eq!(err.context.unwrap().stack.len(), 32);
}

// =============================================================================
// Modules
// =============================================================================

fn counter_module(builder: &mut ProgramBuilder) -> (SymbolId, SymbolId, SymbolId) {
    let counter = builder.symbol("counter");
    let count = builder.symbol("count");
    let bump = builder.symbol("bump");
    builder.push(Stmt::Module {
        symbol: counter,
        variables: vec![Stmt::declare(count, Expr::int(0))],
        methods: vec![Stmt::function(
            bump,
            vec![],
            Stmt::Block(vec![increment(count), Stmt::ret(Expr::var(count))]),
        )],
    });
    (counter, count, bump)
}

#[test]
fn module_keeps_state_between_calls() {
    let mut builder = ProgramBuilder::new();
    let (counter, count, bump) = counter_module(&mut builder);
    builder.extend([
        Stmt::print(Expr::access(Expr::var(counter), Expr::call(bump, vec![]))),
        Stmt::print(Expr::access(Expr::var(counter), Expr::call(bump, vec![]))),
        Stmt::print(Expr::access(Expr::var(counter), Expr::var(count))),
        Stmt::print(Expr::access(Expr::var(counter), Expr::var(bump))),
    ]);
    assert_eq!(run(&builder), ["1", "2", "2", "<counter.bump>"]);
}

#[test]
fn member_operator_and_accessor_agree() {
    let mut builder = ProgramBuilder::new();
    let (counter, _, _) = counter_module(&mut builder);
    builder.push(Stmt::print(op(
        BinaryOp::Member,
        Expr::var(counter),
        Expr::float(0.5),
    )));
    assert_eq!(run(&builder), ["0.5"]);
}

#[test]
fn module_errors_carry_qualified_frame() {
    let mut builder = ProgramBuilder::new();
    let m = builder.symbol("m");
    let fail = builder.symbol("fail");
    let ghost = builder.symbol("ghost");
    builder.extend([
        Stmt::Module {
            symbol: m,
            variables: vec![],
            methods: vec![Stmt::function(fail, vec![], Stmt::print(Expr::var(ghost)))],
        },
        Stmt::print(Expr::access(Expr::var(m), Expr::call(fail, vec![]))),
    ]);
    let mut vm = Vm::new();
    let err = vm.run(&builder.build_program().unwrap()).unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::UnknownSymbol(name) if name == "ghost"));
    assert_eq!(err.context.unwrap().stack, ["m.fail"]);
}

#[test]
fn return_in_module_body_is_stray() {
    let mut builder = ProgramBuilder::new();
    let m = builder.symbol("m");
    builder.push(Stmt::Module {
        symbol: m,
        variables: vec![Stmt::ret(Expr::int(1))],
        methods: vec![],
    });
    let mut vm = Vm::new();
    let err = vm.run(&builder.build_program().unwrap()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StrayControlFlow("return")));
}

#[test]
fn class_is_recorded_but_inert() {
    let mut builder = ProgramBuilder::new();
    let shape = builder.symbol("Shape");
    let area = builder.symbol("area");
    builder.extend([
        Stmt::Class {
            symbol: shape,
            variables: vec![Stmt::declare(area, Expr::int(0))],
            methods: vec![],
        },
        Stmt::print(Expr::var(shape)),
        Stmt::call(shape, vec![]),
    ]);
    let mut vm = Vm::new();
    let err = vm.run(&builder.build_program().unwrap()).unwrap_err();
    assert_eq!(vm.output(), ["<Shape>"]);
    assert!(matches!(err.kind, ErrorKind::NotCallable(_)));
}

#[test]
fn runs_are_independent() {
    let mut builder = ProgramBuilder::new();
    let x = builder.symbol("x");
    builder.extend([Stmt::declare(x, Expr::int(1)), Stmt::print(Expr::var(x))]);
    let program = builder.build_program().unwrap();
    let mut vm = Vm::new();
    vm.run(&program).unwrap();
    vm.run(&program).unwrap();
    assert_eq!(vm.output(), ["1", "1"]);
}
