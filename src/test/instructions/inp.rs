use super::*;

#[test]
fn reads_an_integer_into_a_register() {
    let run = execute_with_input(&[instr!(INP, REGISTER, 1), instr!(HLT)], "42\n");

    assert_eq!(register(&run.pool, 1), 42);
}

#[test]
fn reads_negative_integers() {
    let run = execute_with_input(&[instr!(INP, REGISTER, 1), instr!(HLT)], "-17\n");

    assert_eq!(register(&run.pool, 1), -17);
}

#[test]
fn non_integer_input_is_a_runtime_error() {
    let (exit, _, _) = try_execute(&[instr!(INP, REGISTER, 1), instr!(HLT)], "forty two\n");

    match exit {
        Err(RuntimeError::InvalidInput(line)) => assert_eq!(line, "forty two"),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}
