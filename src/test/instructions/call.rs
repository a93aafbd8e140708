use super::*;

#[test]
fn call_links_and_ret_returns() {
    let run = execute(&[
        instr!(CALL, DIRECT, 3),
        instr!(HLT),
        instr!(NOP),
        instr!(LDA, IMMEDIATE, 7),
        instr!(RET),
    ]);

    assert_eq!(run.exit, ExitCode::Halted);
    assert_eq!(special(&run.pool, SpecialRegister::ACC), 7);
    // the return register still holds the instruction after the call
    assert_eq!(special(&run.pool, SpecialRegister::RR), 1);
}

#[test]
fn nested_return_address_is_overwritten() {
    // A second CALL clobbers RR, as there is no stack to push it onto.
    let run = execute(&[
        instr!(CALL, DIRECT, 2),
        instr!(HLT),
        instr!(CALL, DIRECT, 4),
        instr!(HLT),
        instr!(RET),
    ]);

    assert_eq!(run.exit, ExitCode::Halted);
    assert_eq!(special(&run.pool, SpecialRegister::RR), 3);
}
