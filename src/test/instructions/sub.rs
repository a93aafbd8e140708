use super::*;

#[test]
fn positive_result() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 9),
        instr!(SUB, IMMEDIATE, 4),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 5);
}

#[test]
fn result_crosses_zero() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 2),
        instr!(SUB, IMMEDIATE, 5),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), -3);
}
