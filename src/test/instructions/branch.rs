use super::*;

#[test]
fn bra_is_unconditional() {
    let run = execute(&[
        instr!(BRA, DIRECT, 3),
        instr!(LDA, IMMEDIATE, 9),
        instr!(HLT),
        instr!(LDA, IMMEDIATE, 7),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 7);
}

#[test]
fn brz_taken_on_zero() {
    let run = execute(&[
        instr!(BRZ, DIRECT, 3),
        instr!(LDA, IMMEDIATE, 9),
        instr!(HLT),
        instr!(LDA, IMMEDIATE, 7),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 7);
}

#[test]
fn brz_not_taken_on_non_zero() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 1),
        instr!(BRZ, DIRECT, 4),
        instr!(LDA, IMMEDIATE, 9),
        instr!(HLT),
        instr!(LDA, IMMEDIATE, 7),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 9);
}

#[test]
fn brp_taken_on_zero_and_positive() {
    let run = execute(&[
        instr!(BRP, DIRECT, 3),
        instr!(LDA, IMMEDIATE, 9),
        instr!(HLT),
        instr!(LDA, IMMEDIATE, 7),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 7);
}

#[test]
fn brp_not_taken_on_negative() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, -1),
        instr!(BRP, DIRECT, 4),
        instr!(LDA, IMMEDIATE, 9),
        instr!(HLT),
        instr!(LDA, IMMEDIATE, 7),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 9);
}
