use super::*;

// The test machine has 24-bit cells, so 23 logical left shifts park a
// lone 1-bit in the sign position.

#[test]
fn lsl_into_the_sign_bit_leaves_carry_clear() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 1),
        instr!(LSL, IMMEDIATE, 23),
        instr!(HLT),
    ]);

    let mut expected = String::from("1");
    expected.push_str(&"0".repeat(23));
    assert_eq!(raw(&run.pool, SpecialRegister::ACC.key(REGISTERS)), expected);
    assert_eq!(special(&run.pool, SpecialRegister::FR), 0);
}

#[test]
fn lsl_out_of_the_sign_bit_sets_the_carry() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 1),
        instr!(LSL, IMMEDIATE, 23),
        instr!(LSL, IMMEDIATE, 1),
        instr!(HLT),
    ]);

    assert_eq!(
        raw(&run.pool, SpecialRegister::ACC.key(REGISTERS)),
        "0".repeat(24)
    );
    assert_eq!(special(&run.pool, SpecialRegister::FR), 1);
}

#[test]
fn lsr_shifts_the_low_bit_into_the_carry() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 3),
        instr!(LSR, IMMEDIATE, 1),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 1);
    assert_eq!(special(&run.pool, SpecialRegister::FR), 1);
}

#[test]
fn asr_preserves_the_sign() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, -4),
        instr!(ASR, IMMEDIATE, 1),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), -2);
}

#[test]
fn csl_wraps_without_touching_the_flags() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 1),
        instr!(CSL, IMMEDIATE, 1),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 2);
    assert_eq!(
        raw(&run.pool, SpecialRegister::FR.key(REGISTERS)),
        "0".repeat(24)
    );
}

#[test]
fn csr_wraps_the_low_bit_into_the_sign() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 1),
        instr!(CSR, IMMEDIATE, 1),
        instr!(HLT),
    ]);

    let mut expected = String::from("1");
    expected.push_str(&"0".repeat(23));
    assert_eq!(raw(&run.pool, SpecialRegister::ACC.key(REGISTERS)), expected);
}

#[test]
fn cslc_rotates_through_the_carry() {
    // 24 logical left shifts push the lone bit out into the carry, then
    // the circular shift with carry pulls it back in at the low end.
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 1),
        instr!(LSL, IMMEDIATE, 24),
        instr!(CSLC, IMMEDIATE, 1),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 1);
    assert_eq!(special(&run.pool, SpecialRegister::FR), 0);
}

#[test]
fn zero_count_shift_rewrites_flags_from_their_own_low_bit() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 5),
        instr!(LSL, IMMEDIATE, 0),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 5);
    assert_eq!(special(&run.pool, SpecialRegister::FR), 0);
}
