use super::*;

#[test]
fn and_masks_the_destination() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 12),
        instr!(AND, IMMEDIATE, 10),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 8);
}

#[test]
fn or_merges_into_the_destination() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 12),
        instr!(OR, IMMEDIATE, 3),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 15);
}

#[test]
fn xor_toggles_bits() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 12),
        instr!(XOR, IMMEDIATE, 10),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 6);
}

#[test]
fn not_stores_the_inverted_pattern_unsigned() {
    let run = execute(&[instr!(NOT, IMMEDIATE, 0), instr!(HLT)]);

    // !0 wraps to the all-ones pattern at the cell width
    assert_eq!(
        raw(&run.pool, SpecialRegister::ACC.key(REGISTERS)),
        "1".repeat(layout().word_bits as usize)
    );
}
