use super::*;

#[test]
fn stores_the_raw_accumulator_bits_into_memory() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 9),
        instr!(STA, DIRECT, 5),
        instr!(HLT),
    ]);

    assert_eq!(raw(&run.pool, 5), bits::signed(9, layout().word_bits));
}

#[test]
fn register_mode_source_targets_a_register() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, -7),
        instr!(STA, REGISTER, 3),
        instr!(HLT),
    ]);

    assert_eq!(register(&run.pool, 3), -7);
}

#[test]
fn indirect_source_stores_through_a_pointer() {
    // Cell 4 holds the address 6, so the store lands in cell 6.
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 1),
        instr!(STA, INDIRECT, 4),
        instr!(HLT),
        instr!(NOP),
        bits::signed(6, layout().word_bits),
    ]);

    assert_eq!(raw(&run.pool, 6), bits::signed(1, layout().word_bits));
}
