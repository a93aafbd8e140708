use super::*;

#[test]
fn immediate_value() {
    let run = execute(&[instr!(LDA, IMMEDIATE, -100), instr!(HLT)]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), -100);
}

#[test]
fn direct_address() {
    let run = execute(&[
        instr!(LDA, DIRECT, 2),
        instr!(HLT),
        bits::signed(64, layout().word_bits),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 64);
}

#[test]
fn indirect_address_follows_the_pointer() {
    // Cell 2 holds the address 3, cell 3 holds the value.
    let run = execute(&[
        instr!(LDA, INDIRECT, 2),
        instr!(HLT),
        bits::signed(3, layout().word_bits),
        bits::signed(42, layout().word_bits),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 42);
}

#[test]
fn register_source_copies_between_registers() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 8, 1),
        instr!(LDA, REGISTER, 1, 2),
        instr!(HLT),
    ]);

    assert_eq!(register(&run.pool, 2), 8);
}
