use super::*;

#[test]
fn immediate_source() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 40),
        instr!(ADD, IMMEDIATE, 2),
        instr!(HLT),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 42);
}

#[test]
fn direct_source_reads_memory() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 1),
        instr!(ADD, DIRECT, 3),
        instr!(HLT),
        bits::signed(5, layout().word_bits),
    ]);

    assert_eq!(special(&run.pool, SpecialRegister::ACC), 6);
}

#[test]
fn register_destination() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 3, 2),
        instr!(ADD, IMMEDIATE, 4, 2),
        instr!(HLT),
    ]);

    assert_eq!(register(&run.pool, 2), 7);
}
