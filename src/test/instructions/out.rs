use super::*;

#[test]
fn out_prints_the_integer_with_a_newline() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, 7),
        instr!(OUT, REGISTER, ACC),
        instr!(HLT),
    ]);

    assert_eq!(run.output, "7\n");
}

#[test]
fn out_direct_prints_a_memory_cell() {
    let run = execute(&[
        instr!(OUT, DIRECT, 2),
        instr!(HLT),
        bits::signed(-30, layout().word_bits),
    ]);

    assert_eq!(run.output, "-30\n");
}

#[test]
fn outc_prints_the_bare_character() {
    let run = execute(&[
        instr!(OUTC, IMMEDIATE, 'A' as i64),
        instr!(OUTC, IMMEDIATE, '!' as i64),
        instr!(HLT),
    ]);

    assert_eq!(run.output, "A!");
}

#[test]
fn outb_prints_the_raw_bit_string() {
    let run = execute(&[
        instr!(LDA, IMMEDIATE, -3),
        instr!(OUTB, REGISTER, ACC),
        instr!(HLT),
    ]);

    assert_eq!(
        run.output,
        format!("{}\n", bits::signed(-3, layout().word_bits))
    );
}

#[test]
fn outb_immediate_re_encodes_the_operand() {
    let run = execute(&[instr!(OUTB, IMMEDIATE, 5), instr!(HLT)]);

    assert_eq!(
        run.output,
        format!("{}\n", bits::signed(5, layout().word_bits))
    );
}
