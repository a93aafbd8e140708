use super::*;

fn sample() -> Program {
    Program::from(
        5,
        3,
        8,
        24,
        10,
        0,
        vec!["0".repeat(24), "1".repeat(24), format!("{}{}", "01".repeat(11), "10")],
    )
}

#[test]
fn round_trip() {
    let program = sample();
    let mut buffer = Vec::new();

    write(&mut buffer, &program).unwrap();
    let read_back = read(&mut &buffer[..]).unwrap();

    assert_eq!(program, read_back);
}

#[test]
fn rejects_non_binary_cells() {
    let program = sample();
    let mut buffer = Vec::new();
    write(&mut buffer, &program).unwrap();

    let position = buffer.len() - 1;
    buffer[position] = b'x';

    assert!(read(&mut &buffer[..]).is_err());
}

#[test]
fn rejects_truncated_images() {
    let program = sample();
    let mut buffer = Vec::new();
    write(&mut buffer, &program).unwrap();

    buffer.truncate(buffer.len() - 4);

    assert!(read(&mut &buffer[..]).is_err());
}
