use text_buffer::{Buffer, BufferConfig, Error, Rope};

#[test]
fn editing_session() {
    let mut buffer = Buffer::new();
    buffer.insert_at(0, "hello\nworld").unwrap();
    assert_eq!(buffer.get_text(), "hello\nworld");
    assert_eq!(buffer.total_lines(), 2);
    assert_eq!(buffer.get_line(1).unwrap(), "world");

    buffer.set_cursor(0, 5).unwrap();
    buffer.move_cursor(0, 1).unwrap();
    assert_eq!(buffer.current_position(), (1, 0));

    buffer.delete_range(5, 1).unwrap();
    assert_eq!(buffer.get_text(), "helloworld");
    assert_eq!(buffer.total_lines(), 1);

    buffer.undo().unwrap();
    assert_eq!(buffer.get_text(), "hello\nworld");
    assert_eq!(buffer.total_lines(), 2);
}

#[test]
fn replace_all_is_a_single_undo_step() {
    let mut buffer = Buffer::from("hello\nworld");
    assert_eq!(buffer.find("lo"), vec![3]);

    buffer.replace_all("lo", "LO").unwrap();
    assert_eq!(buffer.get_text(), "helLO\nworld");

    buffer.undo().unwrap();
    assert_eq!(buffer.get_text(), "hello\nworld");

    let mut buffer = Buffer::from("one fish two fish red fish");
    assert_eq!(buffer.replace_all("fish", "cat").unwrap(), 3);
    assert_eq!(buffer.get_text(), "one cat two cat red cat");
    buffer.undo().unwrap();
    assert_eq!(buffer.get_text(), "one fish two fish red fish");
    assert!(!buffer.can_undo());
}

/// Snapshot of everything an undo must restore.
fn state(buffer: &Buffer) -> (String, (usize, usize), usize) {
    (
        buffer.get_text(),
        buffer.current_position(),
        buffer.cursor().preferred_col(),
    )
}

#[test]
fn undo_and_redo_walk_back_and_forth() {
    let mut buffer = Buffer::from("fn main() {\n}\n");
    buffer.set_cursor(0, 11).unwrap();

    // (state just before the edit, state just after it) per transaction
    let mut steps = Vec::new();
    let before = state(&buffer);
    buffer.new_line().unwrap();
    steps.push((before, state(&buffer)));

    let before = state(&buffer);
    buffer.insert_text("    println!(\"hi\");").unwrap();
    steps.push((before, state(&buffer)));

    buffer.move_cursor(-1, 0).unwrap();
    let before = state(&buffer);
    buffer.delete_backward(2).unwrap();
    steps.push((before, state(&buffer)));

    buffer.set_cursor(1, 0).unwrap();
    let before = state(&buffer);
    buffer.replace_all("hi", "hello").unwrap();
    steps.push((before, state(&buffer)));

    let before = state(&buffer);
    buffer.delete_range(0, 3).unwrap();
    steps.push((before, state(&buffer)));

    assert_eq!(
        steps[2].0,
        ("fn main() {\n    println!(\"hi\");\n}\n".to_string(), (0, 11), 19)
    );
    assert_eq!(steps[2].1.1, (0, 9));

    for (before, _) in steps.iter().rev() {
        assert!(buffer.undo().unwrap());
        assert_eq!(&state(&buffer), before);
    }
    assert!(!buffer.undo().unwrap());

    for (_, after) in &steps {
        assert!(buffer.redo().unwrap());
        assert_eq!(&state(&buffer), after);
    }
    assert!(!buffer.redo().unwrap());
}

#[test]
fn undo_restores_the_exact_cursor() {
    let mut buffer = Buffer::from("0123456789\nabc\n0123456789");
    buffer.set_cursor(0, 10).unwrap();
    buffer.move_cursor(1, 0).unwrap();
    assert_eq!(buffer.current_position(), (1, 3));
    assert_eq!(buffer.cursor().preferred_col(), 10);

    buffer.insert_text("!").unwrap();
    assert_eq!(buffer.current_position(), (1, 4));

    buffer.undo().unwrap();
    assert_eq!(buffer.current_position(), (1, 3));
    assert_eq!(buffer.cursor().preferred_col(), 10);

    buffer.move_cursor(1, 0).unwrap();
    assert_eq!(buffer.current_position(), (2, 10));

    buffer.redo().unwrap();
    assert_eq!(buffer.get_line(1).unwrap(), "abc!");
    assert_eq!(buffer.current_position(), (1, 4));
}

#[test]
fn errors_leave_the_buffer_untouched() {
    let mut buffer = Buffer::from("abc\ndef");
    buffer.insert_at(3, "!").unwrap();
    buffer.set_cursor(1, 2).unwrap();
    let before = (buffer.get_text(), buffer.current_position());

    let errors = [
        buffer.insert_at(100, "x").unwrap_err(),
        buffer.delete_range(6, 5).unwrap_err(),
        buffer.delete_range(9, 0).unwrap_err(),
        buffer.set_cursor(1, 4).unwrap_err(),
        buffer.go_to_line(7).unwrap_err(),
        buffer.get_line(2).unwrap_err(),
    ];
    for err in &errors {
        assert!(err.is_out_of_range() || err.is_invalid_range(), "{err}");
    }
    assert!(matches!(errors[3], Error::ColumnOutOfRange { .. }));

    assert_eq!((buffer.get_text(), buffer.current_position()), before);
    assert!(buffer.undo().unwrap());
    assert_eq!(buffer.get_text(), "abc\ndef");
}

#[test]
fn history_limit_is_honored() {
    let config = BufferConfig {
        history_limit: Some(3),
        ..BufferConfig::default()
    };
    let mut buffer = Buffer::with_config(config);
    for c in "abcdef".chars() {
        buffer.insert_char(c).unwrap();
    }

    let mut undone = 0;
    while buffer.undo().unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(buffer.get_text(), "abc");
}

#[test]
fn rope_round_trip_and_rebalance() {
    let base = "The quick brown fox\njumps over\nthe lazy dog";
    let len = base.chars().count();

    for index in 0..=len {
        let mut rope = Rope::from(base);
        rope.insert(index, "ünïcödé\n").unwrap();
        assert_eq!(rope.substring(0..rope.len()).unwrap(), rope.to_string());
        rope.remove(index..index + 8).unwrap();
        assert_eq!(rope.to_string(), base);
    }

    let mut rope = Rope::new();
    for i in 0..100 {
        rope.insert(rope.len() / 2, &i.to_string()).unwrap();
    }
    let text = rope.to_string();
    let height = rope.height();
    rope.rebalance();
    assert_eq!(rope.to_string(), text);
    assert!(rope.height() <= height);
}
