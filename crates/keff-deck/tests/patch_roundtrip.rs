use std::fs;
use std::path::PathBuf;

use keff_core::RatioLink;
use keff_deck::{patch_field, patch_linked_fields, Deck, FieldTarget};

fn write_deck(lines: &[&str]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("first_begin.i");
    fs::write(&path, lines.join("")).unwrap();
    (dir, path)
}

fn sample_deck() -> (tempfile::TempDir, PathBuf) {
    write_deck(&[
        "VSOP CORE MODEL\r\n",
        "  COMMENT CARD\r\n",
        "   T1   5.000000E-09                                                        D 17\r\n",
        "  FILLER LINE 1\r\n",
        "   T2   3.144654E-09                                                        D 17\r\n",
        "  FILLER LINE 2\r\n",
    ])
}

#[test]
fn patched_field_reparses_and_other_lines_stay_byte_identical() {
    let (_dir, path) = sample_deck();
    let before = fs::read(&path).unwrap();
    let before_lines: Vec<&[u8]> = before.split_inclusive(|b| *b == b'\n').collect();

    let target = FieldTarget {
        line: 3,
        annotation: "D 17".to_string(),
    };
    let mut deck = Deck::load(&path).expect("load");
    patch_field(&mut deck, &target, 1.778279e-8).expect("patch");
    deck.write().expect("write");

    let after = fs::read(&path).unwrap();
    let after_lines: Vec<&[u8]> = after.split_inclusive(|b| *b == b'\n').collect();
    assert_eq!(before_lines.len(), after_lines.len());
    for (idx, (b, a)) in before_lines.iter().zip(&after_lines).enumerate() {
        if idx == 2 {
            continue;
        }
        assert_eq!(b, a, "line {} changed", idx + 1);
    }

    let patched = std::str::from_utf8(after_lines[2]).unwrap();
    let tokens: Vec<&str> = patched.split_whitespace().collect();
    assert_eq!(tokens[0], "T1");
    let reparsed: f64 = tokens[1].parse().expect("numeric second token");
    assert!((reparsed - 1.778279e-8).abs() < 1e-13);
    assert!(patched.trim_end().ends_with("D 17"));
    assert!(patched.ends_with("\r\n"));
}

#[test]
fn linked_patch_writes_both_fields_with_the_fixed_ratio() {
    let (_dir, path) = sample_deck();
    let primary = FieldTarget {
        line: 3,
        annotation: "D 17".to_string(),
    };
    let linked = FieldTarget {
        line: 5,
        annotation: "D 17".to_string(),
    };
    let ratio = RatioLink::default();

    let mut deck = Deck::load(&path).expect("load");
    let derived =
        patch_linked_fields(&mut deck, &primary, &linked, &ratio, 7.95e-8).expect("patch");
    deck.write().expect("write");

    assert!((7.95e-8 / derived - 1.59).abs() < 1e-9);
    let deck = Deck::load(&path).expect("reload");
    let primary_value: f64 = deck
        .line(3)
        .unwrap()
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    let linked_value: f64 = deck
        .line(5)
        .unwrap()
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    assert!((primary_value - 7.95e-8).abs() < 1e-13);
    assert!((primary_value / linked_value - 1.59).abs() < 1e-6);
}

#[test]
fn out_of_range_line_is_rejected() {
    let (_dir, path) = sample_deck();
    let target = FieldTarget {
        line: 42,
        annotation: "D 17".to_string(),
    };
    let mut deck = Deck::load(&path).expect("load");
    let err = patch_field(&mut deck, &target, 1e-8).unwrap_err();
    assert_eq!(err.info().code, "line-out-of-range");
}

#[test]
fn single_token_line_is_rejected() {
    let (_dir, path) = write_deck(&["HEADER\n", "lonely\n"]);
    let target = FieldTarget {
        line: 2,
        annotation: "D 17".to_string(),
    };
    let mut deck = Deck::load(&path).expect("load");
    let err = patch_field(&mut deck, &target, 1e-8).unwrap_err();
    assert_eq!(err.info().code, "line-malformed");
}

#[test]
fn annotation_drift_is_rejected() {
    let (_dir, path) = write_deck(&["   T1   5.000000E-09   D 99\n"]);
    let target = FieldTarget {
        line: 1,
        annotation: "D 17".to_string(),
    };
    let mut deck = Deck::load(&path).expect("load");
    let err = patch_field(&mut deck, &target, 1e-8).unwrap_err();
    assert_eq!(err.info().code, "annotation-drift");
}

#[test]
fn failing_linked_target_leaves_the_deck_untouched() {
    let (_dir, path) = sample_deck();
    let before = fs::read(&path).unwrap();
    let primary = FieldTarget {
        line: 3,
        annotation: "D 17".to_string(),
    };
    let linked = FieldTarget {
        line: 99,
        annotation: "D 17".to_string(),
    };

    let mut deck = Deck::load(&path).expect("load");
    let err = patch_linked_fields(&mut deck, &primary, &linked, &RatioLink::default(), 1e-8)
        .unwrap_err();
    assert_eq!(err.info().code, "line-out-of-range");
    deck.write().expect("write");
    assert_eq!(fs::read(&path).unwrap(), before, "dual patch must be atomic");
}
