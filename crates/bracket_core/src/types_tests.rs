use super::*;

fn field(names: &[&str]) -> Vec<Entrant> {
    names.iter().map(|&n| Entrant::from(n)).collect()
}

#[test]
fn test_round_count() {
    assert_eq!(round_count(2), Some(1));
    assert_eq!(round_count(64), Some(6));
    assert_eq!(round_count(128), Some(7));
    assert_eq!(round_count(0), None);
    assert_eq!(round_count(1), None);
    assert_eq!(round_count(3), None);
    assert_eq!(round_count(48), None);
}

#[test]
fn test_validate_field_sizes() {
    assert!(validate_field(&field(&["A", "B"])).is_ok());
    assert_eq!(
        validate_field(&field(&["A", "B", "C"])),
        Err(BracketError::InvalidFieldSize { count: 3 })
    );
    assert_eq!(
        validate_field(&[]),
        Err(BracketError::InvalidFieldSize { count: 0 })
    );
    assert_eq!(
        validate_field(&field(&["A"])),
        Err(BracketError::InvalidFieldSize { count: 1 })
    );
}

#[test]
fn test_validate_field_duplicates() {
    let err = validate_field(&field(&["A", "B", "C", "A"])).unwrap_err();
    assert_eq!(
        err,
        BracketError::DuplicateEntrant {
            name: "A".to_string()
        }
    );
}

#[test]
fn test_entrant_serializes_as_plain_string() {
    let json = serde_json::to_string(&Entrant::from("Gonzaga")).unwrap();
    assert_eq!(json, "\"Gonzaga\"");
}
