//! Record list unit tests.

use super::*;
use crate::models::{FieldValue, Record};
use crate::test_support::{titled, titles};

fn card(title: &str, items: &[&str]) -> Record {
    Record::new().with("title", title).with(
        "items",
        FieldValue::List(items.iter().map(|item| FieldValue::from(*item)).collect()),
    )
}

fn items(list: &RecordList<Record>, index: usize) -> Vec<String> {
    list.get(index)
        .and_then(|record| record.get("items"))
        .and_then(FieldValue::as_list)
        .expect("items list")
        .iter()
        .map(|item| item.to_string())
        .collect()
}

#[test]
fn scenario_move_remove_update() {
    let list = titled(&["A", "B", "C"]);

    let moved = list.move_record(0, Direction::Down);
    assert_eq!(titles(&moved), vec!["B", "A", "C"]);

    let removed = moved.remove(2).expect("remove last");
    assert_eq!(titles(&removed), vec!["B", "A"]);

    let updated = removed.update(1, "title", "Z".into()).expect("update");
    assert_eq!(titles(&updated), vec!["B", "Z"]);

    assert_eq!(titles(&list), vec!["A", "B", "C"]);
    assert_eq!(titles(&moved), vec!["B", "A", "C"]);
}

#[test]
fn add_then_remove_at_end_restores_list() {
    for names in [&[][..], &["A"][..], &["A", "B", "C"][..]] {
        let list = titled(names);
        let grown = list.add(Record::new().with("title", "New"));
        assert_eq!(grown.len(), list.len() + 1);
        assert_eq!(grown.remove(list.len()).expect("remove added"), list);
    }
}

#[test]
fn update_changes_only_the_target_record() {
    let list = titled(&["A", "B", "C", "D"]);
    for index in 0..list.len() {
        let updated = list.update(index, "title", "X".into()).expect("update");
        assert_eq!(updated.len(), list.len());
        assert_eq!(
            updated.get(index).and_then(|record| record.get("title")),
            Some(&FieldValue::from("X"))
        );
        for other in (0..list.len()).filter(|other| *other != index) {
            assert_eq!(updated.get(other), list.get(other));
            assert!(updated.shares_record(&list, other), "index {}", other);
        }
        assert!(!updated.shares_record(&list, index));
    }
}

#[test]
fn update_and_remove_reject_out_of_range_indices() {
    let list = titled(&["A", "B", "C"]);
    assert_eq!(
        list.remove(99),
        Err(ListError::IndexOutOfRange { index: 99, len: 3 })
    );
    assert_eq!(
        list.update(3, "title", "Z".into()),
        Err(ListError::IndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(
        RecordList::<Record>::new().remove(0),
        Err(ListError::IndexOutOfRange { index: 0, len: 0 })
    );
    assert_eq!(titles(&list), vec!["A", "B", "C"]);
}

#[test]
fn move_at_boundaries_is_a_no_op() {
    let list = titled(&["A", "B", "C"]);
    assert_eq!(list.move_record(0, Direction::Up), list);
    assert_eq!(list.move_record(2, Direction::Down), list);
    assert_eq!(list.move_record(7, Direction::Up), list);
    assert_eq!(RecordList::<Record>::new().move_record(0, Direction::Down).len(), 0);
}

#[test]
fn moves_are_self_inverse() {
    let list = titled(&["A", "B", "C", "D"]);
    for index in 0..list.len() - 1 {
        let there = list.move_record(index, Direction::Down);
        assert_ne!(there, list);
        assert_eq!(there.move_record(index + 1, Direction::Up), list);
    }
}

#[test]
fn snapshots_are_independent_across_rapid_edits() {
    let mut snapshots = vec![titled(&["draft"])];
    for text in ["d", "dr", "dra", "draf", "draft!"] {
        let next = snapshots
            .last()
            .expect("snapshot")
            .update(0, "title", text.into())
            .expect("typing");
        snapshots.push(next);
    }
    let seen: Vec<String> = snapshots
        .iter()
        .map(|snapshot| titles(snapshot).remove(0))
        .collect();
    assert_eq!(seen, vec!["draft", "d", "dr", "dra", "draf", "draft!"]);
}

#[test]
fn snapshots_can_be_read_from_other_threads() {
    let list = titled(&["A", "B"]);
    let preview = list.clone();
    let handle = std::thread::spawn(move || titles(&preview));
    let edited = list.update(0, "title", "Z".into()).expect("update");
    assert_eq!(handle.join().expect("preview thread"), vec!["A", "B"]);
    assert_eq!(titles(&edited), vec!["Z", "B"]);
}

#[test]
fn nested_update_is_copy_on_write() {
    let list: RecordList<Record> = vec![card("Terms", &["one", "two"]), card("Privacy", &["x"])].into();

    let updated = list
        .update_nested(0, "items", 1, "TWO".into())
        .expect("update nested");
    assert_eq!(items(&updated, 0), vec!["one", "TWO"]);
    assert_eq!(items(&list, 0), vec!["one", "two"]);
    assert!(updated.shares_record(&list, 1));

    assert_eq!(
        list.update_nested(0, "items", 2, "three".into()),
        Err(ListError::IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(
        list.update_nested(5, "items", 0, "x".into()),
        Err(ListError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert_eq!(
        list.update_nested(0, "title", 0, "x".into()),
        Err(ListError::NotAList("title".to_string()))
    );
    assert_eq!(
        list.update_nested(0, "bullets", 0, "x".into()),
        Err(ListError::UnknownField("bullets".to_string()))
    );
}

#[test]
fn nested_add_remove_and_move() {
    let list: RecordList<Record> = vec![card("Terms", &["a", "b", "c"])].into();

    let added = list.add_nested(0, "items", "d".into()).expect("add nested");
    assert_eq!(items(&added, 0), vec!["a", "b", "c", "d"]);

    let removed = added.remove_nested(0, "items", 0).expect("remove nested");
    assert_eq!(items(&removed, 0), vec!["b", "c", "d"]);
    assert_eq!(
        removed.remove_nested(0, "items", 3),
        Err(ListError::IndexOutOfRange { index: 3, len: 3 })
    );

    let moved = removed
        .move_nested(0, "items", 2, Direction::Up)
        .expect("move nested");
    assert_eq!(items(&moved, 0), vec!["b", "d", "c"]);

    let unchanged = moved
        .move_nested(0, "items", 0, Direction::Up)
        .expect("boundary move");
    assert_eq!(unchanged, moved);
    assert!(unchanged.shares_record(&moved, 0));

    assert_eq!(
        moved.move_nested(1, "items", 0, Direction::Down),
        Err(ListError::IndexOutOfRange { index: 1, len: 1 })
    );
}

#[test]
fn renumber_after_remove_is_dense_and_opt_in() {
    let list: RecordList<Record> = ["01", "02", "03", "04"]
        .iter()
        .map(|number| Record::new().with("number", *number))
        .collect();
    let numbers = |list: &RecordList<Record>| -> Vec<String> {
        list.iter()
            .map(|record| record.get("number").map(|n| n.to_string()).unwrap_or_default())
            .collect()
    };

    let plain = list.remove(1).expect("remove");
    assert_eq!(numbers(&plain), vec!["01", "03", "04"]);

    let policy = Renumber::new("number");
    let renumbered = list.remove_renumbered(1, &policy).expect("remove renumbered");
    assert_eq!(numbers(&renumbered), vec!["01", "02", "03"]);
    assert!(renumbered.shares_record(&plain, 0));
    assert!(!renumbered.shares_record(&plain, 1));

    assert_eq!(
        list.remove_renumbered(9, &policy),
        Err(ListError::IndexOutOfRange { index: 9, len: 4 })
    );
}

#[test]
fn renumber_labels_respect_start_and_width() {
    let policy = Renumber::new("step").start_at(0).with_width(3);
    assert_eq!(policy.label(0).expect("label"), "000");
    assert_eq!(policy.label(12).expect("label"), "012");
    assert_eq!(Renumber::new("n").with_width(0).label(9).expect("label"), "10");

    let list = titled(&["A", "B"]);
    let numbered = policy.apply(&list).expect("renumber");
    assert_eq!(
        numbered.get(1).and_then(|record| record.get("step")),
        Some(&FieldValue::from("001"))
    );
}

#[test]
fn renumber_rejects_overflowing_start_and_huge_width() {
    let list = titled(&["A", "B", "C"]);

    let overflowing = Renumber::new("n").start_at(usize::MAX);
    assert!(matches!(
        list.remove_renumbered(0, &overflowing),
        Err(ListError::InvalidRenumber(_))
    ));
    assert!(matches!(overflowing.label(1), Err(ListError::InvalidRenumber(_))));
    assert_eq!(overflowing.label(0).expect("label"), usize::MAX.to_string());

    let last_fits = Renumber::new("n").start_at(usize::MAX - 1);
    assert!(last_fits.validate(2).is_ok());
    assert!(last_fits.validate(3).is_err());

    let too_wide = Renumber::new("n").with_width(usize::MAX);
    assert!(matches!(
        too_wide.apply(&list),
        Err(ListError::InvalidRenumber(_))
    ));
    assert!(Renumber::new("n")
        .with_width(crate::constants::MAX_RENUMBER_WIDTH)
        .apply(&list)
        .is_ok());
}

#[test]
fn direction_parses_words_and_offsets() {
    assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
    assert_eq!(" DOWN ".parse::<Direction>(), Ok(Direction::Down));
    assert_eq!("+1".parse::<Direction>(), Ok(Direction::Down));
    assert_eq!(Direction::try_from(-1i64), Ok(Direction::Up));
    assert!(Direction::try_from(2i64).is_err());
    assert!("sideways".parse::<Direction>().is_err());
    assert_eq!(Direction::Up.offset(), -1);
    assert_eq!(Direction::Down.to_string(), "down");
}

/// Typed record: the list operations are not tied to [`Record`].
#[derive(Debug, Clone, PartialEq)]
struct Feature {
    icon: String,
    title: String,
    description: String,
}

impl Fields for Feature {
    type Value = String;

    fn field(&self, name: &str) -> Option<&String> {
        match name {
            "icon" => Some(&self.icon),
            "title" => Some(&self.title),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: String) -> Result<(), ListError> {
        let slot = match name {
            "icon" => &mut self.icon,
            "title" => &mut self.title,
            "description" => &mut self.description,
            other => return Err(ListError::UnknownField(other.to_string())),
        };
        *slot = value;
        Ok(())
    }
}

fn feature(title: &str) -> Feature {
    Feature {
        icon: "star".to_string(),
        title: title.to_string(),
        description: String::new(),
    }
}

#[test]
fn typed_records_use_the_same_operations() {
    let list: RecordList<Feature> = vec![feature("Fast"), feature("Small")].into();

    let updated = list
        .update(1, "description", "Tiny binaries".to_string())
        .expect("update typed");
    assert_eq!(updated.get(1).map(|f| f.description.as_str()), Some("Tiny binaries"));

    assert_eq!(
        list.update(0, "color", "#fff".to_string()),
        Err(ListError::UnknownField("color".to_string()))
    );
    assert_eq!(
        list.add_nested(0, "title", "x".to_string()),
        Err(ListError::NotAList("title".to_string()))
    );

    let moved = list.move_record(1, Direction::Up);
    assert_eq!(
        moved.to_vec(),
        vec![feature("Small"), feature("Fast")]
    );
}
