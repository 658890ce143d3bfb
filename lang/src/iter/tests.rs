use super::*;
use crate::protocols::Iterable;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

fn drain(seq: LazySeq) -> Vec<Value> {
    SeqIter::new(seq).collect()
}

#[test]
fn range_length_and_elements() {
    let cases = [
        ((0, 5, 1), vec![0, 1, 2, 3, 4]),
        ((1, 10, 3), vec![1, 4, 7]),
        ((5, 0, -2), vec![5, 3, 1]),
        ((0, 0, 1), vec![]),
        ((3, 1, 1), vec![]),
        ((-3, 3, 2), vec![-3, -1, 1]),
    ];
    for ((start, stop, step), expected) in cases {
        let range = RangeSpec::new(start, stop, step).unwrap();
        assert_eq!(range.len(), expected.len(), "range({start}, {stop}, {step})");
        assert_eq!(drain(range.iter()), ints(&expected));
    }
}

#[test]
fn range_rejects_zero_step() {
    let err = RangeSpec::new(0, 1, 0).unwrap_err();
    assert_eq!(err.to_string(), "ValueError: range() arg 3 must not be zero");
}

#[test]
fn range_extreme_bounds_do_not_overflow() {
    let range = RangeSpec::new(i64::MIN, i64::MAX, i64::MAX).unwrap();
    assert_eq!(range.len(), 3);
    assert_eq!(range.get(-1).unwrap(), i64::MAX - 1);
}

#[test]
fn range_indexing_and_membership() {
    let range = RangeSpec::new(0, 10, 3).unwrap();
    assert_eq!(range.get(0).unwrap(), 0);
    assert_eq!(range.get(-1).unwrap(), 9);
    assert_eq!(
        range.get(4).unwrap_err().message,
        "range object index out of range"
    );
    assert!(range.contains(&BigInt::from(6)));
    assert!(!range.contains(&BigInt::from(7)));
    assert!(!range.contains(&BigInt::from(12)));

    let down = RangeSpec::new(10, 0, -5).unwrap();
    assert!(down.contains(&BigInt::from(5)));
    assert!(!down.contains(&BigInt::from(0)));
}

#[test]
fn range_reversal() {
    let range = RangeSpec::new(1, 10, 4).unwrap();
    assert_eq!(drain(range.reversed().iter()), ints(&[9, 5, 1]));
    let empty = RangeSpec::new(5, 5, 1).unwrap();
    assert!(empty.reversed().is_empty());
}

#[test]
fn ranges_are_restartable() {
    let range = Value::Range(RangeSpec::new(0, 3, 1).unwrap());
    let first: Vec<Value> = range.py_iter().unwrap().collect();
    let second: Vec<Value> = range.py_iter().unwrap().collect();
    assert_eq!(first, second);
}

#[test]
fn list_iteration_sees_appends() {
    let list = List::from_values(ints(&[1, 2]));
    let mut seen = Vec::new();
    let mut cursor = SeqIter::new(LazySeq::List {
        source: list.clone(),
        index: 0,
    });
    while let Some(item) = cursor.next() {
        if item == Value::from(1) {
            list.append(Value::from(3));
        }
        seen.push(item);
    }
    assert_eq!(seen, ints(&[1, 2, 3]));
}

#[test]
fn removing_before_the_cursor_skips_an_element() {
    let list = List::from_values(ints(&[1, 2, 3, 4]));
    let mut cursor = Value::List(list.clone()).py_iter().unwrap();
    assert_eq!(cursor.next(), Some(Value::from(1)));
    list.remove(&Value::from(1)).unwrap();
    // 2 shifted under the consumed position
    assert_eq!(cursor.collect::<Vec<_>>(), ints(&[3, 4]));
}

#[test]
fn exhausted_sequences_stay_exhausted() {
    let list = List::from_values(ints(&[1]));
    let seq = LazySeq::List {
        source: list.clone(),
        index: 0,
    }
    .shared();
    let mut cursor = SeqIter::from_shared(seq.clone());
    assert_eq!(cursor.next(), Some(Value::from(1)));
    assert_eq!(cursor.next(), None);
    list.append(Value::from(2));
    assert_eq!(cursor.next(), None);
    assert_eq!(seq.borrow().kind(), "list_iterator");
}

#[test]
fn dict_views_follow_insertion_order_live() {
    let dict = Dict::from_pairs([
        (Value::from("a"), Value::from(1)),
        (Value::from("b"), Value::from(2)),
    ])
    .unwrap();
    let keys = dict.keys();
    let mut cursor = keys.py_iter().unwrap();
    assert_eq!(cursor.next(), Some(Value::from("a")));
    dict.set_item(Value::from("c"), Value::from(3)).unwrap();
    assert_eq!(cursor.collect::<Vec<_>>(), vec![Value::from("b"), Value::from("c")]);

    let items: Vec<Value> = dict.items().py_iter().unwrap().collect();
    assert_eq!(items[2], Value::tuple([Value::from("c"), Value::from(3)]));
    let values: Vec<Value> = dict.values().py_iter().unwrap().collect();
    assert_eq!(values, ints(&[1, 2, 3]));
}

#[test]
fn set_iteration_uses_insertion_order() {
    let set = Set::from_values(ints(&[3, 1, 2])).unwrap();
    assert_eq!(
        drain(LazySeq::Set {
            source: set,
            index: 0
        }),
        ints(&[3, 1, 2])
    );
}

#[test]
fn text_iterates_by_code_point() {
    let seq = LazySeq::Str {
        source: Rc::from("hé!"),
        offset: 0,
    };
    assert_eq!(drain(seq), ["h", "é", "!"].map(Value::from).to_vec());
}

#[test]
fn enumerate_counts_from_start() {
    let source = Value::list(["x", "y"].map(Value::from)).py_iter().unwrap();
    let seq = LazySeq::Enumerate {
        source: source.shared(),
        count: BigInt::from(5),
    };
    assert_eq!(
        drain(seq),
        vec![
            Value::tuple([Value::from(5), Value::from("x")]),
            Value::tuple([Value::from(6), Value::from("y")]),
        ]
    );
}

#[test]
fn zip_truncates_to_shortest() {
    let a = Value::list(ints(&[1, 2, 3])).py_iter().unwrap();
    let b = Value::from("ab").py_iter().unwrap();
    let seq = LazySeq::Zip {
        sources: vec![a.shared(), b.shared()],
    };
    assert_eq!(
        drain(seq),
        vec![
            Value::tuple([Value::from(1), Value::from("a")]),
            Value::tuple([Value::from(2), Value::from("b")]),
        ]
    );
    assert!(drain(LazySeq::Zip { sources: vec![] }).is_empty());
}

#[test]
fn sharing_a_sequence_shares_its_position() {
    let seq = Value::list(ints(&[1, 2, 3])).py_iter().unwrap().into_value();
    let mut first = seq.py_iter().unwrap();
    let mut second = seq.py_iter().unwrap();
    assert_eq!(first.next(), Some(Value::from(1)));
    assert_eq!(second.next(), Some(Value::from(2)));
    assert_eq!(first.next(), Some(Value::from(3)));
    assert_eq!(second.next(), None);
}
