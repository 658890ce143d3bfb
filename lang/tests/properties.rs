use rython_runtime::builtins::{self, MinMaxOptions};
use rython_runtime::collections::Object;
use rython_runtime::protocols::Comparable;
use rython_runtime::{Args, BuiltinId, ErrorKind, Value, call_builtin, call_method};

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

fn materialize(value: &Value) -> Value {
    builtins::make_list(Some(value)).unwrap()
}

fn range(bounds: &[i64]) -> Value {
    builtins::range(&ints(bounds)).unwrap()
}

#[test]
fn abs_keeps_numeric_kind_and_is_idempotent() {
    let samples = [
        Value::from(-7),
        Value::from(0),
        Value::from(12),
        Value::from(-2.5),
        Value::from(-0.0),
        Value::from(3.25),
        Value::Int(num_bigint::BigInt::from(-1) << 100),
    ];
    for x in samples {
        let once = builtins::abs(&x).unwrap();
        assert_eq!(once.type_tag(), x.type_tag(), "abs({})", x.repr());
        assert_eq!(builtins::abs(&once).unwrap(), once);
        assert!(!once.py_lt(&Value::from(0)).unwrap());
    }
}

#[test]
fn min_never_exceeds_max_and_both_are_members() {
    let samples = [
        Value::list(ints(&[5, -2, 9, 0])),
        Value::list(vec![Value::from(1.5), Value::from(1), Value::from(true)]),
        Value::from("rust"),
        Value::tuple(ints(&[4])),
        range(&[10, 0, -3]),
    ];
    let options = MinMaxOptions::default();
    for xs in samples {
        let low = builtins::min(std::slice::from_ref(&xs), &options).unwrap();
        let high = builtins::max(std::slice::from_ref(&xs), &options).unwrap();
        assert!(!high.py_lt(&low).unwrap(), "min > max for {}", xs.repr());
        let members = materialize(&xs);
        assert!(call_method(&members, "count", Args::new(vec![low])).unwrap() != Value::from(0));
        assert!(call_method(&members, "count", Args::new(vec![high])).unwrap() != Value::from(0));
    }
}

#[test]
fn sum_identities() {
    let empty = Value::list([]);
    assert_eq!(builtins::sum(&empty, Value::from(0)).unwrap(), Value::from(0));
    for start in [Value::from(5), Value::from(-1.5)] {
        assert_eq!(builtins::sum(&empty, start.clone()).unwrap(), start);
    }
    assert_eq!(builtins::sum(&range(&[1, 6]), Value::from(0)).unwrap(), Value::from(15));

    let with_keyword = call_builtin(
        BuiltinId::Sum,
        Args::new(vec![Value::list([])]).keyword("start", 3),
    );
    assert_eq!(with_keyword.unwrap(), Value::from(3));
}

#[test]
fn truth_aggregates() {
    assert!(builtins::all(&Value::list([])).unwrap());
    assert!(!builtins::any(&Value::list([])).unwrap());
    assert!(!builtins::all(&Value::list([Value::from(true), Value::from(false)])).unwrap());
    assert!(builtins::any(&Value::list([Value::from(false), Value::from(true)])).unwrap());
}

#[test]
fn numeric_text_round_trips() {
    let huge = num_bigint::BigInt::parse_bytes(b"-123456789012345678901234567890", 10).unwrap();
    for n in [Value::from(0), Value::from(-42), Value::from(i64::MAX), Value::Int(huge)] {
        let text = builtins::to_str(&n);
        assert_eq!(builtins::to_int(&text, None).unwrap(), n);
    }

    for f in [0.0, -0.0, 0.1, 1.0 / 3.0, 1e16, 1.5e-7, -2.5e300, f64::MIN_POSITIVE] {
        let text = builtins::to_str(&Value::from(f));
        let Value::Float(back) = builtins::to_float(&text).unwrap() else {
            panic!("float() did not return a float for {f}");
        };
        assert_eq!(back.0.to_bits(), f.to_bits(), "round trip of {}", text.repr());
    }
}

#[test]
fn ranges_materialize_to_their_elements() {
    assert_eq!(materialize(&range(&[5])), Value::list(ints(&[0, 1, 2, 3, 4])));
    assert_eq!(materialize(&range(&[2, 8])), Value::list(ints(&[2, 3, 4, 5, 6, 7])));
    assert_eq!(materialize(&range(&[0, 10, 2])), Value::list(ints(&[0, 2, 4, 6, 8])));
}

#[test]
fn enumerate_pairs_positions_with_elements() {
    let letters = Value::list(["a", "b", "c"].map(Value::from));
    let pairs = builtins::enumerate(&letters, &Value::from(0)).unwrap();
    assert_eq!(
        materialize(&pairs),
        Value::list([
            Value::tuple([Value::from(0), Value::from("a")]),
            Value::tuple([Value::from(1), Value::from("b")]),
            Value::tuple([Value::from(2), Value::from("c")]),
        ])
    );
}

#[test]
fn zip_pairs_and_truncates() {
    let numbers = Value::list(ints(&[1, 2, 3]));
    let letters = Value::list(["a", "b", "c"].map(Value::from));
    let zipped = builtins::zip(&[numbers.clone(), letters]).unwrap();
    assert_eq!(
        materialize(&zipped),
        Value::list([
            Value::tuple([Value::from(1), Value::from("a")]),
            Value::tuple([Value::from(2), Value::from("b")]),
            Value::tuple([Value::from(3), Value::from("c")]),
        ])
    );

    let short = Value::list(["x", "y"].map(Value::from));
    let zipped = builtins::zip(&[numbers, short]).unwrap();
    assert_eq!(builtins::len(&materialize(&zipped)).unwrap(), 2);
}

#[test]
fn mutation_is_visible_through_aliases() {
    let a = Value::list(ints(&[1]));
    let b = a.clone();
    call_method(&b, "append", Args::new(ints(&[2]))).unwrap();
    assert_eq!(builtins::len(&a).unwrap(), 2);
    assert!(a.is(&b));
}

#[test]
fn hashing_rules() {
    let unhashable = [
        Value::list([]),
        builtins::make_dict(None, Vec::new()).unwrap(),
        builtins::make_set(None).unwrap(),
    ];
    for value in unhashable {
        let err = builtins::hash(&value).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    let text_a = Value::from(String::from("key"));
    let text_b = Value::from("key");
    assert!(!text_a.is(&text_b));
    assert_eq!(builtins::hash(&text_a).unwrap(), builtins::hash(&text_b).unwrap());
    assert_eq!(
        builtins::hash(&Value::from(10)).unwrap(),
        builtins::hash(&builtins::to_int(&Value::from("10"), None).unwrap()).unwrap()
    );
}

#[test]
fn getattr_default_and_missing() {
    let obj = Value::Object(Object::new("Thing"));
    assert_eq!(
        builtins::getattr(&obj, "missing", Some(Value::from(99))).unwrap(),
        Value::from(99)
    );
    let err = builtins::getattr(&obj, "missing", None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AttributeError);
}
