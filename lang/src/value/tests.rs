use super::*;
use crate::builtins::{BuiltinId, Callable};
use expect_test::{Expect, expect};

fn check_repr(value: &Value, expect: Expect) {
    expect.assert_eq(&value.repr());
}

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

#[test]
fn repr_of_scalars() {
    check_repr(&Value::None, expect!["None"]);
    check_repr(&Value::from(true), expect!["True"]);
    check_repr(&Value::from(-42), expect!["-42"]);
    check_repr(&Value::from(2.5), expect!["2.5"]);
    check_repr(&Value::from("hi"), expect!["'hi'"]);
}

#[test]
fn repr_of_nested_containers() {
    let dict = Dict::from_pairs([
        (Value::from("k"), Value::None),
        (Value::from(1), Value::tuple([Value::from(2)])),
    ])
    .unwrap();
    let value = Value::list([
        Value::from(1),
        Value::from("a"),
        Value::Dict(dict),
        Value::tuple([]),
        Value::from(1.0),
        Value::from(false),
    ]);
    check_repr(&value, expect!["[1, 'a', {'k': None, 1: (2,)}, (), 1.0, False]"]);
}

#[test]
fn repr_of_sets_and_ranges() {
    check_repr(&Value::Set(Set::new()), expect!["set()"]);
    check_repr(
        &Value::Set(Set::from_values(ints(&[3, 1, 3, 2])).unwrap()),
        expect!["{3, 1, 2}"],
    );
    check_repr(
        &Value::Range(RangeSpec::new(0, 5, 1).unwrap()),
        expect!["range(0, 5)"],
    );
    check_repr(
        &Value::Range(RangeSpec::new(10, 0, -2).unwrap()),
        expect!["range(10, 0, -2)"],
    );
}

#[test]
fn repr_of_types_and_functions() {
    check_repr(&Value::Type(TypeTag::Int), expect!["<class 'int'>"]);
    check_repr(
        &Value::Type(TypeTag::Instance(Rc::from("Point"))),
        expect!["<class 'Point'>"],
    );
    check_repr(&Callable::builtin(BuiltinId::Len), expect!["<built-in function len>"]);
}

#[test]
fn str_shows_text_raw_and_everything_else_as_repr() {
    assert_eq!(Value::from("a'b").to_string(), "a'b");
    assert_eq!(Value::list([Value::from("x")]).to_string(), "['x']");
    assert_eq!(Value::None.to_string(), "None");
}

#[test]
fn text_repr_picks_quotes_and_escapes() {
    check_repr(&Value::from("it's"), expect![[r#""it's""#]]);
    check_repr(&Value::from(r#"say "hi""#), expect![[r#"'say "hi"'"#]]);
    check_repr(&Value::from(r#"it's "x""#), expect![[r#"'it\'s "x"'"#]]);
    check_repr(&Value::from("a\nb\t\\"), expect![[r"'a\nb\t\\'"]]);
    check_repr(&Value::from("\u{1}é"), expect![[r"'\x01é'"]]);
}

#[test]
fn self_referencing_containers_render_ellipsis() {
    let list = List::from_values(ints(&[1]));
    list.append(Value::List(list.clone()));
    check_repr(&Value::List(list), expect!["[1, [...]]"]);

    let dict = Dict::new();
    dict.set_item(Value::from("me"), Value::Dict(dict.clone()))
        .unwrap();
    check_repr(&Value::Dict(dict), expect!["{'me': {...}}"]);
}

#[test]
fn float_formatting() {
    let rendered: Vec<String> = [
        1.0,
        0.1,
        -0.0,
        123.456,
        1e16,
        1e15,
        1.5e-5,
        0.0001,
        1.0 / 3.0,
        2.0f64.powi(70),
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NAN,
    ]
    .into_iter()
    .map(format_float)
    .collect();
    expect![[r#"
        [
            "1.0",
            "0.1",
            "-0.0",
            "123.456",
            "1e+16",
            "1000000000000000.0",
            "1.5e-05",
            "0.0001",
            "0.3333333333333333",
            "1.1805916207174113e+21",
            "inf",
            "-inf",
            "nan",
        ]
    "#]]
    .assert_debug_eq(&rendered);
}

#[test]
fn numeric_equality_crosses_kinds() {
    assert_eq!(Value::from(1), Value::from(1.0));
    assert_eq!(Value::from(1), Value::from(true));
    assert_eq!(Value::from(0.0), Value::from(false));
    assert_ne!(Value::from(1), Value::from("1"));
    assert_ne!(Value::None, Value::from(0));
    assert_ne!(Value::from(f64::NAN), Value::from(f64::NAN));
}

#[test]
fn containers_compare_structurally() {
    let a = Value::list(ints(&[1, 2]));
    let b = Value::list(vec![Value::from(1.0), Value::from(2)]);
    assert_eq!(a, b);
    assert_ne!(a, Value::tuple(ints(&[1, 2])));
    assert_eq!(
        Value::Set(Set::from_values(ints(&[1, 2])).unwrap()),
        Value::Set(Set::from_values(ints(&[2, 1])).unwrap())
    );
    assert_eq!(
        Value::Range(RangeSpec::new(0, 0, 1).unwrap()),
        Value::Range(RangeSpec::new(5, 1, 3).unwrap())
    );
}

#[test]
fn objects_compare_by_identity() {
    let a = Value::Object(Object::new("Point"));
    let b = Value::Object(Object::new("Point"));
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}

#[test]
fn identity_follows_aliasing() {
    let list = Value::list([]);
    let alias = list.clone();
    assert!(list.is(&alias));
    assert!(!list.is(&Value::list([])));
    assert!(Value::None.is(&Value::None));
    assert!(!Value::from(true).is(&Value::from(false)));
    assert!(Value::from(7).is(&Value::from(7)));
    assert_ne!(Value::from(1).identity(), Value::from(true).identity());
}

#[test]
fn nan_is_never_identical_inside_containers() {
    let nan_a = Value::from(f64::NAN);
    let nan_b = Value::from(f64::NAN);
    assert!(!nan_a.is(&nan_b));
    assert_ne!(Value::list([nan_a.clone()]), Value::list([nan_b.clone()]));
    assert_ne!(Value::tuple([nan_a.clone()]), Value::tuple([nan_b.clone()]));

    let set = Set::from_values([nan_a.clone(), nan_b]).unwrap();
    assert_eq!(set.len(), 2);
    assert!(!set.contains(&nan_a).unwrap());
}

#[test]
fn type_tags() {
    assert_eq!(Value::from(1).type_name(), "int");
    assert_eq!(Value::from(true).type_name(), "bool");
    assert_eq!(Value::None.type_name(), "NoneType");
    assert_eq!(Value::Object(Object::new("Point")).type_name(), "Point");
    assert_eq!(Callable::builtin(BuiltinId::Abs).type_name(), "builtin_function_or_method");
    assert!(TypeTag::Bool.is_subtype_of(&TypeTag::Int));
    assert!(TypeTag::Str.is_subtype_of(&TypeTag::Object));
    assert!(!TypeTag::Int.is_subtype_of(&TypeTag::Bool));
}

#[test]
fn index_conversion() {
    assert_eq!(Value::from(true).as_index().unwrap(), 1);
    let err = Value::from(1.5).as_index().unwrap_err();
    assert_eq!(err.message, "'float' object cannot be interpreted as an integer");
    let huge = Value::Int(BigInt::from(1) << 80);
    assert_eq!(huge.as_index().unwrap_err().kind, crate::error::ErrorKind::IndexError);
}
