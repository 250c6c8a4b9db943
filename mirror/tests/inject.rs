use std::cell::RefCell;
use std::rc::Rc;

use insta::assert_snapshot;
use mirror::{Advisory, Diagnostics, Kind, Reflect, ReflectError, Reflector, reflect};
use mirror_testhelpers::test;

reflect! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Person {
        pub name: String,
        pub age: i32,
        pub nickname: String,
        secret: String,
    }
}

reflect! {
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Meters(pub f64);
}

reflect! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Label(pub String);
}

reflect! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Profile {
        pub height: Meters,
        pub weight: f64,
        pub label: Label,
    }
}

reflect! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Pin(String);
}

reflect! {
    #[derive(Debug, Default)]
    pub struct Vault {
        pub pin: Pin,
    }
}

reflect! {
    pub struct Token {
        pub id: u32,
    }
}

reflect! {
    pub struct Holder {
        pub token: Token,
    }
}

#[derive(Default)]
struct Recorder {
    advisories: RefCell<Vec<Advisory>>,
}

impl Diagnostics for Recorder {
    fn advise(&self, advisory: &Advisory) {
        self.advisories.borrow_mut().push(*advisory);
    }
}

#[test]
fn fields_are_injected_by_name() {
    let mut person = Person::default();
    Reflector::new(&mut person)
        .map("name", "Ada")
        .map("age", 36)
        .inject()?;

    assert_eq!(person.name, "Ada");
    assert_eq!(person.age, 36);
    assert_eq!(person.nickname, "");
}

#[test]
fn kind_mismatch_stops_the_injection() {
    let mut person = Person {
        age: 12,
        ..Person::default()
    };
    let err = Reflector::new(&mut person)
        .map("name", "Ada")
        .map("age", "not-an-int")
        .map("nickname", "Countess")
        .inject()
        .err()
        .unwrap();

    assert!(matches!(
        err,
        ReflectError::FieldKindMismatch {
            field: "age",
            expected: Kind::I32,
            actual: Kind::String,
            ..
        }
    ));
    assert_snapshot!(err, @r#"Field 'Person::age' has kind i32, but the value "not-an-int" has kind string"#);

    // fields before `age` were written, the rest were not
    assert_eq!(person.name, "Ada");
    assert_eq!(person.age, 12);
    assert_eq!(person.nickname, "");
}

#[test]
fn integer_widths_are_distinct_kinds() {
    let mut person = Person::default();
    let err = Reflector::new(&mut person)
        .map("age", 36_i64)
        .inject()
        .err()
        .unwrap();
    assert_snapshot!(err, @"Field 'Person::age' has kind i32, but the value 36 has kind i64");
}

#[test]
fn unexported_and_unknown_names_are_ignored() {
    let mut person = Person::default();
    Reflector::new(&mut person)
        .map("secret", "hunter2")
        .map("favorite_color", "blue")
        .inject()?;
    assert_eq!(person, Person::default());
}

#[test]
fn later_mappings_replace_earlier_ones() {
    let mut person = Person::default();
    Reflector::new(&mut person)
        .map("name", "Ada")
        .map("name", "Grace")
        .inject()?;
    assert_eq!(person.name, "Grace");
}

#[test]
fn fields_are_injected_by_type() {
    let mut person = Person {
        age: 7,
        secret: "kept".into(),
        ..Person::default()
    };
    Reflector::new(&mut person)
        .map_type(String::from("same"))
        .inject_type()?;

    assert_eq!(person.name, "same");
    assert_eq!(person.nickname, "same");
    assert_eq!(person.secret, "kept");
    assert_eq!(person.age, 7);
}

#[test]
fn type_entries_match_exact_types_only() {
    let mut profile = Profile::default();
    Reflector::new(&mut profile)
        .map_type(Meters(1.8))
        // a `&str` is not a `String`, let alone a `Label`
        .map_type("tall")
        .inject_type()?;

    assert_eq!(profile.height, Meters(1.8));
    assert_eq!(profile.weight, 0.0);
    assert_eq!(profile.label, Label::default());
}

#[test]
fn names_convert_into_newtype_fields() {
    let mut profile = Profile::default();
    Reflector::new(&mut profile)
        .map("height", 1.8)
        .map("weight", Meters(70.0))
        .map("label", "tall")
        .inject()?;

    assert_eq!(
        profile,
        Profile {
            height: Meters(1.8),
            weight: 70.0,
            label: Label("tall".into()),
        }
    );
}

#[test]
fn entries_survive_repeated_injections() {
    let mut person = Person::default();
    let mut reflector = Reflector::new(&mut person).map("name", "Ada").map_type(40);
    reflector.inject()?.inject_type()?.inject()?;
    drop(reflector);

    assert_eq!(person.name, "Ada");
    assert_eq!(person.age, 40);
}

#[test]
fn entries_that_cannot_be_cloned_cannot_be_injected() {
    let mut holder = Holder {
        token: Token { id: 1 },
    };
    let err = Reflector::new(&mut holder)
        .map("token", Token { id: 2 })
        .inject()
        .err()
        .unwrap();
    assert!(matches!(err, ReflectError::NotCloneable { shape } if shape == Token::SHAPE));
    assert_eq!(holder.token.id, 1);
}

#[test]
fn targets_resolve_through_references_and_boxes() {
    let mut person = Person::default();
    let mut by_ref = &mut person;
    Reflector::new(&mut by_ref).map("age", 1).inject()?;
    assert_eq!(person.age, 1);

    let mut boxed = Box::new(Person::default());
    Reflector::new(&mut boxed).map("age", 2).inject()?;
    assert_eq!(boxed.age, 2);

    let mut deep = Box::new(&mut person);
    Reflector::new(&mut deep).map("age", 3).inject()?;
    drop(deep);
    assert_eq!(person.age, 3);
}

#[test]
fn shared_references_cannot_be_injected_into() {
    let person = Person::default();
    let mut shared = &person;
    let err = Reflector::new(&mut shared)
        .map("age", 1)
        .inject()
        .err()
        .unwrap();
    assert_snapshot!(err, @"Cannot inject fields: Person is behind a shared reference");
    assert_eq!(person.age, 0);
}

#[test]
fn targets_must_be_structs_with_named_fields() {
    let mut number = 5_i32;
    let err = Reflector::new(&mut number)
        .map("age", 1)
        .inject()
        .err()
        .unwrap();
    assert_snapshot!(err, @"i32 does not lead to a struct with named fields");

    // newtypes resolve to what they wrap
    let mut meters = Meters(1.0);
    let err = Reflector::new(&mut meters).inject_type().err().unwrap();
    assert!(matches!(err, ReflectError::NotAnAggregate { shape } if shape == Meters::SHAPE));
}

#[test]
fn advisories_flag_the_wrong_kind_of_entries() {
    let recorder = Recorder::default();
    let mut person = Person::default();

    Reflector::new(&mut person)
        .diagnostics(&recorder)
        .map_type(String::from("x"))
        .inject()?;
    Reflector::new(&mut person)
        .diagnostics(&recorder)
        .map("name", "x")
        .inject_type()?;
    // neither kind of entry: nothing to advise about
    Reflector::new(&mut person)
        .diagnostics(&recorder)
        .inject()?;
    // both kinds: nothing either
    Reflector::new(&mut person)
        .diagnostics(&recorder)
        .map("name", "x")
        .map_type(3)
        .inject()?
        .inject_type()?;

    let advisories = recorder.advisories.borrow();
    assert_eq!(
        *advisories,
        [
            Advisory::OnlyTypeEntries {
                shape: Person::SHAPE
            },
            Advisory::OnlyNameEntries {
                shape: Person::SHAPE
            },
        ]
    );
    assert_snapshot!(advisories[0], @"Injecting into Person by field name, but only values mapped by type were given: did you mean inject_type?");

    // advisories never stop the injection
    assert_eq!(person.name, "x");
}

#[test]
fn shared_sinks_can_be_handed_over() {
    let recorder = Rc::new(Recorder::default());
    let mut person = Person::default();
    Reflector::new(&mut person)
        .diagnostics(Rc::clone(&recorder))
        .map("age", 1)
        .inject_type()?;
    assert_eq!(recorder.advisories.borrow().len(), 1);
}

#[test]
fn private_newtype_fields_are_not_written_through() {
    let mut vault = Vault::default();
    let err = Reflector::new(&mut vault)
        .map("pin", "1234")
        .inject()
        .err()
        .unwrap();
    assert_snapshot!(err, @"A &str cannot be assigned to a Pin");
    assert_eq!(vault.pin, Pin::default());

    Reflector::new(&mut vault)
        .map("pin", Pin(String::from("1234")))
        .inject()?;
    assert_eq!(vault.pin.0, "1234");
}
