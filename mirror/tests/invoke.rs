use insta::assert_snapshot;
use mirror::{Kind, ReflectError, Reflector, Value, args, reflect};
use mirror_testhelpers::test;

reflect! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Counter {
        pub step: u32,
        total: u32,
        history: Vec<u32>,
    }
    impl {
        fn bump(&mut self, times: u32) -> u32;
        fn total(&self) -> u32;
        fn describe(&self, prefix: String, suffix: &'static str) -> String;
        fn scale(&mut self, by: u32, extra: u32) -> (u32, u32);
        fn reset(&mut self);
        fn last(&self) -> Option<u32>;
    }
}

impl Counter {
    fn new(step: u32) -> Self {
        Self {
            step,
            total: 0,
            history: Vec::new(),
        }
    }

    fn bump(&mut self, times: u32) -> u32 {
        self.total += self.step * times;
        self.history.push(self.total);
        self.total
    }

    fn total(&self) -> u32 {
        self.total
    }

    fn describe(&self, prefix: String, suffix: &'static str) -> String {
        format!("{prefix}{}{suffix}", self.total)
    }

    fn scale(&mut self, by: u32, extra: u32) -> (u32, u32) {
        let before = self.total;
        self.total = self.total * by + extra;
        (before, self.total)
    }

    fn reset(&mut self) {
        self.total = 0;
        self.history.clear();
    }

    fn last(&self) -> Option<u32> {
        self.history.last().copied()
    }
}

fn single(outputs: Vec<Value>) -> Value {
    assert_eq!(outputs.len(), 1, "expected exactly one output");
    outputs.into_iter().next().unwrap()
}

#[test]
fn methods_are_invoked_by_name() {
    let mut counter = Counter::new(3);
    let mut reflector = Reflector::new(&mut counter);

    let outputs = reflector.invoke("bump", args![2_u32])?;
    assert_eq!(single(outputs).take::<u32>()?, 6);

    let outputs = reflector.invoke("total", args![])?;
    assert_eq!(single(outputs).take::<u32>()?, 6);

    let outputs = reflector.invoke("last", args![])?;
    assert_eq!(single(outputs).take::<Option<u32>>()?, Some(6));

    drop(reflector);
    assert_eq!(counter.history, [6]);
}

#[test]
fn unknown_methods_leave_the_target_alone() {
    let mut counter = Counter::new(3);
    counter.bump(1);
    let before = counter.clone();

    let err = Reflector::new(&mut counter)
        .invoke("does_not_exist", args![1_u32])
        .unwrap_err();
    assert_snapshot!(err, @"Counter has no method named 'does_not_exist'");

    // lookups are exact
    let err = Reflector::new(&mut counter)
        .invoke("Bump", args![1_u32])
        .unwrap_err();
    assert!(matches!(err, ReflectError::MethodNotFound { ref name, .. } if name == "Bump"));

    assert_eq!(counter, before);
}

#[test]
fn method_arguments_are_checked_like_function_arguments() {
    let mut counter = Counter::new(3);
    let mut reflector = Reflector::new(&mut counter);

    let err = reflector.invoke("bump", args![]).unwrap_err();
    assert_snapshot!(err, @"Counter::bump takes 1 argument(s), but 0 were given");

    let err = reflector.invoke("bump", args!["twice"]).unwrap_err();
    assert_snapshot!(err, @r#"Parameter 0 of Counter::bump has kind u32, but argument "twice" has kind string"#);

    // an unsuffixed literal is an i32
    let err = reflector.invoke("bump", args![2]).unwrap_err();
    assert!(matches!(
        err,
        ReflectError::KindMismatch {
            expected: Kind::U32,
            actual: Kind::I32,
            ..
        }
    ));

    drop(reflector);
    assert_eq!(counter.total(), 0);
}

#[test]
fn method_arguments_convert_to_parameter_types() {
    let mut counter = Counter::new(5);
    counter.bump(2);

    let outputs = Reflector::new(&mut counter).invoke("describe", args!["total=", "!"])?;
    assert_eq!(single(outputs).take::<String>()?, "total=10!");
}

#[test]
fn methods_are_invoked_by_type() {
    let mut counter = Counter::new(5);
    counter.bump(2);
    let mut reflector = Reflector::new(&mut counter);

    let outputs = reflector.invoke_type("describe", args!["!", String::from("total=")])?;
    assert_eq!(single(outputs).take::<String>()?, "total=10!");

    // both parameters are `u32`: the last value feeds both
    let outputs = reflector.invoke_type("scale", args![100_u32, 2_u32])?;
    let values: Vec<u32> = outputs
        .into_iter()
        .map(|output| output.take::<u32>())
        .collect::<Result<_, _>>()?;
    assert_eq!(values, [10, 22]);

    let err = reflector
        .invoke_type("describe", args!["!", "total="])
        .unwrap_err();
    assert_snapshot!(err, @"Parameter 0 of Counter::describe needs a String, but no argument has that type");
}

#[test]
fn unit_methods_return_nothing() {
    let mut counter = Counter::new(5);
    counter.bump(1);

    let outputs = Reflector::new(&mut counter).invoke("reset", args![])?;
    assert!(outputs.is_empty());
    assert_eq!(counter.total(), 0);
    assert!(counter.history.is_empty());
}

#[test]
fn shared_references_only_allow_shared_methods() {
    let mut counter = Counter::new(5);
    counter.bump(1);
    let mut shared = &counter;
    let mut reflector = Reflector::new(&mut shared);

    let outputs = reflector.invoke("total", args![])?;
    assert_eq!(single(outputs).take::<u32>()?, 5);

    let err = reflector.invoke("bump", args![1_u32]).unwrap_err();
    assert_snapshot!(err, @"Cannot call a `&mut self` method: Counter is behind a shared reference");
}

#[test]
fn methods_are_found_through_boxes() {
    let mut boxed = Box::new(Counter::new(4));
    let outputs = Reflector::new(&mut boxed).invoke("bump", args![1_u32])?;
    assert_eq!(single(outputs).take::<u32>()?, 4);
    assert_eq!(boxed.total(), 4);
}

#[test]
fn invoking_on_a_non_struct_fails() {
    let mut list = vec![1_u32, 2, 3];
    let err = Reflector::new(&mut list)
        .invoke("len", args![])
        .unwrap_err();
    assert_snapshot!(err, @"Vec<u32> does not lead to a struct with named fields");
}

#[test]
fn injection_and_invocation_share_a_reflector() {
    let mut counter = Counter::new(1);
    let mut reflector = Reflector::new(&mut counter).map("step", 10_u32);
    reflector.inject()?;
    let outputs = reflector.invoke("bump", args![3_u32])?;
    assert_eq!(single(outputs).take::<u32>()?, 30);
}
