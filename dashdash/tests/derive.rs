use dashdash::{CommandLine, Error, InputError, Kind, Outcome};

#[derive(CommandLine, Debug, Default, Eq, PartialEq)]
struct ExampleCommandLine {
    #[dashdash(flag, "this toggles false->true only")]
    some_flag: bool,
    #[dashdash(value, "a free-form string")]
    some_string: String,
    #[dashdash(value, "an optional string")]
    maybe_string: Option<String>,
    #[dashdash(choice, "pick a size", "small", "medium", "large")]
    size: Option<String>,
    #[dashdash(choice, "pick a side", "left", "right")]
    side: String,
    not_an_option: u64,
}

#[test]
fn declarations() {
    let registry = ExampleCommandLine::registry();
    let names: Vec<&str> = registry.arguments().map(|arg| arg.name()).collect();
    assert_eq!(
        vec!["some-flag", "some-string", "maybe-string", "size", "side"],
        names
    );
    let kinds: Vec<Kind> = registry.arguments().map(|arg| arg.kind()).collect();
    assert_eq!(
        vec![Kind::Flag, Kind::Free, Kind::Free, Kind::Choice, Kind::Choice],
        kinds
    );
    let size = registry.argument("size").unwrap();
    assert_eq!("pick a size", size.help());
    assert_eq!(&["small", "medium", "large"], size.choices());
}

#[test]
fn all_args() {
    let (got, outcome) = ExampleCommandLine::from_arguments(&[
        "--some-flag",
        "--some-string=xyz",
        "--maybe-string=abc",
        "--size=large",
        "--side=left",
    ])
    .unwrap();
    assert_eq!(Outcome::Ready, outcome);
    assert_eq!(
        ExampleCommandLine {
            some_flag: true,
            some_string: "xyz".to_string(),
            maybe_string: Some("abc".to_string()),
            size: Some("large".to_string()),
            side: "left".to_string(),
            not_an_option: 0,
        },
        got
    );
}

#[test]
fn some_args() {
    let (got, outcome) = ExampleCommandLine::from_arguments(&["--side=right"]).unwrap();
    assert_eq!(Outcome::Ready, outcome);
    assert_eq!(
        ExampleCommandLine {
            side: "right".to_string(),
            ..ExampleCommandLine::default()
        },
        got
    );
}

#[test]
fn help_keeps_defaults() {
    let (got, outcome) = ExampleCommandLine::from_arguments(&["--help"]).unwrap();
    assert_eq!(Outcome::Help, outcome);
    assert_eq!(ExampleCommandLine::default(), got);
}

#[test]
fn errors_pass_through() {
    assert_eq!(
        Err(Error::Input(InputError::Unrecognized(vec![
            "--some_flag".to_string()
        ]))),
        ExampleCommandLine::from_arguments(&["--some_flag"])
    );
}
