use std::ffi::OsStr;
use std::process::Command;

fn echo<S: AsRef<OsStr>>(args: &[S]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_dashdash-echo"))
        .args(args)
        .output()
        .expect("dashdash-echo should run");
    (
        output.status.code().expect("dashdash-echo should exit"),
        String::from_utf8(output.stdout).expect("stdout should be utf8"),
        String::from_utf8(output.stderr).expect("stderr should be utf8"),
    )
}

const USAGE: &str = "Usage: dashdash-echo [--name=v] [--shout] [--color=v] [--dry-run]";

#[test]
fn ready() {
    let (status, stdout, stderr) = echo(&["--color=blue", "--name=world", "--dry-run"]);
    assert_eq!(0, status);
    assert_eq!("name=world\ncolor=blue\ndry-run\n", stdout);
    assert_eq!("", stderr);
}

#[test]
fn no_arguments_prints_help() {
    let args: &[&str] = &[];
    let (status, stdout, stderr) = echo(args);
    assert_eq!(0, status);
    let expected = format!(
        "{USAGE}
Prints each option dashdash recognized, one per line.

Optional arguments:
--name=v  who to greet
--shout   greet loudly
--color=v what color to greet in [red,green,blue]
--dry-run

"
    );
    assert_eq!(expected, stdout);
    assert_eq!("", stderr);
}

#[test]
fn explicit_help() {
    let (status, stdout, _) = echo(&["--shout", "--help"]);
    assert_eq!(0, status);
    assert!(stdout.starts_with(USAGE));
}

#[test]
fn bad_values_exit_two() {
    let (status, stdout, stderr) = echo(&["--color=mauve", "--shout=yes", "--name"]);
    assert_eq!(2, status);
    assert_eq!("", stdout);
    assert_eq!(
        format!(
            "{USAGE}\nError: bad argument values: --color=mauve (invalid choice), \
             --shout=yes (unexpected value), --name (missing value)\n\n"
        ),
        stderr
    );
}

#[test]
fn unrecognized_exit_two() {
    let (status, _, stderr) = echo(&["--whisper", "--shout", "--mumble"]);
    assert_eq!(2, status);
    assert!(stderr.contains("Error: unrecognized arguments: --whisper, --mumble\n"));
}

#[test]
fn bad_format_exits_two() {
    let (status, stdout, stderr) = echo(&["--shout", "shout", "--name=a b"]);
    assert_eq!(2, status);
    assert_eq!("", stdout);
    assert_eq!(
        format!("{USAGE}\nError: bad argument format: shout, --name=a b\n\n"),
        stderr
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_is_bad_format() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let args = [
        OsString::from("--shout"),
        OsString::from_vec(vec![b'-', b'-', 0xff]),
    ];
    let (status, stdout, stderr) = echo(&args);
    assert_eq!(2, status);
    assert_eq!("", stdout);
    assert!(stderr.starts_with(USAGE), "stderr={stderr:?}");
    assert!(
        stderr.contains("Error: bad argument format: --\u{FFFD}\n"),
        "stderr={stderr:?}"
    );
}
