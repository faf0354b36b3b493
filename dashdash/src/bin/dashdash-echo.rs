//! Echo what dashdash made of the command line.
//!
//! ```
//! $ dashdash-echo --name=world --shout --color=red
//! name=world
//! shout
//! color=red
//! ```
//!
//! Running with no arguments, or with `--help`, prints the help text.

use dashdash::{CommandLine, Registry};

#[derive(CommandLine, Debug, Default, Eq, PartialEq)]
struct EchoOptions {
    #[dashdash(value, "who to greet")]
    name: Option<String>,
    #[dashdash(flag, "greet loudly")]
    shout: bool,
    #[dashdash(choice, "what color to greet in", "red", "green", "blue")]
    color: Option<String>,
    #[dashdash(flag)]
    dry_run: bool,
}

fn main() {
    let mut registry = Registry::new();
    registry
        .set_name("dashdash-echo")
        .set_description("Prints each option dashdash recognized, one per line.");
    let options = EchoOptions::from_registry(registry);
    if let Some(name) = &options.name {
        println!("name={}", name);
    }
    if options.shout {
        println!("shout");
    }
    if let Some(color) = &options.color {
        println!("color={}", color);
    }
    if options.dry_run {
        println!("dry-run");
    }
}
