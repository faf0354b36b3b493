use crate::{Argument, Error, Registry};

/////////////////////////////////////////////// usage //////////////////////////////////////////////

/// The alias as it appears in usage text:  `--name` for flags, `--name=v` for anything that
/// takes a value.
fn usage_alias(arg: &Argument) -> String {
    if arg.choices().is_empty() {
        arg.alias()
    } else {
        format!("{}=v", arg.alias())
    }
}

/// The help text with the legal values appended when there's a closed set of them.
fn usage_help(arg: &Argument) -> String {
    let choices = arg.choices();
    if choices.len() > 1 {
        let set = format!("[{}]", choices.join(","));
        if arg.help().is_empty() {
            set
        } else {
            format!("{} {}", arg.help(), set)
        }
    } else {
        arg.help().to_string()
    }
}

impl Registry {
    /// The name shown in usage text.  Falls back to the file name of `argv0` when no name was
    /// configured.
    pub fn program_name<'a>(&'a self, argv0: &'a str) -> &'a str {
        if !self.name.is_empty() {
            return &self.name;
        }
        std::path::Path::new(argv0)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(argv0)
    }

    /// The one-line synopsis, e.g. `Usage: prog [--verbose] [--level=v]`.
    pub fn usage(&self, argv0: &str) -> String {
        let mut usage = format!("Usage: {}", self.program_name(argv0));
        for arg in self.arguments() {
            usage.push_str(" [");
            usage.push_str(&usage_alias(arg));
            usage.push(']');
        }
        usage
    }

    /// The full help text:  synopsis, description, and one aligned row per declared option.
    pub fn help(&self, argv0: &str) -> String {
        let mut lines = vec![self.usage(argv0)];
        if !self.description.is_empty() {
            lines.push(self.description.clone());
        }
        lines.push(String::new());
        lines.push("Optional arguments:".to_string());
        let width = self
            .arguments()
            .map(|arg| usage_alias(arg).len())
            .max()
            .unwrap_or(0);
        for arg in self.arguments() {
            let row = format!("{:width$} {}", usage_alias(arg), usage_help(arg));
            lines.push(row.trim_end().to_string());
        }
        lines.push(String::new());
        lines.join("\n") + "\n"
    }

    /// What gets printed when parsing fails:  the synopsis, the error, and a blank line.
    pub fn diagnostic(&self, argv0: &str, err: &Error) -> String {
        format!("{}\nError: {}\n\n", self.usage(argv0), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .set_name("prog")
            .set_description("Does the thing.")
            .declare("verbose", "be chatty", &[])
            .declare("output", "where to write", &[""])
            .declare("mode", "how to run", &["fast", "slow"])
            .declare("quiet", "", &[])
            .declare("level", "", &["1", "2", "3"]);
        registry
    }

    #[test]
    fn usage_line() {
        assert_eq!(
            "Usage: prog [--verbose] [--output=v] [--mode=v] [--quiet] [--level=v]",
            registry().usage("/usr/bin/ignored")
        );
    }

    #[test]
    fn help_text() {
        let expected = "\
Usage: prog [--verbose] [--output=v] [--mode=v] [--quiet] [--level=v]
Does the thing.

Optional arguments:
--verbose  be chatty
--output=v where to write
--mode=v   how to run [fast,slow]
--quiet
--level=v  [1,2,3]

";
        assert_eq!(expected, registry().help("prog"));
    }

    #[test]
    fn no_description_no_arguments() {
        let registry = Registry::new();
        assert_eq!(
            "Usage: tool\n\nOptional arguments:\n\n",
            registry.help("/usr/local/bin/tool")
        );
    }

    #[test]
    fn program_name_fallback() {
        let mut registry = Registry::new();
        assert_eq!("tool", registry.program_name("/usr/local/bin/tool"));
        assert_eq!("tool", registry.program_name("tool"));
        assert_eq!("", registry.program_name(""));
        registry.set_name("renamed");
        assert_eq!("renamed", registry.program_name("/usr/local/bin/tool"));
    }

    #[test]
    fn diagnostic_text() {
        let mut registry = Registry::new();
        registry.declare("arg1", "", &[""]);
        let err = registry.parse(&["foo", "--bad name"]).unwrap_err();
        assert_eq!(
            "Usage: prog [--arg1=v]\nError: bad argument format: foo, --bad name\n\n",
            registry.diagnostic("prog", &err)
        );
    }
}
