use std::ffi::OsString;

use clap::Parser;

/// Create directories, including any missing parents.
#[derive(Parser, Debug)]
#[command(name = "safe-recursive-mkdir", version, about)]
pub struct Cli {
    /// Directories to create; existing ones are left alone.
    #[arg(
        value_name = "DIR",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub paths: Vec<OsString>,
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_argument_in_order() {
        let cli = Cli::try_parse_from(["safe-recursive-mkdir", "a", "b/c", "-weird"]).unwrap();
        assert_eq!(
            cli.paths,
            vec![
                OsString::from("a"),
                OsString::from("b/c"),
                OsString::from("-weird")
            ]
        );
    }

    #[test]
    fn double_dash_separates_and_is_not_a_path() {
        let cli = Cli::try_parse_from(["safe-recursive-mkdir", "--", "x"]).unwrap();
        assert_eq!(cli.paths, vec![OsString::from("x")]);
    }

    #[test]
    fn leading_help_flag_is_not_a_path() {
        let err = Cli::try_parse_from(["safe-recursive-mkdir", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn no_arguments_is_an_empty_batch() {
        let cli = Cli::try_parse_from(["safe-recursive-mkdir"]).unwrap();
        assert!(cli.paths.is_empty());
    }
}
