//! The `list` command - the welcome text with every available entry.

use mathsolve::{list_operators, solve};

use crate::config::Config;
use crate::reply::Reply;

const EXAMPLE_QUERY: &str = "3 ** log15(pi) + 42";
const EXAMPLE_ABOUT: &str = "logN";

pub fn run(config: &Config) {
    println!("{}", welcome(config));
}

fn welcome(config: &Config) -> String {
    let names: Vec<&str> = list_operators().into_iter().map(|(token, _)| token).collect();
    let example = Reply::new(EXAMPLE_QUERY, solve(EXAMPLE_QUERY), &config.output);
    let example_result = example
        .raw(&config.output)
        .unwrap_or_else(|| example.render(&config.output));
    let about = mathsolve::lookup_doc(EXAMPLE_ABOUT).unwrap_or_default();

    format!(
        "List of currently available functions:\n{}\n\n\
         Example: {EXAMPLE_QUERY}\nResult: {example_result}\n\n\
         To know more about each function use `mathsolve about <name>`\n\
         Example: mathsolve about {EXAMPLE_ABOUT}\nResult: {about}",
        names.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_lists_entries_in_order() {
        let text = welcome(&Config::default());
        assert!(text.starts_with("List of currently available functions:\npi, e, acos"));
        assert!(text.contains("logN, !, !!, **, *, /, +, -"));
        assert!(text.contains("Result: Alias for log(x, y) => logY(x)"));
    }

    #[test]
    fn test_welcome_example_solves() {
        let text = welcome(&Config::default());
        assert!(!text.contains("Result: You have"));
        assert!(text.contains("Example: 3 ** log15(pi) + 42\nResult: 43.5"));
    }
}
