use crate::error::{UnicornError, UnicornResult};

/// Parsed run parameters. Built once from the process arguments and passed
/// by reference from there on; nothing mutates it after validation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LeapConfig {
    /// Total duration of one leap, in seconds.
    pub seconds: f64,
    pub number: usize,
    /// Whether `--number` was given explicitly. Herd mode only falls back to
    /// its default size when it was not.
    pub number_was_given: bool,
    pub herd: bool,
    /// Scales the arc's peak height.
    pub eccentricity: f64,
    /// Unicorn image filename, resolved against `~/.unicornleap` unless
    /// absolute.
    pub unicorn: String,
    /// Sparkle image filename; sparkles are drawn only when this was given.
    pub sparkle: Option<String>,
    pub verbose: bool,
}

impl Default for LeapConfig {
    fn default() -> Self {
        Self {
            seconds: 2.0,
            number: 1,
            number_was_given: false,
            herd: false,
            eccentricity: 1.0,
            unicorn: "unicorn.png".to_string(),
            sparkle: None,
            verbose: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Parsed {
    /// `-h`/`--help` was given; print usage and exit 0.
    Help,
    Run(LeapConfig),
}

pub fn usage() -> String {
    [
        "Usage: unicornleap [options]",
        "  -h  --help             Display usage information.",
        "  -s  --seconds n        Animate for n seconds. (default: 2.0)",
        "  -n  --number i         Display i unicorns. (default: 1)",
        "  -H  --herd             Enables herd-mode.",
        "  -e  --eccentricity x   Leap the unicorns with a higher peak. (default: 1.0)",
        "  -u  --unicorn file     Filename for unicorn image.",
        "  -k  --sparkle file     Filename for sparkle image.",
        "  -v  --verbose          Print verbose messages.",
    ]
    .join("\n")
}

/// Scans `args` (without the program name) into either a run configuration
/// or the full list of problems. All problems are collected before failing,
/// so the user sees every bad flag at once.
pub fn parse(args: &[String]) -> UnicornResult<Parsed> {
    let scan = scan(args);

    if scan.help {
        return Ok(Parsed::Help);
    }

    let mut errors = Vec::new();
    if !scan.invalid.is_empty() {
        errors.push(format!(
            "unicornleap - invalid options: {}",
            scan.invalid.join(", ")
        ));
    }
    for (name, missing) in [
        ("seconds", scan.seconds.is_missing()),
        ("number", scan.number.is_missing()),
        ("eccentricity", scan.eccentricity.is_missing()),
        ("unicorn", scan.unicorn.is_missing()),
        ("sparkle", scan.sparkle.is_missing()),
    ] {
        if missing {
            errors.push(format!(
                "unicornleap - the {name} flag requires an argument"
            ));
        }
    }
    if !errors.is_empty() {
        return Err(UnicornError::usage(errors));
    }

    let number_was_given = scan.number.has_value();
    Ok(Parsed::Run(LeapConfig {
        seconds: scan.seconds.into_value().unwrap_or(2.0),
        number: scan.number.into_value().unwrap_or(1),
        number_was_given,
        herd: scan.herd,
        eccentricity: scan.eccentricity.into_value().unwrap_or(1.0),
        unicorn: scan
            .unicorn
            .into_value()
            .unwrap_or_else(|| "unicorn.png".to_string()),
        sparkle: scan.sparkle.into_value(),
        verbose: scan.verbose,
    }))
}

/// State of one value-carrying flag after scanning.
#[derive(Clone, Debug, Default, PartialEq)]
enum Flag<T> {
    #[default]
    Absent,
    /// Flag seen, but its value was missing or unparseable.
    Missing,
    Value(T),
}

impl<T> Flag<T> {
    fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    fn has_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    fn into_value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Scan {
    help: bool,
    herd: bool,
    verbose: bool,
    seconds: Flag<f64>,
    number: Flag<usize>,
    eccentricity: Flag<f64>,
    unicorn: Flag<String>,
    sparkle: Flag<String>,
    invalid: Vec<String>,
}

fn scan(args: &[String]) -> Scan {
    let mut scan = Scan::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => scan.help = true,
            "-H" | "--herd" => scan.herd = true,
            "-v" | "--verbose" => scan.verbose = true,
            "-s" | "--seconds" => scan.seconds = take_positive_f64(args, &mut i),
            "-n" | "--number" => scan.number = take_parsed(args, &mut i),
            "-e" | "--eccentricity" => scan.eccentricity = take_nonnegative_f64(args, &mut i),
            "-u" | "--unicorn" => scan.unicorn = take_parsed(args, &mut i),
            "-k" | "--sparkle" => scan.sparkle = take_parsed(args, &mut i),
            other => scan.invalid.push(other.to_string()),
        }
        i += 1;
    }
    scan
}

/// Consumes the token after `args[*i]` as the flag's value. The token is
/// consumed even when it fails to parse, so a stray `-s -v` reports the
/// seconds flag rather than cascading into later flags.
fn take_parsed<T: std::str::FromStr>(args: &[String], i: &mut usize) -> Flag<T> {
    *i += 1;
    match args.get(*i) {
        Some(raw) => match raw.parse::<T>() {
            Ok(v) => Flag::Value(v),
            Err(_) => Flag::Missing,
        },
        None => Flag::Missing,
    }
}

fn take_positive_f64(args: &[String], i: &mut usize) -> Flag<f64> {
    match take_parsed::<f64>(args, i) {
        Flag::Value(v) if v.is_finite() && v > 0.0 => Flag::Value(v),
        Flag::Value(_) => Flag::Missing,
        other => other,
    }
}

fn take_nonnegative_f64(args: &[String], i: &mut usize) -> Flag<f64> {
    match take_parsed::<f64>(args, i) {
        Flag::Value(v) if v.is_finite() && v >= 0.0 => Flag::Value(v),
        Flag::Value(_) => Flag::Missing,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn run(raw: &[&str]) -> LeapConfig {
        match parse(&args(raw)).unwrap() {
            Parsed::Run(config) => config,
            Parsed::Help => panic!("unexpected help"),
        }
    }

    fn errors(raw: &[&str]) -> Vec<String> {
        match parse(&args(raw)).unwrap_err() {
            UnicornError::Usage(errors) => errors,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn no_args_yields_defaults() {
        assert_eq!(run(&[]), LeapConfig::default());
    }

    #[test]
    fn short_and_long_forms_agree() {
        let short = run(&["-s", "3.5", "-n", "4", "-H", "-e", "0.5", "-u", "u.png", "-k", "k.png", "-v"]);
        let long = run(&[
            "--seconds", "3.5",
            "--number", "4",
            "--herd",
            "--eccentricity", "0.5",
            "--unicorn", "u.png",
            "--sparkle", "k.png",
            "--verbose",
        ]);
        assert_eq!(short, long);
        assert_eq!(short.seconds, 3.5);
        assert_eq!(short.number, 4);
        assert!(short.number_was_given);
        assert!(short.herd);
        assert_eq!(short.eccentricity, 0.5);
        assert_eq!(short.unicorn, "u.png");
        assert_eq!(short.sparkle.as_deref(), Some("k.png"));
        assert!(short.verbose);
    }

    #[test]
    fn help_wins_over_everything_else() {
        assert_eq!(parse(&args(&["-x", "--help", "--number"])).unwrap(), Parsed::Help);
    }

    #[test]
    fn number_without_value_requires_argument() {
        assert_eq!(
            errors(&["--number"]),
            vec!["unicornleap - the number flag requires an argument".to_string()]
        );
    }

    #[test]
    fn unparseable_values_require_argument() {
        assert_eq!(
            errors(&["-s", "soon"]),
            vec!["unicornleap - the seconds flag requires an argument".to_string()]
        );
        assert_eq!(
            errors(&["-n", "-3"]),
            vec!["unicornleap - the number flag requires an argument".to_string()]
        );
        assert_eq!(
            errors(&["-s", "-2.0"]),
            vec!["unicornleap - the seconds flag requires an argument".to_string()]
        );
    }

    #[test]
    fn all_problems_are_collected_invalid_options_first() {
        assert_eq!(
            errors(&["-x", "--bogus", "-s", "soon", "--number"]),
            vec![
                "unicornleap - invalid options: -x, --bogus".to_string(),
                "unicornleap - the seconds flag requires an argument".to_string(),
                "unicornleap - the number flag requires an argument".to_string(),
            ]
        );
    }

    #[test]
    fn flag_token_following_a_value_flag_is_consumed() {
        // `-s -v` swallows `-v` as the (bad) value; verbose stays off.
        let errs = errors(&["-s", "-v"]);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("seconds"));
    }

    #[test]
    fn sparkle_defaults_to_none() {
        assert_eq!(run(&[]).sparkle, None);
    }

    #[test]
    fn eccentricity_zero_is_accepted() {
        assert_eq!(run(&["-e", "0"]).eccentricity, 0.0);
    }

    #[test]
    fn usage_names_every_flag() {
        let text = usage();
        assert!(text.starts_with("Usage: unicornleap [options]"));
        for flag in ["--help", "--seconds", "--number", "--herd", "--eccentricity", "--unicorn", "--sparkle", "--verbose"] {
            assert!(text.contains(flag), "usage missing {flag}");
        }
    }
}
