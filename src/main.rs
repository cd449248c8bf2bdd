mod debug_report;

use spindrift::{
    DEFAULT_MAX_PASSES, DEFAULT_PREVIEW_COUNT, SpinOptions, count_variations, generate_previews,
    spin_verbose_with, validate,
};
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    match config.mode {
        Mode::Spin => {
            let opts = SpinOptions {
                seed: config.seed.clone(),
                max_passes: config.max_passes,
                preserve_original: true,
            };
            let report = spin_verbose_with(&config.template, &opts);
            debug_report::print_run(&config.template, &report, config.seed.as_deref(), config.color);
        }
        Mode::Previews(count) => {
            let previews = generate_previews(&config.template, count);
            debug_report::print_previews(&config.template, &previews, config.color);
        }
        Mode::Validate => {
            let result = validate(&config.template);
            debug_report::print_validation(&config.template, &result, config.color);
            if !result.valid {
                std::process::exit(1);
            }
        }
        Mode::Count => {
            println!("{}", count_variations(&config.template));
        }
    }
}

#[derive(Debug)]
enum Mode {
    Spin,
    Previews(usize),
    Validate,
    Count,
}

#[derive(Debug)]
struct CliConfig {
    template: String,
    seed: Option<String>,
    max_passes: usize,
    mode: Mode,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from(mut args: impl Iterator<Item = String>) -> Result<CliConfig, String> {
    let mut template: Option<String> = None;
    let mut seed: Option<String> = None;
    let mut max_passes = DEFAULT_MAX_PASSES;
    let mut mode = Mode::Spin;
    let mut color = io::stdout().is_terminal();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("spindrift {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--validate" => mode = Mode::Validate,
            "--count" => mode = Mode::Count,
            "--previews" => {
                let value = args.next().ok_or_else(|| "error: --previews expects a value".to_string())?;
                mode = Mode::Previews(parse_number(&value, "--previews")?);
            }
            "--seed" | "-s" => {
                let value = args.next().ok_or_else(|| "error: --seed expects a value".to_string())?;
                seed = Some(value);
            }
            "--passes" => {
                let value = args.next().ok_or_else(|| "error: --passes expects a value".to_string())?;
                max_passes = parse_number(&value, "--passes")?;
            }
            "--template" | "-t" => {
                let value = args.next().ok_or_else(|| "error: --template expects a value".to_string())?;
                if template.is_some() {
                    return Err("error: template provided multiple times".to_string());
                }
                template = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if template.is_some() {
                        return Err("error: template provided multiple times".to_string());
                    }
                    template = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--previews=") => {
                let value = arg.trim_start_matches("--previews=");
                mode = Mode::Previews(parse_number(value, "--previews")?);
            }
            _ if arg.starts_with("--seed=") => {
                let value = arg.trim_start_matches("--seed=");
                seed = Some(value.to_string());
            }
            _ if arg.starts_with("--passes=") => {
                let value = arg.trim_start_matches("--passes=");
                max_passes = parse_number(value, "--passes")?;
            }
            _ if arg.starts_with("--template=") => {
                let value = arg.trim_start_matches("--template=");
                if template.is_some() {
                    return Err("error: template provided multiple times".to_string());
                }
                template = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if template.is_some() {
                    return Err("error: template provided multiple times".to_string());
                }
                template = Some(rest);
                break;
            }
        }
    }

    let template = match template {
        Some(value) => value,
        None => read_stdin_template()?,
    };

    if template.trim().is_empty() {
        return Err(format!("error: no template provided\n\n{}", help_text()));
    }

    Ok(CliConfig { template, seed, max_passes, mode, color })
}

fn read_stdin_template() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_number(value: &str, flag: &str) -> Result<usize, String> {
    value.parse::<usize>().map_err(|_| format!("error: invalid {flag} '{value}' (expected a non-negative integer)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "spindrift {version}

Spintax template expansion CLI.

Usage:
  spindrift [OPTIONS] [--] <template...>
  spindrift [OPTIONS] --template <text>

Options:
  -t, --template <text>      Template to expand. If omitted, reads remaining args
                             or stdin when no args are provided.
  -s, --seed <seed>          Derive every choice from <seed>; the same seed always
                             reproduces the same output. Key it by a prospect id
                             for stable per-recipient spins.
  --passes <n>               Bound on substitution passes. Default: {default_passes}
  --previews <n>             Print up to n distinct preview expansions and exit
                             (a composition UI typically asks for {default_previews}).
  --validate                 Check the template structure and exit.
  --count                    Print the number of distinct variations and exit.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Failed validation or internal error.
  2  Invalid arguments or missing template.
",
        version = env!("CARGO_PKG_VERSION"),
        default_passes = DEFAULT_MAX_PASSES,
        default_previews = DEFAULT_PREVIEW_COUNT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every case supplies a template so the stdin fallback never runs.
    fn parse(args: &[&str]) -> Result<CliConfig, String> {
        parse_args_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn positional_args_join_into_the_template() {
        let config = parse(&["{Hi|Hello}", "there"]).unwrap();
        assert_eq!(config.template, "{Hi|Hello} there");
        assert!(matches!(config.mode, Mode::Spin));
        assert_eq!(config.max_passes, DEFAULT_MAX_PASSES);
        assert!(config.seed.is_none());
    }

    #[test]
    fn flags_accept_separate_and_equals_forms() {
        let config = parse(&["--seed", "prospect-42", "--passes", "7", "-t", "{a|b}"]).unwrap();
        assert_eq!(config.seed.as_deref(), Some("prospect-42"));
        assert_eq!(config.max_passes, 7);
        assert_eq!(config.template, "{a|b}");

        let config = parse(&["--seed=prospect-42", "--passes=7", "--template={a|b}"]).unwrap();
        assert_eq!(config.seed.as_deref(), Some("prospect-42"));
        assert_eq!(config.max_passes, 7);
        assert_eq!(config.template, "{a|b}");
    }

    #[test]
    fn double_dash_joins_the_rest_verbatim() {
        let config = parse(&["--seed", "s", "--", "--passes", "{a|b}"]).unwrap();
        assert_eq!(config.seed.as_deref(), Some("s"));
        // Everything after `--` is template text, flags included.
        assert_eq!(config.template, "--passes {a|b}");
        assert_eq!(config.max_passes, DEFAULT_MAX_PASSES);
    }

    #[test]
    fn mode_flags_select_the_mode() {
        assert!(matches!(parse(&["--validate", "{a|b}"]).unwrap().mode, Mode::Validate));
        assert!(matches!(parse(&["--count", "{a|b}"]).unwrap().mode, Mode::Count));
        assert!(matches!(parse(&["--previews", "3", "{a|b}"]).unwrap().mode, Mode::Previews(3)));
        assert!(matches!(parse(&["--previews=3", "{a|b}"]).unwrap().mode, Mode::Previews(3)));
    }

    #[test]
    fn color_flags_override_the_terminal_default() {
        assert!(parse(&["--color", "{a|b}"]).unwrap().color);
        assert!(!parse(&["--no-color", "{a|b}"]).unwrap().color);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        // Array of (args, expected error fragment)
        let cases: Vec<(&[&str], &str)> = vec![
            (&["--frobnicate", "{a|b}"], "unknown option"),
            (&["-x", "{a|b}"], "unknown option"),
            (&["--passes", "many", "{a|b}"], "invalid --passes"),
            (&["--passes=-1", "{a|b}"], "invalid --passes"),
            (&["--previews", "-3", "{a|b}"], "invalid --previews"),
            (&["--passes"], "--passes expects a value"),
            (&["--previews"], "--previews expects a value"),
            (&["--seed"], "--seed expects a value"),
            (&["--template"], "--template expects a value"),
            (&["-t", "{a|b}", "extra"], "template provided multiple times"),
            (&["-t", "{a|b}", "--template={c|d}"], "template provided multiple times"),
            (&["-t", "{a|b}", "--", "{c|d}"], "template provided multiple times"),
        ];

        for (args, fragment) in cases {
            let err = parse(args).unwrap_err();
            assert!(err.contains(fragment), "missing {fragment:?} in {err:?} for {args:?}");
        }
    }
}
