use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use env_logger::{Builder, Env};
use log::{LevelFilter, info};
use relang::{Pattern, RegularLanguage, SpannedError, parse_spanned};

#[derive(Parser)]
#[command(name = "relang")]
#[command(about = "Relang - compile and convert regular languages")]
#[command(version)]
struct Cli {
    /// Log more details to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check if the whole input is in the language of a pattern
    Match {
        /// The regex pattern
        pattern: String,
        /// The input string to test
        input: String,
        /// Build the DFA and match with it
        #[arg(short, long)]
        dfa: bool,
    },
    /// Print the NFA built for a pattern
    Nfa {
        /// The regex pattern
        pattern: String,
    },
    /// Print the DFA built for a pattern
    Dfa {
        /// The regex pattern
        pattern: String,
        /// Add a sink state so every state has every transition
        #[arg(short, long)]
        complete: bool,
    },
    /// Rebuild a pattern from its DFA by state elimination
    Regex {
        /// The regex pattern
        pattern: String,
    },
    /// Print a pattern for every string not in the language
    Complement {
        /// The regex pattern
        pattern: String,
        /// Also test this input against the complement
        input: Option<String>,
    },
    /// Print the parsed pattern tree
    Tree {
        /// The regex pattern
        pattern: String,
    },
}

/// The log level forced by `-v`, if any
fn verbosity_level(verbosity: u8) -> Option<LevelFilter> {
    match verbosity {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// Log to stderr, at `RUST_LOG` (default `warn`) unless `-v` overrides it
fn init_logging(verbosity: u8) {
    let env = Env::default().default_filter_or("warn");
    let mut builder = Builder::from_env(env);
    if let Some(level) = verbosity_level(verbosity) {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Match {
            pattern,
            input,
            dfa,
        } => cmd_match(&pattern, &input, dfa),
        Commands::Nfa { pattern } => cmd_nfa(&pattern),
        Commands::Dfa { pattern, complete } => cmd_dfa(&pattern, complete),
        Commands::Regex { pattern } => cmd_regex(&pattern),
        Commands::Complement { pattern, input } => cmd_complement(&pattern, input.as_deref()),
        Commands::Tree { pattern } => cmd_tree(&pattern),
    }
}

/// Print a parse error with a caret under the offending part of the pattern
fn report_error(pattern: &str, error: &SpannedError) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), error.error);
    eprintln!("  {}", pattern);
    let width = error.span.len().max(1);
    eprintln!(
        "  {}{}",
        " ".repeat(error.span.start),
        "^".repeat(width).red().bold()
    );
    std::process::exit(2);
}

fn parse_or_exit(pattern: &str) -> Pattern {
    match parse_spanned(pattern) {
        Ok(p) => p,
        Err(e) => report_error(pattern, &e),
    }
}

fn language_or_exit(pattern: &str) -> RegularLanguage {
    RegularLanguage::from_pattern(parse_or_exit(pattern))
}

fn print_match(matched: bool) -> ! {
    if matched {
        println!("{}", "true".green());
        std::process::exit(0);
    } else {
        println!("{}", "false".red());
        std::process::exit(1);
    }
}

fn cmd_match(pattern: &str, input: &str, use_dfa: bool) {
    let language = language_or_exit(pattern);
    if use_dfa {
        let dfa = language.dfa();
        info!("matching with a DFA of {} states", dfa.len());
    } else {
        info!("matching with an NFA of {} states", language.nfa().len());
    }
    print_match(language.matches(input));
}

fn cmd_nfa(pattern: &str) {
    let language = language_or_exit(pattern);
    let nfa = language.nfa();

    println!("{}", "NFA:".bold());
    println!(
        "  {} states, {} symbols",
        nfa.len().to_string().cyan(),
        nfa.alphabet().len().to_string().cyan()
    );
    println!();
    print!("{}", nfa.pretty_print());
}

fn cmd_dfa(pattern: &str, complete: bool) {
    let language = language_or_exit(pattern);
    let mut dfa = language.dfa().clone();
    if complete {
        dfa.complete();
    }

    println!("{}", "DFA:".bold());
    println!(
        "  {} states, {} symbols",
        dfa.len().to_string().cyan(),
        dfa.alphabet().len().to_string().cyan()
    );
    println!();
    print!("{}", dfa.pretty_print());
}

fn cmd_regex(pattern: &str) {
    let language = language_or_exit(pattern);
    let rebuilt = RegularLanguage::from_dfa(language.dfa().clone());

    println!("{}", "Converting pattern...".bold());
    println!("  Input:  {}", pattern.cyan());
    println!("  Output: {}", rebuilt.regex().to_string().green());
}

fn cmd_complement(pattern: &str, input: Option<&str>) {
    let language = language_or_exit(pattern);
    let complement = language.complement();

    println!("{}", "Complement:".bold());
    println!("  {}", complement.regex().to_string().green());

    if let Some(input) = input {
        println!();
        print_match(complement.matches(input));
    }
}

fn cmd_tree(pattern: &str) {
    let tree = parse_or_exit(pattern);
    println!("{}", tree.to_tree_string());
}
