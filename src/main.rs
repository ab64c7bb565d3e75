use clap::Parser;
use monkey::ast::Stmt;
use monkey::cli::{generate_completions, Args, Commands};
use monkey::config::AppConfig;
use monkey::diagnostic::{render_diagnostics, Diagnostic};
use monkey::interpreter::{parse, Environment, Evaluator, ParseError};
use monkey::object::Object;
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::Path;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting monkey");

    let status = if let Some(source) = &args.eval {
        verbose_log(&config, "Running source from command-line argument");
        run_source(source, "<eval>", &config)
    } else if let Some(path) = &args.file {
        verbose_log(&config, &format!("Reading script from file: {}", path.display()));
        match read_file(path) {
            Ok(source) => run_source(&source, &path.display().to_string(), &config),
            Err(e) => {
                error_message(&config, &e);
                1
            }
        }
    } else {
        run_repl(&config)
    };

    std::process::exit(status);
}

/// Runs a whole script and prints its final value unless it is null.
fn run_source(source: &str, file_name: &str, config: &AppConfig) -> i32 {
    verbose_log(config, &format!("Parsing {} bytes", source.len()));
    let (program, errors) = parse(source);
    if !errors.is_empty() {
        report_parse_errors(source, file_name, &errors, config);
        return 1;
    }

    verbose_log(config, &format!("Evaluating {} statements", program.statements.len()));
    let env = Environment::new();
    let mut evaluator = Evaluator::new(io::stdout());
    match evaluator.eval_program(&program, &env) {
        Object::Error(err) => {
            report_diagnostic(source, file_name, err.to_diagnostic(), config);
            1
        }
        Object::Null => 0,
        value => {
            println!("{}", value);
            0
        }
    }
}

fn run_repl(config: &AppConfig) -> i32 {
    if !config.verbose {
        println!("Monkey {}", env!("CARGO_PKG_VERSION"));
        println!("Type `exit` or press Ctrl+D to quit.");
    } else {
        verbose_log(config, "Entering interactive mode");
    }

    let env = Environment::new();
    let mut evaluator = Evaluator::new(io::stdout());

    loop {
        print!(">> ");
        if let Err(e) = io::stdout().flush() {
            error_message(config, &format!("Error writing prompt: {}", e));
            return 1;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error_message(config, &format!("Error reading input: {}", e));
                return 1;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        let (program, errors) = parse(trimmed);
        if !errors.is_empty() {
            report_parse_errors(trimmed, "repl", &errors, config);
            continue;
        }

        let ends_with_let = matches!(program.statements.last(), Some(Stmt::Let { .. }));
        match evaluator.eval_program(&program, &env) {
            Object::Error(err) => report_diagnostic(trimmed, "repl", err.to_diagnostic(), config),
            _ if ends_with_let => {}
            value => println!("{}", value),
        }
    }

    verbose_log(config, "Leaving interactive mode");
    0
}

fn report_parse_errors(source: &str, file_name: &str, errors: &[ParseError], config: &AppConfig) {
    verbose_log(config, &format!("Parsing failed with {} error(s)", errors.len()));
    let diagnostics: Vec<Diagnostic> = errors.iter().map(|e| e.to_diagnostic()).collect();
    eprint!(
        "{}",
        render_diagnostics(source, file_name, &diagnostics, config.color_enabled)
    );
}

fn report_diagnostic(source: &str, file_name: &str, diagnostic: Diagnostic, config: &AppConfig) {
    eprint!(
        "{}",
        render_diagnostics(source, file_name, &[diagnostic], config.color_enabled)
    );
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[monkey:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
