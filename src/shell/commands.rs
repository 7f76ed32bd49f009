use colored::Colorize;
use console::Term;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::menu::{MENU_DESCRIPTIONS, MENU_OPTIONS};
use super::spinner::StatusSpinner;
use crate::analyzer::constants::{LOG_DIR_NAME, LOG_FILE_SUFFIX};
use crate::analyzer::report::write_report;
use crate::analyzer::types::SortKey;
use crate::analyzer::usage::aggregate;
use crate::analyzer::utils::{format_elapsed, path_label};

/// Interactive session loop. Returns when the user picks exit, answers 'n'
/// to the repeat prompt or input reaches end of file.
pub fn run() {
    let term = Arc::new(Mutex::new(Term::stdout()));
    let stdin = io::stdin();
    let mut input = String::new();
    let mut show_banner = true;
    let mut first_banner = true;

    loop {
        if show_banner {
            // keep the first screen intact, it may carry startup warnings
            if !first_banner {
                if let Ok(term) = term.lock() {
                    let _ = term.clear_screen();
                }
            }
            print_banner();
            first_banner = false;
            show_banner = false;
        }

        print!("> ");
        let _ = io::stdout().flush();

        input.clear();
        match stdin.read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let command: Vec<_> = input.trim().split_whitespace().collect();

        if command.is_empty() {
            continue;
        }

        match command[..] {
            ["1", ..] => {
                if analyze_loop(&term, &stdin) {
                    show_banner = true;
                } else {
                    break;
                }
            }
            ["2", ..] | ["exit", ..] => break,
            ["help"] => print_help(None),
            ["help", topic, ..] => print_help(Some(topic)),
            _ => println!(
                "{}",
                format!("Unknown option '{}', enter 1, 2 or help.", command[0]).red()
            ),
        }
    }

    println!("\nSession terminated... Goodbye.");
}

fn print_banner() {
    println!("{}", "=== Disk Usage Statistics ===".cyan().bold());
    println!("Session: {}@{}", whoami::username(), whoami::devicename());
    println!();
    for name in ["1", "2"] {
        if let Some(entry) = MENU_DESCRIPTIONS.get(name) {
            println!("{}. {}", name, entry.title);
        }
    }
    println!("Type 'help' for details on each option.");
}

fn print_help(topic: Option<&str>) {
    match topic {
        Some(name) => match MENU_DESCRIPTIONS.get(name) {
            Some(entry) => println!("{} - {}", entry.title.green(), entry.description),
            None => println!("{}", format!("No such option: {}", name).red()),
        },
        None => {
            let mut names: Vec<_> = MENU_OPTIONS.iter().collect();
            names.sort();
            for name in names {
                if let Some(entry) = MENU_DESCRIPTIONS.get(name) {
                    println!("[{}] {} - {}", name, entry.title.green(), entry.description);
                }
            }
        }
    }
}

// One analysis round after another until the user answers 'n' (terminate)
// or input runs dry (back to the menu). Returning false ends the program.
fn analyze_loop(term: &Arc<Mutex<Term>>, stdin: &io::Stdin) -> bool {
    loop {
        let path = match prompt_path(stdin) {
            Some(path) => path,
            None => return true,
        };
        let sort = prompt_sort(stdin);
        let to_file = match prompt_confirm(
            stdin,
            "Write the report to a log file instead of the console? (y/n): ",
        ) {
            Some(choice) => choice,
            None => return true,
        };

        run_analysis(term, &path, sort, to_file);

        match prompt_confirm(
            stdin,
            "\nDo you want to analyze another directory? (y/n): ",
        ) {
            Some(true) => continue,
            Some(false) | None => return false,
        }
    }
}

fn run_analysis(term: &Arc<Mutex<Term>>, path: &Path, sort: SortKey, to_file: bool) {
    let sink = if to_file {
        match open_log_sink(path) {
            Ok(sink) => Some(sink),
            Err(err) => {
                println!("{}", format!("Could not open the log file: {}", err).red());
                return;
            }
        }
    } else {
        None
    };

    // the spinner owns the terminal for the duration of the walk and is
    // joined before any report output goes out
    let spinner = StatusSpinner::start(Arc::clone(term), "Analyzing");
    let result = aggregate(path);
    let elapsed = spinner.finish();

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            println!("{}", format!("Analysis failed: {}", err).red());
            return;
        }
    };

    let written = match sink {
        Some((log_path, file)) => {
            let mut out = BufWriter::new(file);
            write_report(&mut out, path, &report, sort)
                .and_then(|()| out.flush())
                .map(|()| Some(log_path))
        }
        None => {
            println!();
            write_report(&mut io::stdout(), path, &report, sort).map(|()| None)
        }
    };

    match written {
        Ok(Some(log_path)) => {
            println!(
                "{}",
                format!(
                    "\nAnalysis complete! The report has been saved as '{}'.",
                    log_path.display()
                )
                .green()
            );
            println!("Time elapsed: {}.", format_elapsed(elapsed));
        }
        Ok(None) => {
            println!("{}", "\nAnalysis complete!".green());
            println!("Time elapsed: {}.", format_elapsed(elapsed));
        }
        Err(err) => println!("{}", format!("Could not write the report: {}", err).red()),
    }
}

fn prompt_path(stdin: &io::Stdin) -> Option<PathBuf> {
    loop {
        let line = read_prompt(stdin, "\nEnter the directory path to analyze: ")?;
        if line.is_empty() {
            println!("{}", "Please enter a path.".red());
            continue;
        }
        let path = match std::path::absolute(&line) {
            Ok(path) => path,
            Err(err) => {
                println!(
                    "{}",
                    format!("Error: '{}' is not a usable path ({}).", line, err).red()
                );
                continue;
            }
        };
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => return Some(path),
            Ok(_) => println!(
                "{}",
                format!("Error: '{}' is not a directory.", path.display()).red()
            ),
            Err(err) => println!(
                "{}",
                format!(
                    "Error: '{}' is not a valid directory ({}).",
                    path.display(),
                    err
                )
                .red()
            ),
        }
    }
}

fn prompt_sort(stdin: &io::Stdin) -> SortKey {
    loop {
        match read_prompt(stdin, "Sort tree entries by name or size? [name]: ") {
            None => return SortKey::default(),
            Some(answer) if answer.is_empty() => return SortKey::default(),
            Some(answer) => match SortKey::parse(&answer) {
                Some(sort) => return sort,
                None => println!("{}", "Please answer 'name' or 'size'.".red()),
            },
        }
    }
}

fn prompt_confirm(stdin: &io::Stdin, prompt: &str) -> Option<bool> {
    loop {
        let answer = read_prompt(stdin, prompt)?;
        match parse_confirm(&answer) {
            Some(choice) => return Some(choice),
            None => println!("{}", "Invalid input. Please enter 'y' or 'n'.".red()),
        }
    }
}

fn read_prompt(stdin: &io::Stdin, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

// y/yes => true, n/no => false, anything else is unrecognized
pub fn parse_confirm(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn log_file_name(path: &Path) -> String {
    format!("{}{}", path_label(path), LOG_FILE_SUFFIX)
}

fn open_log_sink(path: &Path) -> io::Result<(PathBuf, File)> {
    fs::create_dir_all(LOG_DIR_NAME)?;
    let log_path = Path::new(LOG_DIR_NAME).join(log_file_name(path));
    let file = File::create(&log_path)?;
    Ok((log_path, file))
}
