use colored::Colorize;
use vfolder::scenario::{Outcome, Step};

pub fn print_outcomes(steps: &[Step], outcomes: &[Outcome]) {
    for (index, (step, outcome)) in steps.iter().zip(outcomes).enumerate() {
        print_outcome(&(index + 1).to_string(), step, outcome);
    }
}

pub fn print_structure(lines: &[String]) {
    for line in lines {
        println!("{}", colorize_structure_line(line));
    }
}

fn print_outcome(label: &str, step: &Step, outcome: &Outcome) {
    match (step, outcome) {
        (Step::Parallel(children), Outcome::Parallel(results)) => {
            println!("{} {}", label.bold(), step);
            for (index, (child, result)) in children.iter().zip(results).enumerate() {
                print_outcome(&format!("{label}.{}", index + 1), child, result);
            }
        }
        (Step::Structure, Outcome::Structure(lines)) => {
            println!("{} {}", label.bold(), step.to_string().cyan());
            print_structure(lines);
        }
        _ => {
            let status = if outcome.is_success() {
                "ok".green()
            } else {
                "--".yellow()
            };
            println!("{} {} {}: {}", label.bold(), status, step.to_string().cyan(), outcome);
        }
    }
}

fn colorize_structure_line(line: &str) -> String {
    let name_start = line.len() - line.trim_start().len();
    let (indent, entry) = line.split_at(name_start);
    if entry.starts_with('+') {
        format!("{indent}{}", entry.blue().bold())
    } else {
        format!("{indent}{entry}")
    }
}
