//! vector-logic - command line interface
//!
//! Builds an engine from variables and rules given on the command line,
//! compiles it, and answers queries against the compiled valid set or a
//! piece of evidence.

use clap::Parser;
use std::process;
use vector_logic::Engine;

#[derive(Parser, Debug)]
#[command(name = "vlogic")]
#[command(about = "Propositional inference over ternary state vectors", long_about = None)]
#[command(version)]
struct Args {
    /// Variable names (repeatable)
    #[arg(short = 'v', long = "var", value_name = "NAME", required = true)]
    variables: Vec<String>,

    /// Rules over the variables (repeatable), e.g. "x1 && x2 => x3"
    #[arg(short = 'r', long = "rule", value_name = "RULE")]
    rules: Vec<String>,

    /// Evidence assignments like "x1=true" or "x2=false" (repeatable)
    #[arg(short = 'e', long = "evidence", value_name = "NAME=BOOL")]
    evidence: Vec<String>,

    /// Skip compilation and schedule the evidence with the raw rules
    #[arg(long = "no-compile")]
    no_compile: bool,

    /// Print the engine (rules, state vectors, valid set) before answering
    #[arg(short = 's', long = "show-engine")]
    show_engine: bool,

    /// Print the intermediate size statistics of the compile run
    #[arg(long = "stats")]
    stats: bool,
}

fn parse_evidence(raw: &[String]) -> Result<Vec<(String, bool)>, String> {
    raw.iter()
        .map(|entry| {
            let (name, value) = entry
                .split_once('=')
                .ok_or_else(|| format!("expected NAME=BOOL, got '{}'", entry))?;
            let value = value
                .trim()
                .parse::<bool>()
                .map_err(|_| format!("expected true or false in '{}'", entry))?;
            Ok((name.trim().to_string(), value))
        })
        .collect()
}

fn main() {
    let args = Args::parse();

    let evidence = match parse_evidence(&args.evidence) {
        Ok(evidence) => evidence,
        Err(message) => {
            eprintln!("Error parsing evidence: {}", message);
            process::exit(1);
        }
    };

    let mut engine = match Engine::with_name(&args.variables, "vlogic") {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Error creating engine: {}", err);
            process::exit(1);
        }
    };

    for rule in &args.rules {
        if let Err(err) = engine.add_rule(rule) {
            eprintln!("Error adding rule '{}': {}", rule, err);
            process::exit(1);
        }
    }

    if !args.no_compile {
        engine.compile();
        if args.stats {
            eprintln!("intermediate sizes: {}", engine.intermediate_size_stats());
        }
        if engine.is_contradiction() {
            println!("The rule set is contradictory.");
            process::exit(0);
        }
    }

    if args.show_engine {
        println!("{}", engine);
    }

    if evidence.is_empty() {
        if args.no_compile {
            eprintln!("Nothing to do: no evidence given and compilation disabled.");
            process::exit(1);
        }
        // No evidence: report the consolidated value of every variable.
        for name in engine.variables() {
            match engine.get_variable_value(name) {
                Ok(Some(value)) => println!("{} = {}", name, value),
                Ok(None) => println!("{} = unknown", name),
                Err(err) => {
                    eprintln!("Error querying '{}': {}", name, err);
                    process::exit(1);
                }
            }
        }
        return;
    }

    let pairs: Vec<(&str, bool)> = evidence
        .iter()
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    let prediction = match engine.predict(&pairs) {
        Ok(prediction) => prediction,
        Err(err) => {
            eprintln!("Error predicting: {}", err);
            process::exit(1);
        }
    };

    if prediction.is_contradiction() {
        println!("The evidence contradicts the knowledge base.");
        return;
    }

    println!("Result ({} cubes):", prediction.size());
    println!("{}", prediction.render(4));
    for name in engine.variables() {
        match prediction.value(name) {
            Ok(Some(value)) => println!("{} = {}", name, value),
            Ok(None) => println!("{} = unknown", name),
            Err(err) => {
                eprintln!("Error querying '{}': {}", name, err);
                process::exit(1);
            }
        }
    }
}
