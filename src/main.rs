use clap::Parser;
use grammar_solver::{GrammarSolver, RandomPick, RngPick};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Random sentence generator for BNF-style grammars
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the grammar file
    #[arg(help = "Path to the grammar file")]
    grammar_file: PathBuf,

    /// The non-terminal to generate; prompts interactively when omitted
    #[arg(help = "Non-terminal symbol to generate, e.g. \"<s>\"")]
    symbol: Option<String>,

    /// Number of sentences to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Seed for reproducible output
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Print the defined non-terminals and exit
    #[arg(long)]
    symbols: bool,

    /// Print the generated sentences as JSON
    #[arg(long)]
    json: bool,
}

/// Generated sentences for one symbol
#[derive(Serialize)]
struct Report<'a> {
    symbol: &'a str,
    sentences: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Keep stdout clean for machine-readable output
    let status = |message: String| {
        if cli.json {
            eprintln!("{}", message);
        } else {
            println!("{}", message);
        }
    };

    status(format!("Loading grammar from {}...", cli.grammar_file.display()));
    let grammar = GrammarSolver::from_file(&cli.grammar_file)?;
    status(format!("Loaded {} rules.", grammar.len()));

    if cli.symbols {
        println!("{}", grammar.symbols());
        return Ok(());
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut pick = RngPick(rng);

    match cli.symbol.as_deref() {
        Some(symbol) => {
            let sentences = generate_many(&grammar, symbol, cli.count, &mut pick)?;
            if cli.json {
                let report = Report { symbol, sentences };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Generating {} random samples:\n", cli.count);
                print_numbered(&sentences);
            }
        }
        None => interactive(&grammar, &mut pick)?,
    }

    Ok(())
}

fn generate_many(
    grammar: &GrammarSolver,
    symbol: &str,
    count: usize,
    pick: &mut impl RandomPick,
) -> grammar_solver::Result<Vec<String>> {
    (0..count)
        .map(|_| grammar.generate_with(symbol, &mut *pick))
        .collect()
}

fn print_numbered(sentences: &[String]) {
    for (i, sentence) in sentences.iter().enumerate() {
        println!("{}. {}", i + 1, sentence);
    }
}

/// Prompt for symbols until an empty answer
fn interactive(
    grammar: &GrammarSolver,
    pick: &mut impl RandomPick,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("\nAvailable symbols to generate are:");
        println!("{}", grammar.symbols());

        let Some(symbol) = prompt(&mut input, "What do you want generated (return to quit)? ")?
        else {
            return Ok(());
        };

        if !grammar.contains(&symbol)? {
            eprintln!("Unknown symbol: {}", symbol);
            continue;
        }

        let Some(count) = prompt(&mut input, "How many do you want me to generate? ")? else {
            return Ok(());
        };
        let count: usize = match count.parse() {
            Ok(count) => count,
            Err(_) => {
                eprintln!("Not a number: {}", count);
                continue;
            }
        };

        let sentences = generate_many(grammar, &symbol, count, &mut *pick)?;
        print_numbered(&sentences);
    }
}

/// Read one trimmed answer; `None` on an empty line or end of input
fn prompt(input: &mut impl BufRead, question: &str) -> io::Result<Option<String>> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let answer = line.trim();
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer.to_string()))
    }
}
