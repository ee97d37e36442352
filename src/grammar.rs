use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use regex::Regex;

use crate::utils::{GrammarError, RandomPick, Result, thread_pick};

/// Separates the symbol from its alternatives in a rule line
pub const RULE_SEPARATOR: &str = "::=";

/// Separates alternatives within a rule line
pub const ALTERNATIVE_SEPARATOR: char = '|';

/// One alternative expansion of a non-terminal.
///
/// Tokens are kept as plain text. Whether a token is a non-terminal is only
/// decided at generation time, by asking the table that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    tokens: Vec<String>,
}

impl Production {
    /// The tokens of this alternative, in order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// A grammar table built once from rule lines of the form
/// `<symbol>::=alt1|alt2|...`, answering membership and generation queries.
///
/// The table cannot be changed after construction, so a solver can be
/// shared between threads freely.
#[derive(Debug, Clone)]
pub struct GrammarSolver {
    /// The rules mapping non-terminals to their alternatives
    rules: HashMap<String, Vec<Production>>,
    /// Non-terminals in the order they were defined
    order: Vec<String>,
}

impl GrammarSolver {
    /// Build a grammar from trimmed, non-blank rule lines.
    ///
    /// Fails with [`GrammarError::InvalidGrammar`] when there are no lines,
    /// when a symbol is defined twice, or when a line is malformed.
    pub fn build<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rule_regex = Regex::new(r"^(?P<symbol>.*?)::=(?P<alternatives>.*)$")?;

        let mut rules = HashMap::new();
        let mut order = Vec::new();

        for line in lines {
            let (symbol, productions) = Self::parse_rule(&rule_regex, line.as_ref())?;

            match rules.entry(symbol) {
                Entry::Occupied(entry) => {
                    return Err(GrammarError::InvalidGrammar(format!(
                        "duplicate non-terminal: {}",
                        entry.key()
                    )));
                }
                Entry::Vacant(entry) => {
                    order.push(entry.key().clone());
                    entry.insert(productions);
                }
            }
        }

        if order.is_empty() {
            return Err(GrammarError::InvalidGrammar("empty grammar".to_string()));
        }

        Ok(GrammarSolver { rules, order })
    }

    /// Parse a grammar from a reader, one rule per line.
    ///
    /// Lines are trimmed; blank lines and lines starting with `#` are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            lines.push(trimmed.to_string());
        }

        Self::build(lines)
    }

    /// Parse a grammar from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    fn parse_rule(rule_regex: &Regex, line: &str) -> Result<(String, Vec<Production>)> {
        let captures = rule_regex.captures(line).ok_or_else(|| {
            GrammarError::InvalidGrammar(format!(
                "missing `{}` in rule: {}",
                RULE_SEPARATOR, line
            ))
        })?;

        let symbol = captures["symbol"].trim();
        if symbol.is_empty() {
            return Err(GrammarError::InvalidGrammar(format!(
                "missing non-terminal in rule: {}",
                line
            )));
        }

        let productions = captures["alternatives"]
            .split(ALTERNATIVE_SEPARATOR)
            .map(|alternative| {
                Self::parse_production(alternative).map_err(|_| {
                    GrammarError::InvalidGrammar(format!(
                        "empty alternative for {} in rule: {}",
                        symbol, line
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((symbol.to_string(), productions))
    }

    /// Parse one alternative into its whitespace-separated tokens
    pub fn parse_production(alternative: &str) -> Result<Production> {
        let tokens: Vec<String> = alternative
            .split_whitespace()
            .map(str::to_string)
            .collect();

        if tokens.is_empty() {
            return Err(GrammarError::InvalidGrammar(format!(
                "empty alternative: {:?}",
                alternative
            )));
        }

        Ok(Production { tokens })
    }

    /// Check whether `symbol` is a defined non-terminal.
    ///
    /// The match is exact and case-sensitive. An empty symbol is rejected.
    pub fn contains(&self, symbol: &str) -> Result<bool> {
        if symbol.is_empty() {
            return Err(GrammarError::InvalidArgument(
                "symbol must not be empty".to_string(),
            ));
        }

        Ok(self.rules.contains_key(symbol))
    }

    /// All non-terminals, sorted, formatted like `[<a>, <b>, <c>]`
    pub fn symbols(&self) -> String {
        let mut symbols: Vec<&str> = self.order.iter().map(String::as_str).collect();
        symbols.sort_unstable();
        format!("[{}]", symbols.join(", "))
    }

    /// Non-terminals in definition order
    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// The alternatives defined for `symbol`, if it is a non-terminal
    pub fn alternatives(&self, symbol: &str) -> Option<&[Production]> {
        self.rules.get(symbol).map(Vec::as_slice)
    }

    /// Number of defined non-terminals
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false for a successfully built grammar
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Generate one random derivation of `symbol` using the thread's generator
    pub fn generate(&self, symbol: &str) -> Result<String> {
        self.generate_with(symbol, &mut thread_pick())
    }

    /// Generate one random derivation of `symbol`, drawing every choice from `pick`.
    ///
    /// Expansions are joined by single spaces and the result is trimmed.
    /// There is no recursion guard: a grammar that never reaches a
    /// terminal-only alternative recurses until the stack is exhausted.
    pub fn generate_with<P>(&self, symbol: &str, pick: &mut P) -> Result<String>
    where
        P: RandomPick + ?Sized,
    {
        let productions = self.rules.get(symbol).ok_or_else(|| {
            GrammarError::InvalidArgument(format!("unknown symbol: {:?}", symbol))
        })?;

        let result = self.expand_non_terminal(productions, pick)?;
        Ok(result.trim().to_string())
    }

    /// Recursively expand one non-terminal with a fresh draw
    fn expand_non_terminal<P>(&self, productions: &[Production], pick: &mut P) -> Result<String>
    where
        P: RandomPick + ?Sized,
    {
        let index = pick.pick(productions.len());
        let production = productions.get(index).ok_or_else(|| {
            GrammarError::InvalidArgument(format!(
                "random pick {} out of range for {} alternatives",
                index,
                productions.len()
            ))
        })?;

        let mut pieces = Vec::with_capacity(production.tokens.len());
        for token in &production.tokens {
            match self.rules.get(token) {
                Some(nested) => pieces.push(self.expand_non_terminal(nested, pick)?),
                None => pieces.push(token.clone()),
            }
        }

        Ok(pieces.join(" "))
    }
}

impl fmt::Display for GrammarSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.order {
            let alternatives: Vec<String> = self.rules[symbol]
                .iter()
                .map(Production::to_string)
                .collect();
            writeln!(
                f,
                "{}{}{}",
                symbol,
                RULE_SEPARATOR,
                alternatives.join(&ALTERNATIVE_SEPARATOR.to_string())
            )?;
        }
        Ok(())
    }
}
