//! Replacement resolution for missing textures
//!
//! Ranks indexed textures by name similarity and hands the ranked list to a
//! [`DecisionProvider`]. The console provider is the interactive front end;
//! other providers script or automate the choice.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::assets::similarity::similarity_ratio;
use crate::assets::texture_index::{file_name_of, TextureIndex};
use crate::error::RepairError;

/// A texture offered as a replacement
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Path relative to the asset folder, `/`-separated
    pub relative_path: String,
    /// Similarity of its file name to the missing one
    pub score: f64,
}

/// Outcome of asking for a replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Use the candidate at this 0-based position
    Accept(usize),
    /// Leave the reference alone
    Skip,
}

/// Source of replacement decisions
pub trait DecisionProvider {
    /// Choose among `candidates` (never empty, best first) for `missing`
    fn decide(&mut self, missing: &str, candidates: &[Candidate]) -> Result<Decision, RepairError>;
}

/// Indexed textures scoring at least `threshold` against `missing`, best first
///
/// Only file names are compared. Equal scores keep index order.
pub fn rank_candidates(missing: &str, index: &TextureIndex, threshold: f64) -> Vec<Candidate> {
    let target = file_name_of(missing);
    let mut candidates: Vec<Candidate> = index
        .iter()
        .map(|entry| Candidate {
            relative_path: entry.relative_path.clone(),
            score: similarity_ratio(target, &entry.file_name),
        })
        .filter(|c| c.score >= threshold)
        .collect();

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

/// Resolves missing texture references against an index
pub struct Resolver<'a, P: DecisionProvider + ?Sized> {
    index: &'a TextureIndex,
    threshold: f64,
    provider: &'a mut P,
}

impl<'a, P: DecisionProvider + ?Sized> Resolver<'a, P> {
    /// Create a resolver
    pub fn new(index: &'a TextureIndex, threshold: f64, provider: &'a mut P) -> Self {
        Self { index, threshold, provider }
    }

    /// Replacement path chosen for `missing`, or `None` when skipped
    ///
    /// The provider is not consulted when nothing is similar enough.
    pub fn resolve(&mut self, missing: &str) -> Result<Option<String>, RepairError> {
        let candidates = rank_candidates(missing, self.index, self.threshold);
        if candidates.is_empty() {
            log::info!("No similar textures found for {}", missing);
            return Ok(None);
        }

        match self.provider.decide(missing, &candidates)? {
            Decision::Accept(choice) => match candidates.get(choice) {
                Some(candidate) => Ok(Some(candidate.relative_path.clone())),
                None => {
                    log::warn!("Choice {} out of range for {}, skipping", choice + 1, missing);
                    Ok(None)
                }
            },
            Decision::Skip => Ok(None),
        }
    }
}

/// Interpret a console answer: 1-based number or the skip token
///
/// Returns `None` for anything invalid.
pub fn parse_answer(input: &str, candidate_count: usize, skip_token: &str) -> Option<Decision> {
    let answer = input.trim();
    if answer.eq_ignore_ascii_case(skip_token.trim()) {
        return Some(Decision::Skip);
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=candidate_count).contains(&n) => Some(Decision::Accept(n - 1)),
        _ => None,
    }
}

/// Prompts on a writer and reads answers line by line
///
/// Invalid answers re-prompt indefinitely. End of input counts as a skip.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
    skip_token: String,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on standard input/output
    pub fn stdio(skip_token: impl Into<String>) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), skip_token)
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    /// Prompt over arbitrary streams
    pub fn new(input: R, output: W, skip_token: impl Into<String>) -> Self {
        Self { input, output, skip_token: skip_token.into() }
    }

    /// Give back the output stream
    pub fn into_output(self) -> W {
        self.output
    }

    fn show(&mut self, missing: &str, candidates: &[Candidate]) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Looking for texture: {}", missing)?;
        writeln!(self.output, "Similar textures found:")?;
        for (n, candidate) in candidates.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {} (similarity: {:.2}%)",
                n + 1,
                candidate.relative_path,
                candidate.score * 100.0
            )?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> DecisionProvider for ConsolePrompt<R, W> {
    fn decide(&mut self, missing: &str, candidates: &[Candidate]) -> Result<Decision, RepairError> {
        let to_err = |e: io::Error| RepairError::io("<console>", e);
        self.show(missing, candidates).map_err(to_err)?;

        loop {
            write!(
                self.output,
                "\nSelect texture number to use as replacement (or '{}' to skip): ",
                self.skip_token
            )
            .and_then(|()| self.output.flush())
            .map_err(to_err)?;

            let mut line = String::new();
            if self.input.read_line(&mut line).map_err(to_err)? == 0 {
                log::warn!("Input closed, skipping {}", missing);
                return Ok(Decision::Skip);
            }

            if let Some(decision) = parse_answer(&line, candidates.len(), &self.skip_token) {
                return Ok(decision);
            }
            writeln!(self.output, "Invalid choice. Please try again.").map_err(to_err)?;
        }
    }
}

/// Always takes the best-ranked candidate
#[derive(Debug, Default, Clone, Copy)]
pub struct BestCandidate;

impl DecisionProvider for BestCandidate {
    fn decide(&mut self, missing: &str, candidates: &[Candidate]) -> Result<Decision, RepairError> {
        match candidates.first() {
            Some(best) => {
                log::info!("Auto-selecting {} for {}", best.relative_path, missing);
                Ok(Decision::Accept(0))
            }
            None => Ok(Decision::Skip),
        }
    }
}

/// Replays a fixed list of decisions, then skips
#[derive(Debug, Default, Clone)]
pub struct ScriptedDecisions {
    decisions: VecDeque<Decision>,
    asked: Vec<String>,
}

impl ScriptedDecisions {
    /// Create from decisions in the order they will be requested
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self { decisions: decisions.into_iter().collect(), asked: Vec::new() }
    }

    /// Missing textures the provider was asked about, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn decide(&mut self, missing: &str, _candidates: &[Candidate]) -> Result<Decision, RepairError> {
        self.asked.push(missing.to_string());
        Ok(self.decisions.pop_front().unwrap_or(Decision::Skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn brick_index() -> TextureIndex {
        TextureIndex::from_relative_paths([
            "tex/brick_new.png",
            "tex/grass.jpg",
            "tex/brick_old2.png",
        ])
    }

    #[test]
    fn test_rank_filters_and_sorts() {
        let ranked = rank_candidates("C:\\art\\brick_old.png", &brick_index(), 0.6);
        let paths: Vec<&str> = ranked.iter().map(|c| c.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["tex/brick_old2.png", "tex/brick_new.png"]);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_rank_ties_keep_index_order() {
        let index = TextureIndex::from_relative_paths(["b/rock_b.png", "a/rock_a.png"]);
        let ranked = rank_candidates("rock_c.png", &index, 0.0);
        assert_eq!(ranked[0].relative_path, "b/rock_b.png");
        assert_eq!(ranked[1].relative_path, "a/rock_a.png");
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer(" 2 \n", 3, "n"), Some(Decision::Accept(1)));
        assert_eq!(parse_answer("N\n", 3, "n"), Some(Decision::Skip));
        assert_eq!(parse_answer("0", 3, "n"), None);
        assert_eq!(parse_answer("4", 3, "n"), None);
        assert_eq!(parse_answer("two", 3, "n"), None);
        assert_eq!(parse_answer("-1", 3, "n"), None);
    }

    #[test]
    fn test_console_reprompts_until_valid() {
        let input = Cursor::new("abc\n9\n1\n");
        let mut prompt = ConsolePrompt::new(input, Vec::new(), "n");
        let candidates = rank_candidates("brick_old.png", &brick_index(), 0.6);

        let decision = prompt.decide("brick_old.png", &candidates).unwrap();
        assert_eq!(decision, Decision::Accept(0));

        let shown = String::from_utf8(prompt.into_output()).unwrap();
        assert!(shown.contains("Looking for texture: brick_old.png"));
        assert!(shown.contains("1. tex/brick_old2.png"));
        assert_eq!(shown.matches("Invalid choice. Please try again.").count(), 2);
    }

    #[test]
    fn test_console_eof_skips() {
        let mut prompt = ConsolePrompt::new(Cursor::new(""), Vec::new(), "n");
        let candidates = rank_candidates("brick_old.png", &brick_index(), 0.6);
        assert_eq!(prompt.decide("brick_old.png", &candidates).unwrap(), Decision::Skip);
    }

    #[test]
    fn test_resolver_without_candidates_does_not_ask() {
        let index = brick_index();
        let mut provider = ScriptedDecisions::new([Decision::Accept(0)]);
        let result = Resolver::new(&index, 0.6, &mut provider).resolve("zzz.png").unwrap();
        assert_eq!(result, None);
        assert!(provider.asked().is_empty());
    }

    #[test]
    fn test_resolver_accept_and_skip() {
        let index = brick_index();
        let mut provider = ScriptedDecisions::new([Decision::Accept(1), Decision::Skip]);
        let mut resolver = Resolver::new(&index, 0.6, &mut provider);

        assert_eq!(resolver.resolve("brick_old.png").unwrap(), Some("tex/brick_new.png".to_string()));
        assert_eq!(resolver.resolve("brick_old.png").unwrap(), None);
    }

    #[test]
    fn test_resolver_out_of_range_choice_skips() {
        let index = brick_index();
        let mut provider = ScriptedDecisions::new([Decision::Accept(7)]);
        let result = Resolver::new(&index, 0.6, &mut provider).resolve("brick_old.png").unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_best_candidate_without_candidates_skips() {
        let decision = BestCandidate.decide("brick_old.png", &[]).unwrap();
        assert_eq!(decision, Decision::Skip);
    }

    #[test]
    fn test_best_candidate() {
        let index = brick_index();
        let mut provider = BestCandidate;
        let result = Resolver::new(&index, 0.6, &mut provider).resolve("brick_old.png").unwrap();
        assert_eq!(result, Some("tex/brick_old2.png".to_string()));
    }
}
