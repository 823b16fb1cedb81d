//! Interactive decisions on a terminal.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;
use docnorm::{AnomalyAction, AnomalyRecord, DecisionSource, LanguageCode, StyleTarget};

/// Asks every question on `output` and reads answers from `input`.
///
/// End of input or an unreadable answer counts as pressing Enter, which is
/// always the conservative choice.
pub struct PromptDecisions<R, W> {
    input: R,
    output: W,
    language: Option<String>,
    style_count: Option<usize>,
}

impl<R: BufRead, W: Write> PromptDecisions<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            language: None,
            style_count: None,
        }
    }

    /// Announce how many styles are in use before the first style question.
    pub fn with_style_count(mut self, count: usize) -> Self {
        self.style_count = Some(count);
        self
    }

    /// Answer the language question up front instead of asking.
    pub fn with_language(mut self, code: Option<LanguageCode>) -> Self {
        self.language = Some(code.map(|c| c.to_string()).unwrap_or_default());
        self
    }

    /// Ask for a path; surrounding quotes are removed.
    pub fn ask_path(&mut self, question: &str) -> PathBuf {
        let answer = self.ask(question);
        PathBuf::from(strip_quotes(&answer))
    }

    fn ask(&mut self, question: &str) -> String {
        let _ = write!(self.output, "{}", question);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => line.trim().to_string(),
            Err(e) => {
                log::warn!("Could not read answer: {}", e);
                String::new()
            }
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        matches!(self.ask(question).to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn say(&mut self, line: impl std::fmt::Display) {
        let _ = writeln!(self.output, "{}", line);
    }
}

impl<R: BufRead, W: Write> DecisionSource for PromptDecisions<R, W> {
    fn choose_language_code(&mut self) -> String {
        if let Some(ref code) = self.language {
            return code.clone();
        }
        loop {
            let answer = self.ask("\nEnter language code (e.g., en-US, en-GB) or Enter to skip: ");
            match LanguageCode::parse(&answer) {
                Ok(code) => return code.map(|c| c.to_string()).unwrap_or_default(),
                Err(e) => self.say(format!("  {}", e).yellow()),
            }
        }
    }

    fn choose_style_target(&mut self, style_name: &str) -> Option<StyleTarget> {
        if let Some(count) = self.style_count.take() {
            self.say(format!("\nFound {} styles in use.", count.to_string().bold()));
        }
        self.say(format!("Style: '{}'", style_name.bold()));
        let answer = self.ask("  1: Normal, 2: Heading 1, 3: Heading 2, [Enter]: Skip: ");
        StyleTarget::from_choice(&answer)
    }

    fn choose_perform_review(&mut self) -> bool {
        self.confirm("\nReview single characters with isolated formatting? [y/N]: ")
    }

    fn choose_anomaly_action(&mut self, record: &AnomalyRecord) -> AnomalyAction {
        self.say("");
        self.say(format!(
            "{} paragraph {}, offset {}: {}",
            "Isolated".cyan().bold(),
            record.paragraph_index + 1,
            record.offset,
            record.labels().join(", ")
        ));
        self.say(format!("  {}", record.context));
        let answer = self.ask("  k: Keep, r: Revert, q: Stop reviewing, [Enter]: Keep: ");
        match answer.to_ascii_lowercase().as_str() {
            "r" | "revert" => AnomalyAction::Revert,
            "q" | "quit" | "stop" => AnomalyAction::Stop,
            _ => AnomalyAction::Keep,
        }
    }

    fn choose_perform_metadata_scrub(&mut self) -> bool {
        self.confirm("\nClear author, comments, keywords, last modified by and title? [y/N]: ")
    }
}

/// Trim whitespace and one pair of surrounding quotes.
pub fn strip_quotes(input: &str) -> &str {
    let trimmed = input.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed.trim_matches('"')
}
