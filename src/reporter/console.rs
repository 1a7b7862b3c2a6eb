//! Console reporter with colored output

use crate::feedback::FeedbackGenerator;
use crate::{AggregateStats, Band, CriterionResult, ScoreReport};
use colored::Colorize;
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print a single report
    pub fn report(&self, report: &ScoreReport) {
        print!("{}", self.render(report));
    }

    /// Print several reports followed by a summary
    pub fn report_many(&self, reports: &[ScoreReport], stats: &AggregateStats) {
        for report in reports {
            self.report(report);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Print one line per report
    pub fn report_quiet(&self, report: &ScoreReport) {
        println!("{}", self.render_quiet(report));
    }

    pub fn render_quiet(&self, report: &ScoreReport) -> String {
        let label = report
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "transcript".to_string());
        format!(
            "{}: {:.1} ({})",
            label,
            report.overall_score,
            self.colorize_band(report.band)
        )
    }

    /// Render a full report as text
    pub fn render(&self, report: &ScoreReport) -> String {
        let mut out = String::new();
        self.write_header(&mut out, report);
        self.write_score(&mut out, report);
        self.write_breakdown(&mut out, report);
        self.write_recommendations(&mut out, report);
        out.push('\n');
        out
    }

    fn write_header(&self, out: &mut String, report: &ScoreReport) {
        let title = match report.source {
            Some(ref path) => format!("Self-Introduction Score: {}", path.display()),
            None => "Self-Introduction Score".to_string(),
        };
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.paint(title.bold()));

        let semantic = if report.semantic.available {
            format!("semantic: {}", report.semantic.provider)
        } else {
            match report.semantic.reason {
                Some(ref reason) if self.verbose => {
                    format!("semantic: unavailable ({})", reason)
                }
                _ => "semantic: unavailable, rule scores only".to_string(),
            }
        };
        let _ = writeln!(out, "   Words: {} | {}", report.word_count, semantic);
        let _ = writeln!(out);
    }

    fn write_score(&self, out: &mut String, report: &ScoreReport) {
        let bar = self.create_score_bar(report.overall_score);
        let band = self.colorize_band(report.band);
        let _ = writeln!(out, "   Score: {} {}", bar, band);
        let _ = writeln!(
            out,
            "   {}",
            self.paint(FeedbackGenerator::band_description(report.band).dimmed())
        );
        let _ = writeln!(out);
    }

    fn write_breakdown(&self, out: &mut String, report: &ScoreReport) {
        let _ = writeln!(out, "   {}", self.paint("Rubric Breakdown:".bold()));

        for c in &report.criteria {
            let bar = self.create_mini_bar(c.score);
            let score_str = format!("{:>5.1}", c.score);
            let colored_score = if !self.use_colors {
                score_str
            } else if c.score >= 80.0 {
                score_str.green().to_string()
            } else if c.score >= 60.0 {
                score_str.yellow().to_string()
            } else {
                score_str.red().to_string()
            };
            let _ = writeln!(
                out,
                "   {} {} {:<16} (weight {}%, {})",
                bar,
                colored_score,
                c.criterion.name(),
                c.weight,
                self.split_note(c)
            );
            let _ = writeln!(out, "       {} {}", self.paint("→".dimmed()), c.feedback);

            if let Some(ref error) = c.details.error {
                let _ = writeln!(out, "       {} {}", self.paint("✗".red()), error);
            }
            if self.verbose {
                if let Some(ref details) = c.details.rule {
                    let json = serde_json::to_string(details).unwrap_or_default();
                    let _ = writeln!(out, "       {} {}", self.paint("↳".dimmed()), json);
                }
            }
        }
        let _ = writeln!(out);
    }

    fn split_note(&self, c: &CriterionResult) -> String {
        match c.semantic_score {
            Some(semantic) => format!("rule {:.0}, semantic {:.0}", c.rule_score, semantic),
            None => format!("rule {:.0}", c.rule_score),
        }
    }

    fn write_recommendations(&self, out: &mut String, report: &ScoreReport) {
        if report.recommendations.is_empty() {
            return;
        }
        let _ = writeln!(out, "   {}", self.paint("Recommendations:".bold()));
        let limit = if self.verbose { usize::MAX } else { 3 };
        for rec in report.recommendations.iter().take(limit) {
            let _ = writeln!(out, "   {} {}", self.paint("→".cyan()), rec);
        }
    }

    /// Render the summary for directory runs
    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.paint("Summary".bold()));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(
            out,
            "   Transcripts scored: {}",
            stats.transcripts_scored
        );
        let _ = writeln!(
            out,
            "   Average score:      {:.1} ({})",
            stats.average_score,
            self.colorize_band(stats.average_band)
        );
        let _ = writeln!(
            out,
            "   Range:              {:.1} - {:.1}",
            stats.lowest_score, stats.highest_score
        );
        let _ = writeln!(out, "   Total words:        {}", stats.total_words);
        let _ = writeln!(out);
        out
    }

    fn paint(&self, s: colored::ColoredString) -> String {
        if self.use_colors {
            s.to_string()
        } else {
            s.clear().to_string()
        }
    }

    fn colorize_band(&self, band: Band) -> String {
        let s = band.to_string();
        if !self.use_colors {
            return s;
        }
        match band {
            Band::Excellent => s.green().bold().to_string(),
            Band::Good => s.green().to_string(),
            Band::NeedsImprovement => s.yellow().to_string(),
            Band::Weak => s.red().bold().to_string(),
        }
    }

    fn create_score_bar(&self, score: f64) -> String {
        let filled = ((score.clamp(0.0, 100.0) * 20.0) / 100.0) as usize;
        let empty = 20 - filled;

        let bar = format!(
            "[{}{}] {:>5.1}",
            "█".repeat(filled),
            "░".repeat(empty),
            score
        );

        if self.use_colors {
            if score >= 80.0 {
                bar.green().to_string()
            } else if score >= 60.0 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: f64) -> String {
        let filled = ((score.clamp(0.0, 100.0) * 10.0) / 100.0) as usize;
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
