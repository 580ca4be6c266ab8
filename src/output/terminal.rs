// Colored terminal output for analysis results and company listings.
//
// main.rs display paths delegate here so formatting stays in one place.

use colored::{ColoredString, Colorize};

use super::truncate_chars;
use crate::db::{AnalysisResult, CompanyEntry};
use crate::narration::AudioOutcome;
use crate::sentiment::SentimentLabel;

/// Display a full analysis report.
pub fn display_result(result: &AnalysisResult) {
    println!(
        "\n{}",
        format!("=== News Analysis: {} ===", result.company).bold()
    );

    let analyzed = format!(
        "{} of {} requested articles analyzed",
        result.articles_analyzed(),
        result.requested_count
    );
    if result.is_partial() {
        println!("  {} (partial)", analyzed.yellow());
    } else {
        println!("  {analyzed}");
    }
    println!(
        "  Analyzed at: {}",
        result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    println!(
        "  {:>3}  {:<9} {:>5}  {:<48} {}",
        "#".dimmed(),
        "Sentiment".dimmed(),
        "Conf".dimmed(),
        "Title".dimmed(),
        "Source".dimmed(),
    );
    println!("  {}", "-".repeat(84).dimmed());
    for (i, item) in result.articles.iter().enumerate() {
        println!(
            "  {:>3}. {:<9} {:>5.2}  {:<48} {}",
            i + 1,
            colorize_label(item.sentiment.label),
            item.sentiment.confidence,
            truncate_chars(&item.article.title, 45),
            item.article.source.dimmed(),
        );
        if !item.topics.keywords.is_empty() {
            println!(
                "       {} {}",
                "topics:".dimmed(),
                item.topics.keywords.join(", ")
            );
        }
    }

    let summary = &result.summary;
    let dist = &summary.sentiment_distribution;
    println!("\n{}", "Sentiment distribution".bold());
    println!(
        "  {} {}   {} {}   {} {}",
        "positive".green(),
        dist.positive,
        "negative".red(),
        dist.negative,
        "neutral".yellow(),
        dist.neutral
    );
    println!("  {}", summary.overall_assessment);

    if !summary.common_topics.is_empty() {
        println!("\n{}", "Common topics".bold());
        println!("  {}", summary.common_topics.join(", "));
    }

    if !summary.coverage_differences.is_empty() {
        println!("\n{}", "Coverage differences".bold());
        for diff in &summary.coverage_differences {
            println!("  - {}", diff.comparison);
            println!("    {}", diff.impact.dimmed());
        }
    }

    println!(
        "\n{}",
        format!("Narration ({})", result.narration.language).bold()
    );
    for line in result.narration.text.lines() {
        println!("  {line}");
    }

    match &result.audio {
        AudioOutcome::Ready { size_bytes, .. } => {
            println!("\n  Audio: {} ({} bytes)", "ready".green(), size_bytes);
        }
        AudioOutcome::Failed { reason } => {
            println!("\n  Audio: {} ({})", "unavailable".red(), reason);
        }
    }

    if !result.failures.is_empty() {
        println!(
            "\n  {} {} articles dropped:",
            "!".yellow(),
            result.failures.len()
        );
        for failure in &result.failures {
            println!(
                "    [{}] {} {}",
                failure.stage,
                truncate_chars(&failure.url, 60),
                failure.reason.dimmed()
            );
        }
    }
}

/// Display stored companies.
pub fn display_company_list(entries: &[CompanyEntry]) {
    if entries.is_empty() {
        println!("No companies analyzed yet. Run `newscast analyze <company>` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Analyzed companies ({}) ===", entries.len()).bold()
    );
    for entry in entries {
        let audio = if entry.has_audio {
            "audio".green()
        } else {
            "no audio".dimmed()
        };
        println!(
            "  {:<30} {:>2} articles  {}  {}",
            entry.company,
            entry.articles_analyzed,
            entry.analyzed_at.format("%Y-%m-%d %H:%M"),
            audio
        );
    }
}

fn colorize_label(label: SentimentLabel) -> ColoredString {
    match label {
        SentimentLabel::Positive => label.as_str().green(),
        SentimentLabel::Negative => label.as_str().red(),
        SentimentLabel::Neutral => label.as_str().yellow(),
    }
}
