use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rafiq", version, author, about = "A terminal companion for Quran memorization and revision")]
pub struct Cli {
    /// Use this database file instead of the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the memorization plan, or edit the existing one
    Setup {
        /// Pages to memorize on each planned day (0.5 to 20, half-page steps)
        #[arg(long)]
        goal: Option<f64>,
        /// Planned weekdays, comma separated (sun,mon,tue,wed,thu,fri,sat)
        #[arg(long)]
        days: Option<String>,
        /// Pages already memorized before using rafiq (0 to 604)
        #[arg(long)]
        initial: Option<u32>,
    },
    /// Record memorized and/or revised pages for a day
    Log {
        /// Day to edit as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Pages memorized that day; replaces the stored value
        #[arg(long, short = 'm')]
        memorized: Option<String>,
        /// Pages revised that day; replaces the stored value
        #[arg(long, short = 'r')]
        revised: Option<String>,
    },
    /// Dashboard: totals, commitment, khatmas and upcoming badges
    Today,
    /// Weekly history, newest week first
    History,
    /// Last 7 days and last 4 weeks as text bars
    Stats,
    /// All badges and how close you are to each
    Badges {
        /// Only show one category: memorization, revision or consistency
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the stored record as JSON
    Export,
    /// Tips for memorizing and revising
    Tips,
}
