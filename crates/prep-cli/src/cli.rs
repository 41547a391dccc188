//! CLI argument definitions for the admin back office.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use prep_model::{DateRange, ExamSelection};

#[derive(Parser)]
#[command(
    name = "prep-admin",
    version,
    about = "Exam-prep back office - browse and edit content, read analytics",
    long_about = "Browse and edit subjects, topics, questions, exams, coupons and podcasts,\n\
                  manage users and AI settings, and render the analytics dashboard\n\
                  against the admin API."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Admin API root (overrides the config file and PREP_ADMIN_API_URL).
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Access token (overrides PREP_ADMIN_TOKEN).
    #[arg(long = "token", value_name = "TOKEN", global = true)]
    pub token: Option<String>,

    /// TOML file with connection settings.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Exam filter shared by every command (NEET_PG, NEET_UG, JEE, UPSC or ALL).
    #[arg(long = "exam", value_name = "EXAM", default_value = "ALL", global = true)]
    pub exam: ExamSelection,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render every analytics tile for the selected exam and range.
    Dashboard {
        /// Date range: today, 7d or 30d.
        #[arg(long = "range", value_name = "RANGE", default_value = "7d")]
        range: DateRange,
    },

    /// List subjects, or add one.
    Subjects {
        #[command(subcommand)]
        action: Option<SubjectAction>,
    },

    /// List topics, optionally of one subject, or add one.
    Topics {
        /// Only topics of this subject.
        #[arg(long = "subject", value_name = "SUBJECT_ID")]
        subject: Option<String>,

        #[command(subcommand)]
        action: Option<TopicAction>,
    },

    /// List questions, or delete one.
    Questions {
        #[arg(long = "subject", value_name = "SUBJECT_ID")]
        subject: Option<String>,

        /// Requires --subject.
        #[arg(long = "topic", value_name = "TOPIC_ID", requires = "subject")]
        topic: Option<String>,

        #[command(subcommand)]
        action: Option<QuestionAction>,
    },

    /// List exam and event configurations.
    Exams,

    /// List coupons.
    Coupons,

    /// List podcast episodes.
    Podcasts,

    /// List users page by page.
    Users {
        #[arg(long = "page", value_name = "N")]
        page: Option<u32>,

        #[arg(long = "page-size", value_name = "N")]
        page_size: Option<u32>,

        /// Only users with this status (repeatable).
        #[arg(long = "status", value_name = "STATUS")]
        status: Vec<String>,

        #[arg(long = "username", value_name = "NAME")]
        username: Option<String>,
    },

    /// Show the AI personalization settings.
    AiSettings,
}

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Create a subject for the exam given with --exam.
    Add {
        #[arg(long = "name", value_name = "NAME")]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum TopicAction {
    /// Create a topic under a subject.
    Add {
        #[arg(long = "subject", value_name = "SUBJECT_ID")]
        subject: String,

        #[arg(long = "name", value_name = "NAME")]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum QuestionAction {
    /// Delete a question by id.
    Delete {
        #[arg(value_name = "QUESTION_ID")]
        id: String,
    },
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use prep_model::ExamCategory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_exam_after_subcommand() {
        let cli = Cli::parse_from(["prep-admin", "dashboard", "--range", "30d", "--exam", "neet_pg"]);
        assert_eq!(cli.exam, ExamSelection::Exam(ExamCategory::NeetPg));
        match cli.command {
            Command::Dashboard { range } => assert_eq!(range, DateRange::Last30Days),
            _ => panic!("expected dashboard"),
        }
    }

    #[test]
    fn test_exam_defaults_to_all() {
        let cli = Cli::parse_from(["prep-admin", "subjects"]);
        assert_eq!(cli.exam, ExamSelection::All);
        assert!(matches!(cli.command, Command::Subjects { action: None }));
    }

    #[test]
    fn test_topic_requires_subject() {
        assert!(Cli::try_parse_from(["prep-admin", "questions", "--topic", "thorax"]).is_err());
    }

    #[test]
    fn test_unknown_exam_rejected() {
        assert!(Cli::try_parse_from(["prep-admin", "--exam", "GRE", "exams"]).is_err());
    }
}
