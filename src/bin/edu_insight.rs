//! EduInsight CLI - Command-line interface for EduInsight
//!
//! Commands:
//! - predict: Predict a learner type from feature values or a stored student
//! - explain: Render the narrative for a learner type
//! - students: List students in the dataset
//! - dashboard: Show a student's dashboard panel
//! - features: Describe the model features
//! - doctor: Diagnose dataset and artifact health

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use edu_insight::dashboard::feature_description;
use edu_insight::dataset::StudentDataset;
use edu_insight::report::ReportEncoder;
use edu_insight::{
    artifacts, FeatureName, FeatureVectorBuilder, InsightConfig, InsightEngine, InsightError,
    RawFieldMap, RawValue, INSIGHT_VERSION, PRODUCER_NAME,
};

/// EduInsight - Learner-type inference and narrative engine
#[derive(Parser)]
#[command(name = "edu-insight")]
#[command(author = "EduInsight Team")]
#[command(version = INSIGHT_VERSION)]
#[command(about = "Classify learners and explain the result", long_about = None)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true, default_value = "edu-insight.json")]
    config: PathBuf,

    /// Student dataset (overrides config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Classifier artifact (overrides config)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Scaler artifact (overrides config)
    #[arg(long, global = true)]
    scaler: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a learner type
    Predict {
        /// Feature value as name=value (repeatable, decimal comma allowed)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// JSON object of feature values (use - for stdin)
        #[arg(short, long, conflicts_with = "student")]
        input: Option<PathBuf>,

        /// Use the latest dataset row of this student
        #[arg(short, long)]
        student: Option<String>,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Render the explanation for a learner type
    Explain {
        /// Learner type label, e.g. "Fast Learner"
        #[arg(short, long)]
        label: String,

        /// Feature value as name=value (repeatable, decimal comma allowed)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// JSON object of feature values (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List students in the dataset
    Students,

    /// Show a student's dashboard panel
    Dashboard {
        /// Student identifier
        #[arg(short, long)]
        student: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Describe the model features in canonical order
    Features,

    /// Diagnose dataset and artifact health
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), InsightCliError> {
    let mut config = InsightConfig::load_or_default(Some(cli.config.as_path()))?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(scaler) = cli.scaler {
        config.scaler_path = scaler;
    }

    match cli.command {
        Commands::Predict {
            fields,
            input,
            student,
            pretty,
        } => cmd_predict(&config, fields, input.as_deref(), student.as_deref(), pretty),

        Commands::Explain {
            label,
            fields,
            input,
        } => cmd_explain(&label, fields, input.as_deref()),

        Commands::Students => cmd_students(&config),

        Commands::Dashboard { student, json } => cmd_dashboard(&config, &student, json),

        Commands::Features => cmd_features(),

        Commands::Doctor { json } => cmd_doctor(&config, json),
    }
}

fn cmd_predict(
    config: &InsightConfig,
    fields: Vec<(String, String)>,
    input: Option<&Path>,
    student: Option<&str>,
    pretty: bool,
) -> Result<(), InsightCliError> {
    let engine = InsightEngine::load(config);

    let mut field_map = match student {
        Some(id) => engine.student_fields(id)?,
        None => read_field_map(input)?,
    };
    merge_fields(&mut field_map, fields);

    let outcome = engine.predict(&field_map);
    let explanation = outcome
        .success
        .then(|| engine.explain(&outcome.label, &field_map));
    let success = outcome.success;

    let report = ReportEncoder::new().encode(
        student,
        FeatureVectorBuilder::build(&field_map),
        outcome,
        explanation,
    );
    println!("{}", ReportEncoder::to_json(&report, pretty)?);

    if success {
        Ok(())
    } else {
        Err(InsightCliError::PredictionFailed(
            report.outcome.error.unwrap_or_default(),
        ))
    }
}

fn cmd_explain(
    label: &str,
    fields: Vec<(String, String)>,
    input: Option<&Path>,
) -> Result<(), InsightCliError> {
    let mut field_map = read_field_map(input)?;
    merge_fields(&mut field_map, fields);

    println!("{}", edu_insight::explain(label, &field_map));
    Ok(())
}

fn cmd_students(config: &InsightConfig) -> Result<(), InsightCliError> {
    let dataset = StudentDataset::from_path(&config.data_path)?;
    for id in dataset.students() {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_dashboard(config: &InsightConfig, student: &str, json: bool) -> Result<(), InsightCliError> {
    let engine = InsightEngine::load(config);
    let panel = engine.dashboard(student)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&panel)?);
    } else {
        println!("Profile - {}", panel.student);
        println!("{}", "=".repeat(10 + panel.student.len()));

        let width = panel.cells.iter().map(|c| c.label.len()).max().unwrap_or(0);
        for cell in &panel.cells {
            println!("  {:<width$}  {}", cell.label, cell.value, width = width);
        }
    }

    Ok(())
}

fn cmd_features() -> Result<(), InsightCliError> {
    println!("Model features (canonical order)");
    println!();
    for (i, feature) in FeatureName::ALL.iter().enumerate() {
        println!("{}. {}", i + 1, feature);
        println!("   {}", feature_description(*feature));
    }
    Ok(())
}

fn cmd_doctor(config: &InsightConfig, json: bool) -> Result<(), InsightCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("EduInsight version {}", INSIGHT_VERSION),
    });

    checks.push(match StudentDataset::from_path(&config.data_path) {
        Ok(dataset) => DoctorCheck {
            name: "dataset".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "{} rows, {} students (id column: {})",
                dataset.len(),
                dataset.students().len(),
                dataset.id_column()
            ),
        },
        Err(e) => DoctorCheck {
            name: "dataset".to_string(),
            status: CheckStatus::Warning,
            message: format!("Dashboard unavailable: {}", e),
        },
    });

    checks.push(match artifacts::load_classifier(&config.model_path) {
        Ok(_) => DoctorCheck {
            name: "classifier".to_string(),
            status: CheckStatus::Ok,
            message: format!("Loaded {}", config.model_path.display()),
        },
        Err(e) => DoctorCheck {
            name: "classifier".to_string(),
            status: CheckStatus::Error,
            message: format!("Inference unavailable: {}", e),
        },
    });

    checks.push(match artifacts::load_scaler(&config.scaler_path) {
        Ok(_) => DoctorCheck {
            name: "scaler".to_string(),
            status: CheckStatus::Ok,
            message: format!("Loaded {}", config.scaler_path.display()),
        },
        Err(e) => DoctorCheck {
            name: "scaler".to_string(),
            status: CheckStatus::Warning,
            message: format!("Features will be passed unscaled: {}", e),
        },
    });

    // Check stdin is available (for `predict --input -`)
    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (piped input ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: INSIGHT_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("EduInsight Doctor Report");
        println!("========================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(InsightCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn parse_field(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))?;
    let name = name.trim();
    if FeatureName::from_name(name).is_none() {
        return Err(format!("unknown feature '{}'", name));
    }
    Ok((name.to_string(), value.to_string()))
}

fn read_field_map(input: Option<&Path>) -> Result<RawFieldMap, InsightCliError> {
    let Some(path) = input else {
        return Ok(RawFieldMap::new());
    };

    let data = if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };

    Ok(serde_json::from_str(&data)?)
}

fn merge_fields(map: &mut RawFieldMap, fields: Vec<(String, String)>) {
    for (name, value) in fields {
        map.insert(name, RawValue::Text(value));
    }
}

// Error types

#[derive(Debug)]
enum InsightCliError {
    Io(io::Error),
    Insight(InsightError),
    Json(serde_json::Error),
    PredictionFailed(String),
    DoctorFailed,
}

impl From<io::Error> for InsightCliError {
    fn from(e: io::Error) -> Self {
        InsightCliError::Io(e)
    }
}

impl From<InsightError> for InsightCliError {
    fn from(e: InsightError) -> Self {
        InsightCliError::Insight(e)
    }
}

impl From<serde_json::Error> for InsightCliError {
    fn from(e: serde_json::Error) -> Self {
        InsightCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<InsightCliError> for CliError {
    fn from(e: InsightCliError) -> Self {
        match e {
            InsightCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            InsightCliError::Insight(e) => {
                let (code, hint) = match &e {
                    InsightError::StudentNotFound(_) => {
                        ("STUDENT_NOT_FOUND", "Run 'edu-insight students' to list identifiers")
                    }
                    InsightError::Dataset(_) => {
                        ("DATASET_ERROR", "Check the --data path and CSV header")
                    }
                    InsightError::Config(_) => ("CONFIG_ERROR", "Check the --config file"),
                    _ => ("INSIGHT_ERROR", "Run 'edu-insight doctor' for details"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            InsightCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Input must be a JSON object of feature values".to_string()),
            },
            InsightCliError::PredictionFailed(msg) => CliError {
                code: "PREDICTION_FAILED".to_string(),
                message: msg,
                hint: Some("Run 'edu-insight doctor' to check the artifacts".to_string()),
            },
            InsightCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
