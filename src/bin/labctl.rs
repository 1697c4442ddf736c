use clap::{Args, Parser, Subcommand};
use labquest_gateway::models::{Difficulty, EvaluationRequest, VariationRequest, MAX_BULK_TOTAL};
use labquest_gateway::{Config, PromptBuilder, QuestionGateway};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "labctl", about = "CLI for the LabQuest AI gateway", version)]
struct Cli {
    /// Override PROVIDER_BASE_URL
    #[arg(global = true, long)]
    base_url: Option<String>,

    /// Override PROVIDER_MODEL
    #[arg(global = true, long)]
    model: Option<String>,

    /// Override PROVIDER_API_KEY
    #[arg(global = true, long)]
    api_key: Option<String>,

    /// Pretty-print JSON output
    #[arg(global = true, long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate equivalent variations of a question
    Variations {
        #[command(flatten)]
        question: QuestionArgs,
        /// Number of variations (defaults to 4)
        #[arg(long)]
        count: Option<u32>,
    },
    /// Generate many variations in sequential batches
    Bulk {
        #[command(flatten)]
        question: QuestionArgs,
        /// Total number of variations to produce (1-100)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_BULK_TOTAL as i64))]
        total: u32,
    },
    /// Score a student's answer
    Evaluate {
        #[command(flatten)]
        answer: AnswerArgs,
    },
    /// Rate how distinct a set of questions are (0-100)
    Uniqueness {
        /// Questions to compare
        #[arg(required = true)]
        questions: Vec<String>,
    },
    /// Print the prompt for a request without calling the model
    Prompt {
        #[command(subcommand)]
        cmd: PromptCmd,
    },
}

#[derive(Subcommand, Debug)]
enum PromptCmd {
    /// Variation-generation prompt
    Variations {
        #[command(flatten)]
        question: QuestionArgs,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Answer-evaluation prompt
    Evaluate {
        #[command(flatten)]
        answer: AnswerArgs,
    },
    /// Uniqueness-scoring prompt
    Uniqueness {
        #[arg(required = true)]
        questions: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct QuestionArgs {
    /// The original lab question
    #[arg(long)]
    question: String,
    /// Subject, e.g. Biology
    #[arg(long)]
    subject: String,
    /// Easy, Medium or Hard
    #[arg(long, default_value = "Medium")]
    difficulty: Difficulty,
    /// Category within the subject
    #[arg(long, default_value = "General")]
    category: String,
    /// Tag (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,
}

impl QuestionArgs {
    fn into_request(self, count: Option<u32>) -> VariationRequest {
        VariationRequest {
            original_question: self.question,
            subject: self.subject,
            difficulty: self.difficulty,
            category: self.category,
            tags: self.tags,
            variation_count: count,
        }
    }
}

#[derive(Args, Debug)]
struct AnswerArgs {
    /// The question that was answered
    #[arg(long)]
    question: String,
    /// The student's answer text
    #[arg(long)]
    answer: String,
    /// Subject, e.g. Biology
    #[arg(long)]
    subject: String,
}

impl AnswerArgs {
    fn into_request(self) -> EvaluationRequest {
        EvaluationRequest {
            question: self.question,
            student_answer: self.answer,
            subject: self.subject,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Load env and parse CLI
    Config::dotenv_load();
    let Cli { base_url, model, api_key, pretty, command } = Cli::parse();

    let connect = || -> Result<QuestionGateway, Box<dyn std::error::Error>> {
        let conf = Config::from_vars(|key| match key {
            "PROVIDER_BASE_URL" if base_url.is_some() => base_url.clone(),
            "PROVIDER_MODEL" if model.is_some() => model.clone(),
            "PROVIDER_API_KEY" if api_key.is_some() => api_key.clone(),
            _ => std::env::var(key).ok(),
        })?;
        Ok(QuestionGateway::from_config(&conf)?)
    };

    let degraded = match command {
        // Prompt rendering needs no credentials
        Commands::Prompt { cmd } => {
            let builder = PromptBuilder::new();
            let prompt = match cmd {
                PromptCmd::Variations { question, count } => builder.variations(&question.into_request(count)),
                PromptCmd::Evaluate { answer } => builder.evaluation(&answer.into_request()),
                PromptCmd::Uniqueness { questions } => builder.uniqueness(&questions),
            };
            print_json(&prompt, pretty)?;
            false
        }
        Commands::Variations { question, count } => {
            let result = connect()?.generate_variations(&question.into_request(count)).await;
            print_json(&result, pretty)?;
            result.degraded
        }
        Commands::Bulk { question, total } => {
            let result = connect()?.generate_bulk(&question.into_request(None), total).await;
            print_json(&result, pretty)?;
            if result.shortfall > 0 {
                eprintln!("Warning: {} of {} variations missing", result.shortfall, total);
            }
            result.degraded
        }
        Commands::Evaluate { answer } => {
            let result = connect()?.evaluate_answer(&answer.into_request()).await;
            print_json(&result, pretty)?;
            result.degraded
        }
        Commands::Uniqueness { questions } => {
            let result = connect()?.check_uniqueness(&questions).await;
            print_json(&result, pretty)?;
            result.degraded
        }
    };

    if degraded {
        eprintln!("Warning: AI provider unavailable, fallback content was returned");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}
