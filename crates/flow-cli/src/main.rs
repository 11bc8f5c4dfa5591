mod wizard;

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use flow_engine::{
    FlowEvent, FlowForm, InputEvent, build_render_payload, render_json_ui, render_text,
};
use flow_spec::{FlowSpec, answers_schema, validate};
use wizard::{PromptContext, Verbosity, WizardPresenter, parse_answer};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Text-based conversational form runner",
    long_about = "Runs, validates, and inspects conversational form flows driven by the FlowForm engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Run a flow as an interactive text wizard.
    Run {
        /// Path to the FlowSpec JSON describing the flow.
        #[arg(long, value_name = "SPEC")]
        spec: PathBuf,
        /// Optional JSON file containing initial answers.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Show verbose output (statuses, reachable questions, parse expectations).
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Also emit answer JSON after submission.
        #[arg(long)]
        answers_json: bool,
    },
    /// Validate an answers file against a flow definition.
    Validate {
        /// Path to the FlowSpec JSON.
        #[arg(long, value_name = "SPEC")]
        spec: PathBuf,
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Print the JSON schema describing a flow's answer set.
    Schema {
        /// Path to the FlowSpec JSON.
        #[arg(long, value_name = "SPEC")]
        spec: PathBuf,
    },
    /// Print the render payload for a flow and optional answers.
    Inspect {
        /// Path to the FlowSpec JSON.
        #[arg(long, value_name = "SPEC")]
        spec: PathBuf,
        /// Optional JSON file containing answers to replay first.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Render output mode.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            spec,
            answers,
            verbose,
            answers_json,
        } => run_wizard(spec, answers, verbose, answers_json),
        Command::Validate { spec, answers } => run_validate(spec, answers),
        Command::Schema { spec } => run_schema(spec),
        Command::Inspect {
            spec,
            answers,
            format,
        } => run_inspect(spec, answers, format),
    }
}

fn run_wizard(
    spec_path: PathBuf,
    answers_path: Option<PathBuf>,
    verbose: bool,
    answers_json: bool,
) -> CliResult<()> {
    let spec = load_spec(&spec_path)?;
    let mut form = FlowForm::from_spec(&spec)?;
    if let Some(path) = answers_path {
        let answers = load_json(&path)?;
        seed_answers(&mut form, &answers);
    }

    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose), answers_json);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let timer_enabled = form.options().timer;
    let mut last_tick = Instant::now();

    loop {
        if timer_enabled {
            deliver_ticks(&mut form, &mut last_tick);
        }
        let payload = build_render_payload(&form);
        presenter.show_header(&payload);
        presenter.show_status(&payload);
        if form.options().progressbar && !verbose && payload.progress.answered > 0 {
            println!("{}", payload.percent_label);
        }
        if verbose
            && timer_enabled
            && form.timer().is_on()
            && let Ok(label) = form.language().format_time(&form.timer().formatted())
        {
            println!("{}", label);
        }

        if form.submitted() {
            break;
        }

        if let Some(active) = payload.questions.iter().find(|question| question.active) {
            let prompt = PromptContext::new(active, &payload.progress);
            presenter.show_prompt(&prompt);
            let Some(line) = next_line(&mut lines)? else {
                return Err("standard input closed before the flow was submitted".into());
            };
            match line.trim() {
                ":quit" => return Err("flow aborted".into()),
                ":back" => {
                    form.handle(InputEvent::Previous);
                }
                ":skip" | "" => {
                    let events = form.handle(InputEvent::Enter);
                    if events.is_empty() {
                        presenter.show_rejection(&form.language().invalid_prompt);
                    }
                }
                input => match parse_answer(active, input) {
                    Ok(value) => {
                        let events = form.handle(InputEvent::Answer {
                            id: active.id.clone(),
                            value,
                        });
                        let accepted = events
                            .iter()
                            .any(|event| matches!(event, FlowEvent::Answer { .. }));
                        if !accepted {
                            presenter.show_rejection(&form.language().invalid_prompt);
                        }
                    }
                    Err(error) => presenter.show_parse_error(&error),
                },
            }
        } else if form.completed() {
            println!(
                "{} (press Enter, :back to review, :quit to abort)",
                form.language().submit_label
            );
            let Some(line) = next_line(&mut lines)? else {
                return Err("standard input closed before the flow was submitted".into());
            };
            match line.trim() {
                ":quit" => return Err("flow aborted".into()),
                ":back" => {
                    form.handle(InputEvent::Previous);
                }
                _ => {
                    form.handle(InputEvent::Enter);
                }
            }
        } else {
            // Nothing reachable and nothing completed: an empty flow.
            return Err("the flow has no reachable questions".into());
        }
    }

    presenter.show_completion(&form.answer_set(), &form.language().thank_you_text);
    Ok(())
}

fn run_validate(spec_path: PathBuf, answers_path: PathBuf) -> CliResult<()> {
    let spec = load_spec(&spec_path)?;
    let answers = load_json(&answers_path)?;
    let result = validate(&spec, &answers);
    println!("{}", serde_json::to_string_pretty(&result)?);
    if result.valid {
        Ok(())
    } else {
        Err("answers do not satisfy the flow".into())
    }
}

fn run_schema(spec_path: PathBuf) -> CliResult<()> {
    let spec = load_spec(&spec_path)?;
    let schema = answers_schema(&spec);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn run_inspect(
    spec_path: PathBuf,
    answers_path: Option<PathBuf>,
    format: RenderMode,
) -> CliResult<()> {
    let spec = load_spec(&spec_path)?;
    let mut form = FlowForm::from_spec(&spec)?;
    if let Some(path) = answers_path {
        let answers = load_json(&path)?;
        seed_answers(&mut form, &answers);
    }
    let payload = build_render_payload(&form);
    match format {
        RenderMode::Text => println!("{}", render_text(&payload)),
        RenderMode::Json => println!("{}", serde_json::to_string_pretty(&render_json_ui(&payload))?),
    }
    Ok(())
}

fn load_spec(path: &Path) -> CliResult<FlowSpec> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let spec = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
    Ok(spec)
}

fn load_json(path: &Path) -> CliResult<Value> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let value = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
    Ok(value)
}

/// Replay stored answers in flow order so the cursor lands on the first
/// unanswered question.
fn seed_answers(form: &mut FlowForm, answers: &Value) {
    let Some(map) = answers.as_object() else {
        return;
    };
    let ids: Vec<String> = form
        .questions()
        .iter()
        .map(|question| question.id_or_indexed())
        .collect();
    for id in ids {
        if let Some(value) = map.get(&id) {
            form.handle(InputEvent::Answer {
                id,
                value: value.clone(),
            });
        }
    }
}

fn deliver_ticks(form: &mut FlowForm, last_tick: &mut Instant) {
    let elapsed = last_tick.elapsed().as_secs();
    for _ in 0..elapsed {
        form.handle(InputEvent::Tick);
    }
    if elapsed > 0 {
        *last_tick += Duration::from_secs(elapsed);
    }
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> CliResult<Option<String>> {
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}
