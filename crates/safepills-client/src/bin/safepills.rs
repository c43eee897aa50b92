use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use safepills_client::prompt::{parse_flow_input, parse_yes_no, render_flow_question, Input};
use safepills_client::{
    AnalysisOutcome, ApiClient, ClientConfig, InteractionAnalyzer, LegacyEvent, LegacyQuizSession,
    QuestionnaireSession, SearchBackend, SearchWidget, SessionEvent,
};
use safepills_core::questionnaire::LegacyProfile;
use safepills_core::{
    translate, translate_with, AnalysisResult, Back, Drug, Lang, ScoreView, SelectionStore,
    SubstanceRef, Wizard, WizardStep,
};

#[derive(Parser)]
#[command(name = "safepills")]
#[command(about = "SafePills medication self-assessment")]
struct Cli {
    /// API base URL (overrides SAFEPILLS_API_URL and PUBLIC_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Interface language: fr or es
    #[arg(long, global = true)]
    lang: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search drugs and substances
    Search {
        /// At least two characters
        query: String,
    },
    /// Answer the questionnaire for a molecule
    Check {
        /// CIS or substance code
        id: String,
        /// Name shown in the verdict (defaults to the id)
        #[arg(long)]
        name: Option<String>,
    },
    /// Answer the legacy yes/no quiz for a molecule
    LegacyCheck {
        /// CIS or substance code
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// M or F
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        #[arg(long)]
        other_meds: Option<bool>,
    },
    /// Check interactions between drugs, each given as a search query
    Analyze {
        #[arg(required = true)]
        queries: Vec<String>,
    },
}

type StdinLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("safepills=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(code) = &cli.lang {
        config = config.with_lang(Lang::from_code(code));
    }
    tracing::debug!(api_url = %config.api_url, lang = config.lang.code(), "Configuration loaded");

    let api = Arc::new(ApiClient::new(&config)?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match cli.command {
        Commands::Search { query } => run_search(api, &config, &query).await,
        Commands::Check { id, name } => {
            let name = name.unwrap_or_else(|| id.clone());
            run_check(api, config.lang, SubstanceRef::new(id, name), &mut lines).await
        }
        Commands::LegacyCheck {
            id,
            name,
            gender,
            age,
            other_meds,
        } => {
            let name = name.unwrap_or_else(|| id.clone());
            let profile = LegacyProfile {
                gender,
                age,
                has_other_meds: other_meds,
            };
            run_legacy_check(api, config.lang, SubstanceRef::new(id, name), profile, &mut lines).await
        }
        Commands::Analyze { queries } => run_analyze(api, config.lang, &queries).await,
    }
}

async fn run_search(api: Arc<ApiClient>, config: &ClientConfig, query: &str) -> anyhow::Result<()> {
    let lang = config.lang;
    if query.trim().chars().count() < config.min_query_len {
        println!("{}", translate(lang, "search.placeholder"));
        return Ok(());
    }

    let mut widget = SearchWidget::new(api, config);
    let mut updates = widget.subscribe();
    widget.set_query(query);

    let snapshot = loop {
        updates.changed().await?;
        let snapshot = updates.borrow().clone();
        if !snapshot.loading && (snapshot.no_results || !snapshot.results.is_empty()) {
            break snapshot;
        }
    };

    if snapshot.no_results {
        println!("{}", translate_with(lang, "search.no_results", &[("query", query)]));
        return Ok(());
    }
    for (i, hit) in snapshot.results.iter().enumerate() {
        println!("{:>2}. {} [{}] {}", i + 1, hit.name, hit.id, hit.subtitle(lang));
    }
    Ok(())
}

async fn read_line(lines: &mut StdinLines) -> anyhow::Result<Option<String>> {
    Ok(lines.next_line().await?)
}

fn print_score(result: &AnalysisResult, molecule: &str, lang: Lang) {
    println!("\n{}", ScoreView::render(result, Some(molecule), lang));
}

async fn run_check(
    api: Arc<ApiClient>,
    lang: Lang,
    substance: SubstanceRef,
    lines: &mut StdinLines,
) -> anyhow::Result<()> {
    let mut wizard = Wizard::new();
    wizard.select_molecule(substance.clone());

    let molecule = substance.name.clone();
    println!("{}", translate_with(lang, "quiz.about", &[("molecule", molecule.as_str())]));
    println!("{}", translate(lang, "quiz.loading"));

    let mut session = QuestionnaireSession::new(api, substance, lang);
    let mut event = session.start().await?;

    loop {
        match event {
            SessionEvent::Complete(result) => {
                if session.interrupted_by().is_some() {
                    println!("\n{}", translate(lang, "quiz.interrupt.title"));
                    println!("{}", translate(lang, "quiz.interrupt.text"));
                }
                wizard.complete(result);
                if let WizardStep::Score { substance, result } = wizard.step() {
                    print_score(result, &substance.name, lang);
                }
                return Ok(());
            }
            SessionEvent::Ask(progress) => {
                let question = session
                    .current_question()
                    .cloned()
                    .context("questionnaire is asking without a current question")?;
                println!("\n{}", render_flow_question(&question, progress, lang));

                let Some(line) = read_line(lines).await? else {
                    return Ok(());
                };
                event = match parse_flow_input(&question, &line) {
                    None => SessionEvent::Ask(progress),
                    Some(Input::Back) => match session.back()? {
                        Back::Exit => {
                            wizard.back_to_search();
                            println!("{}", translate(lang, "search.title"));
                            return Ok(());
                        }
                        Back::Previous(previous) => SessionEvent::Ask(previous),
                    },
                    Some(Input::Answer(value)) => session.answer(value).await?,
                };
            }
        }
    }
}

async fn run_legacy_check(
    api: Arc<ApiClient>,
    lang: Lang,
    substance: SubstanceRef,
    profile: LegacyProfile,
    lines: &mut StdinLines,
) -> anyhow::Result<()> {
    let molecule = substance.name.clone();
    let mut session = LegacyQuizSession::new(api, substance, profile);
    let mut event = session.start().await?;

    loop {
        match event {
            LegacyEvent::Complete(result) => {
                print_score(&result, &molecule, lang);
                return Ok(());
            }
            LegacyEvent::NoQuestions => {
                println!(
                    "{}",
                    translate_with(lang, "quiz.legacy.no_questions.title", &[("molecule", molecule.as_str())])
                );
                println!("{}", translate(lang, "quiz.legacy.no_questions.text"));
                println!("[{}]", translate(lang, "quiz.legacy.acknowledge"));
                if read_line(lines).await?.is_none() {
                    return Ok(());
                }
                let result = session.acknowledge()?;
                print_score(&result, &molecule, lang);
                return Ok(());
            }
            LegacyEvent::Ask(progress) => {
                let text = session
                    .current_question()
                    .map(|q| q.text.clone())
                    .context("quiz is asking without a current question")?;
                println!(
                    "\n{}\n{}\n  [{}] / [{}]",
                    translate_with(
                        lang,
                        "quiz.progress",
                        &[
                            ("current", progress.position.to_string().as_str()),
                            ("total", progress.total.to_string().as_str()),
                        ],
                    ),
                    text,
                    translate(lang, "quiz.yes"),
                    translate(lang, "quiz.no")
                );

                let Some(line) = read_line(lines).await? else {
                    return Ok(());
                };
                event = match parse_yes_no(&line) {
                    Some(value) => session.answer(value).await?,
                    // Back always leaves the legacy quiz
                    None if line.trim().eq_ignore_ascii_case("b") && session.back() == Back::Exit => {
                        return Ok(())
                    }
                    None => LegacyEvent::Ask(progress),
                };
            }
        }
    }
}

async fn run_analyze(api: Arc<ApiClient>, lang: Lang, queries: &[String]) -> anyhow::Result<()> {
    let mut store = SelectionStore::new();
    store.subscribe(|drugs: &[Drug]| {
        tracing::debug!(count = drugs.len(), "Selection changed");
    });

    for query in queries {
        match api.search(query, lang).await {
            Ok(hits) => match hits.first() {
                Some(hit) => {
                    println!("+ {} ({})", hit.name, hit.subtitle(lang));
                    store.add(Drug::from(hit));
                }
                None => println!("{}", translate_with(lang, "search.no_results", &[("query", query.as_str())])),
            },
            Err(e) => tracing::warn!(query = %query, error = %e, "Search failed"),
        }
    }

    let analyzer = InteractionAnalyzer::new(api);
    let outcome = analyzer.analyze(store.read()).await;
    if let AnalysisOutcome::Report(report) = &outcome {
        tracing::debug!(pairs = report.technical_details.len(), "Report received");
    }
    println!("\n{}", outcome.render(lang));
    Ok(())
}
