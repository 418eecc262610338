//! `stackit` command: browse questions and render markdown without a UI.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use pagination::PageNumber;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use stackit_client::config::ClientSettings;
use stackit_client::domain::ports::{AnswerRepository, IdentityProvider, QuestionRepository};
use stackit_client::domain::{
    QuestionDetail, QuestionDetailService, QuestionId, QuestionListController, QuestionListView,
    QuestionSort, StaleResponsePolicy,
};
use stackit_client::outbound::identity::IdentityToolkitProvider;
use stackit_client::outbound::memory::{InMemoryIdentityProvider, InMemoryStore};
use stackit_client::outbound::postgrest::PostgrestStore;

/// `stackit` command arguments.
#[derive(Debug, Parser)]
#[command(name = "stackit", about = "Browse StackIt questions from the terminal", version)]
struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List one page of questions.
    Questions {
        /// 1-based page to show.
        #[arg(long, value_name = "N")]
        page: Option<u32>,
        /// Filter by title, description, or tag.
        #[arg(long, value_name = "Q")]
        search: Option<String>,
        /// `newest`, `unanswered`, or `most-voted`.
        #[arg(long, value_parser = parse_sort)]
        sort: Option<QuestionSort>,
    },
    /// Show a question with its answers.
    Question {
        /// Question id.
        id: i64,
    },
    /// Render markdown from stdin to HTML.
    Render,
}

fn parse_sort(raw: &str) -> Result<QuestionSort, String> {
    raw.parse().map_err(|err: stackit_client::domain::UnknownSort| err.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .wrap_err("read markdown from stdin")?;
            println!("{}", markdown_subset::render(&input));
            Ok(())
        }
        Command::Questions { page, search, sort } => {
            let settings = load_settings()?;
            let backends = Backends::from_settings(&settings)?;
            let view = list_questions(&settings, backends.questions, page, search, sort).await?;
            emit(cli.json, &view, print_list)
        }
        Command::Question { id } => {
            let settings = load_settings()?;
            let backends = Backends::from_settings(&settings)?;
            let service = QuestionDetailService::new(
                backends.questions,
                backends.answers,
                backends.identity,
                Arc::new(DefaultClock),
            );
            let detail = service
                .load(QuestionId::new(id))
                .await
                .map_err(|err| eyre!(err))?;
            emit(cli.json, &detail, print_detail)
        }
    }
}

fn load_settings() -> Result<ClientSettings> {
    ClientSettings::load_from_iter([OsString::from("stackit")])
        .map_err(|err| eyre!("load configuration: {err}"))
}

struct Backends {
    questions: Arc<dyn QuestionRepository>,
    answers: Arc<dyn AnswerRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl Backends {
    fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let timeout = settings.request_timeout();
        let questions: Arc<dyn QuestionRepository>;
        let answers: Arc<dyn AnswerRepository>;
        if let Some(url) = settings.data_url()? {
            info!(data_url = %url, "using hosted data store");
            let store = Arc::new(
                PostgrestStore::new(url, settings.data_api_key.clone(), timeout)
                    .wrap_err("build data store client")?,
            );
            questions = store.clone();
            answers = store;
        } else {
            info!("no data url configured; using sample content");
            let store = Arc::new(InMemoryStore::with_sample_content(Arc::new(DefaultClock)));
            questions = store.clone();
            answers = store;
        }

        let identity: Arc<dyn IdentityProvider> = match settings.identity_url()? {
            Some(url) => Arc::new(
                IdentityToolkitProvider::new(url, settings.identity_api_key.clone(), timeout)
                    .wrap_err("build identity client")?,
            ),
            None => Arc::new(InMemoryIdentityProvider::default()),
        };
        Ok(Self {
            questions,
            answers,
            identity,
        })
    }
}

async fn list_questions(
    settings: &ClientSettings,
    questions: Arc<dyn QuestionRepository>,
    page: Option<u32>,
    search: Option<String>,
    sort: Option<QuestionSort>,
) -> Result<QuestionListView> {
    let list_settings = settings.list_settings(StaleResponsePolicy::DiscardSuperseded)?;
    let list = QuestionListController::new(questions, list_settings);
    list.load().await.map_err(|err| eyre!(err))?;

    if let Some(sort) = sort {
        list.set_sort(sort);
        list.settled().await;
    }
    if let Some(search) = search {
        list.submit_search(search);
        list.settled().await;
    }
    if let Some(page) = page {
        let number = PageNumber::new(page).map_err(|err| eyre!(err))?;
        let last_page = list.view().total_pages.max(1);
        if number.get() > last_page {
            return Err(eyre!("page {page} is out of range; there are {last_page} pages"));
        }
        list.select_page(number);
        list.settled().await;
    }

    let view = list.view();
    match view.error.clone() {
        Some(err) => Err(eyre!(err)),
        None => Ok(view),
    }
}

fn emit<T: Serialize>(json: bool, value: &T, print: fn(&T)) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(value).wrap_err("serialise output")?
        );
    } else {
        print(value);
    }
    Ok(())
}

fn print_list(view: &QuestionListView) {
    if let Some(empty) = &view.empty_state {
        println!("{}", empty.message());
        if empty.offers_clear_search() {
            println!("Run without --search to clear the search.");
        }
        return;
    }
    for question in &view.items {
        println!(
            "[{}] {}  ({} votes, {} answers, {} views)",
            question.id, question.title, question.votes, question.answer_count, question.views
        );
        if !question.tags.is_empty() {
            println!("     tags: {}", question.tags.join(", "));
        }
    }
    let pages = view
        .visible_pages
        .iter()
        .map(|page| {
            if *page == view.current_page {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "page {} of {} ({} questions, sort: {})  {pages}",
        view.current_page, view.total_pages, view.total_items, view.sort
    );
}

fn print_detail(detail: &QuestionDetail) {
    let question = &detail.question;
    println!("{}", question.title);
    println!(
        "asked {} by {}  ({} votes, {} views)",
        detail.asked, question.author, question.votes, question.views
    );
    if !question.tags.is_empty() {
        println!("tags: {}", question.tags.join(", "));
    }
    println!();
    println!("{}", detail.description_html);
    println!();
    println!("{} answers", detail.answers.len());
    for view in &detail.answers {
        let accepted = if view.answer.is_accepted { " (accepted)" } else { "" };
        println!();
        println!(
            "{} votes{accepted}, answered {} by {}",
            view.answer.votes, view.answered, view.answer.author
        );
        println!("{}", view.content_html);
    }
}
