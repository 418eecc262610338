//! Behavioural tests for the paginated, searchable question list.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use pagination::{PageNumber, PageSize};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use stackit_client::domain::{
    EmptyState, ListSettings, Question, QuestionId, QuestionListController, QuestionListView,
    QuestionSort, StaleResponsePolicy,
};
use stackit_client::outbound::memory::InMemoryStore;
use tokio::runtime::Runtime;

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Default, ScenarioState)]
struct ListWorld {
    runtime: Slot<RuntimeHandle>,
    list: Slot<Arc<QuestionListController>>,
    highest_votes: Slot<i64>,
}

impl ListWorld {
    fn runtime(&self) -> Arc<Runtime> {
        self.runtime.get().expect("runtime should be set").0
    }

    fn list(&self) -> Arc<QuestionListController> {
        self.list.get().expect("list should be created")
    }

    fn view(&self) -> QuestionListView {
        self.list().view()
    }
}

#[fixture]
fn world() -> ListWorld {
    let world = ListWorld::default();
    let runtime = Runtime::new().expect("tokio runtime should initialise");
    world.runtime.set(RuntimeHandle(Arc::new(runtime)));
    world
}

fn stored_question(id: i64, title: String) -> Question {
    let created = Utc
        .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        + chrono::Duration::minutes(id);
    Question {
        id: QuestionId::new(id),
        title,
        description: "Details follow.".to_owned(),
        tags: vec!["rust".to_owned()],
        votes: id,
        views: 0,
        author: "Ada".to_owned(),
        created_at: created,
        updated_at: created,
        answer_count: 0,
    }
}

#[given("a store holding {total:i64} questions, {matching:i64} of them about borrowing")]
fn a_store_holding_questions(world: &ListWorld, total: i64, matching: i64) {
    let store = Arc::new(InMemoryStore::default());
    for id in 1..=total {
        let title = if id <= matching {
            format!("How do I borrow value {id}?")
        } else {
            format!("Lifetime puzzle {id}")
        };
        store.seed_question(stored_question(id, title));
    }
    world.highest_votes.set(total);
    let settings = ListSettings {
        page_size: PageSize::new(5).expect("page size"),
        debounce: Duration::from_millis(20),
        stale_responses: StaleResponsePolicy::ApplyAll,
    };
    world
        .list
        .set(Arc::new(QuestionListController::new(store, settings)));
}

#[given("the list has loaded")]
fn the_list_has_loaded(world: &ListWorld) {
    let list = world.list();
    world
        .runtime()
        .block_on(async move { list.load().await })
        .expect("initial load should succeed");
}

#[given("the reader is on page {page:u32}")]
fn the_reader_is_on_page(world: &ListWorld, page: u32) {
    let list = world.list();
    world.runtime().block_on(async move {
        assert!(list.select_page(PageNumber::new(page).expect("page")));
        list.settled().await;
    });
    assert_eq!(world.view().current_page, page);
}

#[when("the reader types {text} into the search box")]
fn the_reader_types_into_the_search_box(world: &ListWorld, text: String) {
    let list = world.list();
    world.runtime().block_on(async move {
        for end in 1..=text.len() {
            list.on_search_input(&text[..end]);
        }
    });
}

#[when("the reader clears the search")]
fn the_reader_clears_the_search(world: &ListWorld) {
    let list = world.list();
    world.runtime().block_on(async move { list.clear_search() });
}

#[when("the reader sorts by {sort}")]
fn the_reader_sorts_by(world: &ListWorld, sort: String) {
    let sort: QuestionSort = sort.parse().expect("known sort");
    let list = world.list();
    world.runtime().block_on(async move {
        assert!(list.set_sort(sort));
    });
}

#[when("the list settles")]
fn the_list_settles(world: &ListWorld) {
    let list = world.list();
    world.runtime().block_on(async move { list.settled().await });
}

#[then("{count:usize} questions are shown on page {page:u32}")]
fn questions_are_shown_on_page(world: &ListWorld, count: usize, page: u32) {
    let view = world.view();
    assert!(view.error.is_none(), "unexpected error: {:?}", view.error);
    assert_eq!(view.items.len(), count);
    assert_eq!(view.current_page, page);
}

#[then("the pager offers pages {first:u32} to {last:u32}")]
fn the_pager_offers_pages(world: &ListWorld, first: u32, last: u32) {
    let expected: Vec<u32> = (first..=last).collect();
    assert_eq!(world.view().visible_pages, expected);
}

#[then("the list offers to clear the search")]
fn the_list_offers_to_clear_the_search(world: &ListWorld) {
    let empty = world.view().empty_state.expect("empty state");
    assert!(empty.offers_clear_search());
}

#[then("the list invites the first question")]
fn the_list_invites_the_first_question(world: &ListWorld) {
    assert_eq!(world.view().empty_state, Some(EmptyState::NoQuestions));
}

#[then("the list says there is nothing past page {last_page:u32}")]
fn the_list_says_there_is_nothing_past_page(world: &ListWorld, last_page: u32) {
    assert_eq!(
        world.view().empty_state,
        Some(EmptyState::PastLastPage { last_page })
    );
}

#[then("the first question has the most votes")]
fn the_first_question_has_the_most_votes(world: &ListWorld) {
    let view = world.view();
    let highest = world.highest_votes.get().expect("seeded");
    assert_eq!(view.items.first().map(|question| question.votes), Some(highest));
    assert!(
        view.items
            .windows(2)
            .all(|pair| pair[0].votes >= pair[1].votes)
    );
}

#[scenario(
    path = "tests/features/question_list.feature",
    name = "Searching returns to the first page of matches"
)]
fn searching_returns_to_the_first_page_of_matches(world: ListWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/question_list.feature",
    name = "A fruitless search can be cleared"
)]
fn a_fruitless_search_can_be_cleared(world: ListWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/question_list.feature",
    name = "An empty store still shows the first page"
)]
fn an_empty_store_still_shows_the_first_page(world: ListWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/question_list.feature",
    name = "Changing the sort returns to the first page"
)]
fn changing_the_sort_returns_to_the_first_page(world: ListWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/question_list.feature",
    name = "A page past the end names the last page"
)]
fn a_page_past_the_end_names_the_last_page(world: ListWorld) {
    let _ = world;
}
