//! Service orchestration tests for the scheduling engine.

use super::support::{SteppingClock, date, timestamp};
use crate::reminder::{
    adapters::memory::InMemorySheetStore,
    domain::{Amount, Task, TaskChanges, TaskId, TaskKind, TaskTitle},
    ports::{
        rows::{self, COL_AMOUNT, COL_NOTE},
        store::{SheetRow, TaskRowStore, TaskRowStoreError, TaskRowStoreResult},
    },
    services::{CreateTaskRequest, TaskScheduleError, TaskScheduleService, UpdateTaskRequest},
};
use async_trait::async_trait;
use eyre::ensure;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

type TestService = TaskScheduleService<InMemorySheetStore, SteppingClock>;

/// Store double that can be switched offline to simulate transport failure.
struct FlakyStore {
    inner: InMemorySheetStore,
    offline: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: InMemorySheetStore::new(),
            offline: AtomicBool::new(false),
        }
    }

    fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> TaskRowStoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TaskRowStoreError::unavailable(std::io::Error::other(
                "sheet endpoint offline",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRowStore for FlakyStore {
    async fn list_rows(&self) -> TaskRowStoreResult<Vec<SheetRow>> {
        self.check()?;
        self.inner.list_rows().await
    }

    async fn append_row(&self, task: &Task) -> TaskRowStoreResult<TaskId> {
        self.check()?;
        self.inner.append_row(task).await
    }

    async fn update_row(&self, id: TaskId, changes: &TaskChanges) -> TaskRowStoreResult<()> {
        self.check()?;
        self.inner.update_row(id, changes).await
    }

    async fn delete_row(&self, id: TaskId) -> TaskRowStoreResult<()> {
        self.check()?;
        self.inner.delete_row(id).await
    }
}

#[fixture]
fn harness() -> (TestService, Arc<InMemorySheetStore>) {
    let store = Arc::new(InMemorySheetStore::new());
    let service = TaskScheduleService::new(
        Arc::clone(&store),
        Arc::new(SteppingClock::starting_at(timestamp(2025, 2, 1))),
    );
    (service, store)
}

fn rent_request() -> CreateTaskRequest {
    CreateTaskRequest::new("จ่ายค่าเช่าร้าน", TaskKind::Expense, 15000.0, date(2025, 2, 15))
        .with_note("ค่าเช่าประจำเดือน")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_then_list_contains_exactly_the_created_task(
    harness: (TestService, Arc<InMemorySheetStore>),
) {
    let (service, store) = harness;
    let created = service.create(rent_request()).await.expect("create task");

    let listed = service.list().await;
    assert_eq!(listed, vec![created.clone()]);
    assert!(!created.id().to_string().is_empty());

    let sheet = store.list_rows().await.expect("store readable");
    assert_eq!(sheet.len(), 2);
}

#[rstest]
#[case(CreateTaskRequest::new("   ", TaskKind::Expense, 15000.0, date(2025, 2, 15)))]
#[case(CreateTaskRequest::new("จ่ายค่าเช่าร้าน", TaskKind::Expense, 0.0, date(2025, 2, 15)))]
#[case(CreateTaskRequest::new("จ่ายค่าเช่าร้าน", TaskKind::Expense, -15000.0, date(2025, 2, 15)))]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_invalid_input_without_side_effects(
    harness: (TestService, Arc<InMemorySheetStore>),
    #[case] request: CreateTaskRequest,
) {
    let (service, store) = harness;
    let result = service.create(request).await;

    assert!(matches!(result, Err(TaskScheduleError::Validation(_))));
    assert!(service.list().await.is_empty());
    let sheet = store.list_rows().await.expect("store readable");
    assert_eq!(sheet.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn toggle_complete_is_an_involution(harness: (TestService, Arc<InMemorySheetStore>)) {
    let (service, _store) = harness;
    let created = service.create(rent_request()).await.expect("create task");

    let done = service
        .toggle_complete(created.id())
        .await
        .expect("first toggle");
    assert!(done.completed());
    assert!(done.updated_at() > created.updated_at());

    let reopened = service
        .toggle_complete(created.id())
        .await
        .expect("second toggle");
    assert!(!reopened.completed());
    assert!(reopened.updated_at() > done.updated_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn toggle_writes_the_localised_label(harness: (TestService, Arc<InMemorySheetStore>)) {
    let (service, store) = harness;
    let created = service.create(rent_request()).await.expect("create task");

    service
        .toggle_complete(created.id())
        .await
        .expect("toggle");

    let sheet = store.list_rows().await.expect("store readable");
    let row = sheet.get(1).expect("task row present");
    assert_eq!(
        row.get(rows::COL_COMPLETED).map(String::as_str),
        Some(rows::DONE_LABEL)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_orders_incomplete_before_completed_then_by_due_date(
    harness: (TestService, Arc<InMemorySheetStore>),
) -> eyre::Result<()> {
    let (service, _store) = harness;
    let march = service
        .create(CreateTaskRequest::new(
            "ค่าน้ำ",
            TaskKind::Expense,
            300.0,
            date(2025, 3, 1),
        ))
        .await?;
    let early = service
        .create(CreateTaskRequest::new(
            "ค่าไฟ",
            TaskKind::Expense,
            1200.0,
            date(2025, 2, 5),
        ))
        .await?;
    let tied_first = service
        .create(CreateTaskRequest::new(
            "รับเงินจากลูกค้า A",
            TaskKind::Income,
            5000.0,
            date(2025, 2, 20),
        ))
        .await?;
    let tied_second = service
        .create(CreateTaskRequest::new(
            "รับเงินจากลูกค้า B",
            TaskKind::Income,
            7000.0,
            date(2025, 2, 20),
        ))
        .await?;

    service.toggle_complete(early.id()).await?;

    let ordered: Vec<TaskId> = service.list().await.iter().map(Task::id).collect();
    ensure!(
        ordered == vec![tied_first.id(), tied_second.id(), march.id(), early.id()],
        "unexpected presentation order: {ordered:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_only_named_fields(harness: (TestService, Arc<InMemorySheetStore>)) {
    let (service, store) = harness;
    let created = service.create(rent_request()).await.expect("create task");

    let updated = service
        .update(
            created.id(),
            UpdateTaskRequest::new().with_amount(16000.0).with_note(""),
        )
        .await
        .expect("update task");

    assert_eq!(updated.title().as_str(), "จ่ายค่าเช่าร้าน");
    assert_eq!(updated.amount().value(), 16000.0);
    assert_eq!(updated.note(), None);
    assert!(updated.updated_at() > created.updated_at());

    let sheet = store.list_rows().await.expect("store readable");
    let row = sheet.get(1).expect("task row present");
    assert_eq!(row.get(COL_AMOUNT).map(String::as_str), Some("16000"));
    assert_eq!(row.get(COL_NOTE).map(String::as_str), Some(""));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_invalid_fields_before_any_store_traffic(
    harness: (TestService, Arc<InMemorySheetStore>),
) {
    let (service, store) = harness;
    let created = service.create(rent_request()).await.expect("create task");
    let before = store.list_rows().await.expect("store readable");

    let result = service
        .update(created.id(), UpdateTaskRequest::new().with_amount(0.0))
        .await;

    assert!(matches!(result, Err(TaskScheduleError::Validation(_))));
    let after = store.list_rows().await.expect("store readable");
    assert_eq!(before, after);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operations_on_unknown_id_fail_with_not_found(
    harness: (TestService, Arc<InMemorySheetStore>),
) {
    let (service, store) = harness;
    let ghost = TaskId::new();

    let toggled = service.toggle_complete(ghost).await;
    assert!(matches!(toggled, Err(TaskScheduleError::NotFound(id)) if id == ghost));

    let updated = service.update(ghost, UpdateTaskRequest::new()).await;
    assert!(matches!(updated, Err(TaskScheduleError::NotFound(_))));

    let deleted = service.delete(ghost).await;
    assert!(matches!(deleted, Err(TaskScheduleError::NotFound(_))));

    let sheet = store.list_rows().await.expect("store readable");
    assert_eq!(sheet.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_locally_and_remotely(
    harness: (TestService, Arc<InMemorySheetStore>),
) {
    let (service, store) = harness;
    let created = service.create(rent_request()).await.expect("create task");

    service.delete(created.id()).await.expect("delete task");

    assert!(service.list().await.is_empty());
    let sheet = store.list_rows().await.expect("store readable");
    assert_eq!(sheet.len(), 1);

    let again = service.delete(created.id()).await;
    assert!(matches!(again, Err(TaskScheduleError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_hydrates_tasks_from_seeded_rows() {
    let clock = SteppingClock::starting_at(timestamp(2025, 1, 10));
    let seeded = [
        Task::new(
            TaskTitle::new("จ่ายค่าเช่าร้าน").expect("valid title"),
            TaskKind::Expense,
            Amount::new(15000.0).expect("valid amount"),
            date(2025, 2, 15),
            None,
            &clock,
        ),
        Task::new(
            TaskTitle::new("รับเงินจากลูกค้า A").expect("valid title"),
            TaskKind::Income,
            Amount::new(5000.0).expect("valid amount"),
            date(2025, 2, 20),
            Some("ชำระค่าสินค้าล่วงหน้า".to_owned()),
            &clock,
        ),
    ];
    let store = Arc::new(InMemorySheetStore::with_rows(
        seeded.iter().map(rows::encode),
    ));
    let service = TaskScheduleService::new(
        Arc::clone(&store),
        Arc::new(SteppingClock::starting_at(timestamp(2025, 2, 1))),
    );

    let count = service.refresh().await.expect("hydration succeeds");
    assert_eq!(count, 2);
    assert_eq!(service.list().await, seeded.to_vec());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_rejects_malformed_rows() {
    let store = Arc::new(InMemorySheetStore::with_rows([vec!["junk".to_owned()]]));
    let service = TaskScheduleService::new(
        store,
        Arc::new(SteppingClock::starting_at(timestamp(2025, 2, 1))),
    );

    let result = service.refresh().await;
    assert!(matches!(result, Err(TaskScheduleError::Codec(_))));
    assert!(service.list().await.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_failure_leaves_local_state_untouched() {
    let store = Arc::new(FlakyStore::new());
    let service = TaskScheduleService::new(
        Arc::clone(&store),
        Arc::new(SteppingClock::starting_at(timestamp(2025, 2, 1))),
    );
    let created = service.create(rent_request()).await.expect("create task");

    store.set_offline(true);

    let toggled = service.toggle_complete(created.id()).await;
    assert!(matches!(toggled, Err(TaskScheduleError::Store(_))));

    let blocked_create = service
        .create(CreateTaskRequest::new(
            "ค่าน้ำ",
            TaskKind::Expense,
            300.0,
            date(2025, 3, 1),
        ))
        .await;
    assert!(matches!(blocked_create, Err(TaskScheduleError::Store(_))));

    let listed = service.list().await;
    assert_eq!(listed, vec![created.clone()]);

    store.set_offline(false);
    let done = service
        .toggle_complete(created.id())
        .await
        .expect("retry succeeds once the store is back");
    assert!(done.completed());
}
