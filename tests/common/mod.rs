//! Common test utilities
//!
//! Memory-backed environment wiring the handlers to in-process
//! collaborators: a `MemoryStore`, a `MemoryDirectory`, and a
//! `RecordingMailer` behind a real dispatcher worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use rfi_concierge::directory::MemoryDirectory;
use rfi_concierge::domain::{Category, OperationContext, UserKind, UserProfile};
use rfi_concierge::handlers::{DiscoveryDayParams, RfiFields};
use rfi_concierge::notify::{Dispatcher, NotificationIntent, RecordingMailer};
use rfi_concierge::store::MemoryStore;

pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub directory: Arc<MemoryDirectory>,
    pub dispatcher: Dispatcher,
    pub ops_mailbox: String,
    mailer: Arc<RecordingMailer>,
    worker: JoinHandle<()>,
}

impl TestEnv {
    pub fn new() -> Self {
        let mailer = Arc::new(RecordingMailer::new());
        let (dispatcher, worker) = Dispatcher::spawn(mailer.clone(), Duration::from_secs(1));

        Self {
            store: Arc::new(MemoryStore::new()),
            directory: Arc::new(MemoryDirectory::new()),
            dispatcher,
            ops_mailbox: "ops@example.gov".to_string(),
            mailer,
            worker,
        }
    }

    /// Shut the dispatcher down and return every delivered notification.
    ///
    /// The worker exits only once all `Dispatcher` clones are gone, so
    /// handlers holding one must be dropped before calling this.
    pub async fn drain(self) -> Vec<NotificationIntent> {
        drop(self.dispatcher);
        self.worker.await.expect("notification worker panicked");
        self.mailer.sent()
    }

    pub fn seed_user(
        &self,
        kind: UserKind,
        name: &str,
        email: &str,
        interest_categories: Vec<Category>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.directory.add(UserProfile {
            id,
            name: name.to_string(),
            email: email.to_string(),
            kind,
            interest_categories,
        });
        id
    }

    pub fn seed_buyer(&self) -> Uuid {
        self.seed_user(UserKind::Buyer, "Buyer", "buyer@gov.example", Vec::new())
    }

    pub fn seed_staff(&self) -> Uuid {
        self.seed_user(
            UserKind::ProgramStaff,
            "Staff",
            "staff@gov.example",
            Vec::new(),
        )
    }

    pub fn seed_vendor(&self, email: &str, interest_categories: Vec<Category>) -> Uuid {
        self.seed_user(UserKind::Vendor, "Vendor Co", email, interest_categories)
    }
}

pub fn context_for(user: Uuid) -> OperationContext {
    OperationContext::new()
        .with_acting_user(user)
        .with_correlation_id(Uuid::new_v4())
}

/// Valid RFI fields with a far-future closing and no discovery day.
pub fn sample_fields(buyer: Uuid, staff: Uuid) -> RfiFields {
    RfiFields {
        rfi_number: "RFI-2099-001".to_string(),
        title: "Network modernization".to_string(),
        entity: "Ministry of Infrastructure".to_string(),
        description: "Seeking vendor input on network modernization".to_string(),
        categories: vec!["network_infrastructure".to_string()],
        closing_date: "2099-06-01".to_string(),
        closing_time: "17:00".to_string(),
        grace_period_days: 2,
        discovery_day: None,
        attachments: Vec::new(),
        buyer_contact: buyer,
        program_staff_contact: staff,
    }
}

pub fn discovery_day(date: &str, time: &str, venue: &str, remote_access: &str) -> DiscoveryDayParams {
    DiscoveryDayParams {
        date: date.to_string(),
        time: time.to_string(),
        venue: venue.to_string(),
        remote_access: remote_access.to_string(),
    }
}
