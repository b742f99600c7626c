//! End-to-end handler tests
//!
//! Drive the command handlers against the memory-backed environment and
//! assert on stored state and the notifications that actually reached the
//! mail collaborator.

use rfi_concierge::domain::{Category, DiscoveryDayChange, DomainError, RfiStatus};
use rfi_concierge::handlers::{
    CancelRegistrationCommand, CreateRfiCommand, CreateRfiHandler, EditRfiCommand, EditRfiHandler,
    PublishRfiHandler, RegistrationCommand, RegistrationHandler,
};
use rfi_concierge::notify::TemplateKind;
use rfi_concierge::store::DocumentStore;
use rfi_concierge::AppError;

use rfi_concierge::handlers::AttendeeParams;
use uuid::Uuid;

mod common;

use common::{context_for, discovery_day, sample_fields, TestEnv};

fn attendee(name: &str, email: &str, remote: bool) -> AttendeeParams {
    AttendeeParams {
        name: name.to_string(),
        email: email.to_string(),
        remote,
    }
}

async fn create_rfi(env: &TestEnv, command: CreateRfiCommand, acting_user: Uuid) -> Uuid {
    let handler = CreateRfiHandler::new(env.store.clone(), env.directory.clone());
    handler
        .execute(command, &context_for(acting_user))
        .await
        .expect("create failed")
        .rfi_id
}

fn edit_handler(env: &TestEnv) -> EditRfiHandler {
    EditRfiHandler::new(
        env.store.clone(),
        env.directory.clone(),
        env.dispatcher.clone(),
    )
}

fn registration_handler(env: &TestEnv) -> RegistrationHandler {
    RegistrationHandler::new(
        env.store.clone(),
        env.directory.clone(),
        env.dispatcher.clone(),
        env.ops_mailbox.clone(),
    )
}

#[tokio::test]
async fn test_venue_change_notifies_only_in_person_attendees() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let vendor = env.seed_vendor("owner@vendor.example", vec![Category::NetworkInfrastructure]);

    let mut fields = sample_fields(buyer, staff);
    fields.discovery_day = Some(discovery_day("2099-05-01", "09:00", "Room A", "link1"));
    let rfi_id = create_rfi(
        &env,
        CreateRfiCommand {
            fields: fields.clone(),
            addenda: Vec::new(),
        },
        buyer,
    )
    .await;

    let registrar = registration_handler(&env);
    registrar
        .register(
            RegistrationCommand {
                rfi_id,
                vendor_id: vendor,
                attendees: vec![
                    attendee("In Person", "in.person@vendor.example", false),
                    attendee("Remote", "remote@vendor.example", true),
                ],
            },
            &context_for(vendor),
        )
        .await
        .unwrap();
    drop(registrar);

    // New version changes only the venue.
    fields.discovery_day = Some(discovery_day("2099-05-01", "09:00", "Room B", "link1"));
    let editor = edit_handler(&env);
    let result = editor
        .execute(
            EditRfiCommand {
                rfi_id,
                fields,
                addenda: Vec::new(),
            },
            &context_for(buyer),
        )
        .await
        .unwrap();
    drop(editor);

    assert_eq!(result.discovery_day_change, DiscoveryDayChange::VenueChanged);
    assert_eq!(result.version_count, 2);

    let sent = env.drain().await;
    let session_notices: Vec<_> = sent
        .iter()
        .filter(|i| {
            i.template == TemplateKind::VendorSessionChanged
                || i.template == TemplateKind::AttendeeSessionChanged
        })
        .collect();

    assert_eq!(session_notices.len(), 2);
    assert!(session_notices
        .iter()
        .any(|i| i.to == "owner@vendor.example"));
    assert!(session_notices
        .iter()
        .any(|i| i.to == "in.person@vendor.example"));
    // The remote attendee is unaffected by a venue change.
    assert!(!session_notices
        .iter()
        .any(|i| i.to == "remote@vendor.example"));
}

#[tokio::test]
async fn test_publish_exactly_once() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();

    let rfi_id = create_rfi(
        &env,
        CreateRfiCommand {
            fields: sample_fields(buyer, staff),
            addenda: Vec::new(),
        },
        buyer,
    )
    .await;

    let publisher = PublishRfiHandler::new(
        env.store.clone(),
        env.directory.clone(),
        env.dispatcher.clone(),
    );
    publisher.execute(rfi_id, &context_for(buyer)).await.unwrap();

    let err = publisher
        .execute(rfi_id, &context_for(buyer))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::AlreadyPublished)
    ));

    let rfi = env.store.find_by_id(rfi_id).await.unwrap().unwrap();
    assert_eq!(rfi.versions().len(), 1);
    assert_eq!(rfi.status(chrono::Utc::now()), RfiStatus::Open);
}

#[tokio::test]
async fn test_publish_matches_each_vendor_once() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    // Interested in both RFI categories; must still get exactly one notice.
    env.seed_vendor(
        "both@vendor.example",
        vec![Category::CloudServices, Category::NetworkInfrastructure],
    );
    env.seed_vendor("other@vendor.example", vec![Category::CyberSecurity]);

    let mut fields = sample_fields(buyer, staff);
    fields.categories = vec![
        "network_infrastructure".to_string(),
        "cloud_services".to_string(),
    ];
    let rfi_id = create_rfi(
        &env,
        CreateRfiCommand {
            fields,
            addenda: Vec::new(),
        },
        buyer,
    )
    .await;

    let publisher = PublishRfiHandler::new(
        env.store.clone(),
        env.directory.clone(),
        env.dispatcher.clone(),
    );
    let result = publisher.execute(rfi_id, &context_for(buyer)).await.unwrap();
    drop(publisher);
    assert_eq!(result.matched_vendors, 1);

    let sent = env.drain().await;
    let matches: Vec<_> = sent
        .iter()
        .filter(|i| i.template == TemplateKind::RfiMatchesInterests)
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].to, "both@vendor.example");
    // Representative category follows the RFI's ordering, not the vendor's.
    assert_eq!(
        matches[0].payload["matched_category"],
        "network_infrastructure"
    );
}

#[tokio::test]
async fn test_registration_lifecycle() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let vendor = env.seed_vendor("owner@vendor.example", Vec::new());

    let mut fields = sample_fields(buyer, staff);
    fields.discovery_day = Some(discovery_day("2099-05-01", "09:00", "Room A", "link1"));
    let rfi_id = create_rfi(
        &env,
        CreateRfiCommand {
            fields,
            addenda: Vec::new(),
        },
        buyer,
    )
    .await;

    let registrar = registration_handler(&env);

    registrar
        .register(
            RegistrationCommand {
                rfi_id,
                vendor_id: vendor,
                attendees: vec![attendee("Pat", "pat@vendor.example", false)],
            },
            &context_for(vendor),
        )
        .await
        .unwrap();

    // A vendor registers at most once.
    let err = registrar
        .register(
            RegistrationCommand {
                rfi_id,
                vendor_id: vendor,
                attendees: vec![attendee("Pat", "pat@vendor.example", false)],
            },
            &context_for(vendor),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::DuplicateRegistration(_))
    ));

    let result = registrar
        .edit(
            RegistrationCommand {
                rfi_id,
                vendor_id: vendor,
                attendees: vec![
                    attendee("Pat", "pat@vendor.example", false),
                    attendee("Sam", "sam@vendor.example", true),
                ],
            },
            &context_for(vendor),
        )
        .await
        .unwrap();
    assert_eq!(result.attendee_count, 2);

    registrar
        .cancel(
            CancelRegistrationCommand {
                rfi_id,
                vendor_id: vendor,
            },
            &context_for(vendor),
        )
        .await
        .unwrap();
    drop(registrar);

    let rfi = env.store.find_by_id(rfi_id).await.unwrap().unwrap();
    assert!(rfi.registrations().is_empty());

    let sent = env.drain().await;
    // Each lifecycle step copies the operations mailbox.
    let ops: Vec<_> = sent.iter().filter(|i| i.to == "ops@example.gov").collect();
    assert_eq!(ops.len(), 3);
    assert_eq!(ops[0].template, TemplateKind::RegistrationReceivedOps);
    assert_eq!(ops[1].template, TemplateKind::RegistrationUpdatedOps);
    assert_eq!(ops[2].template, TemplateKind::RegistrationCancelledOps);
}

#[tokio::test]
async fn test_registration_requires_open_session() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let vendor = env.seed_vendor("owner@vendor.example", Vec::new());

    // No discovery day at all.
    let no_session = create_rfi(
        &env,
        CreateRfiCommand {
            fields: sample_fields(buyer, staff),
            addenda: Vec::new(),
        },
        buyer,
    )
    .await;

    // Session already occurred.
    let mut past_fields = sample_fields(buyer, staff);
    past_fields.discovery_day = Some(discovery_day("2001-05-01", "09:00", "Room A", ""));
    let past_session = create_rfi(
        &env,
        CreateRfiCommand {
            fields: past_fields,
            addenda: Vec::new(),
        },
        buyer,
    )
    .await;

    let registrar = registration_handler(&env);
    let attendees = vec![attendee("Pat", "pat@vendor.example", false)];

    let err = registrar
        .register(
            RegistrationCommand {
                rfi_id: no_session,
                vendor_id: vendor,
                attendees: attendees.clone(),
            },
            &context_for(vendor),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::NoDiscoveryDay)));

    let err = registrar
        .register(
            RegistrationCommand {
                rfi_id: past_session,
                vendor_id: vendor,
                attendees,
            },
            &context_for(vendor),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::RegistrationClosed { .. })
    ));
}

#[tokio::test]
async fn test_registration_is_owner_only() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let vendor = env.seed_vendor("owner@vendor.example", Vec::new());
    let other_vendor = env.seed_vendor("other@vendor.example", Vec::new());

    let mut fields = sample_fields(buyer, staff);
    fields.discovery_day = Some(discovery_day("2099-05-01", "09:00", "Room A", "link1"));
    let rfi_id = create_rfi(
        &env,
        CreateRfiCommand {
            fields,
            addenda: Vec::new(),
        },
        buyer,
    )
    .await;

    let registrar = registration_handler(&env);

    // Acting as another vendor.
    let err = registrar
        .register(
            RegistrationCommand {
                rfi_id,
                vendor_id: vendor,
                attendees: vec![attendee("Pat", "pat@vendor.example", false)],
            },
            &context_for(other_vendor),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // Buyers cannot hold registrations.
    let err = registrar
        .register(
            RegistrationCommand {
                rfi_id,
                vendor_id: buyer,
                attendees: vec![attendee("Pat", "pat@vendor.example", false)],
            },
            &context_for(buyer),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_removed_session_clears_registrations_and_notifies_everyone() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let vendor = env.seed_vendor("owner@vendor.example", Vec::new());

    let mut fields = sample_fields(buyer, staff);
    fields.discovery_day = Some(discovery_day("2099-05-01", "09:00", "Room A", "link1"));
    let rfi_id = create_rfi(
        &env,
        CreateRfiCommand {
            fields: fields.clone(),
            addenda: Vec::new(),
        },
        buyer,
    )
    .await;

    let registrar = registration_handler(&env);
    registrar
        .register(
            RegistrationCommand {
                rfi_id,
                vendor_id: vendor,
                attendees: vec![
                    attendee("In Person", "in.person@vendor.example", false),
                    attendee("Remote", "remote@vendor.example", true),
                ],
            },
            &context_for(vendor),
        )
        .await
        .unwrap();
    drop(registrar);

    fields.discovery_day = None;
    let editor = edit_handler(&env);
    let result = editor
        .execute(
            EditRfiCommand {
                rfi_id,
                fields,
                addenda: Vec::new(),
            },
            &context_for(buyer),
        )
        .await
        .unwrap();
    drop(editor);

    assert_eq!(result.discovery_day_change, DiscoveryDayChange::Removed);

    let rfi = env.store.find_by_id(rfi_id).await.unwrap().unwrap();
    assert!(rfi.registrations().is_empty());

    let sent = env.drain().await;
    let cancelled: Vec<_> = sent
        .iter()
        .filter(|i| i.template == TemplateKind::SessionCancelled)
        .map(|i| i.to.as_str())
        .collect();
    assert_eq!(cancelled.len(), 3);
    assert!(cancelled.contains(&"owner@vendor.example"));
    assert!(cancelled.contains(&"in.person@vendor.example"));
    assert!(cancelled.contains(&"remote@vendor.example"));
}

#[tokio::test]
async fn test_addenda_reconcile_across_edits() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let fields = sample_fields(buyer, staff);

    let rfi_id = create_rfi(
        &env,
        CreateRfiCommand {
            fields: fields.clone(),
            addenda: vec!["First clarification".to_string()],
        },
        buyer,
    )
    .await;

    let first_created_at = {
        let rfi = env.store.find_by_id(rfi_id).await.unwrap().unwrap();
        let addenda = &rfi.current_version().addenda;
        assert_eq!(addenda.len(), 1);
        addenda[0].created_at
    };

    let editor = edit_handler(&env);
    editor
        .execute(
            EditRfiCommand {
                rfi_id,
                fields: fields.clone(),
                addenda: vec![
                    "First clarification".to_string(),
                    "Second clarification".to_string(),
                ],
            },
            &context_for(buyer),
        )
        .await
        .unwrap();

    {
        let rfi = env.store.find_by_id(rfi_id).await.unwrap().unwrap();
        let addenda = &rfi.current_version().addenda;
        assert_eq!(addenda.len(), 2);
        // Position 0 was untouched and keeps its original timestamps.
        assert_eq!(addenda[0].created_at, first_created_at);
        assert_eq!(addenda[0].updated_at, first_created_at);
    }

    // Removal by sentinel at position 0.
    editor
        .execute(
            EditRfiCommand {
                rfi_id,
                fields,
                addenda: vec![
                    rfi_concierge::domain::DELETION_SENTINEL.to_string(),
                    "Second clarification".to_string(),
                ],
            },
            &context_for(buyer),
        )
        .await
        .unwrap();

    let rfi = env.store.find_by_id(rfi_id).await.unwrap().unwrap();
    let addenda = &rfi.current_version().addenda;
    assert_eq!(addenda.len(), 1);
    assert_eq!(addenda[0].description, "Second clarification");
}

#[tokio::test]
async fn test_mutations_require_an_acting_user() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();

    let handler = CreateRfiHandler::new(env.store.clone(), env.directory.clone());
    let err = handler
        .execute(
            CreateRfiCommand {
                fields: sample_fields(buyer, staff),
                addenda: Vec::new(),
            },
            &rfi_concierge::OperationContext::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingHeader(_)));
}
