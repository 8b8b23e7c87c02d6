//! End-to-end checks over the User/email worked example: generate the
//! bundle, wire a dispatcher, and drive an update through the same
//! publish sequence the generated service wrappers compile to.

use eventify::prelude::*;
use std::sync::{Arc, Mutex};

fn schema() -> Schema {
    Schema::new(vec![ModelDescriptor::new(
        "User".into(),
        vec![
            FieldDescriptor::new("id".into(), "Int".into()),
            FieldDescriptor::new("email".into(), "String".into()),
        ],
    )])
}

fn config(out_dir: &std::path::Path) -> Config {
    Config {
        exclude_models: vec![],
        exclude_fields: vec!["id".into()],
        out_dir: out_dir.to_path_buf(),
    }
}

#[test]
fn version_tracks_the_workspace_release() {
    assert_eq!(eventify::VERSION, env!("CARGO_PKG_VERSION"));
    assert_eq!(eventify::VERSION.split('.').count(), 3);
}

#[test]
fn generates_the_service_and_event_bundle() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());

    eventify::generate(&schema(), &config).unwrap();

    let events = std::fs::read_to_string(dir.path().join("events.rs")).unwrap();
    let flat: String = events.chars().filter(|c| !c.is_whitespace()).collect();
    assert!(flat.contains(r#"model_level("User",Hook::Before,Method::FindMany"#));
    assert!(flat.contains(r#"field_level("User","email",Hook::After,Method::Update"#));
    // excluded field contributes no declarations
    assert!(!events.contains(r#""id""#));

    let service = std::fs::read_to_string(dir.path().join("user_service.rs")).unwrap();
    assert!(service.contains("pub struct UserService"));
    assert!(service.contains(r#""UserBeforeUpdate""#));
    assert!(service.contains("pub fn set_email"));
    assert!(!service.contains("pub fn set_id"));
}

#[test]
fn invalid_schemas_never_reach_generation() {
    let dir = tempfile::tempdir().unwrap();
    let bad = Schema::new(vec![ModelDescriptor::new(
        "User".into(),
        vec![FieldDescriptor::new("before".into(), "String".into())],
    )]);

    assert!(eventify::generate(&bad, &config(dir.path())).is_err());
    assert!(!dir.path().join("events.rs").exists());
}

#[test]
fn catalog_matches_the_worked_example() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = eventify::dispatcher(&schema(), &config(dir.path())).unwrap();
    let catalog = dispatcher.catalog();

    // 10 model-level events plus email's 6; excluded id contributes none
    assert_eq!(catalog.len(), 16);
    for key in [
        "UserBeforeFindMany",
        "UserAfterDelete",
        "UserEmailBeforeCreate",
        "UserEmailAfterUpdate",
        "UserEmailBeforeDelete",
    ] {
        assert!(catalog.contains(key), "{key}");
    }
    assert!(!catalog.contains("UserIdBeforeCreate"));
}

#[test]
fn update_publishes_in_the_contract_order() {
    let dir = tempfile::tempdir().unwrap();
    let bus = Arc::new(MemoryBus::new());
    let dispatcher =
        eventify::dispatcher_on(&schema(), &config(dir.path()), bus.clone()).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    for topic in [
        "user.before.update",
        "user.after.update",
        "user.email.before.update",
        "user.email.after.update",
    ] {
        let sink = seen.clone();
        bus.subscribe(
            topic,
            Arc::new(move |p: &EventPayload| sink.lock().unwrap().push(p.topic.clone())),
        );
    }

    // the flow a generated `update` wrapper compiles to
    let client: Arc<dyn DataClient> = Arc::new(MemoryClient::new());
    client
        .create("User", &json!({"data": {"email": "old"}}))
        .unwrap();

    let args = json!({"where": {"id": 1}, "data": {"email": "x"}});
    assert!(dispatcher.publish_event(
        "UserBeforeUpdate",
        EventMeta::before(args.clone(), Value::Null, client.clone()),
    ));
    let result = client.update("User", &args).unwrap();
    assert!(dispatcher.publish_event(
        "UserAfterUpdate",
        EventMeta::after(args, Value::Null, client.clone(), result.clone()),
    ));

    assert_eq!(result["email"], json!("x"));
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [
            "user.email.before.update",
            "user.before.update",
            "user.email.after.update",
            "user.after.update",
        ]
    );
}

#[test]
fn unknown_events_are_silently_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = eventify::dispatcher(&schema(), &config(dir.path())).unwrap();

    let client: Arc<dyn DataClient> = Arc::new(MemoryClient::new());
    assert!(!dispatcher.publish_event(
        "noSuchEvent",
        EventMeta::before(json!({}), Value::Null, client),
    ));
}

#[test]
fn hand_maintained_config_subscribes_through_the_dispatcher() {
    let schema = schema();
    let policy = Config::default();
    let filter = PolicyFilter::new(&policy);
    let catalog = CatalogBuilder::new(&schema, &filter).build();

    let created = Arc::new(Mutex::new(0u32));
    let mut table = ConfigTable::seeded(&catalog);
    let sink = created.clone();
    table.set_after("UserAfterCreate", move |_| *sink.lock().unwrap() += 1);

    let bus = Arc::new(MemoryBus::new());
    let dispatcher = Dispatcher::new(catalog, &table, schema, filter, bus).unwrap();

    let client: Arc<dyn DataClient> = Arc::new(MemoryClient::new());
    dispatcher.publish_event(
        "UserAfterCreate",
        EventMeta::after(json!({}), Value::Null, client, json!({"id": 1})),
    );

    assert_eq!(*created.lock().unwrap(), 1);
}
