use crux_core::testing::AppTester;

use crafty_spinx_shared::capabilities::{GatewayError, GatewayOutput, ItemRow, StorageOutput};
use crafty_spinx_shared::model::{Category, ItemDraft, ItemId, Price};
use crafty_spinx_shared::{App, ConnectionMode, Effect, Event, Model};

/// Pulls the first request of the given effect variant out of an update.
macro_rules! take_request {
    ($update:expr, $variant:path) => {
        $update
            .effects
            .into_iter()
            .find_map(|effect| match effect {
                $variant(request) => Some(request),
                _ => None,
            })
            .expect("expected a matching effect")
    };
}

fn row(id: i64, name: &str) -> ItemRow {
    ItemRow {
        id,
        name: name.into(),
        description: "handmade".into(),
        price_cents: 1_200,
        images: vec![format!("/images/{id}.jpg")],
        image_url: None,
        category: Category::Crochet,
        model_url: None,
    }
}

fn draft(name: &str) -> Box<ItemDraft> {
    Box::new(
        ItemDraft::new(
            name,
            "freshly stitched",
            Price::from_cents(2_500),
            vec!["/images/new.jpg".into()],
            Category::Crochet,
        )
        .unwrap(),
    )
}

fn feed(app: &AppTester<App, Effect>, events: Vec<Event>, model: &mut Model) {
    for event in events {
        app.update(event, model);
    }
}

#[test]
fn transient_load_failure_seeds_the_fallback_catalog() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::StartupRequested, &mut model);
    assert!(model.is_loading);

    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(&mut request, Err(GatewayError::new("57014", "statement timeout")))
        .expect("resolve");
    feed(&app, update.events, &mut model);

    assert_eq!(model.mode, ConnectionMode::Offline);
    assert!(!model.is_loading);
    assert!(!model.catalog.is_empty());

    let view = app.view(&model);
    assert!(!view.catalog.is_empty(), "catalog view must stay usable offline");
    assert!(view.diagnostic.is_none());
    assert!(view.notice.is_some());
}

#[test]
fn unknown_load_failure_also_degrades_to_offline() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::ReloadRequested, &mut model);
    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(&mut request, Err(GatewayError::new("08006", "connection refused")))
        .expect("resolve");
    feed(&app, update.events, &mut model);

    assert_eq!(model.mode, ConnectionMode::Offline);
    assert!(!model.catalog.is_empty());
}

#[test]
fn schema_mismatch_blocks_the_catalog_behind_a_diagnostic() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::StartupRequested, &mut model);
    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(
            &mut request,
            Err(GatewayError::new("42703", "column \"images\" does not exist")),
        )
        .expect("resolve");
    feed(&app, update.events, &mut model);

    assert_eq!(model.mode, ConnectionMode::Fatal);

    let view = app.view(&model);
    assert!(view.catalog.is_empty(), "fatal mode must not render the catalog");
    let diagnostic = view.diagnostic.expect("diagnostic must be shown");
    assert!(diagnostic.remediation.expect("script").contains("CREATE TABLE"));
}

#[test]
fn invalid_credentials_are_fatal_without_a_script() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::StartupRequested, &mut model);
    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(&mut request, Err(GatewayError::new("PGRST301", "Invalid API key")))
        .expect("resolve");
    feed(&app, update.events, &mut model);

    assert_eq!(model.mode, ConnectionMode::Fatal);
    let view = app.view(&model);
    assert!(view.diagnostic.expect("diagnostic").remediation.is_none());
}

#[test]
fn zero_rows_is_an_empty_live_catalog_not_an_error() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::StartupRequested, &mut model);
    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(&mut request, Ok(GatewayOutput::Rows(vec![])))
        .expect("resolve");
    feed(&app, update.events, &mut model);

    assert_eq!(model.mode, ConnectionMode::Live);
    assert!(model.catalog.is_empty());
    assert!(app.view(&model).diagnostic.is_none());
}

#[test]
fn failed_insert_keeps_the_optimistic_item_and_demotes() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    // Reach Live with one stored row.
    let update = app.update(Event::StartupRequested, &mut model);
    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(&mut request, Ok(GatewayOutput::Rows(vec![row(10, "Coasters")])))
        .expect("resolve");
    feed(&app, update.events, &mut model);
    assert_eq!(model.mode, ConnectionMode::Live);

    app.update(
        Event::AdminLoginSubmitted { passcode: "23568".into() },
        &mut model,
    );

    let update = app.update(Event::CreateItemRequested(draft("Wobble the Seal")), &mut model);
    let temp_id = model.catalog.items()[0].id;
    assert!(temp_id.0 > 10, "temporary id is a local time-based surrogate");
    assert_eq!(model.catalog.len(), 2);

    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(&mut request, Err(GatewayError::new("57014", "statement timeout")))
        .expect("resolve");
    feed(&app, update.events, &mut model);

    // The create is never rolled back.
    assert_eq!(model.mode, ConnectionMode::Offline);
    assert_eq!(model.catalog.items()[0].id, temp_id);
    assert_eq!(model.catalog.len(), 2);
}

#[test]
fn offline_is_sticky_for_later_mutations() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::StartupRequested, &mut model);
    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(&mut request, Err(GatewayError::new("57014", "cold start")))
        .expect("resolve");
    feed(&app, update.events, &mut model);
    assert_eq!(model.mode, ConnectionMode::Offline);

    app.update(
        Event::AdminLoginSubmitted { passcode: "23568".into() },
        &mut model,
    );

    // Mutations while Offline never touch the gateway and never clear the mode.
    let update = app.update(Event::CreateItemRequested(draft("Offline Bear")), &mut model);
    assert!(
        !update
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Gateway(_))),
        "offline mutations must not issue gateway requests"
    );
    assert_eq!(model.mode, ConnectionMode::Offline);

    let mut edited = model.catalog.items()[0].clone();
    edited.name = "Offline Bear, renamed".into();
    let update = app.update(Event::SaveItemRequested(Box::new(edited)), &mut model);
    assert!(!update.effects.iter().any(|e| matches!(e, Effect::Gateway(_))));
    assert_eq!(model.mode, ConnectionMode::Offline);
}

#[test]
fn a_fresh_reload_can_return_to_live() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::StartupRequested, &mut model);
    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(&mut request, Err(GatewayError::new("57014", "cold start")))
        .expect("resolve");
    feed(&app, update.events, &mut model);
    assert_eq!(model.mode, ConnectionMode::Offline);

    let update = app.update(Event::ReloadRequested, &mut model);
    let mut request = take_request!(update, Effect::Gateway);
    let update = app
        .resolve(&mut request, Ok(GatewayOutput::Rows(vec![row(10, "Coasters")])))
        .expect("resolve");
    feed(&app, update.events, &mut model);

    assert_eq!(model.mode, ConnectionMode::Live);
    assert_eq!(model.catalog.items()[0].id, ItemId(10));
}

#[test]
fn startup_restores_a_persisted_wishlist_and_survives_corruption() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::StartupRequested, &mut model);
    let mut storage = take_request!(update, Effect::Storage);
    let update = app
        .resolve(
            &mut storage,
            Ok(StorageOutput::Value(Some(b"[7,9]".to_vec()))),
        )
        .expect("resolve");
    feed(&app, update.events, &mut model);
    assert!(model.wishlist.contains(&ItemId(7)));
    assert!(model.wishlist.contains(&ItemId(9)));

    // Corrupt payloads fall back to an empty set, never an error.
    let update = app.update(Event::StartupRequested, &mut model);
    let mut storage = take_request!(update, Effect::Storage);
    let update = app
        .resolve(
            &mut storage,
            Ok(StorageOutput::Value(Some(b"definitely not json".to_vec()))),
        )
        .expect("resolve");
    feed(&app, update.events, &mut model);
    assert!(model.wishlist.is_empty());
}
