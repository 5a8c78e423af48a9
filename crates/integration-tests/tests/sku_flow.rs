//! SKU generation flows against the stub backend.

use atelier_core::gate::{GateError, SkuPolicy};
use atelier_configurator::catalog_api::types::ColourCodeOutcome;
use atelier_configurator::controller::GenerateError;
use atelier_integration_tests::StubBackend;

const CUTLERY_ON: SkuPolicy = SkuPolicy {
    cutlery_enabled: true,
};

#[tokio::test]
async fn ceramic_flow_allocates_through_get_sku() {
    let backend = StubBackend::spawn().await;
    let controller = backend.controller(SkuPolicy::default()).await;

    controller.select_material(Some("Ceramic")).await.expect("material");
    controller.select_typology(Some("Bowls")).await.expect("typology");
    controller.select_product(Some("Ramen Bowl")).await.expect("product");
    controller.set_outer_glaze(Some("Fog")).await;
    controller.set_inner_glaze(Some("Moss")).await;
    controller.set_rim_glaze(Some("Clay")).await;

    assert!(controller.can_submit().await);
    let code = controller.generate_sku().await.expect("allocation");
    assert_eq!(code.as_str(), "GEN-001");

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.state.generated_sku, Some(code));

    // The outbound payload must use the three glaze keys.
    let state = backend.state.lock().await;
    let request = state.sku_requests.last().expect("captured request");
    assert_eq!(request["materialName"], "Ceramic");
    assert_eq!(request["typology"], "Bowls");
    assert_eq!(request["productName"], "Ramen Bowl");
    assert_eq!(request["outerColor"], "Fog");
    assert_eq!(request["innerColor"], "Moss");
    assert_eq!(request["rimColor"], "Clay");
    assert!(request.get("colour").is_none());
}

#[tokio::test]
async fn marble_flow_allocates_through_get_msku() {
    let backend = StubBackend::spawn().await;
    let controller = backend.controller(SkuPolicy::default()).await;

    controller.select_material(Some("Marble")).await.expect("material");
    controller.select_typology(Some("Vases")).await.expect("typology");
    controller.select_product(Some("Bud Vase")).await.expect("product");
    controller.set_material_colour(Some("Verde")).await;

    let code = controller.generate_sku().await.expect("allocation");
    // The stub answers get-msku through the `data` marker.
    assert_eq!(code.as_str(), "MGEN-001");

    // The single-colour payload uses `colour`, not the glaze keys.
    let state = backend.state.lock().await;
    let request = state.sku_requests.last().expect("captured request");
    assert_eq!(request["materialName"], "Marble");
    assert_eq!(request["colour"], "Verde");
    assert!(request.get("outerColor").is_none());
}

#[tokio::test]
async fn incomplete_selection_blocks_submission() {
    let backend = StubBackend::spawn().await;
    let controller = backend.controller(SkuPolicy::default()).await;

    controller.select_material(Some("Ceramic")).await.expect("material");
    controller.select_typology(Some("Bowls")).await.expect("typology");
    controller.select_product(Some("Ramen Bowl")).await.expect("product");
    controller.set_outer_glaze(Some("Fog")).await;
    controller.set_inner_glaze(Some("Moss")).await;
    // Rim missing.

    assert!(!controller.can_submit().await);
    let err = controller.generate_sku().await.expect_err("gate closed");
    assert!(matches!(err, GenerateError::Gate(GateError::MissingColours(_))));

    // Nothing was sent.
    assert!(backend.state.lock().await.sku_requests.is_empty());
}

#[tokio::test]
async fn cutlery_flow_respects_the_policy_gate() {
    let backend = StubBackend::spawn().await;

    // Disabled (default): rejected before any network traffic.
    let controller = backend.controller(SkuPolicy::default()).await;
    controller.select_material(Some("Cutlery")).await.expect("material");
    controller.select_typology(Some("Cutlery")).await.expect("typology");
    controller.select_product(Some("Serving Spoon")).await.expect_err(
        "no products are loaded for the disabled cutlery flow",
    );

    // Enabled: the same contract is honoured end-to-end.
    let controller = backend.controller(CUTLERY_ON).await;
    controller.select_material(Some("Cutlery")).await.expect("material");
    controller.select_typology(Some("Cutlery")).await.expect("typology");

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.options.cutlery_colours.len(), 1);
    assert_eq!(snapshot.options.products.len(), 1);

    controller.select_product(Some("Serving Spoon")).await.expect("product");
    controller.set_handle_colour(Some("Walnut")).await;
    controller.set_finish_colour(Some("Matte Gold")).await;

    let code = controller.generate_sku().await.expect("allocation");
    // The stub answers cutlery-sku through the nested marker.
    assert_eq!(code.as_str(), "CGEN-001");

    let state = backend.state.lock().await;
    let request = state.sku_requests.last().expect("captured request");
    assert_eq!(request["materialName"], "Cutlery");
    assert_eq!(request["handleColor"], "Walnut");
    assert_eq!(request["finishColor"], "Matte Gold");
}

#[tokio::test]
async fn failed_allocation_clears_the_previous_code() {
    let backend = StubBackend::spawn().await;
    let controller = backend.controller(SkuPolicy::default()).await;

    controller.select_material(Some("Ceramic")).await.expect("material");
    controller.select_typology(Some("Bowls")).await.expect("typology");
    controller.select_product(Some("Ramen Bowl")).await.expect("product");
    controller.set_outer_glaze(Some("Fog")).await;
    controller.set_inner_glaze(Some("Fog")).await;
    controller.set_rim_glaze(Some("Fog")).await;

    controller.generate_sku().await.expect("first allocation");
    assert!(controller.snapshot().await.state.generated_sku.is_some());

    backend.state.lock().await.fail_sku_allocation = true;
    let err = controller.generate_sku().await.expect_err("backend down");
    assert!(matches!(err, GenerateError::Api(_)));

    // No stale code survives a failed attempt, and none is invented.
    assert!(controller.snapshot().await.state.generated_sku.is_none());
}

#[tokio::test]
async fn colour_combination_registration_is_idempotent() {
    let backend = StubBackend::spawn().await;
    let client = backend.client();

    let first = client
        .add_colour_combination("Fog", "Moss", "Clay")
        .await
        .expect("first registration");
    let ColourCodeOutcome::Created(code) = &first else {
        panic!("expected a freshly minted code, got {first:?}");
    };

    let second = client
        .add_colour_combination("Fog", "Moss", "Clay")
        .await
        .expect("second registration");
    assert_eq!(second, ColourCodeOutcome::Existing(code.clone()));

    // No second code was minted.
    assert_eq!(backend.state.lock().await.colour_combinations.len(), 1);

    // A different triple still mints a new code.
    let third = client
        .add_colour_combination("Fog", "Moss", "Fog")
        .await
        .expect("third registration");
    assert!(matches!(third, ColourCodeOutcome::Created(ref c) if c != code));
}

#[tokio::test]
async fn reference_mutations_invalidate_the_cache() {
    let backend = StubBackend::spawn().await;
    let client = backend.client();

    assert_eq!(client.materials().await.expect("materials").len(), 5);
    client
        .add_material("Terracotta", "TC")
        .await
        .expect("add material");
    assert_eq!(
        client.materials().await.expect("materials again").len(),
        6,
        "the cached material list must be refetched after a registration"
    );

    assert_eq!(
        client
            .material_colours("Marble")
            .await
            .expect("colours")
            .len(),
        2
    );
    client
        .add_material_colour("Marble", "Nero")
        .await
        .expect("add colour");
    assert_eq!(
        client
            .material_colours("Marble")
            .await
            .expect("colours again")
            .len(),
        3
    );
}
