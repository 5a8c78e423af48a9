//! Merged-catalog behaviour against the stub backend.

use atelier_core::catalog::{SearchMode, TypeFilter};
use atelier_configurator::services::CatalogBrowser;
use atelier_integration_tests::StubBackend;

#[tokio::test]
async fn both_record_generations_normalise_into_one_list() {
    let backend = StubBackend::spawn().await;
    let browser = CatalogBrowser::new(backend.client());

    let view = browser.load(SearchMode::OnKeystroke).await.expect("load");
    let rows = view.filtered();

    // One current record plus two legacy records.
    assert_eq!(rows.len(), 3);

    // The same code in both generations normalises to the same shape.
    let mugs: Vec<_> = rows
        .iter()
        .filter(|e| e.sku_code.as_str() == "A1")
        .collect();
    assert_eq!(mugs.len(), 2);
    assert_eq!(mugs[0].product_name, mugs[1].product_name);
    assert_eq!(mugs[0].colour, mugs[1].colour);

    // The legacy innerColor fallback is applied.
    let tumbler = rows
        .iter()
        .find(|e| e.sku_code.as_str() == "Z9")
        .expect("legacy record");
    assert_eq!(tumbler.colour, "Amber");
}

#[tokio::test]
async fn metadata_map_joins_by_code() {
    let backend = StubBackend::spawn().await;
    let browser = CatalogBrowser::new(backend.client());

    let map = browser.metadata_map().await.expect("metadata");
    assert_eq!(map["A1"].product_name, "Mug");
    assert_eq!(map["Z9"].product_name, "Old Tumbler");
    assert_eq!(map["Z9"].colour, "Amber");
}

#[tokio::test]
async fn explicit_search_and_type_filter() {
    let backend = StubBackend::spawn().await;
    let browser = CatalogBrowser::new(backend.client());

    let mut view = browser.load(SearchMode::ExplicitSubmit).await.expect("load");

    view.set_type_filter(TypeFilter::Code("VA".to_string()));
    assert_eq!(view.filtered().len(), 1);

    // A one-letter query is refused.
    view.set_search_term("m");
    assert!(!view.submit_search());

    // A submitted query searches across every typology.
    view.set_search_term("mug");
    assert!(view.submit_search());
    assert_eq!(view.filtered().len(), 2);
}

#[tokio::test]
async fn legacy_edit_and_delete_return_refreshed_views() {
    let backend = StubBackend::spawn().await;
    let browser = CatalogBrowser::new(backend.client());

    let view = browser
        .edit_legacy_sku("l2", "Z9-R", SearchMode::OnKeystroke)
        .await
        .expect("edit");
    assert!(
        view.filtered()
            .iter()
            .any(|e| e.sku_code.as_str() == "Z9-R")
    );

    let view = browser
        .delete_sku("A1", SearchMode::OnKeystroke)
        .await
        .expect("delete");
    let rows = view.filtered();
    // Both generations of A1 are gone.
    assert!(rows.iter().all(|e| e.sku_code.as_str() != "A1"));
    assert_eq!(rows.len(), 1);
}
