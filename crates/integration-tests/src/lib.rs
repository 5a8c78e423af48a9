//! Integration tests for Atelier SKU Studio.
//!
//! The real client, controller and services run against an in-process axum
//! stub of the remote catalog API, spawned on an ephemeral port per test.
//! The stub's state sits behind a mutex so tests can seed data, inject
//! failures and delays, and inspect captured request bodies.
//!
//! # Test Categories
//!
//! - `cascade` - Selection cascade, resets, fatal configuration errors and
//!   the stale-response race
//! - `sku_flow` - SKU generation on both live branches, the cutlery policy
//!   gate and colour-combination idempotence
//! - `pricing_flow` - Pricing round-trips, edit buffers and deletion
//! - `catalog_flow` - Current/legacy merging and search behaviour

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use url::Url;

use atelier_configurator::catalog_api::CatalogApiClient;
use atelier_configurator::config::ApiConfig;
use atelier_configurator::controller::SelectionController;
use atelier_core::gate::SkuPolicy;

/// Mutable backend state shared between the stub handlers and the test.
pub struct StubState {
    pub materials: Vec<Value>,
    pub typologies: Vec<Value>,
    pub palette: Value,
    /// Product lists keyed by category key.
    pub products: HashMap<String, Vec<Value>>,
    /// Colour vocabularies keyed by material name.
    pub material_colours: HashMap<String, Vec<Value>>,
    pub cutlery_colours: Vec<Value>,
    pub colour_combinations: Vec<Value>,
    pub current_skus: Vec<Value>,
    pub legacy_skus: Vec<Value>,
    pub pricing: Vec<Value>,
    /// Artificial latency per product category, for race tests.
    pub product_delays: HashMap<String, Duration>,
    /// Fail `GET colors/{material}` with a 500.
    pub fail_material_colours: bool,
    /// Fail the allocation endpoints with a 500.
    pub fail_sku_allocation: bool,
    /// Bodies posted to the allocation endpoints, in order.
    pub sku_requests: Vec<Value>,
    /// Bodies posted/put to the pricing endpoints, in order.
    pub pricing_writes: Vec<Value>,
    pub next_sku: u64,
    pub next_colour_code: u64,
    pub next_pricing_id: u64,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            materials: vec![
                json!({"name": "Ceramic", "code": "CE"}),
                json!({"name": "Marble", "code": "MA"}),
                json!({"name": "Cement", "code": "CT"}),
                json!({"name": "Cork", "code": "CK"}),
                json!({"name": "Cutlery", "code": "CU"}),
            ],
            typologies: vec![
                json!({"name": "Bowls", "code": "BO"}),
                json!({"name": "Vases", "code": "VA"}),
                json!({"name": "Plates", "code": "PL"}),
                json!({"name": "Cutlery", "code": "CU"}),
                // Present upstream but absent from the category-key map.
                json!({"name": "Chandeliers", "code": "CH"}),
            ],
            palette: json!({
                "outerColors": ["Fog", "Moss", "Clay"],
                "innerColors": ["Fog", "Moss", "Clay"],
                "rimColors": ["Fog", "Moss", "Clay"],
            }),
            products: HashMap::from([
                (
                    "Bowls".to_string(),
                    vec![json!({
                        "_id": "pr1", "name": "Ramen Bowl",
                        "design_code": "RB", "category": "Bowls",
                    })],
                ),
                (
                    "vases".to_string(),
                    vec![json!({
                        "_id": "pr2", "name": "Bud Vase",
                        "design_code": "BV", "category": "vases",
                    })],
                ),
                (
                    "Plates".to_string(),
                    vec![json!({
                        "_id": "pr3", "name": "Dinner Plate",
                        "design_code": "DP", "category": "Plates",
                    })],
                ),
                ("cutlery".to_string(), vec![json!({
                    "_id": "pr4", "name": "Serving Spoon",
                    "design_code": "SS", "category": "cutlery",
                })]),
            ]),
            material_colours: HashMap::from([
                (
                    "Marble".to_string(),
                    vec![
                        json!({"color": "Verde", "code": "VR"}),
                        json!({"color": "Carrara", "code": "CA"}),
                    ],
                ),
                (
                    "Cement".to_string(),
                    vec![json!({"color": "Slate", "code": "SL"})],
                ),
            ]),
            cutlery_colours: vec![json!({
                "handleColor": "Walnut", "finishColor": "Matte Gold", "code": "WG",
            })],
            colour_combinations: Vec::new(),
            current_skus: vec![json!({
                "skuCode": "A1", "productName": "Mug",
                "color": "Blue", "typeCode": "BO",
            })],
            legacy_skus: vec![
                json!({
                    "_id": "l1", "code": "A1", "name": "Mug",
                    "colour": "Blue", "typeCode": "BO",
                }),
                json!({
                    "_id": "l2", "code": "Z9", "name": "Old Tumbler",
                    "innerColor": "Amber", "typeCode": "VA",
                }),
            ],
            pricing: Vec::new(),
            product_delays: HashMap::new(),
            fail_material_colours: false,
            fail_sku_allocation: false,
            sku_requests: Vec::new(),
            pricing_writes: Vec::new(),
            next_sku: 0,
            next_colour_code: 0,
            next_pricing_id: 0,
        }
    }
}

type Shared = Arc<Mutex<StubState>>;

/// An in-process stub of the catalog API.
pub struct StubBackend {
    pub state: Shared,
    addr: SocketAddr,
}

impl StubBackend {
    /// Spawn with default seed data.
    pub async fn spawn() -> Self {
        Self::spawn_with(StubState::default()).await
    }

    /// Spawn with caller-provided state.
    pub async fn spawn_with(state: StubState) -> Self {
        let shared = Arc::new(Mutex::new(state));
        let app = router(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub backend addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            state: shared,
            addr,
        }
    }

    /// Client configuration pointing at this stub.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: Url::parse(&format!("http://{}/api/sku/", self.addr))
                .expect("stub base url"),
            api_token: None,
            cache_ttl: Duration::from_secs(300),
            http_timeout: Duration::from_secs(5),
        }
    }

    /// A real client wired to this stub.
    pub fn client(&self) -> CatalogApiClient {
        CatalogApiClient::new(&self.api_config()).expect("client builds")
    }

    /// An initialised controller wired to this stub.
    pub async fn controller(&self, policy: SkuPolicy) -> SelectionController {
        let controller = SelectionController::new(self.client(), policy);
        controller.init().await.expect("controller init");
        controller
    }
}

fn router(shared: Shared) -> Router {
    Router::new()
        .route("/api/sku/materials", get(materials))
        .route("/api/sku/types", get(typologies))
        .route("/api/sku/colors", get(palette).post(add_material_colour))
        .route("/api/sku/colors/{material}", get(material_colours))
        .route("/api/sku/cutlery", get(cutlery_colours).post(add_cutlery_colour))
        .route(
            "/api/sku/products/{key}",
            get(products).put(rename_product).delete(delete_product),
        )
        .route("/api/sku/add-material", post(add_material))
        .route("/api/sku/add-product", post(add_product))
        .route("/api/sku/design-code", post(design_code))
        .route("/api/sku/add-color", post(add_colour_combination))
        .route("/api/sku/color-entries", get(colour_entries))
        .route("/api/sku/get-sku", post(get_sku))
        .route("/api/sku/get-msku", post(get_msku))
        .route("/api/sku/cutlery-sku", post(cutlery_sku))
        .route("/api/sku/all-codes", get(all_codes))
        .route("/api/sku/old-skus", get(old_skus))
        .route("/api/sku/old-skus/{id}", put(edit_old_sku))
        .route("/api/sku/skus/{code}", axum::routing::delete(delete_sku))
        .route("/api/sku/pricing", get(pricing_list).post(pricing_create))
        .route(
            "/api/sku/pricing/{id}",
            put(pricing_update).delete(pricing_delete),
        )
        .with_state(shared)
}

async fn materials(State(state): State<Shared>) -> Json<Value> {
    let s = state.lock().await;
    Json(json!({"data": s.materials}))
}

async fn typologies(State(state): State<Shared>) -> Json<Value> {
    let s = state.lock().await;
    Json(json!({"data": s.typologies}))
}

async fn palette(State(state): State<Shared>) -> Json<Value> {
    let s = state.lock().await;
    Json(json!({"data": s.palette}))
}

async fn material_colours(
    State(state): State<Shared>,
    Path(material): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let s = state.lock().await;
    if s.fail_material_colours {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let colours = s.material_colours.get(&material).cloned().unwrap_or_default();
    Ok(Json(json!(colours)))
}

async fn add_material_colour(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().await;
    let material = body["material"].as_str().unwrap_or_default().to_string();
    let entries = s.material_colours.entry(material).or_default();
    let entry = json!({
        "color": body["color"],
        "code": format!("MC{}", entries.len() + 1),
    });
    entries.push(entry.clone());
    Json(entry)
}

async fn cutlery_colours(State(state): State<Shared>) -> Json<Value> {
    let s = state.lock().await;
    Json(json!({"data": s.cutlery_colours}))
}

async fn add_cutlery_colour(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().await;
    let entry = json!({
        "handleColor": body["handle"],
        "finishColor": body["finish"],
        "code": format!("CC{}", s.cutlery_colours.len() + 1),
    });
    s.cutlery_colours.push(entry.clone());
    Json(entry)
}

async fn products(State(state): State<Shared>, Path(key): Path<String>) -> Json<Value> {
    let (delay, items) = {
        let s = state.lock().await;
        (
            s.product_delays.get(&key).copied(),
            s.products.get(&key).cloned().unwrap_or_default(),
        )
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Json(json!({"products": items}))
}

async fn rename_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut s = state.lock().await;
    for list in s.products.values_mut() {
        for product in list.iter_mut() {
            if product["_id"] == json!(id) {
                product["name"] = body["name"].clone();
                return Ok(Json(product.clone()));
            }
        }
    }
    Err(StatusCode::NOT_FOUND)
}

async fn delete_product(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut s = state.lock().await;
    for list in s.products.values_mut() {
        list.retain(|product| product["_id"] != json!(id));
    }
    StatusCode::OK
}

async fn add_material(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().await;
    let entry = json!({"name": body["material"], "code": body["code"]});
    s.materials.push(entry.clone());
    Json(entry)
}

async fn add_product(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().await;
    let category = body["category"].as_str().unwrap_or_default().to_string();
    let entry = json!({
        "_id": format!("pr{}", s.products.values().map(Vec::len).sum::<usize>() + 1),
        "name": body["name"],
        "design_code": "NEW",
        "category": category,
    });
    s.products.entry(category).or_default().push(entry.clone());
    Json(entry)
}

async fn design_code(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let s = state.lock().await;
    let name = body["productName"].clone();
    for list in s.products.values() {
        for product in list {
            if product["name"] == name {
                return Json(json!({"success": true, "designCode": product["design_code"]}));
            }
        }
    }
    Json(json!({"success": false, "message": "Product not found"}))
}

async fn add_colour_combination(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut s = state.lock().await;
    let existing = s.colour_combinations.iter().find(|combo| {
        combo["outerColor"] == body["outerColor"]
            && combo["innerColor"] == body["innerColor"]
            && combo["rimColor"] == body["rimColor"]
    });
    if let Some(combo) = existing {
        return Json(json!({
            "message": "Color code already exists!",
            "data": combo["code"],
        }));
    }

    s.next_colour_code += 1;
    let code = format!("CC-{:03}", s.next_colour_code);
    let mut combo = body;
    combo["code"] = json!(code);
    s.colour_combinations.push(combo);
    Json(json!({"colorCode": code}))
}

async fn colour_entries(State(state): State<Shared>) -> Json<Value> {
    let s = state.lock().await;
    Json(json!(s.colour_combinations))
}

async fn get_sku(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut s = state.lock().await;
    if s.fail_sku_allocation {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    s.sku_requests.push(body);
    s.next_sku += 1;
    Ok(Json(json!({"skuCode": format!("GEN-{:03}", s.next_sku)})))
}

async fn get_msku(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut s = state.lock().await;
    if s.fail_sku_allocation {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    s.sku_requests.push(body);
    s.next_sku += 1;
    // The single-colour endpoint answers through the `data` marker.
    Ok(Json(json!({"data": format!("MGEN-{:03}", s.next_sku)})))
}

async fn cutlery_sku(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut s = state.lock().await;
    if s.fail_sku_allocation {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    s.sku_requests.push(body);
    s.next_sku += 1;
    // Answers through the nested marker.
    Ok(Json(
        json!({"newSKU": {"skuCode": format!("CGEN-{:03}", s.next_sku)}}),
    ))
}

async fn all_codes(State(state): State<Shared>) -> Json<Value> {
    let s = state.lock().await;
    Json(json!(s.current_skus))
}

async fn old_skus(State(state): State<Shared>) -> Json<Value> {
    let s = state.lock().await;
    Json(json!(s.legacy_skus))
}

async fn edit_old_sku(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut s = state.lock().await;
    for sku in s.legacy_skus.iter_mut() {
        if sku["_id"] == json!(id) {
            sku["code"] = body["code"].clone();
            return Ok(Json(sku.clone()));
        }
    }
    Err(StatusCode::NOT_FOUND)
}

async fn delete_sku(State(state): State<Shared>, Path(code): Path<String>) -> StatusCode {
    let mut s = state.lock().await;
    let code = json!(code);
    s.current_skus.retain(|sku| sku["skuCode"] != code);
    s.legacy_skus.retain(|sku| sku["code"] != code);
    StatusCode::OK
}

async fn pricing_list(State(state): State<Shared>) -> Json<Value> {
    let s = state.lock().await;
    Json(json!({"data": s.pricing}))
}

async fn pricing_create(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().await;
    s.pricing_writes.push(body.clone());
    s.next_pricing_id += 1;
    let mut record = body;
    record["_id"] = json!(format!("p{}", s.next_pricing_id));
    s.pricing.push(record.clone());
    Json(record)
}

async fn pricing_update(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut s = state.lock().await;
    s.pricing_writes.push(body.clone());
    for record in s.pricing.iter_mut() {
        if record["_id"] == json!(id) {
            let mut updated = body.clone();
            updated["_id"] = json!(id);
            *record = updated.clone();
            return Ok(Json(updated));
        }
    }
    Err(StatusCode::NOT_FOUND)
}

async fn pricing_delete(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut s = state.lock().await;
    let id = json!(id);
    s.pricing.retain(|record| record["_id"] != id);
    StatusCode::OK
}
