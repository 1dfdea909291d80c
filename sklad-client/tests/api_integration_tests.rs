//! Integration tests for sklad-client API operations.
//!
//! These tests use wiremock to simulate server responses and verify paging,
//! polymorphic narrowing, asynchronous tasks and batch operations.

use serde_json::{Value, json};
use sklad_client::{
    AssortmentEntity, AssortmentSettings, AsyncState, Bundle, CashOut, Client, ClientError,
    CustomEntityElement, EnterPosition, Meta, MetaType, Params, Product, TrackingCode,
    TrackingCodeType,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IDS: [&str; 5] = [
    "b4a5b2f0-1c3a-11ee-0a80-0d6f00000001",
    "b4a5b2f0-1c3a-11ee-0a80-0d6f00000002",
    "b4a5b2f0-1c3a-11ee-0a80-0d6f00000003",
    "b4a5b2f0-1c3a-11ee-0a80-0d6f00000004",
    "b4a5b2f0-1c3a-11ee-0a80-0d6f00000005",
];

fn row(base: &str, kind: &str, id: &str, name: &str) -> Value {
    json!({
        "meta": {
            "href": format!("{}/entity/{}/{}", base, kind, id),
            "type": kind,
            "mediaType": "application/json"
        },
        "id": id,
        "name": name
    })
}

fn page(rows: Vec<Value>, size: usize, limit: usize, offset: usize) -> Value {
    json!({
        "context": {},
        "meta": {"size": size, "limit": limit, "offset": offset},
        "rows": rows
    })
}

#[tokio::test]
async fn test_paging_windows() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/entity/product"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                row(&base, "product", IDS[0], "Tea"),
                row(&base, "product", IDS[1], "Coffee"),
            ],
            5,
            2,
            0,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/entity/product"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![row(&base, "product", IDS[4], "Cocoa")],
            5,
            2,
            4,
        )))
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();
    let products = client.product();

    let first_params = Params::new().with_limit(2).with_offset(0);
    let first = products.list(&first_params, &cancel).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first.meta.size, 5);
    assert_eq!(first.meta.offset, 0);
    assert!(first.has_more());
    assert_eq!(first.rows[0].name.as_deref(), Some("Tea"));

    let next = first.next_params(&first_params).unwrap();
    assert_eq!(next.offset(), Some(2));
    assert_eq!(next.limit(), Some(2));

    let last = products
        .list(&Params::new().with_limit(2).with_offset(4), &cancel)
        .await
        .unwrap();
    assert_eq!(last.len(), 1);
    assert!(!last.has_more());
    assert!(last.next_params(&first_params).is_none());
}

#[tokio::test]
async fn test_repeated_list_is_identical() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/entity/cashout"))
        .and(query_param("filter", "applicable=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                row(&base, "cashout", IDS[0], "00001"),
                row(&base, "cashout", IDS[1], "00002"),
            ],
            2,
            1000,
            0,
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();
    let params = Params::new().with_filter_eq("applicable", true).with_limit(10);

    let first = client.cash_out().list(&params, &cancel).await.unwrap();
    let second = client.cash_out().list(&params, &cancel).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_assortment_narrowing() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let mut product = row(&base, "product", IDS[0], "Tea");
    product["article"] = json!("T-01");
    let mut bundle = row(&base, "bundle", IDS[1], "Gift set");
    bundle["components"] = json!({"meta": {
        "href": format!("{}/entity/bundle/{}/components", base, IDS[1]),
        "type": "bundlecomponent",
        "size": 2
    }});

    Mock::given(method("GET"))
        .and(path("/entity/assortment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                product.clone(),
                bundle,
                row(&base, "service", IDS[2], "Delivery"),
                row(&base, "product", IDS[3], "Coffee"),
            ],
            4,
            1000,
            0,
        )))
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let assortment = client
        .assortment()
        .list(&Params::new(), &cancel)
        .await
        .unwrap();
    assert_eq!(assortment.len(), 4);

    let first = &assortment.rows[0];
    assert_eq!(first.meta_type().unwrap(), MetaType::Product);
    assert!(first.narrow::<Bundle>().unwrap().is_none());

    let narrowed = first.narrow::<Product>().unwrap().unwrap();
    let direct: Product = serde_json::from_value(product).unwrap();
    assert_eq!(narrowed, direct);
    assert_eq!(narrowed.article.as_deref(), Some("T-01"));

    let products = assortment.products().unwrap();
    let names: Vec<_> = products.iter().filter_map(|p| p.name.as_deref()).collect();
    assert_eq!(names, vec!["Tea", "Coffee"]);

    assert_eq!(assortment.bundles().unwrap().len(), 1);
    assert!(assortment.variants().unwrap().is_empty());

    let kinds: Vec<_> = assortment
        .rows
        .iter()
        .map(|e| AssortmentEntity::try_from(e).unwrap())
        .collect();
    assert!(matches!(kinds[1], AssortmentEntity::Bundle(_)));
    assert!(matches!(kinds[2], AssortmentEntity::Service(_)));
}

#[tokio::test]
async fn test_async_list_matches_sync_list() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let body = page(
        vec![
            row(&base, "product", IDS[0], "Tea"),
            row(&base, "bundle", IDS[1], "Gift set"),
        ],
        2,
        1000,
        0,
    );

    Mock::given(method("GET"))
        .and(path("/entity/assortment"))
        .and(query_param_is_missing("async"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/entity/assortment"))
        .and(query_param("async", "true"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/async/task-1", base).as_str())
                .insert_header(
                    "Content-Location",
                    format!("{}/async/task-1/result", base).as_str(),
                )
                .insert_header("Retry-After", "0"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "PROCESSING"})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "DONE"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-1/result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();
    let assortment = client.assortment();

    let sync = assortment.list(&Params::new(), &cancel).await.unwrap();

    let mut operation = assortment
        .list_async(&Params::new(), &cancel)
        .await
        .unwrap();
    assert_eq!(operation.poll_interval(), Duration::ZERO);
    assert!(operation.status_url().ends_with("/async/task-1"));

    assert!(!operation.poll(&client, &cancel).await.unwrap().is_terminal());

    let result = operation
        .wait(&client, Duration::from_secs(5), &cancel)
        .await
        .unwrap();
    assert_eq!(result, sync);
}

#[tokio::test]
async fn test_async_terminal_state_is_cached() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/entity/cashout"))
        .and(query_param("async", "true"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/async/task-2", base).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "DONE",
            "resultUrl": format!("{}/async/task-2/result", base)
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-2/result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![row(&base, "cashout", IDS[0], "00001")],
            1,
            1000,
            0,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let mut operation = client
        .cash_out()
        .list_async(&Params::new().with_limit(10), &cancel)
        .await
        .unwrap();
    assert_eq!(operation.result_url(), None);

    assert!(operation.poll(&client, &cancel).await.unwrap().is_ready());
    assert!(operation.poll(&client, &cancel).await.unwrap().is_ready());
    assert!(operation.result_url().unwrap().ends_with("/async/task-2/result"));

    let list = operation.into_result().unwrap().unwrap();
    let rows: Vec<CashOut> = list.rows;
    assert_eq!(rows[0].name.as_deref(), Some("00001"));
}

#[tokio::test]
async fn test_async_failure() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/entity/product"))
        .and(query_param("async", "true"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/async/task-3", base).as_str())
                .insert_header("Retry-After", "0"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"error": "Query is too heavy", "code": 1049}]
        })))
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let operation = client
        .product()
        .list_async(&Params::new(), &cancel)
        .await
        .unwrap();
    let error = operation
        .wait(&client, Duration::from_secs(5), &cancel)
        .await
        .unwrap_err();

    match error {
        ClientError::AsyncFailed { errors } => assert_eq!(errors[0].code, Some(1049)),
        other => panic!("Expected AsyncFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_async_wait_times_out() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/entity/product"))
        .and(query_param("async", "true"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/async/task-4", base).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "PENDING"})))
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let operation = client
        .product()
        .list_async(&Params::new(), &cancel)
        .await
        .unwrap()
        .with_poll_interval(Duration::from_millis(20));
    let timeout = Duration::from_millis(200);

    let error = operation.wait(&client, timeout, &cancel).await.unwrap_err();
    assert!(matches!(error, ClientError::Timeout(t) if t == timeout));
}

#[tokio::test]
async fn test_async_server_error_keeps_error_records() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/entity/product"))
        .and(query_param("async", "true"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/async/task-5", base).as_str())
                .insert_header("Retry-After", "0"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "API_ERROR",
            "resultUrl": format!("{}/async/task-5/result", base)
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-5/result"))
        .respond_with(ResponseTemplate::new(412).set_body_json(json!({
            "errors": [{"error": "Unknown filter field 'foo'", "code": 1002}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let operation = client
        .product()
        .list_async(&Params::new().with_filter_eq("foo", "bar"), &cancel)
        .await
        .unwrap();
    let error = operation
        .wait(&client, Duration::from_secs(5), &cancel)
        .await
        .unwrap_err();

    assert!(error.to_string().contains("Unknown filter field 'foo'"));
    match error {
        ClientError::AsyncFailed { errors } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].code, Some(1002));
        }
        other => panic!("Expected AsyncFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_async_rejected_status_settles_as_failed() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/entity/product"))
        .and(query_param("async", "true"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/async/task-6", base).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-6"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"error": "Query is too heavy", "code": 1049}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let mut operation = client
        .product()
        .list_async(&Params::new(), &cancel)
        .await
        .unwrap();

    for _ in 0..2 {
        match operation.poll(&client, &cancel).await.unwrap() {
            AsyncState::Failed(errors) => assert_eq!(errors[0].code, Some(1049)),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }
    assert!(matches!(
        operation.into_result(),
        Some(Err(ClientError::AsyncFailed { .. }))
    ));
}

#[tokio::test]
async fn test_async_unavailable_status_stays_pending() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/entity/product"))
        .and(query_param("async", "true"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/async/task-7", base).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-7"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "errors": [{"error": "Service unavailable", "code": 1000}]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let mut operation = client
        .product()
        .list_async(&Params::new(), &cancel)
        .await
        .unwrap();

    for _ in 0..2 {
        let error = operation.poll(&client, &cancel).await.unwrap_err();
        assert!(error.is_transient());
    }
    assert!(!operation.state().is_terminal());
}

#[tokio::test]
async fn test_async_wait_is_cancellable() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/entity/product"))
        .and(query_param("async", "true"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/async/task-8", base).as_str())
                .insert_header("Retry-After", "5"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async/task-8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "PENDING"})))
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let operation = client
        .product()
        .list_async(&Params::new(), &cancel)
        .await
        .unwrap();
    assert_eq!(operation.poll_interval(), Duration::from_secs(5));

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let error = operation
        .wait(&client, Duration::from_secs(30), &cancel)
        .await
        .unwrap_err();

    assert!(error.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_async_submit_without_location_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entity/assortment"))
        .and(query_param("async", "true"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let cancel = CancellationToken::new();

    let result = client.assortment().list_async(&Params::new(), &cancel).await;
    assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_delete_many_reports_missing_item() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let metas: Vec<Meta> = IDS[..3]
        .iter()
        .map(|id| Meta::new(format!("{}/entity/product/{}", base, id), MetaType::Product))
        .collect();

    let expected_body: Vec<Value> = metas
        .iter()
        .map(|meta| json!({"meta": serde_json::to_value(meta).unwrap()}))
        .collect();

    Mock::given(method("POST"))
        .and(path("/entity/product/delete"))
        .and(body_json(json!(expected_body)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"info": "Entity 'product' with UUID: 1 deleted"},
            {"errors": [{"error": "Entity 'product' with UUID: 2 not found", "code": 1021}]},
            {"info": "Entity 'product' with UUID: 3 deleted"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let result = client.product().delete_many(&metas, &cancel).await.unwrap();
    assert_eq!(result.len(), 3);
    assert!(!result.is_success());

    assert_eq!(result.outcomes()[0].ok(), Some(&metas[0]));
    let missing = result.outcomes()[1].err().unwrap();
    assert_eq!(missing.index, 1);
    assert!(missing.is_not_found());
    assert_eq!(result.outcomes()[2].ok(), Some(&metas[2]));
}

#[tokio::test]
async fn test_delete_many_accepts_entities() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("POST"))
        .and(path("/entity/assortment/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"info": "deleted"},
            {"info": "deleted"}
        ])))
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let assortment_page: sklad_client::Assortment = serde_json::from_str(
        &page(
            vec![
                row(&base, "product", IDS[0], "Tea"),
                row(&base, "service", IDS[1], "Delivery"),
            ],
            2,
            1000,
            0,
        )
        .to_string(),
    )
    .unwrap();

    let result = client
        .assortment()
        .delete_many(&assortment_page.rows, &cancel)
        .await
        .unwrap();
    assert!(result.is_success());
    assert!(result.outcomes()[1].ok().unwrap().is(MetaType::Service));
}

#[tokio::test]
async fn test_delete_many_requires_meta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let cancel = CancellationToken::new();

    let unsaved = vec![Product::default()];
    let result = client.product().delete_many(&unsaved, &cancel).await;
    assert!(matches!(result, Err(ClientError::Core(_))));
}

#[tokio::test]
async fn test_create_update_many() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("POST"))
        .and(path("/entity/cashout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(&base, "cashout", IDS[0], "00001"),
            {"errors": [{
                "error": "Field 'organization' is required",
                "code": 3000,
                "parameter": "organization"
            }]}
        ])))
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();

    let drafts = vec![
        CashOut {
            name: Some("00001".to_string()),
            ..CashOut::default()
        },
        CashOut::default(),
    ];

    let result = client
        .cash_out()
        .create_update_many(&drafts, &Params::new(), &cancel)
        .await
        .unwrap();

    let created = result.outcomes()[0].ok().unwrap();
    assert_eq!(created.id.map(|id| id.to_string()).as_deref(), Some(IDS[0]));

    let failed = result.outcomes()[1].err().unwrap();
    assert_eq!(failed.code(), Some(3000));
    assert_eq!(failed.errors[0].parameter.as_deref(), Some("organization"));
}

#[tokio::test]
async fn test_batch_length_mismatch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/entity/cashout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "only one"}])))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let cancel = CancellationToken::new();

    let drafts = vec![CashOut::default(), CashOut::default()];
    let result = client
        .cash_out()
        .create_update_many(&drafts, &Params::new(), &cancel)
        .await;
    assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_assortment_settings_update() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/entity/assortment/settings"))
        .and(body_json(json!({"createdShared": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "createdShared": true,
            "barcodeRules": {"fillEAN13Barcode": true}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let cancel = CancellationToken::new();

    let settings = AssortmentSettings {
        created_shared: Some(true),
        ..AssortmentSettings::default()
    };
    let updated = client
        .assortment()
        .update_settings(&settings, &cancel)
        .await
        .unwrap();

    assert_eq!(updated.created_shared, Some(true));
    assert_eq!(
        updated.barcode_rules.and_then(|r| r.fill_ean13_barcode),
        Some(true)
    );
}

#[tokio::test]
async fn test_custom_entity_elements() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let directory = IDS[0];
    let element = IDS[1];

    Mock::given(method("GET"))
        .and(path(format!("/entity/customentity/{}", directory)))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![row(&base, "customentity", element, "Red")],
            1,
            10,
            0,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/entity/customentity/{}/{}", directory, element)))
        .and(body_json(json!({"name": "Crimson"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(row(
            &base,
            "customentity",
            element,
            "Crimson",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/entity/customentity/{}/{}", directory, element)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();
    let service = client.custom_entity();
    let directory = directory.parse().unwrap();
    let element = element.parse().unwrap();

    let elements = service
        .elements(directory, &Params::new().with_limit(10), &cancel)
        .await
        .unwrap();
    assert_eq!(elements.rows[0].name.as_deref(), Some("Red"));

    let renamed = CustomEntityElement {
        name: Some("Crimson".to_string()),
        ..CustomEntityElement::default()
    };
    let updated = service
        .update_element(directory, element, &renamed, &cancel)
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Crimson"));

    assert!(
        service
            .delete_element(directory, element, &cancel)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_document_positions_and_trash() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let document = IDS[0];
    let position = IDS[1];

    Mock::given(method("GET"))
        .and(path(format!("/entity/enter/{}/positions", document)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"size": 1, "limit": 1000, "offset": 0},
            "rows": [{"quantity": 3.0, "price": 1500.0}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/entity/enter/{}/positions", document)))
        .and(body_json(json!({"quantity": 2.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": position,
            "quantity": 2.0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let codes_path = format!(
        "/entity/enter/{}/positions/{}/trackingCodes",
        document, position
    );

    Mock::given(method("GET"))
        .and(path(codes_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"size": 1, "limit": 1000, "offset": 0},
            "rows": [{
                "cis": "0104607",
                "type": "consumerpack",
                "trackingCodes": [{"cis": "010460700001", "type": "trackingcode"}]
            }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(codes_path.as_str()))
        .and(body_json(json!([
            {"cis": "010460700002", "type": "trackingcode"},
            {"cis": "bad", "type": "trackingcode"}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"cis": "010460700002", "type": "trackingcode"},
            {"errors": [{"error": "Invalid tracking code", "code": 3000}]}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{}/delete", codes_path)))
        .and(body_json(json!([{"cis": "010460700001", "type": "trackingcode"}])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"info": "Tracking code deleted"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/entity/enter/{}/trash", document)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();
    let enter = client.enter();
    let document = document.parse().unwrap();
    let position = position.parse().unwrap();

    let positions = enter
        .positions()
        .list(document, &Params::new(), &cancel)
        .await
        .unwrap();
    assert_eq!(positions.rows[0].quantity, Some(3.0));

    let created = enter
        .positions()
        .create_one(
            document,
            &EnterPosition {
                quantity: Some(2.0),
                ..EnterPosition::default()
            },
            &cancel,
        )
        .await
        .unwrap();
    assert_eq!(created.id, Some(position));

    let codes = enter
        .positions()
        .tracking_codes(document, position, &cancel)
        .await
        .unwrap();
    assert_eq!(codes.rows[0].kind, Some(TrackingCodeType::ConsumerPack));
    let nested = codes.rows[0].tracking_codes.as_ref().unwrap();
    assert_eq!(nested[0].cis.as_deref(), Some("010460700001"));

    let written = enter
        .positions()
        .create_update_tracking_codes(
            document,
            position,
            &[
                TrackingCode::new("010460700002", TrackingCodeType::TrackingCode),
                TrackingCode::new("bad", TrackingCodeType::TrackingCode),
            ],
            &cancel,
        )
        .await
        .unwrap();
    assert_eq!(written.len(), 2);
    assert!(written.outcomes()[0].is_ok());
    assert_eq!(written.outcomes()[1].err().unwrap().code(), Some(3000));

    let removed = enter
        .positions()
        .delete_tracking_codes(document, position, &nested[..1], &cancel)
        .await
        .unwrap();
    assert!(removed.is_success());
    assert_eq!(
        removed.outcomes()[0].ok().unwrap().cis.as_deref(),
        Some("010460700001")
    );

    enter.move_to_trash(document, &cancel).await.unwrap();
}

#[tokio::test]
async fn test_attributes_and_sync_id() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let sync_id = IDS[2];

    Mock::given(method("GET"))
        .and(path("/entity/cashout/metadata/attributes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"size": 1, "limit": 1000, "offset": 0},
            "rows": [{"name": "Cost center", "type": "string", "required": false}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/entity/cashout/syncid/{}", sync_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(row(
            &base, "cashout", IDS[3], "00042",
        )))
        .mount(&mock_server)
        .await;

    let client = Client::new(&base).unwrap();
    let cancel = CancellationToken::new();
    let cash_out = client.cash_out();

    let attributes = cash_out.attributes().list(&cancel).await.unwrap();
    assert_eq!(attributes.rows[0].kind.as_deref(), Some("string"));

    let found = cash_out
        .get_by_sync_id(sync_id.parse().unwrap(), &Params::new(), &cancel)
        .await
        .unwrap();
    assert_eq!(found.name.as_deref(), Some("00042"));
}
