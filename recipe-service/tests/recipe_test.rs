//! Recipe catalog integration tests.

mod common;

use common::TestApp;

#[tokio::test]
async fn add_recipe_returns_created_with_id() {
    let (app, _mock) = TestApp::spawn().await;

    let response = app
        .add_recipe(&[("recipe_name", "Dal"), ("recipe_text", "Boil lentils")])
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Recipe added successfully");
    assert!(body["recipe_id"].as_i64().is_some());

    app.cleanup().await;
}

#[tokio::test]
async fn repeated_adds_yield_strictly_increasing_ids() {
    let (app, _mock) = TestApp::spawn().await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let name = format!("Recipe {}", i);
        let response = app
            .add_recipe(&[("recipe_name", name.as_str()), ("recipe_text", "Mix and bake")])
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        ids.push(body["recipe_id"].as_i64().expect("recipe_id missing"));
    }

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "ids not increasing: {:?}", ids);

    app.cleanup().await;
}

#[tokio::test]
async fn add_recipe_missing_field_is_rejected_and_not_persisted() {
    let (app, _mock) = TestApp::spawn().await;

    let cases: [&[(&str, &str)]; 4] = [
        &[("recipe_text", "Boil lentils")],
        &[("recipe_name", "Dal")],
        &[("recipe_name", ""), ("recipe_text", "Boil lentils")],
        &[],
    ];

    for fields in cases {
        let response = app.add_recipe(fields).await;
        assert_eq!(response.status().as_u16(), 400, "fields: {:?}", fields);
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["error"], "Both recipe name and text are required");
    }

    assert!(app.list_recipes().await.is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn list_returns_every_added_recipe() {
    let (app, _mock) = TestApp::spawn().await;

    let names = ["Dal", "Rice", "Sambar"];
    let mut inserted = Vec::new();
    for name in names {
        let body: serde_json::Value = app
            .add_recipe(&[("recipe_name", name), ("recipe_text", "Cook it")])
            .await
            .json()
            .await
            .expect("Failed to parse JSON");
        inserted.push((body["recipe_id"].as_i64().unwrap(), name.to_string()));
    }

    let listed = app.list_recipes().await;
    assert_eq!(listed.len(), names.len());

    for entry in &listed {
        let pair = (
            entry["id"].as_i64().expect("id missing"),
            entry["name"].as_str().expect("name missing").to_string(),
        );
        assert!(inserted.contains(&pair), "unexpected entry {:?}", entry);
    }

    app.cleanup().await;
}

#[tokio::test]
async fn empty_catalog_lists_nothing() {
    let (app, _mock) = TestApp::spawn().await;

    assert!(app.list_recipes().await.is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn non_form_body_is_bad_request() {
    let (app, _mock) = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/add_recipe"))
        .json(&serde_json::json!({ "recipe_name": "Dal", "recipe_text": "Boil" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Invalid form data");
    assert!(app.list_recipes().await.is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn storage_failure_returns_generic_500() {
    let (app, _mock) = TestApp::spawn().await;

    app.db.close().await;

    let response = app
        .add_recipe(&[("recipe_name", "Dal"), ("recipe_text", "Boil lentils")])
        .await;
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Database error");

    let response = app
        .client
        .get(app.url("/get_recipes"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Database error");

    app.cleanup().await;
}
