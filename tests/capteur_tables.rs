// Described sensor-console tables: rows plus per-column field metadata.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::Value;

fn column<'a>(body: &'a Value, name: &str) -> &'a Value {
    body["metadata"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["name"] == name)
        .unwrap_or_else(|| panic!("no metadata for {name}"))
}

#[tokio::test]
async fn rights_table_uses_stored_descriptions() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/Capteur/TableauDroits").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"][0]["TableDroits..IdDroit.."], 10);

    let described = column(&body, "TableDroits..NomDroit..");
    assert_eq!(described["table"], "TableDroits");
    assert_eq!(described["label"], "Nom du droit");
    assert_eq!(described["editable"], false);
    assert_eq!(described["scrutable"], true);
    assert_eq!(described["type"], "texte");

    let fallback = column(&body, "TableDroits..IdDroit..");
    assert_eq!(fallback["label"], "not found");
    assert_eq!(fallback["filterable"], true);
    assert_eq!(fallback["scrutable"], false);
    assert_eq!(fallback["editable"], true);
}

#[tokio::test]
async fn users_table_joins_profiles() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/Capteur/TableauUtilisateurs").await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    let carole = data.iter().find(|r| r["TableUtilisateurs..Nom.."] == "Carole").unwrap();
    assert_eq!(carole["TableProfils..NomProfil.."], "Opérateur");
    assert_eq!(column(&body, "TableProfils..NomProfil..")["table"], "TableProfils");
    assert_eq!(column(&body, "TableUtilisateurs..Nom..")["table"], "TableUtilisateurs");
}

#[tokio::test]
async fn empty_table_still_carries_metadata() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/Capteur/TableauCapteurs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Array(vec![]));
    assert_eq!(body["metadata"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn overloads_keep_real_values() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/Capteur/TableauOverloads").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["TableOverloads..Valeur.."], 2.5);
}
