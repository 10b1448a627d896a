//! HTTP clients against in-process fakes of the remote services

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use ::common::contract::{QubeContract, TokenId};
use ::common::encryption::{EncryptionError, EncryptionService};
use ::common::mint::{MintOutcome, MintRequest};
use ::common::pinning::{ContentId, PinError, Pinner};
use ::common::qube::{BlakQube, MetaQube, QubeFile};
use qube::clients::{ContractClient, EncryptionClient, PinataClient};
use qube::AppConfig;

use crate::common::{serve, services, Recorder, Responses};

async fn start(responses: Responses) -> (url::Url, Recorder) {
    let recorder = Recorder::default();
    let url = serve(services(recorder.clone(), responses)).await;
    (url, recorder)
}

fn note() -> QubeFile {
    QubeFile::new("note.txt", "text/plain", b"hello qube".to_vec())
}

#[tokio::test]
async fn test_pin_file_uploads_multipart_with_jwt() {
    let (url, recorder) = start(Responses::default()).await;
    let pinata = PinataClient::new(&url, Some("secret-jwt")).unwrap();

    let cid = pinata.pin_file(&note()).await.unwrap();
    assert_eq!(cid, ContentId::new("QmFile"));

    let seen = recorder.at("/pinning/pinFileToIPFS");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer secret-jwt"));
    let part = &seen[0].body[0];
    assert_eq!(part["name"], "file");
    assert_eq!(part["fileName"], "note.txt");
    assert_eq!(part["contentType"], "text/plain");
    assert_eq!(part["data"], "hello qube");
}

#[tokio::test]
async fn test_pin_json_wraps_pinata_content() {
    let (url, recorder) = start(Responses::default()).await;
    let pinata = PinataClient::new(&url, Some("secret-jwt")).unwrap();

    let document = json!({ "name": "ContentQube NFT #1" });
    let cid = pinata.pin_json(&document).await.unwrap();
    assert_eq!(cid.uri(), "ipfs://QmMeta");

    let seen = recorder.at("/pinning/pinJSONToIPFS");
    assert_eq!(seen[0].body, json!({ "pinataContent": document }));
}

#[tokio::test]
async fn test_empty_hash_is_rejected() {
    let (url, _) = start(Responses {
        json_hash: String::new(),
        ..Default::default()
    })
    .await;
    let pinata = PinataClient::new(&url, None).unwrap();

    let err = pinata.pin_json(&json!({})).await.unwrap_err();
    assert!(matches!(err, PinError::EmptyHash));
}

#[tokio::test]
async fn test_encrypt_file_keeps_descriptor() {
    let (url, recorder) = start(Responses::default()).await;
    let encryption = EncryptionClient::new(&url).unwrap();

    let encrypted = encryption
        .encrypt_file(&ContentId::new("QmFile"))
        .await
        .unwrap();
    assert_eq!(encrypted.key, "k1");
    assert_eq!(encrypted.descriptor["encryptedFile"], "QmEnc");
    assert_eq!(encrypted.descriptor["iv"], "00ff");

    let seen = recorder.at("/encrypt-file");
    assert_eq!(seen[0].body, json!({ "file": "QmFile" }));
}

#[tokio::test]
async fn test_encryption_service_error_status() {
    let (url, _) = start(Responses {
        encrypt_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..Default::default()
    })
    .await;
    let encryption = EncryptionClient::new(&url).unwrap();

    let err = encryption
        .encrypt_file(&ContentId::new("QmFile"))
        .await
        .unwrap_err();
    assert!(matches!(err, EncryptionError::Default(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_mint_relay_receipt_yields_token_id() {
    let (url, recorder) = start(Responses::default()).await;
    let contract = ContractClient::new(&url).unwrap();

    let receipt = contract.mint_qube("ipfs://QmMeta", "k2").await.unwrap();
    assert_eq!(receipt.status, Some(1));
    assert!(!receipt.reverted());

    let token_id = contract.token_id_from_receipt(&receipt).await.unwrap();
    assert_eq!(token_id, Some(TokenId::new("42")));

    let seen = recorder.at("/mint-qube");
    assert_eq!(seen[0].body, json!({ "uri": "ipfs://QmMeta", "key": "k2" }));
}

#[tokio::test]
async fn test_mint_end_to_end_over_http() {
    let (url, recorder) = start(Responses::default()).await;
    let config = AppConfig {
        server_url: url.clone(),
        pinata_url: url.clone(),
        pinata_jwt: Some("secret-jwt".to_string()),
        contract_url: url.clone(),
        ..Default::default()
    };
    let minter = qube::minter(&config).unwrap();

    let file = note();
    let mut blak_qube = BlakQube::default();
    blak_qube.set_field("rarity", "rare").unwrap();
    blak_qube.blob_preview = Some(file.preview());

    let outcome = minter
        .mint(MintRequest {
            file: Some(file),
            meta_qube: MetaQube::default(),
            blak_qube,
        })
        .await
        .unwrap();
    let MintOutcome::Minted(minted) = outcome else {
        panic!("expected a token id");
    };
    assert_eq!(minted.token_id, TokenId::new("42"));
    assert_eq!(minted.metadata_uri, "ipfs://QmMeta");

    let paths: Vec<String> = recorder.all().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        [
            "/pinning/pinFileToIPFS",
            "/encrypt-file",
            "/encrypt-data",
            "/pinning/pinJSONToIPFS",
            "/mint-qube",
        ]
    );

    let sealed = &recorder.at("/encrypt-data")[0].body;
    assert_eq!(sealed["blobFile"], Value::Null);
    assert_eq!(sealed["blobPreview"], Value::Null);
    assert_eq!(sealed["encryptedFileHash"], "QmFile");
    assert_eq!(sealed["encryptedFileKey"], "k1");
    assert_eq!(sealed["rarity"], "rare");

    let metadata = &recorder.at("/pinning/pinJSONToIPFS")[0].body["pinataContent"];
    assert_eq!(metadata["image"]["iv"], "00ff");
    assert_eq!(metadata["attributes"][0]["value"]["iQubeContentType"], "txt");
    assert_eq!(metadata["attributes"][1]["value"]["rarity"], "0xbb");

    let mint = &recorder.at("/mint-qube")[0].body;
    assert_eq!(mint["key"], "k2");
}

#[tokio::test]
async fn test_rejected_blak_qube_over_http_never_mints() {
    let (url, recorder) = start(Responses {
        encrypted_data: json!({ "success": false }),
        ..Default::default()
    })
    .await;
    let config = AppConfig {
        server_url: url.clone(),
        pinata_url: url.clone(),
        contract_url: url.clone(),
        ..Default::default()
    };

    let err = qube::minter(&config)
        .unwrap()
        .mint(MintRequest {
            file: Some(note()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to encrypt BlakQube data");
    assert!(recorder.at("/pinning/pinJSONToIPFS").is_empty());
    assert!(recorder.at("/mint-qube").is_empty());
}
