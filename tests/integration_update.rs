use base64::Engine;
use reqwest::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn update_without_token_is_unauthorized() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("upd_anon");
    common::register_user(&app, &username).await;
    let id = common::get_user_id(&app, &username).await;

    let resp = app
        .client
        .put(format!("{}/api/1.0/users/{id}", app.server_url))
        .json(&json!({ "displayName": "new-display" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_of_another_user_is_forbidden() {
    let app = common::TestApp::spawn().await;
    let owner = common::generate_username("upd_owner");
    let other = common::generate_username("upd_other");
    common::register_user(&app, &owner).await;
    common::register_user(&app, &other).await;

    let token = common::login(&app, &owner, "P4ssword").await;
    let other_id = common::get_user_id(&app, &other).await;

    let resp = app
        .client
        .put(format!("{}/api/1.0/users/{other_id}", app.server_url))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "displayName": "hijacked-display" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_overwrites_display_name() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("upd_name");
    common::register_user(&app, &username).await;

    let token = common::login(&app, &username, "P4ssword").await;
    let id = common::get_user_id(&app, &username).await;

    let resp = app
        .client
        .put(format!("{}/api/1.0/users/{id}", app.server_url))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "displayName": "brand-new-display" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["displayName"], "brand-new-display");

    // The change is visible through the lookup endpoint as well
    let looked_up: serde_json::Value = app
        .client
        .get(format!("{}/users/{}", app.server_url, username))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(looked_up["displayName"], "brand-new-display");
}

#[tokio::test]
async fn update_with_invalid_display_name_is_rejected() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("upd_bad");
    common::register_user(&app, &username).await;

    let token = common::login(&app, &username, "P4ssword").await;
    let id = common::get_user_id(&app, &username).await;

    let resp = app
        .client
        .put(format!("{}/api/1.0/users/{id}", app.server_url))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "displayName": "abc" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["validationErrors"]["displayName"],
        "It must have minimum 4 and maximum 255 characters"
    );
}

#[tokio::test]
async fn update_with_image_stores_file_in_profile_folder() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("upd_img");
    common::register_user(&app, &username).await;

    let token = common::login(&app, &username, "P4ssword").await;
    let id = common::get_user_id(&app, &username).await;

    let resp = app
        .client
        .put(format!("{}/api/1.0/users/{id}", app.server_url))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "displayName": "picture-display", "image": common::png_image_base64() }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.unwrap();
    let image_name = body["image"].as_str().expect("update response missing image name");
    assert!(image_name.ends_with(".png"));

    let stored = app.config.upload.full_profile_images_path().join(image_name);
    assert!(stored.is_file(), "expected stored image at {}", stored.display());
}

#[tokio::test]
async fn replacing_an_image_removes_the_old_file() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("upd_repl");
    common::register_user(&app, &username).await;

    let token = common::login(&app, &username, "P4ssword").await;
    let id = common::get_user_id(&app, &username).await;

    let first: serde_json::Value = app
        .client
        .put(format!("{}/api/1.0/users/{id}", app.server_url))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "displayName": "first-display", "image": common::png_image_base64() }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let first_name = first["image"].as_str().unwrap().to_string();

    let second: serde_json::Value = app
        .client
        .put(format!("{}/api/1.0/users/{id}", app.server_url))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "displayName": "second-display", "image": common::png_image_base64() }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second_name = second["image"].as_str().unwrap().to_string();

    assert_ne!(first_name, second_name);

    let profile_dir = app.config.upload.full_profile_images_path();
    assert!(!profile_dir.join(&first_name).exists(), "replaced image should be deleted");
    assert!(profile_dir.join(&second_name).is_file());
}

#[tokio::test]
async fn update_without_image_keeps_the_existing_one() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("upd_keep");
    common::register_user(&app, &username).await;

    let token = common::login(&app, &username, "P4ssword").await;
    let id = common::get_user_id(&app, &username).await;

    let with_image: serde_json::Value = app
        .client
        .put(format!("{}/api/1.0/users/{id}", app.server_url))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "displayName": "image-display", "image": common::png_image_base64() }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let image_name = with_image["image"].as_str().unwrap().to_string();

    let name_only: serde_json::Value = app
        .client
        .put(format!("{}/api/1.0/users/{id}", app.server_url))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "displayName": "renamed-display" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(name_only["image"].as_str(), Some(image_name.as_str()));
    assert!(app.config.upload.full_profile_images_path().join(&image_name).is_file());
}

#[tokio::test]
async fn update_with_non_image_payload_is_rejected() {
    let app = common::TestApp::spawn().await;
    let username = common::generate_username("upd_txt");
    common::register_user(&app, &username).await;

    let token = common::login(&app, &username, "P4ssword").await;
    let id = common::get_user_id(&app, &username).await;

    let not_an_image = base64::engine::general_purpose::STANDARD.encode(b"just some text");

    let resp = app
        .client
        .put(format!("{}/api/1.0/users/{id}", app.server_url))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "displayName": "text-display", "image": not_an_image }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["validationErrors"]["image"], "Only PNG and JPG files are allowed");
}
