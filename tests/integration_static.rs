use reqwest::StatusCode;

mod common;

const YEAR_IN_SECONDS: u32 = 31_536_000;

async fn place_file(dir: &std::path::Path, name: &str) {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0x00; 16]);
    tokio::fs::write(dir.join(name), bytes).await.unwrap();
}

#[tokio::test]
async fn upload_folders_exist_after_boot() {
    let app = common::TestApp::spawn().await;

    assert!(std::path::Path::new(&app.config.upload.upload_path).is_dir());
    assert!(app.config.upload.full_profile_images_path().is_dir());
    assert!(app.config.upload.full_attachments_path().is_dir());
}

#[tokio::test]
async fn image_in_profile_folder_is_served() {
    let app = common::TestApp::spawn().await;
    place_file(&app.config.upload.full_profile_images_path(), "profile-picture.png").await;

    let resp = app
        .client
        .get(format!("{}/images/profile/profile-picture.png", app.server_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
}

#[tokio::test]
async fn image_in_attachments_folder_is_served() {
    let app = common::TestApp::spawn().await;
    place_file(&app.config.upload.full_attachments_path(), "attached.png").await;

    let resp = app
        .client
        .get(format!("{}/images/attachments/attached.png", app.server_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn served_image_carries_year_long_cache_header() {
    let app = common::TestApp::spawn().await;
    place_file(&app.config.upload.full_attachments_path(), "cached.png").await;

    let resp = app
        .client
        .get(format!("{}/images/attachments/cached.png", app.server_url))
        .send()
        .await
        .unwrap();

    let cache_control = resp.headers().get("cache-control").unwrap().to_str().unwrap();
    assert!(
        cache_control.contains(&format!("max-age={YEAR_IN_SECONDS}")),
        "unexpected cache header: {cache_control}"
    );
}

#[tokio::test]
async fn missing_image_is_not_found() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .get(format!("{}/images/attachments/there-is-no-such-image.png", app.server_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn traversal_outside_the_upload_root_is_not_found() {
    let app = common::TestApp::spawn().await;

    // Encoded so the client does not normalize the dot segments away
    let resp = app
        .client
        .get(format!("{}/images/{}", app.server_url, "..%2F..%2FCargo.toml"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
