use std::time::{SystemTime, UNIX_EPOCH};

use petshop_client::{ClientConfig, DEFAULT_BASE_URL, ShopClient};
use petshop_core::cancel::CancelToken;
use petshop_core::detail::{ActionOutcome, DetailState};
use petshop_core::pagination::{ListOutcome, ListState, NOTICE_PAGE_SIZE};
use petshop_core::post_form::{BoardType, PostDraft};
use petshop_core::record::RecordRef;
use petshop_core::session::SessionContext;
use petshop_core::signup::SignupForm;

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

#[tokio::test]
#[ignore = "requires running shop backend and database"]
async fn http_smoke_flow() {
    let base_url = std::env::var("SHOP_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let config = ClientConfig::new(base_url).expect("SHOP_API_URL must be a valid url");
    let client =
        ShopClient::new(&config, SessionContext::in_memory()).expect("client must build");

    let suffix = unique_suffix();
    let user_id = format!("smoke{suffix}");
    let password = "password123";

    let mut form = SignupForm::default();
    form.set_user_id(user_id.clone());
    form.password = password.to_string();
    form.password_confirm = password.to_string();
    form.nickname = format!("smoke{suffix}");
    form.email = format!("smoke{suffix}@example.com");
    let registered = client.register(&mut form).await;
    assert!(
        matches!(registered, ActionOutcome::Succeeded { .. }),
        "register must succeed: {registered:?}"
    );

    let session = client
        .login(&user_id, password)
        .await
        .expect("login must succeed");
    assert!(!session.access_token.is_empty());

    let mut draft = PostDraft {
        board_type: BoardType::Free,
        title: "smoke title".to_string(),
        content: "smoke content".to_string(),
        ..PostDraft::default()
    };
    client.prefill_post(&mut draft).await;
    let created = client.submit_post(&draft).await;
    assert!(
        matches!(created, ActionOutcome::Succeeded { .. }),
        "post must be created: {created:?}"
    );

    let mut board = ListState::new(NOTICE_PAGE_SIZE);
    let listed = client.load_board(&mut board, CancelToken::new()).await;
    assert_eq!(listed, ListOutcome::Loaded);
    let newest = board
        .items()
        .iter()
        .find(|row| row.title == "smoke title")
        .expect("created post must be listed");

    let mut detail = DetailState::new(RecordRef::board(newest.id));
    client.load_record(&mut detail, CancelToken::new()).await;
    let post = detail.post().expect("detail must load");
    assert!(post.is_owner);

    let deleted = client.delete_record(&detail).await;
    assert!(matches!(deleted, ActionOutcome::Succeeded { .. }));
}
