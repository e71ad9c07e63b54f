use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use petshop_client::{ClientConfig, ShopClient};
use petshop_core::cancel::CancelToken;
use petshop_core::chat::SuggestionState;
use petshop_core::detail::ActionOutcome;
use petshop_core::pagination::{ListOutcome, ListState, NOTICE_PAGE_SIZE};
use petshop_core::post_form::{BoardType, DomainChoice, PostDraft};
use petshop_core::session::{MemoryTokenStore, SessionContext, SessionEvent};
use petshop_core::signup::SignupForm;
use serde_json::json;
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, session: SessionContext) -> ShopClient {
    let config = ClientConfig::new(server.uri()).expect("mock uri must be valid");
    ShopClient::new(&config, session).expect("client must build")
}

fn signed_in() -> SessionContext {
    SessionContext::new(MemoryTokenStore::with_token("secret"))
}

#[tokio::test]
async fn board_sends_bearer_and_page_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/board"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 7, "title": "hello", "writer": "cat", "date": "2026-01-04", "view": 3}],
            "total_pages": 12,
            "start_page": 1,
            "end_page": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, signed_in());
    let mut state = ListState::new(NOTICE_PAGE_SIZE);
    state.set_page(2);

    let outcome = client.load_board(&mut state, CancelToken::new()).await;

    assert_eq!(outcome, ListOutcome::Loaded);
    assert_eq!(state.items()[0].view_count, 3);
    assert_eq!(state.window().buttons(), 1..=10);
}

#[tokio::test]
async fn rejected_token_expires_session_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/board"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "expired"})))
        .mount(&server)
        .await;

    let session = signed_in();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    session.subscribe(move |event| sink.lock().push(event));
    let client = client(&server, session);

    let mut state = ListState::new(NOTICE_PAGE_SIZE);
    let first = client.load_board(&mut state, CancelToken::new()).await;
    let second = client.load_board(&mut state, CancelToken::new()).await;

    assert_eq!(first, ListOutcome::RedirectToLogin);
    assert_eq!(second, ListOutcome::RedirectToLogin);
    assert_eq!(events.lock().as_slice(), &[SessionEvent::Expired]);
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn post_without_email_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/post"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server, signed_in());
    let draft = PostDraft {
        title: "t".to_string(),
        writer: "w".to_string(),
        content: "c".to_string(),
        ..PostDraft::default()
    };

    let outcome = client.submit_post(&draft).await;

    assert!(matches!(outcome, ActionOutcome::Failed(_)));
}

#[tokio::test]
async fn post_is_sent_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/post"))
        .and(header("authorization", "Bearer secret"))
        .and(body_string_contains("name=\"boardType\""))
        .and(body_string_contains("neko@naver.com"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42, "message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, signed_in());
    let mut draft = PostDraft {
        board_type: BoardType::Qna,
        title: "t".to_string(),
        writer: "w".to_string(),
        content: "c".to_string(),
        ..PostDraft::default()
    };
    draft.email.id = "neko".to_string();
    draft.email.domain = DomainChoice::Known("naver.com".to_string());

    let outcome = client.submit_post(&draft).await;

    assert!(matches!(outcome, ActionOutcome::Succeeded { message, .. } if message == "ok"));
}

#[tokio::test]
async fn latest_suggestion_request_wins() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/suggestions"))
        .and(body_partial_json(json!({"current_path": "/main"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"suggestions": [{"label": "main", "answer": "a"}]}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat/suggestions"))
        .and(body_partial_json(json!({"current_path": "/cart"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"suggestions": [{"label": "cart", "answer": "b", "link": "/cart"}]})),
        )
        .mount(&server)
        .await;

    let client = client(&server, SessionContext::in_memory());
    let state = Mutex::new(SuggestionState::new("/main"));
    let slow = state.lock().open().expect("opening issues a request");
    let fast = state
        .lock()
        .route_changed("/cart")
        .expect("route change issues a request");

    let (slow_applied, fast_applied) = tokio::join!(
        client.refresh_suggestions(&state, slow, CancelToken::new()),
        client.refresh_suggestions(&state, fast, CancelToken::new()),
    );

    assert!(!slow_applied);
    assert!(fast_applied);
    let state = state.lock();
    assert_eq!(state.suggestions().len(), 1);
    assert_eq!(state.suggestions()[0].label, "cart");
}

#[tokio::test]
async fn conflict_message_comes_from_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_partial_json(json!({"userId": "neko"})))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"msg": "이미 사용 중인 아이디입니다."})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, SessionContext::in_memory());
    let mut form = SignupForm::default();
    form.set_user_id("neko");
    form.password = "pw".to_string();
    form.password_confirm = "pw".to_string();
    form.nickname = "냥이".to_string();
    form.email = "neko@naver.com".to_string();

    let outcome = client.register(&mut form).await;

    assert_eq!(
        outcome,
        ActionOutcome::Failed("이미 사용 중인 아이디입니다.".to_string())
    );
}

#[tokio::test]
async fn my_qna_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me/qna"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "productName": "츄르", "title": "언제 와요?", "status": "답변대기"}
        ])))
        .mount(&server)
        .await;

    let client = client(&server, signed_in());
    let mut listing = petshop_core::listing::Listing::default();

    client.load_my_qna(&mut listing).await;

    assert_eq!(listing.entries().len(), 1);
    assert_eq!(listing.entries()[0].product_name, "츄르");
}
