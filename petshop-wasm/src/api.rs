use gloo_net::http::{Method, Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

use petshop_core::catalog::ProductQuery;
use petshop_core::chat::{ChatReply, ChatRequest, SuggestionsRequest, SuggestionsResponse};
use petshop_core::detail::PostEdit;
use petshop_core::models::{
    AuthResponse, BoardPage, BoardSummary, CreatedPost, EventList, IdCheck, ListEnvelope, Post,
    PostEnvelope, Product, ProductSummary, Profile, QnaEntry, QuickReply, ReviewEntry,
    ServerMessage,
};
use petshop_core::post_form::{ATTACHMENT_FIELD, PostSubmission};
use petshop_core::record::RecordRef;
use petshop_core::signup::{FindIdRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
use petshop_core::{ApiError, ApiResult};

const API_BASE_URL: &str = match option_env!("WASM_API_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:5000",
};

#[derive(Serialize)]
struct AnswerRequestDto<'a> {
    content: &'a str,
}

fn endpoint(path: &str) -> String {
    format!(
        "{}/{}",
        API_BASE_URL.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn request(method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
    let builder = RequestBuilder::new(&endpoint(path)).method(method);
    match token {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::InvalidRequest(format!("{err:?}"))
}

async fn send(request: Request) -> ApiResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.ok();
        let err = ApiError::from_status(status, body.as_deref());
        tracing::debug!(error = %err, "request rejected by server");
        return Err(err);
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(request: Request) -> ApiResult<T> {
    send(request)
        .await?
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

fn build(builder: RequestBuilder) -> ApiResult<Request> {
    builder
        .build()
        .map_err(|err| ApiError::InvalidRequest(err.to_string()))
}

fn with_json<T: Serialize + ?Sized>(builder: RequestBuilder, body: &T) -> ApiResult<Request> {
    builder
        .json(body)
        .map_err(|err| ApiError::InvalidRequest(err.to_string()))
}

pub(crate) async fn list_board(
    token: &str,
    page: u32,
    per_page: u32,
) -> ApiResult<BoardPage<BoardSummary>> {
    let page = page.to_string();
    let per_page = per_page.to_string();
    let builder = request(Method::GET, "/api/board", Some(token))
        .query([("page", page.as_str()), ("per_page", per_page.as_str())]);
    read_json(build(builder)?).await
}

pub(crate) async fn get_record(token: Option<&str>, record: RecordRef) -> ApiResult<Post> {
    let envelope: PostEnvelope =
        read_json(build(request(Method::GET, &record.api_path(), token))?).await?;
    Ok(envelope.into_post())
}

pub(crate) async fn update_record(token: &str, record: RecordRef, edit: &PostEdit) -> ApiResult<()> {
    let request = with_json(request(Method::PUT, &record.api_path(), Some(token)), edit)?;
    send(request).await.map(drop)
}

pub(crate) async fn delete_record(token: &str, record: RecordRef) -> ApiResult<()> {
    send(build(request(Method::DELETE, &record.api_path(), Some(token)))?)
        .await
        .map(drop)
}

pub(crate) async fn post_answer(token: &str, record: RecordRef, content: &str) -> ApiResult<()> {
    let path = record.answer_api_path().ok_or_else(|| {
        ApiError::InvalidRequest(format!("{} does not accept answers", record.api_path()))
    })?;
    let request = with_json(
        request(Method::POST, &path, Some(token)),
        &AnswerRequestDto { content },
    )?;
    send(request).await.map(drop)
}

/// Multipart-пост. Файл из браузера идёт отдельным `File`, а не байтами формы.
pub(crate) async fn create_post(
    token: &str,
    submission: PostSubmission,
    file: Option<File>,
) -> ApiResult<CreatedPost> {
    let (fields, _) = submission.into_parts();
    let form = FormData::new().map_err(js_error)?;
    for (name, value) in fields {
        form.append_with_str(name, &value).map_err(js_error)?;
    }
    if let Some(file) = file {
        form.append_with_blob_and_filename(ATTACHMENT_FIELD, &file, &file.name())
            .map_err(js_error)?;
    }

    let request = request(Method::POST, "/api/post", Some(token))
        .body(form)
        .map_err(|err| ApiError::InvalidRequest(err.to_string()))?;
    read_json(request).await
}

pub(crate) async fn list_events(token: Option<&str>) -> ApiResult<EventList> {
    read_json(build(request(Method::GET, "/api/event", token))?).await
}

pub(crate) async fn login(payload: &LoginRequest) -> ApiResult<AuthResponse> {
    read_json(with_json(request(Method::POST, "/api/auth/login", None), payload)?).await
}

pub(crate) async fn register(payload: &RegisterRequest) -> ApiResult<ServerMessage> {
    read_json(with_json(request(Method::POST, "/api/auth/register", None), payload)?).await
}

pub(crate) async fn check_user_id(user_id: &str) -> ApiResult<IdCheck> {
    let builder = request(Method::GET, "/api/auth/check-id", None).query([("user_id", user_id)]);
    read_json(build(builder)?).await
}

pub(crate) async fn fetch_profile(token: &str) -> ApiResult<Profile> {
    read_json(build(request(Method::GET, "/api/auth/me", Some(token)))?).await
}

pub(crate) async fn find_id(payload: &FindIdRequest) -> ApiResult<ServerMessage> {
    read_json(with_json(request(Method::POST, "/api/auth/find-id", None), payload)?).await
}

pub(crate) async fn reset_password(payload: &ResetPasswordRequest) -> ApiResult<ServerMessage> {
    read_json(with_json(request(Method::POST, "/api/auth/reset-password", None), payload)?).await
}

pub(crate) async fn send_chat(message: &str) -> ApiResult<String> {
    let payload = ChatRequest {
        message: message.to_string(),
    };
    let reply: ChatReply =
        read_json(with_json(request(Method::POST, "/api/chat", None), &payload)?).await?;
    Ok(reply.reply)
}

pub(crate) async fn chat_suggestions(current_path: &str) -> ApiResult<Vec<QuickReply>> {
    let payload = SuggestionsRequest {
        current_path: current_path.to_string(),
    };
    let response: SuggestionsResponse = read_json(with_json(
        request(Method::POST, "/api/chat/suggestions", None),
        &payload,
    )?)
    .await?;
    Ok(response.suggestions)
}

pub(crate) async fn my_qna(token: &str) -> ApiResult<Vec<QnaEntry>> {
    let list: ListEnvelope<QnaEntry> =
        read_json(build(request(Method::GET, "/api/me/qna", Some(token)))?).await?;
    Ok(list.into_items())
}

pub(crate) async fn my_reviews(token: &str) -> ApiResult<Vec<ReviewEntry>> {
    let list: ListEnvelope<ReviewEntry> =
        read_json(build(request(Method::GET, "/api/me/reviews", Some(token)))?).await?;
    Ok(list.into_items())
}

pub(crate) async fn list_products(query: &ProductQuery) -> ApiResult<BoardPage<ProductSummary>> {
    let pairs = query.query_pairs();
    let builder = request(Method::GET, "/api/products", None)
        .query(pairs.iter().map(|(key, value)| (*key, value.as_str())));
    read_json(build(builder)?).await
}

pub(crate) async fn get_product(id: i64) -> ApiResult<Product> {
    read_json(build(request(Method::GET, &format!("/api/products/{id}"), None))?).await
}
