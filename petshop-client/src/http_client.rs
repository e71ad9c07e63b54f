use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};

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

use crate::api::StorefrontApi;
use crate::config::ClientConfig;
use crate::error::{ShopClientError, ShopClientResult, from_reqwest};

#[derive(Debug, Serialize)]
struct AnswerRequestDto<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct BoardQuery {
    page: u32,
    per_page: u32,
}

#[derive(Debug, Serialize)]
struct CheckIdQuery<'a> {
    user_id: &'a str,
}

#[derive(Debug, Clone)]
/// HTTP-клиент REST API магазина.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт клиент по конфигурации.
    pub fn new(config: &ClientConfig) -> ShopClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| ShopClientError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.ok();
        ApiError::from_status(status, body.as_deref())
    }

    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(from_reqwest)?;
        if !response.status().is_success() {
            let err = Self::decode_error(response).await;
            tracing::debug!(error = %err, "request rejected by server");
            return Err(err);
        }
        Ok(response)
    }

    async fn read_json<TRes: DeserializeOwned>(request: RequestBuilder) -> ApiResult<TRes> {
        let response = Self::send(request).await?;
        response.json::<TRes>().await.map_err(from_reqwest)
    }

    /// универсальный helper для запросов с json-payload
    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> ApiResult<TRes>
    where
        TReq: Serialize + ?Sized,
        TRes: DeserializeOwned,
    {
        Self::read_json(self.request(method, path, token).json(body)).await
    }

    fn multipart(submission: PostSubmission) -> ApiResult<Form> {
        let (fields, attachment) = submission.into_parts();
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        if let Some(file) = attachment {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime_type)
                .map_err(|err| ApiError::InvalidRequest(format!("invalid attachment type: {err}")))?;
            form = form.part(ATTACHMENT_FIELD, part);
        }
        Ok(form)
    }
}

#[async_trait]
impl StorefrontApi for HttpClient {
    async fn list_board(&self, token: &str, page: u32, per_page: u32) -> ApiResult<BoardPage<BoardSummary>> {
        let query = BoardQuery { page, per_page };
        Self::read_json(self.request(Method::GET, "/api/board", Some(token)).query(&query)).await
    }

    async fn get_record(&self, token: Option<&str>, record: RecordRef) -> ApiResult<Post> {
        let envelope: PostEnvelope =
            Self::read_json(self.request(Method::GET, &record.api_path(), token)).await?;
        Ok(envelope.into_post())
    }

    async fn update_record(&self, token: &str, record: RecordRef, edit: &PostEdit) -> ApiResult<()> {
        let request = self
            .request(Method::PUT, &record.api_path(), Some(token))
            .json(edit);
        Self::send(request).await.map(drop)
    }

    async fn delete_record(&self, token: &str, record: RecordRef) -> ApiResult<()> {
        let request = self.request(Method::DELETE, &record.api_path(), Some(token));
        Self::send(request).await.map(drop)
    }

    async fn post_answer(&self, token: &str, record: RecordRef, content: &str) -> ApiResult<()> {
        let path = record.answer_api_path().ok_or_else(|| {
            ApiError::InvalidRequest(format!("{} does not accept answers", record.api_path()))
        })?;
        let request = self
            .request(Method::POST, &path, Some(token))
            .json(&AnswerRequestDto { content });
        Self::send(request).await.map(drop)
    }

    async fn create_post(&self, token: &str, submission: PostSubmission) -> ApiResult<CreatedPost> {
        let form = Self::multipart(submission)?;
        Self::read_json(self.request(Method::POST, "/api/post", Some(token)).multipart(form)).await
    }

    async fn list_events(&self, token: Option<&str>) -> ApiResult<EventList> {
        Self::read_json(self.request(Method::GET, "/api/event", token)).await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.send_json(Method::POST, "/api/auth/login", request, None)
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<ServerMessage> {
        self.send_json(Method::POST, "/api/auth/register", request, None)
            .await
    }

    async fn check_user_id(&self, user_id: &str) -> ApiResult<IdCheck> {
        let request = self
            .request(Method::GET, "/api/auth/check-id", None)
            .query(&CheckIdQuery { user_id });
        Self::read_json(request).await
    }

    async fn fetch_profile(&self, token: &str) -> ApiResult<Profile> {
        Self::read_json(self.request(Method::GET, "/api/auth/me", Some(token))).await
    }

    async fn find_id(&self, request: &FindIdRequest) -> ApiResult<ServerMessage> {
        self.send_json(Method::POST, "/api/auth/find-id", request, None)
            .await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<ServerMessage> {
        self.send_json(Method::POST, "/api/auth/reset-password", request, None)
            .await
    }

    async fn send_chat(&self, message: &str) -> ApiResult<String> {
        let payload = ChatRequest {
            message: message.to_string(),
        };
        let reply: ChatReply = self
            .send_json(Method::POST, "/api/chat", &payload, None)
            .await?;
        Ok(reply.reply)
    }

    async fn chat_suggestions(&self, current_path: &str) -> ApiResult<Vec<QuickReply>> {
        let payload = SuggestionsRequest {
            current_path: current_path.to_string(),
        };
        let response: SuggestionsResponse = self
            .send_json(Method::POST, "/api/chat/suggestions", &payload, None)
            .await?;
        Ok(response.suggestions)
    }

    async fn my_qna(&self, token: &str) -> ApiResult<Vec<QnaEntry>> {
        let list: ListEnvelope<QnaEntry> =
            Self::read_json(self.request(Method::GET, "/api/me/qna", Some(token))).await?;
        Ok(list.into_items())
    }

    async fn my_reviews(&self, token: &str) -> ApiResult<Vec<ReviewEntry>> {
        let list: ListEnvelope<ReviewEntry> =
            Self::read_json(self.request(Method::GET, "/api/me/reviews", Some(token))).await?;
        Ok(list.into_items())
    }

    async fn list_products(&self, query: &ProductQuery) -> ApiResult<BoardPage<ProductSummary>> {
        let request = self
            .request(Method::GET, "/api/products", None)
            .query(&query.query_pairs());
        Self::read_json(request).await
    }

    async fn get_product(&self, id: i64) -> ApiResult<Product> {
        Self::read_json(self.request(Method::GET, &format!("/api/products/{id}"), None)).await
    }
}
