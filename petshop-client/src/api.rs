use async_trait::async_trait;
use petshop_core::ApiResult;
use petshop_core::catalog::ProductQuery;
use petshop_core::detail::PostEdit;
use petshop_core::models::{
    AuthResponse, BoardPage, BoardSummary, CreatedPost, EventList, IdCheck, Post, Product,
    ProductSummary, Profile, QnaEntry, QuickReply, ReviewEntry, ServerMessage,
};
use petshop_core::post_form::PostSubmission;
use petshop_core::record::RecordRef;
use petshop_core::signup::{FindIdRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};

/// REST API магазина. Токен передаётся явно; `None` для анонимного запроса.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /api/board?page=&per_page=`.
    async fn list_board(&self, token: &str, page: u32, per_page: u32) -> ApiResult<BoardPage<BoardSummary>>;

    /// `GET /api/board/{id}` или `/api/event/{id}`.
    async fn get_record(&self, token: Option<&str>, record: RecordRef) -> ApiResult<Post>;

    /// `PUT` записи.
    async fn update_record(&self, token: &str, record: RecordRef, edit: &PostEdit) -> ApiResult<()>;

    /// `DELETE` записи.
    async fn delete_record(&self, token: &str, record: RecordRef) -> ApiResult<()>;

    /// `POST /api/board/{id}/answer`.
    async fn post_answer(&self, token: &str, record: RecordRef, content: &str) -> ApiResult<()>;

    /// `POST /api/post` (multipart).
    async fn create_post(&self, token: &str, submission: PostSubmission) -> ApiResult<CreatedPost>;

    /// `GET /api/event`.
    async fn list_events(&self, token: Option<&str>) -> ApiResult<EventList>;

    /// `POST /api/auth/login`.
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;

    /// `POST /api/auth/register`.
    async fn register(&self, request: &RegisterRequest) -> ApiResult<ServerMessage>;

    /// `GET /api/auth/check-id?user_id=`.
    async fn check_user_id(&self, user_id: &str) -> ApiResult<IdCheck>;

    /// `GET /api/auth/me`.
    async fn fetch_profile(&self, token: &str) -> ApiResult<Profile>;

    /// `POST /api/auth/find-id`.
    async fn find_id(&self, request: &FindIdRequest) -> ApiResult<ServerMessage>;

    /// `POST /api/auth/reset-password`.
    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<ServerMessage>;

    /// `POST /api/chat`, возвращает текст ответа.
    async fn send_chat(&self, message: &str) -> ApiResult<String>;

    /// `POST /api/chat/suggestions`.
    async fn chat_suggestions(&self, current_path: &str) -> ApiResult<Vec<QuickReply>>;

    /// `GET /api/me/qna`.
    async fn my_qna(&self, token: &str) -> ApiResult<Vec<QnaEntry>>;

    /// `GET /api/me/reviews`.
    async fn my_reviews(&self, token: &str) -> ApiResult<Vec<ReviewEntry>>;

    /// `GET /api/products?pet=&sub=&page=`.
    async fn list_products(&self, query: &ProductQuery) -> ApiResult<BoardPage<ProductSummary>>;

    /// `GET /api/products/{id}`.
    async fn get_product(&self, id: i64) -> ApiResult<Product>;
}
