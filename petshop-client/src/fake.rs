use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use petshop_core::catalog::ProductQuery;
use petshop_core::detail::PostEdit;
use petshop_core::models::{
    Answer, AuthResponse, BoardPage, BoardSummary, CreatedPost, EventList, IdCheck, Post, Product,
    ProductSummary, Profile, QnaEntry, QuickReply, ReviewEntry, ServerMessage,
};
use petshop_core::post_form::PostSubmission;
use petshop_core::record::RecordRef;
use petshop_core::signup::{FindIdRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
use petshop_core::{ApiError, ApiResult};

use crate::api::StorefrontApi;

type Slot<T> = Arc<Mutex<ApiResult<T>>>;

fn slot<T>() -> Slot<T> {
    Arc::new(Mutex::new(Err(ApiError::NotFound)))
}

fn take<T: Clone>(slot: &Slot<T>) -> ApiResult<T> {
    slot.lock().expect("fake slot mutex poisoned").clone()
}

pub(crate) fn sample_post(id: i64, is_owner: bool, is_admin: bool) -> Post {
    Post {
        id,
        title: format!("post {id}"),
        content: "body".to_string(),
        writer: "cat".to_string(),
        date: "2026-01-04".to_string(),
        category: "문의사항".to_string(),
        view_count: 1,
        img_url: None,
        is_owner,
        is_admin,
        answers: Vec::<Answer>::new(),
    }
}

#[derive(Clone)]
pub(crate) struct FakeApi {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub tokens: Arc<Mutex<Vec<Option<String>>>>,
    pub board: Slot<BoardPage<BoardSummary>>,
    pub record: Slot<Post>,
    pub update: Slot<()>,
    pub delete: Slot<()>,
    pub answer: Slot<()>,
    pub created: Slot<CreatedPost>,
    pub submissions: Arc<Mutex<Vec<PostSubmission>>>,
    pub events: Slot<EventList>,
    pub login: Slot<AuthResponse>,
    pub register: Slot<ServerMessage>,
    pub id_check: Slot<IdCheck>,
    pub profile: Slot<Profile>,
    pub recovery: Slot<ServerMessage>,
    pub chat: Slot<String>,
    pub suggestions: Slot<Vec<QuickReply>>,
    pub qna: Slot<Vec<QnaEntry>>,
    pub reviews: Slot<Vec<ReviewEntry>>,
    pub products: Slot<BoardPage<ProductSummary>>,
    pub product: Slot<Product>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            tokens: Arc::new(Mutex::new(Vec::new())),
            board: slot(),
            record: slot(),
            update: slot(),
            delete: slot(),
            answer: slot(),
            created: slot(),
            submissions: Arc::new(Mutex::new(Vec::new())),
            events: slot(),
            login: slot(),
            register: slot(),
            id_check: slot(),
            profile: slot(),
            recovery: slot(),
            chat: slot(),
            suggestions: slot(),
            qna: slot(),
            reviews: slot(),
            products: slot(),
            product: slot(),
        }
    }

    pub fn set<T>(slot: &Slot<T>, value: ApiResult<T>) {
        *slot.lock().expect("fake slot mutex poisoned") = value;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record_call(&self, name: &str, token: Option<&str>) {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(name.to_string());
        self.tokens
            .lock()
            .expect("tokens mutex poisoned")
            .push(token.map(str::to_string));
    }
}

#[async_trait]
impl StorefrontApi for FakeApi {
    async fn list_board(&self, token: &str, _page: u32, _per_page: u32) -> ApiResult<BoardPage<BoardSummary>> {
        self.record_call("list_board", Some(token));
        take(&self.board)
    }

    async fn get_record(&self, token: Option<&str>, _record: RecordRef) -> ApiResult<Post> {
        self.record_call("get_record", token);
        take(&self.record)
    }

    async fn update_record(&self, token: &str, _record: RecordRef, _edit: &PostEdit) -> ApiResult<()> {
        self.record_call("update_record", Some(token));
        take(&self.update)
    }

    async fn delete_record(&self, token: &str, _record: RecordRef) -> ApiResult<()> {
        self.record_call("delete_record", Some(token));
        take(&self.delete)
    }

    async fn post_answer(&self, token: &str, _record: RecordRef, _content: &str) -> ApiResult<()> {
        self.record_call("post_answer", Some(token));
        take(&self.answer)
    }

    async fn create_post(&self, token: &str, submission: PostSubmission) -> ApiResult<CreatedPost> {
        self.record_call("create_post", Some(token));
        self.submissions
            .lock()
            .expect("submissions mutex poisoned")
            .push(submission);
        take(&self.created)
    }

    async fn list_events(&self, token: Option<&str>) -> ApiResult<EventList> {
        self.record_call("list_events", token);
        take(&self.events)
    }

    async fn login(&self, _request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.record_call("login", None);
        take(&self.login)
    }

    async fn register(&self, _request: &RegisterRequest) -> ApiResult<ServerMessage> {
        self.record_call("register", None);
        take(&self.register)
    }

    async fn check_user_id(&self, _user_id: &str) -> ApiResult<IdCheck> {
        self.record_call("check_user_id", None);
        take(&self.id_check)
    }

    async fn fetch_profile(&self, token: &str) -> ApiResult<Profile> {
        self.record_call("fetch_profile", Some(token));
        take(&self.profile)
    }

    async fn find_id(&self, _request: &FindIdRequest) -> ApiResult<ServerMessage> {
        self.record_call("find_id", None);
        take(&self.recovery)
    }

    async fn reset_password(&self, _request: &ResetPasswordRequest) -> ApiResult<ServerMessage> {
        self.record_call("reset_password", None);
        take(&self.recovery)
    }

    async fn send_chat(&self, _message: &str) -> ApiResult<String> {
        self.record_call("send_chat", None);
        take(&self.chat)
    }

    async fn chat_suggestions(&self, _current_path: &str) -> ApiResult<Vec<QuickReply>> {
        self.record_call("chat_suggestions", None);
        take(&self.suggestions)
    }

    async fn my_qna(&self, token: &str) -> ApiResult<Vec<QnaEntry>> {
        self.record_call("my_qna", Some(token));
        take(&self.qna)
    }

    async fn my_reviews(&self, token: &str) -> ApiResult<Vec<ReviewEntry>> {
        self.record_call("my_reviews", Some(token));
        take(&self.reviews)
    }

    async fn list_products(&self, _query: &ProductQuery) -> ApiResult<BoardPage<ProductSummary>> {
        self.record_call("list_products", None);
        take(&self.products)
    }

    async fn get_product(&self, _id: i64) -> ApiResult<Product> {
        self.record_call("get_product", None);
        take(&self.product)
    }
}
