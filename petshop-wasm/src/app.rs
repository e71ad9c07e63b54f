use leptos::prelude::*;
use leptos_router::components::{A, ParentRoute, Route, Router, Routes};
use leptos_router::path;
use petshop_core::record::RecordKind;

use crate::components::layout::Layout;
use crate::pages::account::{FindAccountPage, LoginPage, SignupPage};
use crate::pages::board::{DetailPage, EditPage, NoticeboardPage, WritePage};
use crate::pages::catalog::{
    CartPage, CategoryPage, EventsPage, MainPage, OrderCompletePage, ProductPage, SupportPage,
};
use crate::pages::mypage::{MyQnaPage, MyReviewsPage};
use crate::state::AppState;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppState::new());

    view! {
        <Router>
            <Routes fallback=|| view! { <NotFound /> }>
                <Route path=path!("/login") view=LoginPage />
                <Route path=path!("/signup") view=SignupPage />
                <Route path=path!("/find-account") view=FindAccountPage />

                <ParentRoute path=path!("") view=Layout>
                    <Route path=path!("") view=MainPage />
                    <Route path=path!("main") view=MainPage />
                    <Route path=path!("noticeboard") view=NoticeboardPage />
                    <Route
                        path=path!("board/:id")
                        view=|| view! { <DetailPage kind=RecordKind::Board /> }
                    />
                    <Route
                        path=path!("board/edit/:id")
                        view=|| view! { <EditPage kind=RecordKind::Board /> }
                    />
                    <Route path=path!("events") view=EventsPage />
                    <Route
                        path=path!("events/:id")
                        view=|| view! { <DetailPage kind=RecordKind::Event /> }
                    />
                    <Route
                        path=path!("events/edit/:id")
                        view=|| view! { <EditPage kind=RecordKind::Event /> }
                    />
                    <Route path=path!("write") view=WritePage />
                    <Route path=path!("category/:pet") view=CategoryPage />
                    <Route path=path!("category/:pet/:sub") view=CategoryPage />
                    <Route path=path!("product/:id") view=ProductPage />
                    <Route path=path!("cart") view=CartPage />
                    <Route path=path!("order-complete") view=OrderCompletePage />
                    <Route path=path!("support") view=SupportPage />
                    <Route path=path!("mypage/qna") view=MyQnaPage />
                    <Route path=path!("mypage/reviews") view=MyReviewsPage />
                </ParentRoute>
            </Routes>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <main class="page not-found">
            <h1>"404"</h1>
            <p>"Страница не найдена."</p>
            <A href="/main">"На главную"</A>
        </main>
    }
}
