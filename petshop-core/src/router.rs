//! Таблица маршрутов фронтенда.

use std::fmt;

use crate::record::{RecordKind, RecordRef};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Маршрут приложения.
pub enum Route {
    /// `/login`.
    Login,
    /// `/signup`.
    Signup,
    /// `/find-account`.
    FindAccount,
    /// `/` и `/main`.
    Main,
    /// `/noticeboard`.
    Noticeboard,
    /// `/events`.
    Events,
    /// `/board/:id` и `/events/:id`.
    Detail(RecordRef),
    /// `/board/edit/:id` и `/events/edit/:id`.
    Edit(RecordRef),
    /// `/write`.
    Write,
    /// `/category/:pet[/:sub]`.
    Category {
        /// Вид питомца.
        pet: String,
        /// Подкатегория.
        sub: Option<String>,
    },
    /// `/product/:id`.
    Product(i64),
    /// `/cart`.
    Cart,
    /// `/order-complete`.
    OrderComplete,
    /// `/support`.
    Support,
    /// `/mypage/qna`.
    MyQna,
    /// `/mypage/reviews`.
    MyReviews,
    /// Всё остальное.
    NotFound,
}

fn record_route(kind: RecordKind, rest: &[&str]) -> Route {
    match rest {
        [] => match kind {
            RecordKind::Board => Route::NotFound,
            RecordKind::Event => Route::Events,
        },
        [id] => id
            .parse()
            .map(|id| Route::Detail(RecordRef { kind, id }))
            .unwrap_or(Route::NotFound),
        ["edit", id] => id
            .parse()
            .map(|id| Route::Edit(RecordRef { kind, id }))
            .unwrap_or(Route::NotFound),
        _ => Route::NotFound,
    }
}

impl Route {
    /// Разбирает путь; query и fragment отбрасываются.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["main"] => Self::Main,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["find-account"] => Self::FindAccount,
            ["noticeboard"] => Self::Noticeboard,
            ["board", rest @ ..] => record_route(RecordKind::Board, rest),
            ["events", rest @ ..] => record_route(RecordKind::Event, rest),
            ["write"] => Self::Write,
            ["category", pet] => Self::Category {
                pet: pet.to_string(),
                sub: None,
            },
            ["category", pet, sub] => Self::Category {
                pet: pet.to_string(),
                sub: Some(sub.to_string()),
            },
            ["product", id] => id.parse().map(Self::Product).unwrap_or(Self::NotFound),
            ["cart"] => Self::Cart,
            ["order-complete"] => Self::OrderComplete,
            ["support"] => Self::Support,
            ["mypage", "qna"] => Self::MyQna,
            ["mypage", "reviews"] => Self::MyReviews,
            _ => Self::NotFound,
        }
    }

    /// Канонический путь.
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::FindAccount => "/find-account".to_string(),
            Self::Main => "/main".to_string(),
            Self::Noticeboard => "/noticeboard".to_string(),
            Self::Events => "/events".to_string(),
            Self::Detail(record) => record.detail_route(),
            Self::Edit(record) => record.edit_route(),
            Self::Write => "/write".to_string(),
            Self::Category { pet, sub: None } => format!("/category/{pet}"),
            Self::Category { pet, sub: Some(sub) } => format!("/category/{pet}/{sub}"),
            Self::Product(id) => format!("/product/{id}"),
            Self::Cart => "/cart".to_string(),
            Self::OrderComplete => "/order-complete".to_string(),
            Self::Support => "/support".to_string(),
            Self::MyQna => "/mypage/qna".to_string(),
            Self::MyReviews => "/mypage/reviews".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Страницы входа/регистрации рендерятся без общей навигации и подвала.
    pub fn has_layout(&self) -> bool {
        !matches!(self, Self::Login | Self::Signup | Self::FindAccount)
    }

    /// Без токена страница уводит на `/login`.
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::Noticeboard
                | Self::Edit(_)
                | Self::Write
                | Self::Cart
                | Self::MyQna
                | Self::MyReviews
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_routes_with_explicit_kind() {
        assert_eq!(Route::parse("/board/5"), Route::Detail(RecordRef::board(5)));
        assert_eq!(Route::parse("/events/edit/7"), Route::Edit(RecordRef::event(7)));
        assert_eq!(Route::parse("/events"), Route::Events);
        assert_eq!(Route::parse("/board"), Route::NotFound);
        assert_eq!(Route::parse("/board/abc"), Route::NotFound);
    }

    #[test]
    fn parses_category_and_ignores_query() {
        assert_eq!(
            Route::parse("/category/dog/food?page=2"),
            Route::Category {
                pet: "dog".to_string(),
                sub: Some("food".to_string())
            }
        );
        assert_eq!(Route::parse("/"), Route::Main);
        assert_eq!(Route::parse("/nope/deeper"), Route::NotFound);
    }

    #[test]
    fn paths_round_trip_for_known_routes() {
        for raw in ["/login", "/noticeboard", "/board/edit/3", "/product/11", "/mypage/reviews"] {
            assert_eq!(Route::parse(raw).path(), raw);
        }
    }

    #[test]
    fn auth_pages_are_bare_and_public() {
        assert!(!Route::Login.has_layout());
        assert!(!Route::Signup.requires_session());
        assert!(Route::Main.has_layout());
        assert!(Route::Write.requires_session());
        assert!(Route::Noticeboard.requires_session());
        assert!(!Route::Support.requires_session());
    }

    #[test]
    fn token_only_pages_are_guarded() {
        for path in ["/noticeboard", "/board/edit/3", "/events/edit/4", "/mypage/qna", "/mypage/reviews"] {
            assert!(Route::parse(path).requires_session(), "{path} must be guarded");
        }
        assert!(!Route::parse("/board/3").requires_session());
    }
}
