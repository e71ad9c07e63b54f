use petshop_core::listing::{Listing, fallback_reviews};
use petshop_core::models::{QnaEntry, ReviewEntry};

use crate::ShopClient;
use crate::api::StorefrontApi;

impl<A: StorefrontApi> ShopClient<A> {
    /// Мои вопросы. При ошибке список пуст.
    pub async fn load_my_qna(&self, listing: &mut Listing<QnaEntry>) {
        let result = match self.require_token() {
            Ok(access) => {
                let result = self.api.my_qna(&access).await;
                self.observe(result)
            }
            Err(err) => Err(err),
        };
        listing.apply(result);
    }

    /// Мои отзывы. При ошибке показываются демо-данные.
    pub async fn load_my_reviews(&self, listing: &mut Listing<ReviewEntry>) {
        let result = match self.require_token() {
            Ok(access) => {
                let result = self.api.my_reviews(&access).await;
                self.observe(result)
            }
            Err(err) => Err(err),
        };
        listing.apply_or(result, fallback_reviews);
    }
}

#[cfg(test)]
mod tests {
    use petshop_core::ApiError;
    use petshop_core::session::{MemoryTokenStore, SessionContext};

    use super::*;
    use crate::fake::FakeApi;

    #[tokio::test]
    async fn review_failure_shows_demo_data() {
        let api = FakeApi::new();
        FakeApi::set(&api.reviews, Err(ApiError::NotFound));
        let client = ShopClient::with_api(api, SessionContext::new(MemoryTokenStore::with_token("t")));
        let mut listing = Listing::default();

        client.load_my_reviews(&mut listing).await;

        assert_eq!(listing.entries().len(), fallback_reviews().len());
        assert!(!listing.is_loading());
    }

    #[tokio::test]
    async fn qna_without_session_is_empty() {
        let api = FakeApi::new();
        let client = ShopClient::with_api(api.clone(), SessionContext::in_memory());
        let mut listing = Listing::default();

        client.load_my_qna(&mut listing).await;

        assert!(listing.entries().is_empty());
        assert_eq!(api.count("my_qna"), 0);
    }
}
