use petshop_core::cancel::CancelToken;
use petshop_core::catalog::ProductQuery;
use petshop_core::models::{EventList, Product, ProductSummary};
use petshop_core::pagination::{ListOutcome, ListState};

use crate::ShopClient;
use crate::api::StorefrontApi;
use crate::cancel::until_cancelled;
use crate::error::ShopClientResult;

impl<A: StorefrontApi> ShopClient<A> {
    /// Страница товаров категории. Окно пагинации приходит с сервера.
    pub async fn load_products(
        &self,
        state: &mut ListState<ProductSummary>,
        pet: &str,
        sub: Option<&str>,
        token: CancelToken,
    ) -> ListOutcome {
        let outcome = self.fetch_product_page(state, pet, sub, &token).await;
        if outcome != ListOutcome::ResetToFirstPage {
            return outcome;
        }
        self.fetch_product_page(state, pet, sub, &token).await
    }

    async fn fetch_product_page(
        &self,
        state: &mut ListState<ProductSummary>,
        pet: &str,
        sub: Option<&str>,
        token: &CancelToken,
    ) -> ListOutcome {
        let request = state.begin(token.clone());
        let query = ProductQuery {
            page: request.page,
            ..ProductQuery::new(pet, sub.map(str::to_string))
        };
        match until_cancelled(token, self.api.list_products(&query)).await {
            Some(result) => state.apply(&request, result),
            None => ListOutcome::Stale,
        }
    }

    /// Карточка товара.
    pub async fn product(&self, id: i64) -> ShopClientResult<Product> {
        Ok(self.api.get_product(id).await?)
    }

    /// Список событий вместе с признаком администратора.
    pub async fn events(&self) -> ShopClientResult<EventList> {
        let access = self.session.token();
        let result = self.api.list_events(access.as_deref()).await;
        let result = if access.is_some() { self.observe(result) } else { result };
        Ok(result?)
    }
}
