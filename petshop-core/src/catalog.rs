//! Каталог товаров и корзина.

use crate::models::{Product, ProductSummary};

/// Сумма заказа, начиная с которой доставка бесплатна (в вонах).
pub const FREE_SHIPPING_THRESHOLD: i64 = 30_000;

/// Стоимость доставки ниже порога.
pub const SHIPPING_FEE: i64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Параметры списка товаров.
pub struct ProductQuery {
    /// Вид питомца (`dog`, `cat`).
    pub pet: String,
    /// Подкатегория.
    pub sub: Option<String>,
    /// Страница.
    pub page: u32,
}

impl ProductQuery {
    /// Первая страница категории.
    pub fn new(pet: impl Into<String>, sub: Option<String>) -> Self {
        Self {
            pet: pet.into(),
            sub,
            page: 1,
        }
    }

    /// Query-параметры `GET /api/products`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("pet", self.pet.clone())];
        if let Some(sub) = self.sub.as_ref().filter(|s| !s.is_empty()) {
            pairs.push(("sub", sub.clone()));
        }
        pairs.push(("page", self.page.max(1).to_string()));
        pairs
    }
}

/// Цена в вонах с разделителями тысяч: `12,900원`.
pub fn format_price(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped}원")
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Строка корзины.
pub struct CartLine {
    /// Товар.
    pub product_id: i64,
    /// Название.
    pub name: String,
    /// Цена за штуку.
    pub price: i64,
    /// Количество, не меньше 1.
    pub quantity: u32,
}

impl CartLine {
    /// Стоимость строки.
    pub fn total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

impl From<&Product> for CartLine {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
        }
    }
}

impl From<&ProductSummary> for CartLine {
    fn from(product: &ProductSummary) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Корзина, живущая только на клиенте.
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Строки.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Пуста ли корзина.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Добавляет товар; повторное добавление увеличивает количество.
    pub fn add(&mut self, line: CartLine) {
        match self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => existing.quantity += line.quantity.max(1),
            None => self.lines.push(CartLine {
                quantity: line.quantity.max(1),
                ..line
            }),
        }
    }

    /// Меняет количество; ноль удаляет строку.
    pub fn set_quantity(&mut self, product_id: i64, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Удаляет строку.
    pub fn remove(&mut self, product_id: i64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Очищает корзину после оформления.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Сумма товаров.
    pub fn subtotal(&self) -> i64 {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Доставка: бесплатно от порога, для пустой корзины ноль.
    pub fn shipping(&self) -> i64 {
        let subtotal = self.subtotal();
        if subtotal == 0 || subtotal >= FREE_SHIPPING_THRESHOLD {
            0
        } else {
            SHIPPING_FEE
        }
    }

    /// К оплате.
    pub fn total(&self) -> i64 {
        self.subtotal() + self.shipping()
    }

    /// Сколько осталось до бесплатной доставки.
    pub fn until_free_shipping(&self) -> i64 {
        (FREE_SHIPPING_THRESHOLD - self.subtotal()).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i64, price: i64) -> CartLine {
        CartLine {
            product_id: id,
            name: format!("item {id}"),
            price,
            quantity: 1,
        }
    }

    #[test]
    fn query_pairs_skip_empty_sub() {
        let query = ProductQuery::new("dog", Some(String::new()));
        assert_eq!(
            query.query_pairs(),
            vec![("pet", "dog".to_string()), ("page", "1".to_string())]
        );

        let query = ProductQuery {
            page: 3,
            ..ProductQuery::new("cat", Some("toy".to_string()))
        };
        assert_eq!(query.query_pairs().len(), 3);
    }

    #[test]
    fn shipping_is_free_from_threshold() {
        let mut cart = Cart::default();
        assert_eq!(cart.total(), 0);

        cart.add(line(1, 12_000));
        assert_eq!(cart.shipping(), SHIPPING_FEE);
        assert_eq!(cart.until_free_shipping(), 18_000);

        cart.add(line(1, 12_000));
        cart.add(line(2, 6_000));
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.subtotal(), 30_000);
        assert_eq!(cart.shipping(), 0);
        assert_eq!(cart.total(), 30_000);
    }

    #[test]
    fn zero_quantity_removes_line() {
        let mut cart = Cart::default();
        cart.add(line(1, 1_000));
        cart.set_quantity(1, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn prices_are_grouped() {
        assert_eq!(format_price(0), "0원");
        assert_eq!(format_price(12_900), "12,900원");
        assert_eq!(format_price(1_234_567), "1,234,567원");
    }
}
