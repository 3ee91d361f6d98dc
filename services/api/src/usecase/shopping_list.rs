use crate::domain::repository::ShoppingListPort;
use crate::domain::shopping_list::{aggregate, render};
use crate::error::ApiError;

pub struct DownloadShoppingListUseCase<P: ShoppingListPort> {
    pub port: P,
}

impl<P: ShoppingListPort> DownloadShoppingListUseCase<P> {
    /// Plain-text shopping list for the user's cart.
    pub async fn execute(&self, user_id: i32) -> Result<String, ApiError> {
        let lines = self.port.cart_lines(user_id).await?;
        Ok(render(&aggregate(lines)))
    }
}
