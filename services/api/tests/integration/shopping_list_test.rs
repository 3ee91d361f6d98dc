use foodgram_api::domain::types::CartLine;
use foodgram_api::usecase::shopping_list::DownloadShoppingListUseCase;

use crate::helpers::MockShoppingList;

fn line(ingredient_id: i32, name: &str, unit: &str, amount: f64) -> CartLine {
    CartLine {
        ingredient_id,
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
        amount,
    }
}

#[tokio::test]
async fn should_sum_amounts_across_recipes_in_cart() {
    let usecase = DownloadShoppingListUseCase {
        port: MockShoppingList {
            lines: vec![
                line(2, "sugar", "g", 30.0),
                line(1, "flour", "g", 200.0),
                line(2, "sugar", "g", 20.0),
                line(3, "milk", "ml", 0.5),
            ],
        },
    };

    let text = usecase.execute(1).await.unwrap();

    assert_eq!(text, "flour 200 g\nmilk 0.5 ml\nsugar 50 g\n");
}

#[tokio::test]
async fn should_return_empty_text_for_empty_cart() {
    let usecase = DownloadShoppingListUseCase {
        port: MockShoppingList { lines: vec![] },
    };

    assert_eq!(usecase.execute(1).await.unwrap(), "");
}
