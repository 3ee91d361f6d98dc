use std::collections::HashSet;

use foodgram_api::domain::filter::{RecipeFilter, RecipeFilterParams};
use foodgram_api::domain::types::{CallerMarks, IngredientAmountInput};
use foodgram_api::usecase::recipe::{
    CreateRecipeInput, CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase,
    ListRecipesUseCase, UpdateRecipeInput, UpdateRecipeUseCase,
};
use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;

use crate::helpers::{
    MockCallerMarks, MockImageStore, MockIngredientRepo, MockRecipeRepo, MockTagRepo, TEST_IMAGE,
    assert_error, test_ingredient, test_recipe, test_tag,
};

fn create_usecase(
    recipes: MockRecipeRepo,
) -> CreateRecipeUseCase<MockRecipeRepo, MockTagRepo, MockIngredientRepo, MockImageStore> {
    CreateRecipeUseCase {
        repo: recipes,
        tags: MockTagRepo::new(vec![test_tag(1, "breakfast"), test_tag(2, "dinner")]),
        ingredients: MockIngredientRepo::new(vec![
            test_ingredient(1, "flour"),
            test_ingredient(2, "sugar"),
        ]),
        images: MockImageStore::new(),
    }
}

fn update_usecase(
    recipes: MockRecipeRepo,
) -> UpdateRecipeUseCase<MockRecipeRepo, MockTagRepo, MockIngredientRepo, MockImageStore> {
    UpdateRecipeUseCase {
        repo: recipes,
        tags: MockTagRepo::new(vec![test_tag(1, "breakfast"), test_tag(2, "dinner")]),
        ingredients: MockIngredientRepo::new(vec![test_ingredient(1, "flour")]),
        images: MockImageStore::new(),
    }
}

fn pancakes() -> CreateRecipeInput {
    CreateRecipeInput {
        name: "Pancakes".to_owned(),
        text: "Whisk and fry.".to_owned(),
        image: TEST_IMAGE.to_owned(),
        cooking_time: 20,
        tags: vec![2, 1, 2],
        ingredients: vec![
            IngredientAmountInput {
                ingredient_id: 1,
                amount: 250.0,
            },
            IngredientAmountInput {
                ingredient_id: 2,
                amount: 30.0,
            },
        ],
    }
}

// ── CreateRecipeUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_recipe_with_deduplicated_tags_and_stored_image() {
    let usecase = create_usecase(MockRecipeRepo::empty());

    let id = usecase.execute(5, pancakes()).await.unwrap();

    assert_eq!(id, 101);
    let created = usecase.repo.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].author_id, 5);
    assert_eq!(created[0].tag_ids, vec![2, 1]);
    assert_eq!(created[0].image, "recipes/upload-1.png");
    assert_eq!(created[0].ingredients.len(), 2);
}

#[tokio::test]
async fn should_reject_recipe_without_tags() {
    let usecase = create_usecase(MockRecipeRepo::empty());
    let input = CreateRecipeInput {
        tags: vec![],
        ..pancakes()
    };

    assert_error(usecase.execute(5, input).await, "VALIDATION_ERROR");
    assert!(usecase.images.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_recipe_with_zero_cooking_time() {
    let usecase = create_usecase(MockRecipeRepo::empty());
    let input = CreateRecipeInput {
        cooking_time: 0,
        ..pancakes()
    };

    assert_error(usecase.execute(5, input).await, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_unknown_tag_before_storing_image() {
    let usecase = create_usecase(MockRecipeRepo::empty());
    let input = CreateRecipeInput {
        tags: vec![1, 99],
        ..pancakes()
    };

    assert_error(usecase.execute(5, input).await, "VALIDATION_ERROR");
    assert!(usecase.images.saved.lock().unwrap().is_empty());
    assert!(usecase.repo.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_unknown_ingredient() {
    let usecase = create_usecase(MockRecipeRepo::empty());
    let input = CreateRecipeInput {
        ingredients: vec![IngredientAmountInput {
            ingredient_id: 42,
            amount: 1.0,
        }],
        ..pancakes()
    };

    assert_error(usecase.execute(5, input).await, "VALIDATION_ERROR");
}

#[tokio::test]
async fn should_reject_image_that_is_not_a_data_uri() {
    let usecase = create_usecase(MockRecipeRepo::empty());
    let input = CreateRecipeInput {
        image: "https://example.com/cake.png".to_owned(),
        ..pancakes()
    };

    assert_error(usecase.execute(5, input).await, "VALIDATION_ERROR");
}

// ── UpdateRecipeUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_update_by_non_author() {
    let usecase = update_usecase(MockRecipeRepo::new(vec![test_recipe(1, 10)]));
    let input = UpdateRecipeInput {
        name: Some("Stolen".to_owned()),
        ..Default::default()
    };

    assert_error(
        usecase.execute(11, UserRole::Regular, 1, input).await,
        "FORBIDDEN",
    );
    assert!(usecase.repo.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_allow_staff_to_update_any_recipe() {
    let usecase = update_usecase(MockRecipeRepo::new(vec![test_recipe(1, 10)]));
    let input = UpdateRecipeInput {
        cooking_time: Some(45),
        ..Default::default()
    };

    usecase
        .execute(99, UserRole::Staff, 1, input)
        .await
        .unwrap();

    let updates = usecase.repo.updates.lock().unwrap();
    assert_eq!(updates[0].1.cooking_time, Some(45));
}

#[tokio::test]
async fn should_leave_omitted_fields_untouched_on_partial_update() {
    let usecase = update_usecase(MockRecipeRepo::new(vec![test_recipe(1, 10)]));
    let input = UpdateRecipeInput {
        name: Some("Better pancakes".to_owned()),
        ..Default::default()
    };

    usecase
        .execute(10, UserRole::Regular, 1, input)
        .await
        .unwrap();

    let updates = usecase.repo.updates.lock().unwrap();
    let (id, changes) = &updates[0];
    assert_eq!(*id, 1);
    assert_eq!(changes.name.as_deref(), Some("Better pancakes"));
    assert!(changes.tag_ids.is_none());
    assert!(changes.ingredients.is_none());
    assert!(changes.image.is_none());
    assert!(usecase.images.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_empty_tag_list_on_update() {
    let usecase = update_usecase(MockRecipeRepo::new(vec![test_recipe(1, 10)]));
    let input = UpdateRecipeInput {
        tags: Some(vec![]),
        ..Default::default()
    };

    assert_error(
        usecase.execute(10, UserRole::Regular, 1, input).await,
        "VALIDATION_ERROR",
    );
}

#[tokio::test]
async fn should_return_not_found_when_updating_missing_recipe() {
    let usecase = update_usecase(MockRecipeRepo::empty());

    assert_error(
        usecase
            .execute(10, UserRole::Regular, 1, UpdateRecipeInput::default())
            .await,
        "RECIPE_NOT_FOUND",
    );
}

// ── DeleteRecipeUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_own_recipe() {
    let usecase = DeleteRecipeUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(1, 10)]),
    };

    usecase.execute(10, UserRole::Regular, 1).await.unwrap();
    assert!(usecase.repo.recipes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_delete_by_non_author() {
    let usecase = DeleteRecipeUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(1, 10)]),
    };

    assert_error(
        usecase.execute(11, UserRole::Regular, 1).await,
        "FORBIDDEN",
    );
    assert_eq!(usecase.repo.recipes.lock().unwrap().len(), 1);
}

// ── ListRecipes / GetRecipe ──────────────────────────────────────────────────

#[tokio::test]
async fn should_list_newest_first_with_caller_flags() {
    let marks = CallerMarks {
        favourites: HashSet::from([2]),
        cart: HashSet::from([1]),
        followed: HashSet::from([10]),
    };
    let usecase = ListRecipesUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(1, 10), test_recipe(2, 11)]),
        marks: MockCallerMarks::new(marks),
    };

    let (views, count) = usecase
        .execute(Some(7), &RecipeFilter::default(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(views[0].recipe.id, 2);
    assert!(views[0].is_favorited);
    assert!(!views[0].is_in_shopping_cart);
    assert!(!views[0].author_is_subscribed);
    assert_eq!(views[1].recipe.id, 1);
    assert!(views[1].is_in_shopping_cart);
    assert!(views[1].author_is_subscribed);
}

fn tagged_recipe(id: i32, author_id: i32, slugs: &[&str]) -> foodgram_api::domain::types::Recipe {
    let mut recipe = test_recipe(id, author_id);
    recipe.tags = slugs
        .iter()
        .enumerate()
        .map(|(i, slug)| test_tag(i as i32 + 1, slug))
        .collect();
    recipe
}

fn list_usecase(repo: MockRecipeRepo) -> ListRecipesUseCase<MockRecipeRepo, MockCallerMarks> {
    ListRecipesUseCase {
        repo,
        marks: MockCallerMarks::new(CallerMarks::default()),
    }
}

#[tokio::test]
async fn should_return_tag_union_without_duplicates() {
    let usecase = list_usecase(MockRecipeRepo::new(vec![
        tagged_recipe(1, 10, &["breakfast"]),
        tagged_recipe(2, 10, &["lunch"]),
        tagged_recipe(3, 10, &["breakfast", "lunch"]),
        tagged_recipe(4, 10, &[]),
    ]));
    let filter = RecipeFilter::build(
        None,
        RecipeFilterParams {
            tags: vec!["lunch".into(), "breakfast".into()],
            ..Default::default()
        },
    )
    .unwrap();

    let (views, count) = usecase
        .execute(None, &filter, PageRequest::default())
        .await
        .unwrap();

    let ids: Vec<i32> = views.iter().map(|v| v.recipe.id).collect();
    assert_eq!(count, 3);
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 3);
}

#[tokio::test]
async fn should_filter_by_author() {
    let usecase = list_usecase(MockRecipeRepo::new(vec![
        test_recipe(1, 10),
        test_recipe(2, 11),
        test_recipe(3, 10),
    ]));
    let filter = RecipeFilter {
        author_id: Some(10),
        ..Default::default()
    };

    let (views, count) = usecase
        .execute(None, &filter, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert!(views.iter().all(|v| v.recipe.author.id == 10));
}

#[tokio::test]
async fn should_intersect_tag_author_and_favourite_filters() {
    let repo = MockRecipeRepo::new(vec![
        tagged_recipe(1, 10, &["breakfast"]),
        tagged_recipe(2, 10, &["breakfast"]),
        tagged_recipe(3, 11, &["breakfast"]),
        tagged_recipe(4, 10, &["dinner"]),
    ])
    .with_marks(vec![(7, 1), (7, 3), (7, 4), (8, 2)], vec![]);
    let usecase = list_usecase(repo);
    let filter = RecipeFilter::build(
        Some(7),
        RecipeFilterParams {
            tags: vec!["breakfast".into()],
            author: Some(10),
            is_favorited: Some("1".into()),
            is_in_shopping_cart: None,
        },
    )
    .unwrap();

    let (views, count) = usecase
        .execute(Some(7), &filter, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(count, 1);
    assert_eq!(views[0].recipe.id, 1);
}

#[tokio::test]
async fn should_restrict_to_callers_cart() {
    let repo = MockRecipeRepo::new(vec![test_recipe(1, 10), test_recipe(2, 10)])
        .with_marks(vec![], vec![(7, 2), (8, 1)]);
    let usecase = list_usecase(repo);
    let filter = RecipeFilter {
        in_cart_of: Some(7),
        ..Default::default()
    };

    let (views, count) = usecase
        .execute(Some(7), &filter, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(count, 1);
    assert_eq!(views[0].recipe.id, 2);
}

#[tokio::test]
async fn should_skip_flag_lookup_for_anonymous_caller() {
    let marks = CallerMarks {
        favourites: HashSet::from([1]),
        ..Default::default()
    };
    let usecase = GetRecipeUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(1, 10)]),
        marks: MockCallerMarks::new(marks),
    };

    let view = usecase.execute(None, 1).await.unwrap();

    assert!(!view.is_favorited);
    assert_eq!(*usecase.marks.loads.lock().unwrap(), 0);
}

#[tokio::test]
async fn should_return_not_found_for_missing_recipe() {
    let usecase = GetRecipeUseCase {
        repo: MockRecipeRepo::empty(),
        marks: MockCallerMarks::empty(),
    };

    assert_error(usecase.execute(Some(1), 404).await, "RECIPE_NOT_FOUND");
}
