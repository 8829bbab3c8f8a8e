//! 测试夹具: 三张桌、两道菜、三种原料，后端用 MemoryBackend

#![allow(dead_code)]

use pos_core::{Config, MemoryBackend, OverconsumptionPolicy, PosState, Store};
use shared::models::{
    Category, DiningTable, DiningTableCreate, Ingredient, MenuItem, MenuItemSize, OrderItem, Recipe,
    RecipeIngredient,
};
use std::sync::Arc;

pub fn menu() -> Vec<MenuItem> {
    let mut fried_rice = MenuItem::new(
        "fried-rice",
        "Fried Rice",
        vec![
            MenuItemSize::new(
                "Regular",
                8.0,
                Recipe::new(vec![RecipeIngredient::new("rice", 1.0)]),
            ),
            MenuItemSize::new(
                "Large",
                11.0,
                Recipe::new(vec![
                    RecipeIngredient::new("rice", 1.5),
                    RecipeIngredient::new("egg", 1.0),
                ]),
            ),
        ],
    );
    fried_rice.category_id = Some("mains".into());

    let mut tea = MenuItem::new(
        "iced-tea",
        "Iced Tea",
        vec![MenuItemSize::new(
            "Cup",
            2.5,
            Recipe::new(vec![RecipeIngredient::new("sugar", 0.02)]),
        )],
    );
    tea.category_id = Some("drinks".into());
    vec![fried_rice, tea]
}

pub fn categories() -> Vec<Category> {
    vec![
        Category {
            id: "mains".into(),
            name: "Mains".into(),
            sort_order: 1,
            is_active: true,
        },
        Category {
            id: "drinks".into(),
            name: "Drinks".into(),
            sort_order: 2,
            is_active: true,
        },
    ]
}

pub fn ingredients() -> Vec<Ingredient> {
    vec![
        Ingredient::new("rice", "Rice", "kg", 10.0).with_min_stock(3.0),
        Ingredient::new("sugar", "Sugar", "kg", 3.0).with_min_stock(1.0),
        Ingredient::new("egg", "Egg", "pcs", 12.0).with_min_stock(4.0),
    ]
}

pub fn backend() -> Arc<MemoryBackend> {
    Arc::new(
        MemoryBackend::new()
            .with_menu(categories(), menu())
            .with_ingredients(ingredients())
            .with_tables(vec![
                DiningTable::new("T1", "Window 1", 4),
                DiningTable::new("T2", "Window 2", 4),
                DiningTable::new("T3", "Bar", 2),
            ]),
    )
}

pub fn config(policy: OverconsumptionPolicy) -> Config {
    Config::with_overrides("./target/pos-test", policy)
}

/// State without snapshot store, hydrated from the backend, tables T1..T3
pub async fn pos_with(backend: Arc<MemoryBackend>, policy: OverconsumptionPolicy) -> PosState {
    let state = PosState::new(
        config(policy),
        Store::new(),
        backend.clone(),
        backend,
        None,
    );
    state.hydrate().await;
    for (id, name, capacity) in [("T1", "Window 1", 4), ("T2", "Window 2", 4), ("T3", "Bar", 2)] {
        state
            .tables
            .add_table(DiningTableCreate {
                id: Some(id.into()),
                name: name.into(),
                capacity,
                zone_id: None,
            })
            .unwrap();
    }
    state
}

pub async fn pos() -> (PosState, Arc<MemoryBackend>) {
    let backend = backend();
    let state = pos_with(backend.clone(), OverconsumptionPolicy::Clamp).await;
    (state, backend)
}

pub fn rice(size: &str, quantity: u32) -> OrderItem {
    OrderItem::new("fried-rice", size, quantity)
}

pub fn stock(state: &PosState, ingredient_id: &str) -> f64 {
    state
        .inventory
        .ingredient(ingredient_id)
        .map(|i| i.stock)
        .unwrap_or(f64::NAN)
}
